//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Attaching the session cookie to requests for the knowledge-base host
//! - GET requests for HTML pages and image bytes
//! - Error classification (status, timeout, transport)

use crate::config::Config;
use crate::url::same_origin;
use crate::{ConfigError, KbError};
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult<B> {
    /// Server answered 200
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: B,
    },

    /// Server answered with any other status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, broken body)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the timeout
        timed_out: bool,
    },
}

impl<B> FetchResult<B> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts the result into the body or a fetch failure for `url`
    pub fn into_body(self, url: &Url) -> Result<B, KbError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::HttpError { status_code } => Err(KbError::HttpStatus {
                url: url.to_string(),
                status: status_code,
            }),
            Self::NetworkError { timed_out: true, .. } => Err(KbError::Timeout {
                url: url.to_string(),
            }),
            Self::NetworkError { error, .. } => Err(KbError::Network {
                url: url.to_string(),
                message: error,
            }),
        }
    }
}

/// Issues authenticated GET requests against the knowledge base
///
/// The fetcher owns the session cookie for the whole crawl. It is only sent
/// to the knowledge-base origin; image hosts elsewhere get plain requests.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    origin: Url,
    cookie: HeaderValue,
}

impl PageFetcher {
    /// Builds a fetcher for `origin` that authenticates with `cookie_name=session_id`
    pub fn new(
        origin: Url,
        cookie_name: &str,
        session_id: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, KbError> {
        let cookie = HeaderValue::from_str(&format!("{}={}", cookie_name, session_id))
            .map_err(|e| ConfigError::Validation(format!("Invalid session cookie: {}", e)))?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            origin,
            cookie,
        })
    }

    /// Builds a fetcher from the configuration and a session token
    pub fn from_config(config: &Config, session_id: &str) -> Result<Self, KbError> {
        let origin = Url::parse(&config.site.base_url)?;
        Self::new(
            origin,
            &config.site.cookie_name,
            session_id,
            &config.crawler.user_agent,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )
    }

    /// Fetches a page and returns its decoded text
    pub async fn fetch_html(&self, url: &Url) -> FetchResult<String> {
        let (final_url, status_code, response) = match self.send(url).await {
            Ok(parts) => parts,
            Err(failure) => return failure,
        };

        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code,
                body,
            },
            Err(e) => classify_error(&e),
        }
    }

    /// Fetches raw bytes (used for images)
    pub async fn fetch_bytes(&self, url: &Url) -> FetchResult<Vec<u8>> {
        let (final_url, status_code, response) = match self.send(url).await {
            Ok(parts) => parts,
            Err(failure) => return failure,
        };

        match response.bytes().await {
            Ok(bytes) => FetchResult::Success {
                final_url,
                status_code,
                body: bytes.to_vec(),
            },
            Err(e) => classify_error(&e),
        }
    }

    /// Sends the GET request and keeps only 200 responses
    async fn send<B>(&self, url: &Url) -> Result<(String, u16, Response), FetchResult<B>> {
        let mut request = self.client.get(url.clone());
        if same_origin(&self.origin, url) {
            request = request.header(COOKIE, self.cookie.clone());
        }

        let response = request.send().await.map_err(|e| classify_error(&e))?;
        let status = response.status();

        if status.as_u16() != 200 {
            return Err(FetchResult::HttpError {
                status_code: status.as_u16(),
            });
        }

        Ok((response.url().to_string(), status.as_u16(), response))
    }
}

fn classify_error<B>(e: &reqwest::Error) -> FetchResult<B> {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}
