//! kb-mirror main entry point
//!
//! Command-line interface for mirroring a knowledge base to a local directory tree.

use anyhow::{bail, Context};
use clap::Parser;
use kb_mirror::config::{load_config_with_hash, validate_session_id, Config};
use kb_mirror::crawler::Crawler;
use kb_mirror::output::print_report;
use kb_mirror::storage::ArticleStore;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

/// kb-mirror: an incremental knowledge-base mirror
///
/// Walks the catalog's sections, categories and paginated article listings,
/// and stores every article as a text file with its images next to it.
/// Articles whose stored copy is already up to date are left untouched.
#[derive(Parser, Debug)]
#[command(name = "kb-mirror")]
#[command(version)]
#[command(about = "An incremental knowledge-base mirror", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Process a single article instead of the whole catalog
    #[arg(long, value_name = "URL")]
    article: Option<Url>,

    /// Session cookie value (overrides site.session-id)
    #[arg(long, env = "KB_SESSION_ID", hide_env_values = true)]
    session_id: Option<String>,

    /// Remove the output directory before crawling
    #[arg(long, conflicts_with = "dry_run")]
    fresh: bool,

    /// Walk the catalog and report what would be mirrored without writing anything
    #[arg(long, conflicts_with = "article")]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    setup_logging(cli.verbose, cli.quiet, config.output.log_file.as_deref())?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    let session_id = resolve_session_id(cli.session_id.as_deref(), &config)?;

    if cli.dry_run {
        return handle_dry_run(&config, &session_id).await;
    }

    if cli.fresh {
        let store = ArticleStore::from_config(&config.output);
        tracing::info!("Removing {} before crawling", store.root().display());
        store.clean().context("Failed to clean output directory")?;
    }

    let crawler = Crawler::new(&config, &session_id)?;
    let report = match &cli.article {
        Some(url) => {
            tracing::info!("Processing single article {}", url);
            crawler.run_single(url).await
        }
        None => {
            tracing::info!("Starting crawl of {}", config.site.catalog_url());
            crawler.run().await
        }
    };

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Console output is always on; `log_file` adds a plain-text layer appending
/// to that file.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kb_mirror=info,warn"),
            1 => EnvFilter::new("kb_mirror=debug,info"),
            2 => EnvFilter::new("kb_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = match log_file {
        Some(log_file) => {
            let (dir, file_name) = split_log_path(Path::new(log_file))?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = RollingFileAppender::new(Rotation::NEVER, dir, file_name);
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn split_log_path(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        bail!("log-file {} has no file name", path.display());
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((dir, file_name.to_string()))
}

/// Picks the session token from the command line/environment, then the config
fn resolve_session_id(cli_value: Option<&str>, config: &Config) -> anyhow::Result<String> {
    let Some(session_id) = cli_value.or(config.site.session_id.as_deref()) else {
        bail!("No session id given: set site.session-id, --session-id or KB_SESSION_ID");
    };

    validate_session_id(session_id)?;
    Ok(session_id.to_string())
}

/// Handles the --dry-run mode: walks the catalog without fetching articles
async fn handle_dry_run(config: &Config, session_id: &str) -> anyhow::Result<()> {
    println!("=== kb-mirror Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Catalog URL: {}", config.site.catalog_url());
    println!("  Cookie: {}", config.site.cookie_name);

    println!("\nCrawler:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Category delay: {}ms", config.crawler.category_delay_ms);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nOutput:");
    println!("  Root: {}", config.output.root_dir);
    println!("  Images: {}", config.output.images_dir);
    if let Some(log_file) = &config.output.log_file {
        println!("  Log file: {}", log_file);
    }

    let crawler = Crawler::new(config, session_id)?;
    let categories = crawler.collect_categories().await;

    println!("\nCategories ({}):", categories.len());
    let mut total = 0;
    for category in &categories {
        let articles = crawler.collect_articles(category).await;
        println!("  - {} ({} articles)", category, articles.len());
        total += articles.len();
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would check {} article links", total);

    Ok(())
}
