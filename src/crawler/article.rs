//! Article data model
//!
//! Extraction produces an [`ArticleDraft`]: an immutable, ordered list of
//! content blocks where images are still remote references. Once the images
//! have been materialized, the draft is resolved into an [`ArticleRecord`]
//! whose body carries `$<n>` placeholders instead.

use url::Url;

/// Fallback label for a missing first breadcrumb
pub const NO_DATABASE: &str = "Без категории";

/// Fallback label for a missing second breadcrumb
pub const NO_SECTION: &str = "Без раздела";

/// Fallback label for a missing third breadcrumb
pub const NO_CATEGORY: &str = "Без подраздела";

/// The navigation trail of an article: database, section, category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub database: String,
    pub section: String,
    pub category: String,
}

impl Breadcrumb {
    /// Builds a breadcrumb from positional segments
    ///
    /// Positions that are absent or blank take their fallback label; extra
    /// segments are ignored.
    pub fn from_segments(segments: Vec<String>) -> Self {
        let mut segments = segments.into_iter();
        let mut next = |fallback: &str| {
            segments
                .next()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        let database = next(NO_DATABASE);
        let section = next(NO_SECTION);
        let category = next(NO_CATEGORY);

        Self {
            database,
            section,
            category,
        }
    }

    pub fn segments(&self) -> [&str; 3] {
        [&self.database, &self.section, &self.category]
    }
}

/// A piece of extracted content, before images are downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Image(Url),
}

/// One direct child of the content container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentBlock {
    pub fragments: Vec<Fragment>,
}

/// Result of extraction: everything needed to file and render an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub url: String,
    pub breadcrumb: Breadcrumb,
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

impl ArticleDraft {
    /// Image sources in document order
    pub fn image_sources(&self) -> Vec<&Url> {
        self.blocks
            .iter()
            .flat_map(|block| block.fragments.iter())
            .filter_map(|fragment| match fragment {
                Fragment::Image(src) => Some(src),
                Fragment::Text(_) => None,
            })
            .collect()
    }

    pub fn image_count(&self) -> usize {
        self.image_sources().len()
    }

    /// Resolves images into placeholders
    ///
    /// `assignments[i]` is the number given to the i-th image source, or
    /// `None` if it could not be materialized; unassigned images are dropped
    /// from the body. Blocks left without any content are dropped too.
    pub fn to_record(&self, assignments: &[Option<u32>]) -> ArticleRecord {
        let mut image_index = 0;
        let mut image_urls = Vec::new();
        let mut body = Vec::new();

        for block in &self.blocks {
            let mut inlines = Vec::new();
            for fragment in &block.fragments {
                match fragment {
                    Fragment::Text(text) => {
                        if !text.is_empty() {
                            inlines.push(Inline::Text(text.clone()));
                        }
                    }
                    Fragment::Image(src) => {
                        if let Some(number) = assignments.get(image_index).copied().flatten() {
                            inlines.push(Inline::Placeholder(number));
                            image_urls.push(src.to_string());
                        }
                        image_index += 1;
                    }
                }
            }
            if !inlines.is_empty() {
                body.push(Paragraph { inlines });
            }
        }

        ArticleRecord {
            url: self.url.clone(),
            breadcrumb: self.breadcrumb.clone(),
            title: self.title.clone(),
            body,
            image_urls,
        }
    }

    /// The record as it would look if every image were materialized as `1..=N`
    pub fn expected_record(&self) -> ArticleRecord {
        let assignments: Vec<Option<u32>> = (1..=self.image_count() as u32).map(Some).collect();
        self.to_record(&assignments)
    }
}

/// A resolved piece of body content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Placeholder(u32),
}

/// A paragraph of the stored body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    /// Renders the paragraph as one line, pieces separated by a single space
    pub fn render(&self) -> String {
        self.inlines
            .iter()
            .map(|inline| match inline {
                Inline::Text(text) => text.clone(),
                Inline::Placeholder(n) => format!("${}", n),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A fully resolved article, ready to be stored
///
/// Invariant: the placeholders in `body` are exactly `1..=image_urls.len()`
/// in order, and `image_urls[n - 1]` is the source of placeholder `$n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub url: String,
    pub breadcrumb: Breadcrumb,
    pub title: String,
    pub body: Vec<Paragraph>,
    pub image_urls: Vec<String>,
}

impl ArticleRecord {
    /// Body text, paragraphs separated by a blank line
    pub fn render_body(&self) -> String {
        self.body
            .iter()
            .map(Paragraph::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Placeholder numbers in body order
    pub fn placeholders(&self) -> Vec<u32> {
        self.body
            .iter()
            .flat_map(|p| p.inlines.iter())
            .filter_map(|inline| match inline {
                Inline::Placeholder(n) => Some(*n),
                Inline::Text(_) => None,
            })
            .collect()
    }
}
