/// Freshness states of a mirrored article
///
/// Every article starts as `Unknown` and is resolved by the staleness check
/// into exactly one of `Missing`, `Stale` or `Fresh`.
use std::fmt;

/// Why a stored article no longer matches the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaleReason {
    /// The rendered text differs from the stored file
    ContentChanged,

    /// The text matches but the image with this ordinal is absent on disk
    ImageMissing(u32),

    /// The stored file exists but could not be read
    Unreadable,

    /// The source could not be fetched or extracted during the check
    CheckFailed,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentChanged => write!(f, "content changed"),
            Self::ImageMissing(n) => write!(f, "image {} missing", n),
            Self::Unreadable => write!(f, "stored file unreadable"),
            Self::CheckFailed => write!(f, "check failed"),
        }
    }
}

/// Represents where a stored article stands relative to the live source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticleState {
    /// Not checked yet
    Unknown,

    /// No stored file exists at the derived path
    Missing,

    /// A stored file exists but must be re-written
    Stale(StaleReason),

    /// Stored text and every image file are up to date
    Fresh,
}

impl ArticleState {
    /// Returns true if the article has to be extracted and written again
    ///
    /// `Unknown` counts as needing an update: an unchecked article is never
    /// silently skipped.
    pub fn needs_update(&self) -> bool {
        !matches!(self, Self::Fresh)
    }

    /// Returns true if existing image files can be kept as they are
    ///
    /// Only an image-only staleness keeps them; a text change may have
    /// reordered or replaced the images, so those are downloaded again.
    pub fn keeps_existing_images(&self) -> bool {
        matches!(self, Self::Stale(StaleReason::ImageMissing(_)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Missing => "missing",
            Self::Stale(_) => "stale",
            Self::Fresh => "fresh",
        }
    }
}

impl fmt::Display for ArticleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stale(reason) => write!(f, "stale ({})", reason),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
