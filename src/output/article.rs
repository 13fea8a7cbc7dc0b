use crate::crawler::ArticleRecord;

/// First line of every stored article
pub const METADATA_MARKER: &str = "# Метаданные";

/// Line separating the metadata block from the body
pub const CONTENT_MARKER: &str = "# Содержание";

/// Renders an article into the text stored on disk
///
/// ```text
/// # Метаданные
/// # URL: <url>
/// # Название: <title>
/// # База: <database>
/// # Раздел: <section>
/// # Категория: <category>
///
/// # Содержание
///
/// <body>
/// ```
pub fn render_article(record: &ArticleRecord) -> String {
    let lines = [
        METADATA_MARKER.to_string(),
        format!("# URL: {}", record.url),
        format!("# Название: {}", record.title),
        format!("# База: {}", record.breadcrumb.database),
        format!("# Раздел: {}", record.breadcrumb.section),
        format!("# Категория: {}", record.breadcrumb.category),
        String::new(),
        CONTENT_MARKER.to_string(),
        String::new(),
        record.render_body(),
    ];

    lines.join("\n")
}
