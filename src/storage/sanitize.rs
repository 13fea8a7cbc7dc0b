/// Characters that may not appear in a path component
pub const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turns a breadcrumb segment or title into a single filesystem-safe component
///
/// Every forbidden character becomes `_`, then surrounding whitespace is
/// trimmed. Names that would still escape the directory (`""`, `.`, `..`)
/// become `_`.
///
/// # Examples
///
/// ```
/// use kb_mirror::storage::sanitize_component;
///
/// assert_eq!(sanitize_component("  Ошибка: a/b?  "), "Ошибка_ a_b_");
/// ```
pub fn sanitize_component(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let trimmed = replaced.trim();
    match trimmed {
        "" | "." | ".." => "_".to_string(),
        _ => trimmed.to_string(),
    }
}
