//! Content normalization.

/// Hard cap on normalized text, in characters.
pub const MAX_CONTENT_CHARS: usize = 50_000;

/// Collapse whitespace and cap the length of extracted text.
///
/// Every whitespace run (newlines and tabs included) becomes one space,
/// non-whitespace control characters are dropped, and the result is cut to
/// [`MAX_CONTENT_CHARS`] characters. Leading and trailing whitespace never
/// survives, which keeps the function idempotent.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => collapsed[..cut].trim_end().to_string(),
        None => collapsed,
    }
}
