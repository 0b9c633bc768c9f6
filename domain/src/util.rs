//! Shared utility functions.

/// Truncate a string to at most `max_chars` characters.
///
/// Returns a sub-slice of the original string, always ending on a UTF-8
/// character boundary. If the string has `max_chars` characters or fewer,
/// the entire string is returned unchanged.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Display preview: the first `max_chars` characters followed by `...`
/// when anything was cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    let head = truncate_chars(s, max_chars);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}...", head)
    }
}
