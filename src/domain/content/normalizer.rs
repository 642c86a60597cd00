//! Content normalization before prompting.

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub truncated: bool,
}

/// Truncates to `max_chars` characters, then collapses all whitespace runs
/// (newlines included) into single spaces and trims the ends.
///
/// Truncation counts characters, never bytes, so multi-byte text is never
/// split inside a code point.
pub fn normalize(raw: &str, max_chars: usize) -> Normalized {
    let (head, truncated) = match raw.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&raw[..byte_idx], true),
        None => (raw, false),
    };

    Normalized {
        text: collapse_whitespace(head),
        truncated,
    }
}

/// Collapses whitespace runs into single spaces and trims.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
