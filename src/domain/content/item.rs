//! Normalized input text and where it came from.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalizer::normalize;

/// Declared origin of analyzed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    File,
    Url,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Text => "text",
            SourceKind::File => "file",
            SourceKind::Url => "url",
        };
        write!(f, "{}", s)
    }
}

/// Text ready for the prompt. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    text: String,
    source: SourceKind,
    /// Character count before normalization.
    original_length: usize,
    /// File name or URL, when there is one.
    label: Option<String>,
    truncated: bool,
}

impl ContentItem {
    /// Normalizes raw text, keeping at most `max_chars` characters.
    pub fn new(raw: &str, source: SourceKind, max_chars: usize) -> Self {
        let normalized = normalize(raw, max_chars);
        Self {
            text: normalized.text,
            source,
            original_length: raw.chars().count(),
            label: None,
            truncated: normalized.truncated,
        }
    }

    /// Attaches a file name or URL.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn original_length(&self) -> usize {
        self.original_length
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// True when the raw text was longer than the limit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// True when nothing is left to analyze.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_source_and_original_length() {
        let item = ContentItem::new("  Hello\n\nworld  ", SourceKind::Text, 4000);

        assert_eq!(item.text(), "Hello world");
        assert_eq!(item.source(), SourceKind::Text);
        assert_eq!(item.original_length(), 16);
        assert!(!item.is_truncated());
        assert!(!item.is_empty());
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        let item = ContentItem::new(" \n\t ", SourceKind::File, 4000).with_label("notes.txt");
        assert!(item.is_empty());
        assert_eq!(item.label(), Some("notes.txt"));
    }

    #[test]
    fn source_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SourceKind::Url).unwrap(), "\"url\"");
        assert_eq!(SourceKind::File.to_string(), "file");
    }
}
