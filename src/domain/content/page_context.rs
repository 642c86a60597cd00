//! What a fetched page shows besides its text.

use serde::{Deserialize, Serialize};

/// Images listed in the prompt summary.
pub const SUMMARY_IMAGE_LIMIT: usize = 5;

/// `<head>` metadata worth showing the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
}

/// An `<img>` with whatever text describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    /// Absolute source URL.
    pub src: String,
    pub alt: Option<String>,
    pub title: Option<String>,
}

impl PageImage {
    /// "Alt: ...; Title: ..." or `None` when the image carries no text.
    pub fn description(&self) -> Option<String> {
        let parts: Vec<String> = [("Alt", &self.alt), ("Title", &self.title)]
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}: {}", name, v)))
            .collect();
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

/// Kind of embedded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Embed,
}

/// A `<video>`, `<iframe>`, `<embed>` or `<object>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualElement {
    pub kind: MediaKind,
    pub src: Option<String>,
    /// Title for videos, MIME type for embeds.
    pub detail: Option<String>,
}

impl VisualElement {
    pub fn description(&self) -> String {
        match self.kind {
            MediaKind::Video => format!(
                "Video element: {}",
                self.detail.as_deref().unwrap_or("No title")
            ),
            MediaKind::Embed => format!(
                "Embedded content: {}",
                self.detail.as_deref().unwrap_or("Unknown type")
            ),
        }
    }
}

/// Non-text context of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageContext {
    pub metadata: PageMetadata,
    pub images: Vec<PageImage>,
    pub visual_elements: Vec<VisualElement>,
}

impl PageContext {
    pub fn is_empty(&self) -> bool {
        self.metadata == PageMetadata::default()
            && self.images.is_empty()
            && self.visual_elements.is_empty()
    }

    /// Plain-text summary for the prompt's visual context section.
    ///
    /// Returns `None` when there is nothing worth mentioning.
    pub fn summary(&self) -> Option<String> {
        let mut lines = Vec::new();

        let described: Vec<String> = self
            .images
            .iter()
            .filter_map(PageImage::description)
            .take(SUMMARY_IMAGE_LIMIT)
            .collect();
        if !described.is_empty() {
            lines.push("Images found:".to_string());
            lines.extend(described.into_iter().map(|d| format!("- {}", d)));
        }

        if !self.visual_elements.is_empty() {
            lines.push("Visual elements:".to_string());
            lines.extend(
                self.visual_elements
                    .iter()
                    .map(|e| format!("- {}", e.description())),
            );
        }

        let meta = &self.metadata;
        if let Some(title) = meta.title.as_ref().or(meta.og_title.as_ref()) {
            lines.push(format!("Page Title: {}", title));
        }
        if let Some(description) = meta.description.as_ref().or(meta.og_description.as_ref()) {
            lines.push(format!("Description: {}", description));
        }
        if let Some(author) = &meta.author {
            lines.push(format!("Author: {}", author));
        }
        if let Some(keywords) = &meta.keywords {
            lines.push(format!("Keywords: {}", keywords));
        }

        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(alt: Option<&str>, title: Option<&str>) -> PageImage {
        PageImage {
            src: "https://example.com/a.png".to_string(),
            alt: alt.map(String::from),
            title: title.map(String::from),
        }
    }

    #[test]
    fn image_description_joins_alt_and_title() {
        assert_eq!(
            image(Some("A cat"), Some("Cat pic")).description().as_deref(),
            Some("Alt: A cat; Title: Cat pic")
        );
        assert_eq!(image(None, Some("Only title")).description().as_deref(), Some("Title: Only title"));
        assert_eq!(image(None, None).description(), None);
    }

    #[test]
    fn empty_context_has_no_summary() {
        let context = PageContext::default();
        assert!(context.is_empty());
        assert_eq!(context.summary(), None);
    }

    #[test]
    fn summary_lists_images_media_and_metadata() {
        let context = PageContext {
            metadata: PageMetadata {
                og_title: Some("Launch day".to_string()),
                description: Some("Our new product".to_string()),
                ..Default::default()
            },
            images: vec![image(Some("Team photo"), None), image(None, None)],
            visual_elements: vec![VisualElement {
                kind: MediaKind::Video,
                src: None,
                detail: None,
            }],
        };

        let summary = context.summary().unwrap();
        assert_eq!(
            summary,
            "Images found:\n- Alt: Team photo\nVisual elements:\n- Video element: No title\n\
             Page Title: Launch day\nDescription: Our new product"
        );
    }

    #[test]
    fn summary_caps_image_lines() {
        let context = PageContext {
            images: (0..8).map(|i| image(Some(&format!("img {}", i)), None)).collect(),
            ..Default::default()
        };
        let summary = context.summary().unwrap();
        assert_eq!(summary.lines().filter(|l| l.starts_with("- ")).count(), SUMMARY_IMAGE_LIMIT);
    }
}
