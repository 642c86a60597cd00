//! Content module - normalized input for analysis.

mod item;
mod normalizer;
mod page_context;

pub use item::{ContentItem, SourceKind};
pub use normalizer::{collapse_whitespace, normalize, Normalized};
pub use page_context::{
    MediaKind, PageContext, PageImage, PageMetadata, VisualElement, SUMMARY_IMAGE_LIMIT,
};
