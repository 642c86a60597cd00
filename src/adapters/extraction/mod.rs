//! Content extraction adapters.
//!
//! - `HttpContentFetcher` - `ContentFetcher` over reqwest
//! - `StandardFileExtractor` - `FileExtractor` for text and HTML uploads
//! - `extract_main_text` / `extract_page_context` - HTML parsing with scraper

mod file;
mod html;
mod url_fetcher;

pub use file::{decode_text, extract_file_text, FileKind, StandardFileExtractor};
pub use html::{extract_main_text, extract_page_context, MAX_EMBEDS, MAX_IMAGES, MAX_VIDEOS};
pub use url_fetcher::{
    validate_url, HttpContentFetcher, BROWSER_USER_AGENT, DEFAULT_MAX_BODY_BYTES,
};
