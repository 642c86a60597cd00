//! Uploaded file text extraction.

use std::fmt;

use super::html::extract_main_text;
use crate::ports::{ExtractionError, FileExtractor, UploadedFile};

/// File kinds the upload endpoint recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    PlainText,
    Html,
    Pdf,
    Docx,
    Image,
}

impl FileKind {
    /// Detects the kind from the declared MIME type, then the file extension.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());
        if let Some(kind) = mime.as_deref().and_then(Self::from_mime) {
            return Some(kind);
        }

        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        extension.as_deref().and_then(Self::from_extension)
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/plain" | "text/markdown" => Some(FileKind::PlainText),
            "text/html" => Some(FileKind::Html),
            "application/pdf" => Some(FileKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(FileKind::Docx)
            }
            "image/jpeg" | "image/jpg" | "image/png" => Some(FileKind::Image),
            _ => None,
        }
    }

    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "txt" | "md" => Some(FileKind::PlainText),
            "html" | "htm" => Some(FileKind::Html),
            "pdf" => Some(FileKind::Pdf),
            "docx" => Some(FileKind::Docx),
            "jpg" | "jpeg" | "png" => Some(FileKind::Image),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::PlainText => "text",
            FileKind::Html => "html",
            FileKind::Pdf => "pdf",
            FileKind::Docx => "docx",
            FileKind::Image => "image",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// `FileExtractor` for plain text and HTML uploads.
#[derive(Debug, Clone, Copy)]
pub struct StandardFileExtractor {
    max_bytes: usize,
}

impl StandardFileExtractor {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl FileExtractor for StandardFileExtractor {
    fn extract(&self, upload: &UploadedFile) -> Result<String, ExtractionError> {
        extract_file_text(upload, self.max_bytes)
    }
}

/// Extracts the text of an uploaded file.
///
/// Text files come back trimmed but otherwise untouched; the normalizer
/// does the rest.
pub fn extract_file_text(upload: &UploadedFile, max_bytes: usize) -> Result<String, ExtractionError> {
    if upload.bytes.len() > max_bytes {
        return Err(ExtractionError::TooLarge {
            size: upload.bytes.len(),
            limit: max_bytes,
        });
    }

    let content_type = upload.content_type.as_deref();
    let file_name = upload.file_name.as_deref();
    let kind = FileKind::detect(content_type, file_name).ok_or_else(|| {
        ExtractionError::UnsupportedFormat(
            content_type.or(file_name).unwrap_or("unknown").to_string(),
        )
    })?;

    match kind {
        FileKind::PlainText => Ok(decode_text(&upload.bytes).trim().to_string()),
        FileKind::Html => extract_main_text(&decode_text(&upload.bytes)),
        FileKind::Pdf | FileKind::Docx | FileKind::Image => {
            Err(ExtractionError::ExtractorUnavailable(kind.to_string()))
        }
    }
}

/// Decodes UTF-8, falling back to Latin-1 for anything else.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: &[u8], name: &str, mime: Option<&str>) -> UploadedFile {
        let file = UploadedFile::new(bytes).with_file_name(name);
        match mime {
            Some(mime) => file.with_content_type(mime),
            None => file,
        }
    }

    #[test]
    fn detects_by_mime_before_extension() {
        assert_eq!(
            FileKind::detect(Some("text/html; charset=utf-8"), Some("notes.txt")),
            Some(FileKind::Html)
        );
        assert_eq!(
            FileKind::detect(Some("application/octet-stream"), Some("Notes.TXT")),
            Some(FileKind::PlainText)
        );
        assert_eq!(FileKind::detect(None, Some("scan.jpeg")), Some(FileKind::Image));
        assert_eq!(FileKind::detect(None, Some("archive.zip")), None);
        assert_eq!(FileKind::detect(None, None), None);
    }

    #[test]
    fn plain_text_is_trimmed() {
        let text = extract_file_text(&upload(b"  hello there \n", "a.txt", None), 1024).unwrap();
        assert_eq!(text, "hello there");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // "café" in Latin-1
        assert_eq!(decode_text(&[0x63, 0x61, 0x66, 0xE9]), "café");
        assert_eq!(decode_text("naïve".as_bytes()), "naïve");
        assert_eq!(decode_text(b"\xEF\xBB\xBFbom"), "bom");
    }

    #[test]
    fn latin1_upload_is_decoded_through_the_extractor() {
        let text = extract_file_text(&upload(b" caf\xE9 au lait ", "menu.txt", None), 1024).unwrap();
        assert_eq!(text, "café au lait");

        let html = b"<html><body><article>R\xE9sum\xE9</article></body></html>";
        let text = extract_file_text(&upload(html, "cv.html", Some("text/html")), 1024).unwrap();
        assert_eq!(text, "Résumé");
    }

    #[test]
    fn html_upload_uses_main_text() {
        let html = b"<html><body><nav>menu</nav><article>Post text</article></body></html>";
        let text = extract_file_text(&upload(html, "page.html", None), 1024).unwrap();
        assert_eq!(text, "Post text");
    }

    #[test]
    fn recognized_binary_formats_have_no_extractor() {
        let err = extract_file_text(&upload(b"%PDF-1.7", "doc.pdf", Some("application/pdf")), 1024)
            .unwrap_err();
        assert_eq!(err.to_string(), "no extractor available for pdf");

        let err = extract_file_text(&upload(b"\x89PNG", "x.png", None), 1024).unwrap_err();
        assert_eq!(err, ExtractionError::ExtractorUnavailable("image".to_string()));
    }

    #[test]
    fn unknown_types_are_unsupported() {
        let err = extract_file_text(&upload(b"PK", "a.zip", Some("application/zip")), 1024)
            .unwrap_err();
        assert_eq!(err, ExtractionError::UnsupportedFormat("application/zip".to_string()));
    }

    #[test]
    fn extractor_applies_its_size_limit() {
        let extractor = StandardFileExtractor::new(4);
        assert!(extractor.extract(&upload(b"tiny", "a.txt", None)).is_ok());
        assert!(matches!(
            extractor.extract(&upload(b"too big", "a.txt", None)),
            Err(ExtractionError::TooLarge { .. })
        ));
    }

    #[test]
    fn oversized_uploads_are_rejected_first() {
        let err = extract_file_text(&upload(&[b'a'; 11], "a.zip", None), 10).unwrap_err();
        assert_eq!(err, ExtractionError::TooLarge { size: 11, limit: 10 });
    }
}
