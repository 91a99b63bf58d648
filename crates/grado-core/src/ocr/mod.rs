//! Text extraction adapter over an external OCR service.
//!
//! The adapter refuses HTML payloads before the OCR service is called, so
//! interstitial error pages served by the file host never cost an OCR
//! request.

mod auto;
#[cfg(feature = "native")]
mod raster;
mod pdf;

pub use auto::{sniff_format, AutoDetector, PayloadFormat};
#[cfg(feature = "native")]
pub use raster::ImageTextDetector;
pub use pdf::PdfTextDetector;

use std::path::Path;

use tracing::{debug, info};

use crate::error::{DocumentError, OcrError};

/// Number of leading bytes inspected for an HTML signature.
pub const HEADER_PEEK_LEN: usize = 20;

/// An OCR / text-detection service returning recognized lines.
pub trait TextDetector {
    /// Detect text lines in a document payload.
    fn detect_lines(&self, data: &[u8]) -> Result<Vec<String>, OcrError>;
}

impl<T: TextDetector + ?Sized> TextDetector for &T {
    fn detect_lines(&self, data: &[u8]) -> Result<Vec<String>, OcrError> {
        (**self).detect_lines(data)
    }
}

impl<T: TextDetector + ?Sized> TextDetector for Box<T> {
    fn detect_lines(&self, data: &[u8]) -> Result<Vec<String>, OcrError> {
        (**self).detect_lines(data)
    }
}

/// Whether the leading bytes look like an HTML page or doctype.
pub fn is_html_payload(data: &[u8]) -> bool {
    let head = &data[..data.len().min(HEADER_PEEK_LEN)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let head = head[start..].to_ascii_lowercase();

    head.starts_with(b"<!doctype") || head.starts_with(b"<html") || head.starts_with(b"<!do")
}

/// Adapter turning a file into a single text string via a [`TextDetector`].
pub struct TextExtractor<D: TextDetector> {
    detector: D,
}

impl<D: TextDetector> TextExtractor<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    /// Underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Read a file and extract its text.
    pub fn extract_text(&self, path: &Path) -> Result<String, DocumentError> {
        let data = std::fs::read(path).map_err(|source| DocumentError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract_text_from_bytes(&data)
    }

    /// Extract text from an in-memory payload.
    ///
    /// Recognized lines are joined with single spaces and trimmed.
    pub fn extract_text_from_bytes(&self, data: &[u8]) -> Result<String, DocumentError> {
        if is_html_payload(data) {
            return Err(DocumentError::HtmlPayloadDetected);
        }

        let lines = self.detector.detect_lines(data)?;
        let text = join_lines(&lines);

        if text.is_empty() {
            return Err(DocumentError::NoTextExtracted);
        }

        info!("Extracted {} characters from {} lines", text.len(), lines.len());
        debug!("Text head: {}", text.chars().take(200).collect::<String>());
        Ok(text)
    }
}

fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::Cell;

    use super::*;

    /// Detector returning canned lines and counting invocations.
    pub struct FakeDetector {
        pub lines: Vec<String>,
        pub fail: bool,
        pub calls: Cell<usize>,
    }

    impl FakeDetector {
        pub fn with_text(text: &str) -> Self {
            Self {
                lines: text.lines().map(str::to_string).collect(),
                fail: false,
                calls: Cell::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                lines: Vec::new(),
                fail: true,
                calls: Cell::new(0),
            }
        }
    }

    impl TextDetector for FakeDetector {
        fn detect_lines(&self, _data: &[u8]) -> Result<Vec<String>, OcrError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(OcrError::Detection("service unavailable".to_string()))
            } else {
                Ok(self.lines.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeDetector;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_html_signatures() {
        assert!(is_html_payload(b"<!DOCTYPE html><html>"));
        assert!(is_html_payload(b"<html lang=\"es\">"));
        assert!(is_html_payload(b"<!doctype html>"));
        assert!(is_html_payload(b"\n  <HTML>"));
        assert!(!is_html_payload(b"%PDF-1.7\n"));
        assert!(!is_html_payload(b""));
    }

    #[test]
    fn test_lines_are_space_joined() {
        let extractor = TextExtractor::new(FakeDetector::with_text(
            "  REPUBLICA DE COLOMBIA \n\nCEDULA DE CIUDADANIA\n1007561292 ",
        ));
        let text = extractor.extract_text_from_bytes(b"%PDF-1.4").unwrap();
        assert_eq!(text, "REPUBLICA DE COLOMBIA CEDULA DE CIUDADANIA 1007561292");
    }

    #[test]
    fn test_html_never_reaches_detector() {
        let extractor = TextExtractor::new(FakeDetector::with_text("texto"));
        let result = extractor.extract_text_from_bytes(b"<!DOCTYPE html><p>Error 403</p>");

        assert!(matches!(result, Err(DocumentError::HtmlPayloadDetected)));
        assert_eq!(extractor.detector().calls.get(), 0);
    }

    #[test]
    fn test_no_text_extracted() {
        let extractor = TextExtractor::new(FakeDetector::with_text("   \n  "));
        let result = extractor.extract_text_from_bytes(b"%PDF-1.4");
        assert!(matches!(result, Err(DocumentError::NoTextExtracted)));
    }

    #[test]
    fn test_detector_failure_propagates() {
        let extractor = TextExtractor::new(FakeDetector::failing());
        let result = extractor.extract_text_from_bytes(b"%PDF-1.4");
        assert!(matches!(result, Err(DocumentError::Ocr(_))));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let extractor = TextExtractor::new(FakeDetector::with_text("x"));
        let result = extractor.extract_text(Path::new("/nonexistent/grado/file.pdf"));
        assert!(matches!(result, Err(DocumentError::UnreadableFile { .. })));
    }
}
