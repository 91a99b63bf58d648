//! Text detection for PDFs with an embedded text layer.

use lopdf::Document;
use tracing::debug;

use super::TextDetector;
use crate::error::OcrError;

/// Text detector reading the embedded text layer with `lopdf` and
/// `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextDetector;

impl PdfTextDetector {
    pub fn new() -> Self {
        Self
    }

    /// Load the document, decrypting empty-password PDFs, and return bytes
    /// suitable for `pdf-extract`.
    fn prepare(&self, data: &[u8]) -> Result<Vec<u8>, OcrError> {
        let mut doc = Document::load_mem(data).map_err(|e| OcrError::Pdf(e.to_string()))?;

        if doc.get_pages().is_empty() {
            return Err(OcrError::Pdf("PDF has no pages".to_string()));
        }

        if !doc.is_encrypted() {
            return Ok(data.to_vec());
        }

        if doc.decrypt("").is_err() {
            return Err(OcrError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| OcrError::Pdf(format!("failed to save decrypted PDF: {}", e)))?;
        Ok(decrypted)
    }
}

impl TextDetector for PdfTextDetector {
    fn detect_lines(&self, data: &[u8]) -> Result<Vec<String>, OcrError> {
        let prepared = self.prepare(data)?;
        let text = pdf_extract::extract_text_from_mem(&prepared)
            .map_err(|e| OcrError::Pdf(e.to_string()))?;

        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!("PDF text layer yielded {} lines", lines.len());
        Ok(lines)
    }
}
