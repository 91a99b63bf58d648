//! Format sniffing and backend dispatch.

use tracing::debug;

use super::{PdfTextDetector, TextDetector};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Payload format recognized from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Pdf,
    Image,
    Unknown,
}

/// Classify a payload by its leading bytes.
pub fn sniff_format(data: &[u8]) -> PayloadFormat {
    const IMAGE_MAGIC: [&[u8]; 6] = [
        b"\x89PNG",
        b"\xFF\xD8\xFF",
        b"II*\x00",
        b"MM\x00*",
        b"GIF8",
        b"BM",
    ];

    if data.starts_with(b"%PDF") {
        PayloadFormat::Pdf
    } else if IMAGE_MAGIC.iter().any(|magic| data.starts_with(magic))
        || (data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP")
    {
        PayloadFormat::Image
    } else {
        PayloadFormat::Unknown
    }
}

/// Detector routing PDFs and images to the matching backend.
pub struct AutoDetector {
    pdf: PdfTextDetector,
    image: Option<Box<dyn TextDetector>>,
}

impl AutoDetector {
    /// PDF-only detector; images fail with `UnsupportedFormat`.
    pub fn new() -> Self {
        Self {
            pdf: PdfTextDetector::new(),
            image: None,
        }
    }

    /// Attach a backend for image payloads.
    pub fn with_image_detector(mut self, detector: Box<dyn TextDetector>) -> Self {
        self.image = Some(detector);
        self
    }

    /// Build from configuration, loading image OCR models when configured.
    #[cfg(feature = "native")]
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let detector = Self::new();
        Ok(match super::ImageTextDetector::from_config(config)? {
            Some(image) => detector.with_image_detector(Box::new(image)),
            None => detector,
        })
    }

    /// Build from configuration. Image OCR requires the `native` feature.
    #[cfg(not(feature = "native"))]
    pub fn from_config(_config: &OcrConfig) -> Result<Self, OcrError> {
        Ok(Self::new())
    }
}

impl Default for AutoDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDetector for AutoDetector {
    fn detect_lines(&self, data: &[u8]) -> Result<Vec<String>, OcrError> {
        let format = sniff_format(data);
        debug!("Payload format: {:?}", format);

        match format {
            PayloadFormat::Pdf => self.pdf.detect_lines(data),
            PayloadFormat::Image => match &self.image {
                Some(detector) => detector.detect_lines(data),
                None => Err(OcrError::UnsupportedFormat(
                    "image OCR models not configured".to_string(),
                )),
            },
            PayloadFormat::Unknown => Err(OcrError::UnsupportedFormat(
                "unrecognized file signature".to_string(),
            )),
        }
    }
}
