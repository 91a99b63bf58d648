//! Error types for the grado-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a submission before any slot is validated.
#[derive(Error, Debug)]
pub enum GradoError {
    /// The form submission is not valid JSON for the form model.
    #[error("invalid form submission: {0}")]
    Submission(#[from] serde_json::Error),

    /// OCR backend setup error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Dictionary installation error.
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures that can happen while validating a single document slot.
///
/// None of these escape the record assembler: each one downgrades the
/// affected slot to manual review.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The payload is an HTML page rather than a document.
    #[error("HTML payload detected")]
    HtmlPayloadDetected,

    /// The OCR service recognized no text lines.
    #[error("no text extracted")]
    NoTextExtracted,

    /// The file is below the absolute minimum size for any document.
    #[error("file too small: {size} bytes (minimum {minimum})")]
    FileTooSmall { size: u64, minimum: u64 },

    /// The file could not be stat'ed or read.
    #[error("unreadable file {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A status value outside the output vocabulary.
    #[error("unknown slot status: {0}")]
    UnknownSlotStatus(String),

    /// The OCR service itself failed.
    #[error("OCR service failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Errors raised by text detection backends.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The payload format is not handled by any backend.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// PDF parsing or text extraction failed.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("text detection failed: {0}")]
    Detection(String),
}

/// Errors related to dictionary resources.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Resource name is not a plain file name.
    #[error("invalid dictionary name: {0}")]
    InvalidName(String),

    /// Writing a provided dictionary failed.
    #[error("failed to write dictionary {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the grado library.
pub type Result<T> = std::result::Result<T, GradoError>;
