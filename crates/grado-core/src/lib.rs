//! Core library for graduation document intake.
//!
//! This crate provides:
//! - Per-slot keyword dictionaries with an in-memory cache
//! - A text extraction adapter over an external OCR service
//! - Layered document validation (content, HTML sniffing, size heuristics)
//! - Rule-based field extraction (ID numbers, registration codes, institution, program, dates)
//! - Assembly of the flat output record for a form submission

pub mod error;
pub mod models;
pub mod dictionary;
pub mod ocr;
pub mod extraction;
pub mod validation;
pub mod record;

pub use error::{DocumentError, GradoError, Result};
pub use models::slot::DocumentSlot;
pub use models::submission::{DownloadedFile, Submission};
pub use models::record::{DocumentStatus, Flag, OutputRecord};
pub use dictionary::DictionaryStore;
pub use ocr::{AutoDetector, PdfTextDetector, TextDetector, TextExtractor};
#[cfg(feature = "native")]
pub use ocr::ImageTextDetector;
pub use extraction::{extract_fields, extract_from_filename, ExtractedField, ExtractedFields};
pub use validation::{
    is_valid, InstitutionValidator, ValidationEngine, ValidationMethod, ValidationOutcome,
};
pub use record::RecordAssembler;
