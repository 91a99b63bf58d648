//! Document validation.
//!
//! A document is accepted when its text matches the slot dictionary, or,
//! failing that, when its size is consistent with a genuine document of
//! that type. HTML payloads skip OCR and are judged by size only.

mod institution;
mod keywords;
pub mod strategy;

pub use institution::InstitutionValidator;
pub use keywords::is_valid;

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dictionary::DictionaryStore;
use crate::error::DocumentError;
use crate::extraction::ExtractedFields;
use crate::models::config::ValidationConfig;
use crate::models::slot::DocumentSlot;
use crate::models::submission::DownloadedFile;
use crate::ocr::{is_html_payload, TextDetector, TextExtractor, HEADER_PEEK_LEN};
use strategy::{SlotContext, Verdict, STRATEGIES};

/// How a document was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationMethod {
    /// Dictionary match on extracted text.
    #[serde(rename = "textract")]
    Textract,
    /// HTML payload accepted on size.
    #[serde(rename = "size-html")]
    SizeHtml,
    /// Size accepted after content validation was inconclusive.
    #[serde(rename = "alternative-size")]
    SizeFallback,
}

impl ValidationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationMethod::Textract => "textract",
            ValidationMethod::SizeHtml => "size-html",
            ValidationMethod::SizeFallback => "alternative-size",
        }
    }
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid {
        method: ValidationMethod,
        fields: ExtractedFields,
    },
    NeedsManualReview {
        reason: String,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    pub fn method(&self) -> Option<ValidationMethod> {
        match self {
            ValidationOutcome::Valid { method, .. } => Some(*method),
            ValidationOutcome::NeedsManualReview { .. } => None,
        }
    }

    /// Extracted fields of a valid outcome.
    pub fn fields(&self) -> Option<&ExtractedFields> {
        match self {
            ValidationOutcome::Valid { fields, .. } => Some(fields),
            ValidationOutcome::NeedsManualReview { .. } => None,
        }
    }

    fn manual(reason: impl Into<String>) -> Self {
        ValidationOutcome::NeedsManualReview {
            reason: reason.into(),
        }
    }
}

/// Runs the validation strategies for one slot at a time.
pub struct ValidationEngine<'a, D: TextDetector> {
    store: &'a DictionaryStore,
    extractor: TextExtractor<D>,
    config: ValidationConfig,
}

impl<'a, D: TextDetector> ValidationEngine<'a, D> {
    pub fn new(store: &'a DictionaryStore, detector: D, config: ValidationConfig) -> Self {
        Self {
            store,
            extractor: TextExtractor::new(detector),
            config,
        }
    }

    pub fn store(&self) -> &'a DictionaryStore {
        self.store
    }

    pub fn extractor(&self) -> &TextExtractor<D> {
        &self.extractor
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a downloaded file for `slot`. Never fails: every error
    /// resolves to `NeedsManualReview` or defers to the next strategy.
    pub fn validate(&self, file: &DownloadedFile, slot: DocumentSlot) -> ValidationOutcome {
        let ctx = match inspect(file, slot) {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("{}: {}", slot, e);
                return ValidationOutcome::manual(e.to_string());
            }
        };
        debug!("{}: {} bytes, html={}", slot, ctx.size, ctx.html);

        for strategy in STRATEGIES {
            match strategy.evaluate(self, &ctx) {
                Ok(Verdict::Valid { method, fields }) => {
                    info!("{}: valid ({}), {} field(s)", slot, method, fields.len());
                    return ValidationOutcome::Valid { method, fields };
                }
                Ok(Verdict::Reject(reason)) => {
                    info!("{}: manual review ({})", slot, reason);
                    return ValidationOutcome::manual(reason);
                }
                Ok(Verdict::Pass) => {}
                Err(e) => debug!("{}: {:?} inconclusive: {}", slot, strategy, e),
            }
        }

        ValidationOutcome::manual("no strategy accepted the document")
    }
}

fn inspect(file: &DownloadedFile, slot: DocumentSlot) -> Result<SlotContext<'_>, DocumentError> {
    let unreadable = |source: std::io::Error| DocumentError::UnreadableFile {
        path: file.path.clone(),
        source,
    };

    let size = std::fs::metadata(&file.path).map_err(unreadable)?.len();
    let head = read_head(&file.path).map_err(unreadable)?;

    Ok(SlotContext {
        slot,
        file,
        size,
        html: is_html_payload(&head),
    })
}

fn read_head(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(HEADER_PEEK_LEN);
    std::fs::File::open(path)?
        .take(HEADER_PEEK_LEN as u64)
        .read_to_end(&mut head)?;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractedField;
    use crate::ocr::testing::FakeDetector;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    const TYT_TEXT: &str = "REPORTE DE RESULTADOS DEL EXAMEN SABER TyT\n\
        Identificación: C.C 1007561292 Número de registro: EK202312345678\n\
        Aplicación del examen: 15 de octubre de 2023 Publicación de resultados: 2 de diciembre de 2023";

    fn write_file(dir: &Path, name: &str, header: &[u8], size: usize) -> DownloadedFile {
        let mut data = header.to_vec();
        data.resize(size.max(header.len()), b' ');
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        DownloadedFile::from_path(path).unwrap()
    }

    fn engine<'a>(store: &'a DictionaryStore, detector: FakeDetector) -> ValidationEngine<'a, FakeDetector> {
        ValidationEngine::new(store, detector, ValidationConfig::default())
    }

    #[test]
    fn test_tiny_files_need_review() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::with_text(TYT_TEXT));

        for size in [1, 500, 999] {
            let file = write_file(dir.path(), "tiny.pdf", b"%PDF-1.4\n", size);
            let outcome = engine.validate(&file, DocumentSlot::CompetencyExam);
            assert!(!outcome.is_valid(), "size {} accepted", size);
        }
        assert_eq!(engine.extractor().detector().calls.get(), 0);
    }

    #[test]
    fn test_large_html_accepted_by_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::with_text(TYT_TEXT));

        let file = write_file(dir.path(), "report.pdf", b"<!DOCTYPE html><html>", 90_000);
        let outcome = engine.validate(&file, DocumentSlot::CompetencyExam);

        assert_eq!(outcome.method(), Some(ValidationMethod::SizeHtml));
        assert_eq!(engine.extractor().detector().calls.get(), 0);
    }

    #[test]
    fn test_unnamed_download_gets_no_filename_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::with_text(TYT_TEXT));

        let mut file = write_file(dir.path(), "1xCUNq9_2024_aZ.pdf", b"<!DOCTYPE html><html>", 90_000);
        let outcome = engine.validate(&file, DocumentSlot::CompetencyExam);
        assert_eq!(
            outcome.fields().map(|f| f.contains_key(&ExtractedField::Institution)),
            Some(false)
        );

        file.file_name = String::new();
        let outcome = engine.validate(&file, DocumentSlot::CompetencyExam);
        assert_eq!(outcome.method(), Some(ValidationMethod::SizeHtml));
        assert_eq!(outcome.fields().map(|f| f.is_empty()), Some(true));
    }

    #[test]
    fn test_small_html_needs_review() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::with_text(TYT_TEXT));

        let file = write_file(dir.path(), "error.html", b"<html><body>", 5_000);
        let outcome = engine.validate(&file, DocumentSlot::CompetencyExam);

        assert!(!outcome.is_valid());
        assert_eq!(engine.extractor().detector().calls.get(), 0);
    }

    #[test]
    fn test_content_match_extracts_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::with_text(TYT_TEXT));

        let file = write_file(dir.path(), "tyt.pdf", b"%PDF-1.4\n", 2_000);
        let outcome = engine.validate(&file, DocumentSlot::CompetencyExam);

        assert_eq!(outcome.method(), Some(ValidationMethod::Textract));
        let fields = outcome.fields().unwrap();
        assert_eq!(fields[&ExtractedField::ExamRegistration], "EK202312345678");
        assert_eq!(fields[&ExtractedField::ExamDate], "15 de octubre de 2023");
        assert_eq!(engine.extractor().detector().calls.get(), 1);
    }

    #[test]
    fn test_unmatched_content_falls_back_to_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::with_text("lorem ipsum dolor"));

        let file = write_file(dir.path(), "TyT_EK20231234.pdf", b"%PDF-1.4\n", 85_000);
        let outcome = engine.validate(&file, DocumentSlot::CompetencyExam);

        assert_eq!(outcome.method(), Some(ValidationMethod::SizeFallback));
        assert_eq!(
            outcome.fields().unwrap()[&ExtractedField::ExamRegistration],
            "EK20231234"
        );
    }

    #[test]
    fn test_unmatched_small_content_needs_review() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::with_text("lorem ipsum dolor"));

        let file = write_file(dir.path(), "scan.pdf", b"%PDF-1.4\n", 2_000);
        assert!(!engine.validate(&file, DocumentSlot::CompetencyExam).is_valid());
    }

    #[test]
    fn test_ocr_failure_falls_back_to_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::failing());

        let file = write_file(dir.path(), "recibo.pdf", b"%PDF-1.4\n", 20_000);
        let outcome = engine.validate(&file, DocumentSlot::FeeReceipt);

        assert_eq!(outcome.method(), Some(ValidationMethod::SizeFallback));
        assert_eq!(engine.extractor().detector().calls.get(), 1);
    }

    #[test]
    fn test_threshold_follows_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let mut config = ValidationConfig::default();
        config.min_sizes.insert(DocumentSlot::FeeReceipt, 1_500);
        let engine = ValidationEngine::new(&store, FakeDetector::failing(), config);

        let file = write_file(dir.path(), "recibo.pdf", b"%PDF-1.4\n", 2_000);
        assert!(engine.validate(&file, DocumentSlot::FeeReceipt).is_valid());
    }

    #[test]
    fn test_missing_file_needs_review() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let engine = engine(&store, FakeDetector::with_text(TYT_TEXT));

        let file = DownloadedFile {
            path: PathBuf::from("/nonexistent/grado/cedula.pdf"),
            original_url: String::new(),
            file_name: "cedula.pdf".to_string(),
            size: 60_000,
        };
        let outcome = engine.validate(&file, DocumentSlot::IdentityCard);

        assert!(matches!(outcome, ValidationOutcome::NeedsManualReview { .. }));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(ValidationMethod::Textract.to_string(), "textract");
        assert_eq!(
            serde_json::to_string(&ValidationMethod::SizeFallback).unwrap(),
            "\"alternative-size\""
        );
    }
}
