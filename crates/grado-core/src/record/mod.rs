//! Output record assembly.
//!
//! Slots are processed one after another in [`DocumentSlot::ALL`] order.
//! Extracted values are echoed into shared output fields, so when two slots
//! yield the same field the later slot's value is kept.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::dictionary::DictionaryStore;
use crate::extraction::rules::normalize_registration;
use crate::extraction::{ExtractedField, ExtractedFields};
use crate::models::config::ValidationConfig;
use crate::models::record::{DocumentStatus, Flag, OutputRecord};
use crate::models::slot::DocumentSlot;
use crate::models::submission::{DownloadedFile, Submission};
use crate::ocr::TextDetector;
use crate::validation::{InstitutionValidator, ValidationEngine, ValidationOutcome};

/// Builds the output record for a submission.
pub struct RecordAssembler<'a, D: TextDetector> {
    engine: ValidationEngine<'a, D>,
    institutions: InstitutionValidator<'a>,
}

impl<'a, D: TextDetector> RecordAssembler<'a, D> {
    pub fn new(store: &'a DictionaryStore, detector: D, config: ValidationConfig) -> Self {
        Self {
            engine: ValidationEngine::new(store, detector, config),
            institutions: InstitutionValidator::new(store),
        }
    }

    pub fn engine(&self) -> &ValidationEngine<'a, D> {
        &self.engine
    }

    /// Pair downloaded files with slots by the URL they were fetched from,
    /// then assemble.
    pub fn assemble_downloads(
        &self,
        submission: &Submission,
        downloads: Vec<DownloadedFile>,
    ) -> OutputRecord {
        let urls = submission.document_urls();
        let mut files = BTreeMap::new();

        for file in downloads {
            match urls.iter().find(|(_, url)| **url == file.original_url) {
                Some((slot, _)) => {
                    debug!("Mapped {} -> {}", file.file_name, slot);
                    files.insert(*slot, file);
                }
                None => warn!("Downloaded file {} matches no slot URL", file.original_url),
            }
        }

        self.assemble(submission, &files)
    }

    /// Validate every supplied file and fill in the record.
    pub fn assemble(
        &self,
        submission: &Submission,
        files: &BTreeMap<DocumentSlot, DownloadedFile>,
    ) -> OutputRecord {
        let mut record = OutputRecord::new(submission);

        for slot in DocumentSlot::ALL {
            let Some(file) = files.get(&slot) else {
                debug!("{}: not attached", slot);
                continue;
            };

            let outcome = self.engine.validate(file, slot);
            *record.status_mut(slot) = status_for(&outcome);

            if let ValidationOutcome::Valid { method, fields } = &outcome {
                record.validation_methods.insert(slot, method.to_string());
                self.apply_fields(&mut record, submission, slot, fields);
            }
        }

        let valid = DocumentSlot::ALL
            .iter()
            .filter(|slot| record.status(**slot) == DocumentStatus::Valid)
            .count();
        info!(
            "Assembled record: {} attached, {} valid",
            files.len(),
            valid
        );

        record
    }

    fn apply_fields(
        &self,
        record: &mut OutputRecord,
        submission: &Submission,
        slot: DocumentSlot,
        fields: &ExtractedFields,
    ) {
        for (field, value) in fields {
            match field {
                ExtractedField::IdNumber => {
                    record.extracted_document_number = value.clone();
                    if slot == DocumentSlot::IdentityCard {
                        record.document_number_valid =
                            Flag::from_bool(digits(value) == digits(&submission.document_number));
                    }
                }
                ExtractedField::ExamRegistration => record.exam_registration = value.clone(),
                ExtractedField::NationalRegistration => {
                    record.extracted_national_registration = value.clone();
                    record.national_registration_valid = national_registration_flag(
                        value,
                        &submission.national_exam_registration,
                    );
                }
                ExtractedField::Institution => {
                    record.extracted_institution = value.clone();
                    record.institution_valid = self.institutions.validate(value);
                }
                ExtractedField::Program => record.extracted_program = value.clone(),
                ExtractedField::ExamDate => record.extracted_exam_date = value.clone(),
            }
        }
    }
}

fn status_for(outcome: &ValidationOutcome) -> DocumentStatus {
    match outcome {
        ValidationOutcome::Valid { .. } => DocumentStatus::Valid,
        ValidationOutcome::NeedsManualReview { .. } => DocumentStatus::ManualReview,
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn national_registration_flag(extracted: &str, declared: &str) -> Flag {
    let declared = normalize_registration(declared, "AC");
    if declared.is_empty() {
        return Flag::No;
    }
    Flag::from_bool(normalize_registration(extracted, "AC") == declared)
}
