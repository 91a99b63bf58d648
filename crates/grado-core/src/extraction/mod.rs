//! Field extraction from recognized document text.

mod filename;
pub mod patterns;
pub mod rules;

pub use filename::{extract_from_filename, DEFAULT_INSTITUTION};
pub use rules::{apply_rules, FieldRule, PostProcess, Selection};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::slot::DocumentSlot;
use rules::{COMPETENCY_EXAM_RULES, IDENTITY_CARD_RULES, NATIONAL_EXAM_RULES};

/// Structured fields a document can yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedField {
    /// Identity document number of the subject.
    IdNumber,
    /// Competency exam registration code (EK...).
    ExamRegistration,
    /// National exam registration code (AC...).
    NationalRegistration,
    /// Institution of higher education.
    Institution,
    /// Academic program.
    Program,
    /// Exam application / presentation date.
    ExamDate,
}

/// Sparse field map. A missing key means "not found".
pub type ExtractedFields = BTreeMap<ExtractedField, String>;

/// Rule table for a slot. Slots without field rules get an empty table.
pub fn rules_for(slot: DocumentSlot) -> &'static [FieldRule] {
    match slot {
        DocumentSlot::IdentityCard => &IDENTITY_CARD_RULES,
        DocumentSlot::NationalExam => &NATIONAL_EXAM_RULES,
        DocumentSlot::CompetencyExam => &COMPETENCY_EXAM_RULES,
        _ => &[],
    }
}

/// Extract the structured fields of `slot` from document text.
pub fn extract_fields(text: &str, slot: DocumentSlot) -> ExtractedFields {
    if text.trim().is_empty() {
        return ExtractedFields::new();
    }

    let fields = apply_rules(text, rules_for(slot));
    let expected = rules_for(slot)
        .iter()
        .map(|rule| rule.field)
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    if expected > 0 {
        info!("{}: extracted {}/{} fields", slot, fields.len(), expected);
    }
    fields
}
