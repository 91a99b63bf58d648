//! Per-slot extraction rule tables.
//!
//! Each table lists `(field, pattern, post-processing)` rules in priority
//! order. For a given field the first rule producing a value wins; later
//! rules for that field are skipped. The tables hold policy only, the
//! matching loop lives in [`apply_rules`].

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::patterns::*;
use super::{ExtractedField, ExtractedFields};

/// How a captured value is cleaned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Trim surrounding whitespace and collapse inner runs.
    Trim,
    /// Keep digits only; reject values outside the length range.
    Digits { min: usize, max: usize },
    /// Uppercase alphanumeric code, adding `prefix` to bare digit runs.
    Registration { prefix: &'static str },
}

impl PostProcess {
    pub fn apply(self, raw: &str) -> Option<String> {
        let value = match self {
            PostProcess::Trim => raw.split_whitespace().collect::<Vec<_>>().join(" "),
            PostProcess::Digits { min, max } => {
                let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.len() < min || digits.len() > max {
                    return None;
                }
                digits
            }
            PostProcess::Registration { prefix } => normalize_registration(raw, prefix),
        };

        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Uppercase a registration code and make sure it carries its prefix.
pub fn normalize_registration(raw: &str, prefix: &str) -> String {
    let code: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    if code.is_empty() {
        return code;
    }
    if code.chars().all(|c| c.is_ascii_digit()) {
        format!("{}{}", prefix, code)
    } else {
        code
    }
}

/// Which match to keep when a pattern hits several times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// First match in the text.
    First,
    /// Longest post-processed value; ties go to the earliest.
    Longest,
}

/// One extraction rule.
pub struct FieldRule {
    pub field: ExtractedField,
    pub pattern: Regex,
    pub post: PostProcess,
    pub selection: Selection,
}

impl FieldRule {
    fn new(field: ExtractedField, pattern: &Regex, post: PostProcess) -> Self {
        Self {
            field,
            pattern: pattern.clone(),
            post,
            selection: Selection::First,
        }
    }

    fn longest(mut self) -> Self {
        self.selection = Selection::Longest;
        self
    }

    /// Evaluate the rule against `text`.
    pub fn evaluate(&self, text: &str) -> Option<String> {
        let mut values = self
            .pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| self.post.apply(m.as_str()));

        match self.selection {
            Selection::First => values.next(),
            Selection::Longest => values.fold(None, |best: Option<String>, value| match best {
                Some(current) if current.len() >= value.len() => Some(current),
                _ => Some(value),
            }),
        }
    }
}

const ID_DIGITS: PostProcess = PostProcess::Digits { min: 6, max: 12 };
const EXAM_CODE: PostProcess = PostProcess::Registration { prefix: "EK" };
const NATIONAL_CODE: PostProcess = PostProcess::Registration { prefix: "AC" };

lazy_static! {
    pub static ref IDENTITY_CARD_RULES: Vec<FieldRule> = vec![
        FieldRule::new(ExtractedField::IdNumber, &ID_CARD_NUMBER, ID_DIGITS).longest(),
    ];

    pub static ref NATIONAL_EXAM_RULES: Vec<FieldRule> = vec![
        FieldRule::new(ExtractedField::NationalRegistration, &NATIONAL_REGISTRATION, NATIONAL_CODE),
    ];

    pub static ref COMPETENCY_EXAM_RULES: Vec<FieldRule> = vec![
        FieldRule::new(ExtractedField::IdNumber, &EXAM_ID_WITH_CC, ID_DIGITS),
        FieldRule::new(ExtractedField::IdNumber, &EXAM_ID_LABELED, ID_DIGITS),
        FieldRule::new(ExtractedField::IdNumber, &EXAM_ID_CC, ID_DIGITS),
        FieldRule::new(ExtractedField::IdNumber, &EXAM_ID_CEDULA, ID_DIGITS),
        FieldRule::new(ExtractedField::IdNumber, &EXAM_ID_BARE, ID_DIGITS),

        FieldRule::new(ExtractedField::ExamRegistration, &EXAM_REGISTRATION_NUMBER, EXAM_CODE),
        FieldRule::new(ExtractedField::ExamRegistration, &EXAM_REGISTRATION_LABELED, EXAM_CODE),
        FieldRule::new(ExtractedField::ExamRegistration, &EXAM_REGISTRATION_EK, EXAM_CODE),

        FieldRule::new(ExtractedField::Institution, &EXAM_INSTITUTION_LABELED, PostProcess::Trim),
        FieldRule::new(ExtractedField::Institution, &EXAM_INSTITUTION_CANONICAL, PostProcess::Trim),
        FieldRule::new(ExtractedField::Institution, &EXAM_INSTITUTION_SHORT, PostProcess::Trim),

        FieldRule::new(ExtractedField::Program, &EXAM_PROGRAM_ACADEMIC, PostProcess::Trim),
        FieldRule::new(ExtractedField::Program, &EXAM_PROGRAM_LABELED, PostProcess::Trim),
        FieldRule::new(ExtractedField::Program, &EXAM_PROGRAM_PREFIX, PostProcess::Trim),

        FieldRule::new(ExtractedField::ExamDate, &EXAM_DATE_APPLICATION, PostProcess::Trim),
        FieldRule::new(ExtractedField::ExamDate, &EXAM_DATE_LABELED, PostProcess::Trim),
        FieldRule::new(ExtractedField::ExamDate, &EXAM_DATE_APPLIED_ON, PostProcess::Trim),
    ];
}

/// Run a rule table over `text`, first hit per field wins.
pub fn apply_rules(text: &str, rules: &[FieldRule]) -> ExtractedFields {
    let mut fields = ExtractedFields::new();

    for (index, rule) in rules.iter().enumerate() {
        if fields.contains_key(&rule.field) {
            continue;
        }
        if let Some(value) = rule.evaluate(text) {
            debug!("{:?} = {:?} (rule {})", rule.field, value, index + 1);
            fields.insert(rule.field, value);
        }
    }

    fields
}
