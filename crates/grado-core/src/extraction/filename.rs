//! Heuristic field recovery from a file name.
//!
//! Used when a document passed size-based validation but its text could not
//! be read. Precision is low; the values are best-effort echoes.

use chrono::NaiveDate;
use tracing::debug;

use super::patterns::{
    FILENAME_DATE_DMY, FILENAME_DATE_YMD, FILENAME_EXAM_REGISTRATION,
    FILENAME_NATIONAL_REGISTRATION,
};
use super::{ExtractedField, ExtractedFields};
use crate::models::slot::DocumentSlot;

/// Institution assumed for competency exam reports named after the exam.
pub const DEFAULT_INSTITUTION: &str = "CORPORACION UNIFICADA NACIONAL DE EDUCACION SUPERIOR - CUN";

const INSTITUTION_HINTS: [&str; 3] = ["tyt", "saber", "cun"];
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 2020..=2030;

/// Extract what the file name reveals for `slot`.
pub fn extract_from_filename(file_name: &str, slot: DocumentSlot) -> ExtractedFields {
    let mut fields = ExtractedFields::new();

    match slot {
        DocumentSlot::CompetencyExam => {
            if let Some(code) = registration_code(file_name, &FILENAME_EXAM_REGISTRATION) {
                fields.insert(ExtractedField::ExamRegistration, code);
            }
            if let Some(date) = presentation_date(file_name) {
                fields.insert(ExtractedField::ExamDate, date);
            }
            if tokens(file_name).any(|token| is_institution_hint(&token)) {
                fields.insert(ExtractedField::Institution, DEFAULT_INSTITUTION.to_string());
            }
        }
        DocumentSlot::NationalExam => {
            if let Some(code) = registration_code(file_name, &FILENAME_NATIONAL_REGISTRATION) {
                fields.insert(ExtractedField::NationalRegistration, code);
            }
        }
        _ => {}
    }

    if !fields.is_empty() {
        debug!("{}: {} field(s) from file name {:?}", slot, fields.len(), file_name);
    }
    fields
}

fn registration_code(file_name: &str, pattern: &regex::Regex) -> Option<String> {
    let caps = pattern.captures(file_name)?;
    Some(format!("{}{}", caps[1].to_uppercase(), &caps[2]))
}

fn presentation_date(file_name: &str) -> Option<String> {
    let ymd = FILENAME_DATE_YMD
        .captures_iter(file_name)
        .find_map(|caps| calendar_date(&caps[1], &caps[2], &caps[3]));
    let dmy = || {
        FILENAME_DATE_DMY
            .captures_iter(file_name)
            .find_map(|caps| calendar_date(&caps[3], &caps[2], &caps[1]))
    };

    ymd.or_else(dmy)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .or_else(|| bare_year(file_name).map(|year| format!("{}-01-01", year)))
}

fn calendar_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Lowercased alphanumeric words of a file name.
fn tokens(file_name: &str) -> impl Iterator<Item = String> + '_ {
    file_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// A hint word, optionally followed by digits (`saber11`, `tyt2023`).
fn is_institution_hint(token: &str) -> bool {
    INSTITUTION_HINTS.iter().any(|hint| {
        token
            .strip_prefix(hint)
            .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
    })
}

/// First 4-digit word inside the accepted year range.
fn bare_year(file_name: &str) -> Option<i32> {
    tokens(file_name)
        .filter(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse::<i32>().ok())
        .find(|year| YEAR_RANGE.contains(year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(fields: &ExtractedFields, key: ExtractedField) -> Option<&str> {
        fields.get(&key).map(String::as_str)
    }

    #[test]
    fn test_competency_exam_filename() {
        let fields = extract_from_filename(
            "Resultado_TyT_EK202312345678_2023-10-15.pdf",
            DocumentSlot::CompetencyExam,
        );

        assert_eq!(field(&fields, ExtractedField::ExamRegistration), Some("EK202312345678"));
        assert_eq!(field(&fields, ExtractedField::ExamDate), Some("2023-10-15"));
        assert_eq!(field(&fields, ExtractedField::Institution), Some(DEFAULT_INSTITUTION));
    }

    #[test]
    fn test_day_first_date() {
        let fields = extract_from_filename("reporte 15.10.2023.pdf", DocumentSlot::CompetencyExam);
        assert_eq!(field(&fields, ExtractedField::ExamDate), Some("2023-10-15"));
    }

    #[test]
    fn test_bare_year_defaults_to_january_first() {
        let fields = extract_from_filename("ek_20231234 resultados 2024.pdf", DocumentSlot::CompetencyExam);
        assert_eq!(field(&fields, ExtractedField::ExamRegistration), Some("EK20231234"));
        assert_eq!(field(&fields, ExtractedField::ExamDate), Some("2024-01-01"));
        assert_eq!(field(&fields, ExtractedField::Institution), None);
    }

    #[test]
    fn test_invalid_calendar_date_uses_year() {
        let fields = extract_from_filename("2023-13-45 informe.pdf", DocumentSlot::CompetencyExam);
        assert_eq!(field(&fields, ExtractedField::ExamDate), Some("2023-01-01"));
    }

    #[test]
    fn test_year_out_of_range_is_ignored() {
        let fields = extract_from_filename("scan_1998.pdf", DocumentSlot::CompetencyExam);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_registration_inside_word_is_ignored() {
        let fields = extract_from_filename("geek123456789.pdf", DocumentSlot::CompetencyExam);
        assert_eq!(field(&fields, ExtractedField::ExamRegistration), None);
    }

    #[test]
    fn test_hints_match_whole_words() {
        let fields = extract_from_filename("diploma_secundaria.pdf", DocumentSlot::CompetencyExam);
        assert!(fields.is_empty());

        let fields = extract_from_filename("1xCUNq9_2024_aZ.pdf", DocumentSlot::CompetencyExam);
        assert_eq!(field(&fields, ExtractedField::Institution), None);

        let fields = extract_from_filename("resultados-Saber11.pdf", DocumentSlot::CompetencyExam);
        assert_eq!(field(&fields, ExtractedField::Institution), Some(DEFAULT_INSTITUTION));
    }

    #[test]
    fn test_year_inside_longer_word_is_ignored() {
        let fields = extract_from_filename("scanx2024b.pdf", DocumentSlot::CompetencyExam);
        assert_eq!(field(&fields, ExtractedField::ExamDate), None);
    }

    #[test]
    fn test_unnamed_file_yields_nothing() {
        assert!(extract_from_filename("", DocumentSlot::CompetencyExam).is_empty());
        assert!(extract_from_filename("", DocumentSlot::NationalExam).is_empty());
    }

    #[test]
    fn test_national_exam_filename() {
        let fields = extract_from_filename("saber11-ac201943210987.pdf", DocumentSlot::NationalExam);
        assert_eq!(
            field(&fields, ExtractedField::NationalRegistration),
            Some("AC201943210987")
        );
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_other_slots_yield_nothing() {
        assert!(extract_from_filename("cedula_2023.pdf", DocumentSlot::IdentityCard).is_empty());
    }
}
