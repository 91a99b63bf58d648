//! Regex patterns for document field extraction.
//!
//! Labeled patterns capture their value in group 1. Free-text captures stop
//! at the next section label or at the end of the line.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Identity card: thousands-dotted numbers (1.007.561.292) or 6-12 digit
    // chunks; longer runs split into 12-digit chunks
    pub static ref ID_CARD_NUMBER: Regex = Regex::new(
        r"(\b\d{1,3}(?:\.\d{3})+\b|\d{6,12})"
    ).unwrap();

    // National exam (Saber 11) registration: AC + digits
    pub static ref NATIONAL_REGISTRATION: Regex = Regex::new(
        r"(?i)\b(AC\s?\d{4,})"
    ).unwrap();

    // Competency exam: subject identification number
    pub static ref EXAM_ID_WITH_CC: Regex = Regex::new(
        r"(?i)identificaci[oó]n:?\s*c\.?\s?c\.?\s*(\d{6,12})\b"
    ).unwrap();

    pub static ref EXAM_ID_LABELED: Regex = Regex::new(
        r"(?i)identificaci[oó]n:?\s*(\d{6,12})\b"
    ).unwrap();

    pub static ref EXAM_ID_CC: Regex = Regex::new(
        r"(?i)\bc\.\s?c\.?\s*(\d{6,12})\b"
    ).unwrap();

    pub static ref EXAM_ID_CEDULA: Regex = Regex::new(
        r"(?i)c[eé]dula:?\s*(\d{6,12})\b"
    ).unwrap();

    pub static ref EXAM_ID_BARE: Regex = Regex::new(
        r"\b(\d{8,12})\b"
    ).unwrap();

    // Competency exam: registration code (EK...)
    pub static ref EXAM_REGISTRATION_NUMBER: Regex = Regex::new(
        r"(?i)n[uú]mero\s+de\s+registro:?\s*([a-z]*\s?\d+)"
    ).unwrap();

    pub static ref EXAM_REGISTRATION_LABELED: Regex = Regex::new(
        r"(?i)registro:\s*([a-z]*\s?\d+)"
    ).unwrap();

    pub static ref EXAM_REGISTRATION_EK: Regex = Regex::new(
        r"(?i)\b(EK\s*\d+)"
    ).unwrap();

    // Competency exam: institution of higher education
    pub static ref EXAM_INSTITUTION_LABELED: Regex = Regex::new(
        r"(?im)instituci[oó]n\s+de\s+educaci[oó]n\s+superior:\s*(.+?)\s*(?:programa|$)"
    ).unwrap();

    pub static ref EXAM_INSTITUTION_CANONICAL: Regex = Regex::new(
        r"(?im)(corporaci[oó]n\s+unificada\s+nacional.*?)\s*(?:programa|$)"
    ).unwrap();

    pub static ref EXAM_INSTITUTION_SHORT: Regex = Regex::new(
        r"(?im)instituci[oó]n:\s*(.+?)\s*(?:programa|$)"
    ).unwrap();

    // Competency exam: academic program, up to the next numbered section
    pub static ref EXAM_PROGRAM_ACADEMIC: Regex = Regex::new(
        r"(?im)programa\s+acad[eé]mico:\s*(.+?)(?:\s+\d{1,2}\.(?:\s|$)|\s*reporte|\s*$)"
    ).unwrap();

    pub static ref EXAM_PROGRAM_LABELED: Regex = Regex::new(
        r"(?im)programa:\s*(.+?)(?:\s+\d{1,2}\.(?:\s|$)|\s*reporte|\s*$)"
    ).unwrap();

    pub static ref EXAM_PROGRAM_PREFIX: Regex = Regex::new(
        r"(?im)(t[eé]cnico\s+profesional.*?)(?:\s+\d{1,2}\.(?:\s|$)|\s*reporte|\s*$)"
    ).unwrap();

    // Competency exam: application date
    pub static ref EXAM_DATE_APPLICATION: Regex = Regex::new(
        r"(?im)aplicaci[oó]n\s+del\s+examen:\s*(.+?)\s*(?:publicaci[oó]n|n[uú]mero\s+de|$)"
    ).unwrap();

    pub static ref EXAM_DATE_LABELED: Regex = Regex::new(
        r"(?im)fecha\s+de\s+aplicaci[oó]n:\s*(.+?)\s*(?:publicaci[oó]n|n[uú]mero\s+de|$)"
    ).unwrap();

    pub static ref EXAM_DATE_APPLIED_ON: Regex = Regex::new(
        r"(?im)aplicado\s+el:\s*(.+?)\s*(?:publicaci[oó]n|n[uú]mero\s+de|$)"
    ).unwrap();

    // File name tokens
    pub static ref FILENAME_EXAM_REGISTRATION: Regex = Regex::new(
        r"(?i)(?:^|[^a-z])(EK)[\s_\-]?(\d{6,})"
    ).unwrap();

    pub static ref FILENAME_NATIONAL_REGISTRATION: Regex = Regex::new(
        r"(?i)(?:^|[^a-z])(AC)[\s_\-]?(\d{6,})"
    ).unwrap();

    pub static ref FILENAME_DATE_YMD: Regex = Regex::new(
        r"(?:^|\D)(\d{4})[\-_.](\d{1,2})[\-_.](\d{1,2})(?:\D|$)"
    ).unwrap();

    pub static ref FILENAME_DATE_DMY: Regex = Regex::new(
        r"(?:^|\D)(\d{1,2})[\-_.](\d{1,2})[\-_.](\d{4})(?:\D|$)"
    ).unwrap();
}
