//! Output record returned for a form submission.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::slot::DocumentSlot;
use super::submission::Submission;
use crate::error::DocumentError;

/// Sentinel for extracted-field echoes that need manual extraction.
pub const MANUAL_EXTRACTION: &str = "Extraccion Manual";

/// Externally visible status of one document slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    /// Document accepted.
    Valid,
    /// Document needs a human reviewer.
    ManualReview,
    /// No document attached for the slot.
    #[default]
    NotAttached,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Valid => "Valido",
            DocumentStatus::ManualReview => "Revision Manual",
            DocumentStatus::NotAttached => "N/A",
        }
    }

    /// Map any status string onto the output vocabulary.
    ///
    /// Unknown values become [`DocumentStatus::ManualReview`].
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_else(|e: DocumentError| {
            warn!("{}, treating as manual review", e);
            DocumentStatus::ManualReview
        })
    }
}

impl FromStr for DocumentStatus {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Valido" | "Válido" | "Documento Valido" => Ok(DocumentStatus::Valid),
            "Revision Manual" | "Revisión Manual" => Ok(DocumentStatus::ManualReview),
            "N/A" | "Documento no adjunto" => Ok(DocumentStatus::NotAttached),
            other => Err(DocumentError::UnknownSlotStatus(other.to_string())),
        }
    }
}

impl From<String> for DocumentStatus {
    fn from(value: String) -> Self {
        DocumentStatus::normalize(&value)
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Yes/no validity flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flag {
    #[serde(rename = "SI")]
    Yes,
    #[serde(rename = "NO")]
    No,
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Flag {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Flag::Yes
        } else {
            Flag::No
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Yes => "SI",
            Flag::No => "NO",
            Flag::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn manual_extraction() -> String {
    MANUAL_EXTRACTION.to_string()
}

/// The flat record produced for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "ID")]
    pub id: serde_json::Value,
    #[serde(rename = "NombreCompleto")]
    pub full_name: String,
    #[serde(rename = "TipoDocumento")]
    pub document_type: String,
    #[serde(rename = "NumeroDocumento")]
    pub document_number: String,
    #[serde(rename = "Modalidad")]
    pub modality: String,
    #[serde(rename = "NivelDeFormacionSolicitadoParaGrado")]
    pub education_level: String,
    #[serde(rename = "ProgramaDelCualSolicita")]
    pub program: String,
    #[serde(rename = "CorreoInsitucional")]
    pub institutional_email: String,
    #[serde(rename = "CorreoPersonal")]
    pub personal_email: String,

    #[serde(rename = "FotocopiaDocumento", default)]
    pub identity_card: DocumentStatus,
    #[serde(rename = "DiplomayActaGradoBachiller", default)]
    pub high_school_diploma: DocumentStatus,
    #[serde(rename = "DiplomayActaGradoTecnico", default)]
    pub technical_diploma: DocumentStatus,
    #[serde(rename = "DiplomayActaGradoTecnologo", default)]
    pub associate_diploma: DocumentStatus,
    #[serde(rename = "DiplomayActaGradoPregrado", default)]
    pub professional_degree: DocumentStatus,
    #[serde(rename = "ResultadoSaberProDelNivelParaGrado", default)]
    pub competency_exam: DocumentStatus,
    #[serde(rename = "ExamenIcfes_11", default)]
    pub national_exam: DocumentStatus,
    #[serde(rename = "RecibiDePagoDerechosDeGrado", default)]
    pub fee_receipt: DocumentStatus,
    #[serde(rename = "Encuesta_M0", default)]
    pub follow_up_survey: DocumentStatus,
    #[serde(rename = "Acta_Homologacion", default)]
    pub credit_transfer: DocumentStatus,

    /// Competency exam registration code echo.
    #[serde(rename = "EK", default = "manual_extraction")]
    pub exam_registration: String,
    #[serde(rename = "Autorización_tratamiento_de_datos")]
    pub data_authorization: String,
    #[serde(rename = "Num_Documento_Extraido", default = "manual_extraction")]
    pub extracted_document_number: String,
    #[serde(rename = "Institucion_Extraida", default = "manual_extraction")]
    pub extracted_institution: String,
    #[serde(rename = "Programa_Extraido", default = "manual_extraction")]
    pub extracted_program: String,
    #[serde(rename = "Fecha_Presentacion_Extraida", default = "manual_extraction")]
    pub extracted_exam_date: String,
    #[serde(rename = "Institucion_Valida", default)]
    pub institution_valid: Flag,
    #[serde(rename = "Num_Doc_Valido", default)]
    pub document_number_valid: Flag,
    #[serde(rename = "Registro_AC_Extraido", default = "manual_extraction")]
    pub extracted_national_registration: String,
    #[serde(rename = "Registro_AC_Valido", default)]
    pub national_registration_valid: Flag,

    /// How each validated slot was accepted.
    #[serde(
        rename = "metodos_validacion",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub validation_methods: BTreeMap<DocumentSlot, String>,
}

impl OutputRecord {
    /// Start a record with applicant fields copied and every other field
    /// at its default.
    pub fn new(submission: &Submission) -> Self {
        Self {
            id: submission.id.clone(),
            full_name: submission.full_name.clone(),
            document_type: submission.document_type.clone(),
            document_number: submission.document_number.clone(),
            modality: submission.modality.clone(),
            education_level: submission.education_level.clone(),
            program: submission.program.clone(),
            institutional_email: submission.institutional_email.clone(),
            personal_email: submission.personal_email.clone(),
            identity_card: DocumentStatus::NotAttached,
            high_school_diploma: DocumentStatus::NotAttached,
            technical_diploma: DocumentStatus::NotAttached,
            associate_diploma: DocumentStatus::NotAttached,
            professional_degree: DocumentStatus::NotAttached,
            competency_exam: DocumentStatus::NotAttached,
            national_exam: DocumentStatus::NotAttached,
            fee_receipt: DocumentStatus::NotAttached,
            follow_up_survey: DocumentStatus::NotAttached,
            credit_transfer: DocumentStatus::NotAttached,
            exam_registration: manual_extraction(),
            data_authorization: submission.data_authorization.clone(),
            extracted_document_number: manual_extraction(),
            extracted_institution: manual_extraction(),
            extracted_program: manual_extraction(),
            extracted_exam_date: manual_extraction(),
            institution_valid: Flag::NotApplicable,
            document_number_valid: Flag::NotApplicable,
            extracted_national_registration: manual_extraction(),
            national_registration_valid: Flag::NotApplicable,
            validation_methods: BTreeMap::new(),
        }
    }

    /// Status field for a slot.
    pub fn status(&self, slot: DocumentSlot) -> DocumentStatus {
        match slot {
            DocumentSlot::IdentityCard => self.identity_card,
            DocumentSlot::HighSchoolDiploma => self.high_school_diploma,
            DocumentSlot::TechnicalDiploma => self.technical_diploma,
            DocumentSlot::AssociateDiploma => self.associate_diploma,
            DocumentSlot::ProfessionalDegree => self.professional_degree,
            DocumentSlot::CompetencyExam => self.competency_exam,
            DocumentSlot::NationalExam => self.national_exam,
            DocumentSlot::FeeReceipt => self.fee_receipt,
            DocumentSlot::FollowUpSurvey => self.follow_up_survey,
            DocumentSlot::CreditTransfer => self.credit_transfer,
        }
    }

    /// Mutable status field for a slot.
    pub fn status_mut(&mut self, slot: DocumentSlot) -> &mut DocumentStatus {
        match slot {
            DocumentSlot::IdentityCard => &mut self.identity_card,
            DocumentSlot::HighSchoolDiploma => &mut self.high_school_diploma,
            DocumentSlot::TechnicalDiploma => &mut self.technical_diploma,
            DocumentSlot::AssociateDiploma => &mut self.associate_diploma,
            DocumentSlot::ProfessionalDegree => &mut self.professional_degree,
            DocumentSlot::CompetencyExam => &mut self.competency_exam,
            DocumentSlot::NationalExam => &mut self.national_exam,
            DocumentSlot::FeeReceipt => &mut self.fee_receipt,
            DocumentSlot::FollowUpSurvey => &mut self.follow_up_survey,
            DocumentSlot::CreditTransfer => &mut self.credit_transfer,
        }
    }
}
