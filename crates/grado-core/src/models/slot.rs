//! The ten fixed document slots of a graduation request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A declared logical document type.
///
/// Each slot maps to exactly one dictionary resource and one minimum-size
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentSlot {
    /// Identity card (cédula).
    #[serde(rename = "cedula")]
    IdentityCard,
    /// High-school diploma and graduation record.
    #[serde(rename = "diploma_bachiller")]
    HighSchoolDiploma,
    /// Technical diploma.
    #[serde(rename = "diploma_tecnico")]
    TechnicalDiploma,
    /// Associate (technologist) diploma.
    #[serde(rename = "diploma_tecnologo")]
    AssociateDiploma,
    /// Professional degree.
    #[serde(rename = "titulo_profesional")]
    ProfessionalDegree,
    /// Competency exam result (Saber TyT).
    #[serde(rename = "prueba_tt")]
    CompetencyExam,
    /// National exam score (Saber 11).
    #[serde(rename = "icfes")]
    NationalExam,
    /// Graduation fee receipt.
    #[serde(rename = "recibo_pago")]
    FeeReceipt,
    /// Follow-up survey (moment 0).
    #[serde(rename = "encuesta_m0")]
    FollowUpSurvey,
    /// Course credit transfer record.
    #[serde(rename = "acta_homologacion")]
    CreditTransfer,
}

impl DocumentSlot {
    /// All slots, in record processing order.
    pub const ALL: [DocumentSlot; 10] = [
        DocumentSlot::IdentityCard,
        DocumentSlot::HighSchoolDiploma,
        DocumentSlot::TechnicalDiploma,
        DocumentSlot::AssociateDiploma,
        DocumentSlot::ProfessionalDegree,
        DocumentSlot::CompetencyExam,
        DocumentSlot::NationalExam,
        DocumentSlot::FeeReceipt,
        DocumentSlot::FollowUpSurvey,
        DocumentSlot::CreditTransfer,
    ];

    /// Stable key used in forms, configuration, and logs.
    pub fn key(self) -> &'static str {
        match self {
            DocumentSlot::IdentityCard => "cedula",
            DocumentSlot::HighSchoolDiploma => "diploma_bachiller",
            DocumentSlot::TechnicalDiploma => "diploma_tecnico",
            DocumentSlot::AssociateDiploma => "diploma_tecnologo",
            DocumentSlot::ProfessionalDegree => "titulo_profesional",
            DocumentSlot::CompetencyExam => "prueba_tt",
            DocumentSlot::NationalExam => "icfes",
            DocumentSlot::FeeReceipt => "recibo_pago",
            DocumentSlot::FollowUpSurvey => "encuesta_m0",
            DocumentSlot::CreditTransfer => "acta_homologacion",
        }
    }

    /// Dictionary resource file name for this slot.
    pub fn dictionary_file(self) -> &'static str {
        match self {
            DocumentSlot::IdentityCard => "Diccionario_Documentos_Identidad.txt",
            DocumentSlot::HighSchoolDiploma => "DiccionarioActayDiplomaBachiller.txt",
            DocumentSlot::TechnicalDiploma => "DiccionarioActayDiplomaTecnico.txt",
            DocumentSlot::AssociateDiploma => "DiccionarioActayDiplomaTecnologo.txt",
            DocumentSlot::ProfessionalDegree => "DiccionarioActayDiplomaPregrado.txt",
            DocumentSlot::CompetencyExam => "DiccionarioTYT.txt",
            DocumentSlot::NationalExam => "DiccionarioIcfes.txt",
            DocumentSlot::FeeReceipt => "DiccionarioPagoDerechosDeGrado.txt",
            DocumentSlot::FollowUpSurvey => "DiccionarioEncuestaSeguimiento.txt",
            DocumentSlot::CreditTransfer => "DiccionarioActaHomologacion.txt",
        }
    }

    /// Default minimum byte size for the size-based fallback.
    pub fn default_min_size(self) -> u64 {
        match self {
            DocumentSlot::IdentityCard => 50_000,
            DocumentSlot::HighSchoolDiploma => 100_000,
            DocumentSlot::TechnicalDiploma => 100_000,
            DocumentSlot::AssociateDiploma => 100_000,
            DocumentSlot::ProfessionalDegree => 100_000,
            DocumentSlot::CompetencyExam => 80_000,
            DocumentSlot::NationalExam => 80_000,
            DocumentSlot::FeeReceipt => 20_000,
            DocumentSlot::FollowUpSurvey => 30_000,
            DocumentSlot::CreditTransfer => 50_000,
        }
    }

    /// Form field carrying this slot's file URL.
    pub fn form_field(self) -> &'static str {
        match self {
            DocumentSlot::IdentityCard => "Copia_de_cedula",
            DocumentSlot::HighSchoolDiploma => "Diploma_y_acta_de_bachiller",
            DocumentSlot::TechnicalDiploma => "diploma_tecnico",
            DocumentSlot::AssociateDiploma => "diploma_tecnologo",
            DocumentSlot::ProfessionalDegree => "Titulo_profesional",
            DocumentSlot::CompetencyExam => "Prueba_T_T",
            DocumentSlot::NationalExam => "Icfes",
            DocumentSlot::FeeReceipt => "Recibo_de_pago_derechos_de_grado",
            DocumentSlot::FollowUpSurvey => "Soporte_de_encuesta_momento_0",
            DocumentSlot::CreditTransfer => "Acta_de_homologacion",
        }
    }
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DocumentSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DocumentSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.key() == wanted)
            .ok_or_else(|| format!("unknown document slot: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slot_keys_roundtrip() {
        for slot in DocumentSlot::ALL {
            assert_eq!(slot.key().parse::<DocumentSlot>().unwrap(), slot);
        }
        assert!("pasaporte".parse::<DocumentSlot>().is_err());
    }

    #[test]
    fn test_each_slot_has_its_own_dictionary() {
        let files: HashSet<_> = DocumentSlot::ALL.iter().map(|s| s.dictionary_file()).collect();
        assert_eq!(files.len(), DocumentSlot::ALL.len());
    }

    #[test]
    fn test_serde_uses_slot_key() {
        let json = serde_json::to_string(&DocumentSlot::CompetencyExam).unwrap();
        assert_eq!(json, "\"prueba_tt\"");
    }
}
