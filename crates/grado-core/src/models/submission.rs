//! Form submission and downloaded-file models.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use super::slot::DocumentSlot;

/// A graduation request form as posted by the intake form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Submission {
    /// Request identifier, passed through unchanged (number or string).
    #[serde(rename = "ID")]
    pub id: serde_json::Value,

    #[serde(rename = "Nombre_completo", deserialize_with = "scalar_string")]
    pub full_name: String,

    #[serde(rename = "Tipo_de_documento", deserialize_with = "scalar_string")]
    pub document_type: String,

    /// Declared identity document number.
    #[serde(rename = "Numero_de_Documento", deserialize_with = "scalar_string")]
    pub document_number: String,

    #[serde(rename = "Modalidad", deserialize_with = "scalar_string")]
    pub modality: String,

    #[serde(rename = "Nivel_de_formacion_del_cual_esta_solicitando_grado", deserialize_with = "scalar_string")]
    pub education_level: String,

    #[serde(rename = "Programa_del_cual_esta_solicitando_grado", deserialize_with = "scalar_string")]
    pub program: String,

    #[serde(rename = "Correo_electronico_institucional", deserialize_with = "scalar_string")]
    pub institutional_email: String,

    #[serde(rename = "Correo_electronico_personal", deserialize_with = "scalar_string")]
    pub personal_email: String,

    #[serde(rename = "Autorizacion_tratamiento_de_datos", deserialize_with = "scalar_string")]
    pub data_authorization: String,

    /// Declared national exam registration code.
    #[serde(rename = "Registro_AC_Numero_de_identificacion_de_las_pruebas_saber_11", deserialize_with = "scalar_string")]
    pub national_exam_registration: String,

    /// Dictionary files shipped with the request (file name -> content).
    pub dictionaries: Option<BTreeMap<String, String>>,

    /// Remaining fields, including the per-slot document URLs.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Submission {
    /// Parse a form submission from JSON text.
    pub fn from_json(content: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a form submission from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Raw form value for a slot's URL field.
    pub fn document_field(&self, slot: DocumentSlot) -> Option<&serde_json::Value> {
        self.extra.get(slot.form_field())
    }

    /// Drive URLs per slot. Values that are not Drive links are skipped.
    pub fn document_urls(&self) -> BTreeMap<DocumentSlot, String> {
        let mut urls = BTreeMap::new();

        for slot in DocumentSlot::ALL {
            match self.document_field(slot) {
                Some(serde_json::Value::String(value)) => {
                    if is_drive_url(value) {
                        debug!("Found URL for {}", slot);
                        urls.insert(slot, value.clone());
                    } else if value.contains("http") {
                        warn!("URL for {} is not a Google Drive link, skipping", slot);
                    } else if !value.trim().is_empty() {
                        debug!("Field {} does not contain a URL", slot.form_field());
                    }
                }
                Some(serde_json::Value::Null) | None => {}
                Some(other) => {
                    warn!("Field {} is not a string: {}", slot.form_field(), other);
                }
            }
        }

        urls
    }
}

/// Accept any JSON scalar for a text field. Forms post numbers and
/// booleans for some answers; null reads as empty.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Bool(value) => Ok(value.to_string()),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar value, found {}",
            other
        ))),
    }
}

fn is_drive_url(value: &str) -> bool {
    value.contains("drive.google.com") || value.contains("docs.google.com")
}

/// A file obtained for one document slot.
///
/// Created by the download collaborator and consumed read-only by the
/// validation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadedFile {
    /// Location on disk.
    pub path: PathBuf,
    /// URL the file was obtained from.
    pub original_url: String,
    /// File name as reported by the host (or derived from the path).
    pub file_name: String,
    /// Size in bytes at download time.
    pub size: u64,
}

impl DownloadedFile {
    /// Describe a local file, reading its size from disk.
    pub fn from_path(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let size = std::fs::metadata(&path)?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let original_url = format!("file://{}", path.display());

        Ok(Self {
            path,
            original_url,
            file_name,
            size,
        })
    }
}
