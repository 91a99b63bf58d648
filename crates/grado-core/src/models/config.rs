//! Configuration structures for the intake pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::slot::DocumentSlot;

/// Main configuration for the grado pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GradoConfig {
    /// Dictionary store configuration.
    pub dictionaries: DictionaryConfig,

    /// Validation thresholds.
    pub validation: ValidationConfig,

    /// OCR backend configuration.
    pub ocr: OcrConfig,

    /// File download configuration.
    pub download: DownloadConfig,
}

/// Dictionary store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Directory containing dictionary text files.
    pub dir: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dictionaries"),
        }
    }
}

/// Thresholds driving the validation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Files below this size are never real documents.
    pub min_file_size: u64,

    /// Dictionary hits needed to accept a document by content.
    pub min_keyword_matches: usize,

    /// Size threshold for slots missing from `min_sizes`.
    pub default_min_size: u64,

    /// Per-slot size thresholds for the size-based fallback.
    pub min_sizes: BTreeMap<DocumentSlot, u64>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_file_size: 1000,
            min_keyword_matches: 2,
            default_min_size: 25_000,
            min_sizes: DocumentSlot::ALL
                .iter()
                .map(|slot| (*slot, slot.default_min_size()))
                .collect(),
        }
    }
}

impl ValidationConfig {
    /// Size threshold for a slot, falling back to the default.
    pub fn min_size_for(&self, slot: DocumentSlot) -> u64 {
        self.min_sizes
            .get(&slot)
            .copied()
            .unwrap_or(self.default_min_size)
    }
}

/// OCR backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory with `det.onnx`, `latin_rec.onnx` and `latin_dict.txt`.
    /// Image OCR is disabled when unset.
    pub model_dir: Option<PathBuf>,

    /// Keep `[UNK]` tokens in recognized text.
    pub keep_unk: bool,
}

/// File download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// User agent sent to the file host.
    pub user_agent: String,

    /// Environment variable holding a Drive bearer token.
    pub access_token_env: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            access_token_env: "GOOGLE_ACCESS_TOKEN".to_string(),
        }
    }
}

impl GradoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ValidationConfig::default();
        assert_eq!(config.min_size_for(DocumentSlot::CompetencyExam), 80_000);
        assert_eq!(config.min_size_for(DocumentSlot::FeeReceipt), 20_000);
    }

    #[test]
    fn test_unlisted_slot_uses_default() {
        let mut config = ValidationConfig::default();
        config.min_sizes.remove(&DocumentSlot::FollowUpSurvey);
        assert_eq!(config.min_size_for(DocumentSlot::FollowUpSurvey), 25_000);
    }

    #[test]
    fn test_partial_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"validation": {"min_keyword_matches": 3}}"#).unwrap();

        let config = GradoConfig::from_file(&path).unwrap();
        assert_eq!(config.validation.min_keyword_matches, 3);
        assert_eq!(config.validation.min_file_size, 1000);
        assert_eq!(config.dictionaries.dir, PathBuf::from("dictionaries"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        GradoConfig::default().save(&path).unwrap();

        let config = GradoConfig::from_file(&path).unwrap();
        assert_eq!(config.validation.min_size_for(DocumentSlot::IdentityCard), 50_000);
    }
}
