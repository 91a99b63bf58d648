//! Per-slot keyword dictionaries with a load-once cache.
//!
//! Dictionaries are plain text files with one keyword or phrase per line.
//! A resource that cannot be read resolves to its built-in list instead.
//! Resolved lists are cached by resource name for the lifetime of the
//! store and never invalidated; editing a file on disk has no effect
//! until a new store is created.

mod embedded;

pub use embedded::{embedded_dictionary, INSTITUTIONS_FILE};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::error::DictionaryError;
use crate::models::config::DictionaryConfig;
use crate::models::slot::DocumentSlot;
use crate::models::submission::Submission;

/// An immutable, shared keyword list.
pub type Dictionary = Arc<Vec<String>>;

/// Loads dictionary resources and caches them by name.
pub struct DictionaryStore {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Dictionary>>,
}

impl DictionaryStore {
    /// Create a store reading files from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store from configuration.
    pub fn from_config(config: &DictionaryConfig) -> Self {
        Self::new(config.dir.clone())
    }

    /// Create a store for one submission: install the dictionaries the
    /// form ships, then load every resource.
    pub fn for_submission(config: &DictionaryConfig, submission: &Submission) -> crate::Result<Self> {
        let store = Self::from_config(config);
        if let Some(dictionaries) = &submission.dictionaries {
            for (name, content) in dictionaries {
                store.install(name, content)?;
            }
        }
        store.preload_all();
        Ok(store)
    }

    /// Directory the store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keyword list for a document slot.
    pub fn get_dictionary(&self, slot: DocumentSlot) -> Dictionary {
        self.load(slot.dictionary_file())
    }

    /// Canonical name variants of accepted institutions.
    pub fn get_institution_dictionary(&self) -> Dictionary {
        self.load(INSTITUTIONS_FILE)
    }

    /// Resolve a resource by name, hitting the disk at most once per name.
    pub fn load(&self, name: &str) -> Dictionary {
        if let Some(cached) = self.cached(name) {
            debug!("Using cached dictionary {}", name);
            return cached;
        }

        let resolved = Arc::new(self.read_or_embedded(name));

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // First writer wins so every caller shares one list per name.
        cache.entry(name.to_string()).or_insert(resolved).clone()
    }

    /// Populate the cache for every slot plus the institution list.
    pub fn preload_all(&self) {
        for slot in DocumentSlot::ALL {
            self.get_dictionary(slot);
        }
        self.get_institution_dictionary();
        info!("Preloaded {} dictionaries", self.cached_count());
    }

    /// Write a dictionary file shipped with a request into the store's
    /// directory. Names already cached keep their cached content.
    pub fn install(&self, name: &str, content: &str) -> Result<(), DictionaryError> {
        if name.is_empty()
            || name.contains(['/', '\\'])
            || name == "."
            || name == ".."
        {
            return Err(DictionaryError::InvalidName(name.to_string()));
        }

        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.dir.join(name), content))
            .map_err(|source| DictionaryError::Write {
                name: name.to_string(),
                source,
            })?;

        if self.cached(name).is_some() {
            warn!("Dictionary {} already cached, new content ignored until restart", name);
        } else {
            debug!("Installed dictionary {}", name);
        }
        Ok(())
    }

    /// Number of resources currently cached.
    pub fn cached_count(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn cached(&self, name: &str) -> Option<Dictionary> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    fn read_or_embedded(&self, name: &str) -> Vec<String> {
        let path = self.dir.join(name);

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let keywords = parse_keywords(&content);
                info!("Loaded dictionary {} with {} keywords", name, keywords.len());
                keywords
            }
            Err(e) => {
                warn!(
                    "Dictionary {} unavailable ({}), using embedded list",
                    path.display(),
                    e
                );
                embedded_dictionary(name)
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            }
        }
    }
}

/// Split file content into trimmed, non-empty keywords.
pub fn parse_keywords(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradoError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_keywords_skips_blank_lines() {
        let keywords = parse_keywords("Saber TyT\r\n\n   \n  Icfes  \nPercentil");
        assert_eq!(keywords, vec!["Saber TyT", "Icfes", "Percentil"]);
    }

    #[test]
    fn test_missing_file_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());

        let dictionary = store.get_dictionary(DocumentSlot::FeeReceipt);
        assert!(dictionary.iter().any(|k| k == "referencia"));
    }

    #[test]
    fn test_file_overrides_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DiccionarioTYT.txt"), "uno\ndos\n").unwrap();
        let store = DictionaryStore::new(dir.path());

        let dictionary = store.get_dictionary(DocumentSlot::CompetencyExam);
        assert_eq!(*dictionary, vec!["uno".to_string(), "dos".to_string()]);
    }

    #[test]
    fn test_load_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("DiccionarioIcfes.txt");
        std::fs::write(&path, "Saber 11\nRegistro\n").unwrap();
        let store = DictionaryStore::new(dir.path());

        let first = store.get_dictionary(DocumentSlot::NationalExam);
        std::fs::remove_file(&path).unwrap();
        let second = store.get_dictionary(DocumentSlot::NationalExam);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_preload_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        store.preload_all();
        assert_eq!(store.cached_count(), DocumentSlot::ALL.len() + 1);
    }

    #[test]
    fn test_install_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path().join("dicts"));

        store.install("DiccionarioTYT.txt", "Saber Pro\nModulo").unwrap();
        let dictionary = store.get_dictionary(DocumentSlot::CompetencyExam);
        assert_eq!(dictionary[0], "Saber Pro");
    }

    #[test]
    fn test_for_submission_installs_and_preloads() {
        let dir = tempfile::tempdir().unwrap();
        let config = DictionaryConfig {
            dir: dir.path().to_path_buf(),
        };
        let submission = Submission::from_json(
            r#"{"dictionaries": {"DiccionarioPagoDerechosDeGrado.txt": "Pago\nReferencia\nValor"}}"#,
        )
        .unwrap();

        let store = DictionaryStore::for_submission(&config, &submission).unwrap();
        assert_eq!(store.cached_count(), DocumentSlot::ALL.len() + 1);
        assert_eq!(store.get_dictionary(DocumentSlot::FeeReceipt).len(), 3);
    }

    #[test]
    fn test_for_submission_rejects_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = DictionaryConfig {
            dir: dir.path().to_path_buf(),
        };
        let submission =
            Submission::from_json(r#"{"dictionaries": {"../x.txt": "uno"}}"#).unwrap();

        assert!(matches!(
            DictionaryStore::for_submission(&config, &submission),
            Err(GradoError::Dictionary(DictionaryError::InvalidName(_)))
        ));
    }

    #[test]
    fn test_install_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        assert!(matches!(
            store.install("../evil.txt", "x"),
            Err(DictionaryError::InvalidName(_))
        ));
    }
}
