//! Institution name validation against the canonical variant list.

use tracing::debug;

use crate::dictionary::DictionaryStore;
use crate::models::record::{Flag, MANUAL_EXTRACTION};

/// Placeholder values that never count as an institution name.
const SENTINELS: [&str; 3] = ["Revision Manual", "Revisión Manual", MANUAL_EXTRACTION];

/// Checks extracted institution names against the institution dictionary.
pub struct InstitutionValidator<'a> {
    store: &'a DictionaryStore,
}

impl<'a> InstitutionValidator<'a> {
    pub fn new(store: &'a DictionaryStore) -> Self {
        Self { store }
    }

    /// `Flag::Yes` when the name and a canonical variant contain one another.
    pub fn validate(&self, extracted: &str) -> Flag {
        let extracted = extracted.trim();
        if extracted.is_empty() || SENTINELS.contains(&extracted) {
            return Flag::No;
        }

        let name = extracted.to_lowercase();
        let variants = self.store.get_institution_dictionary();

        for variant in variants.iter() {
            let variant_lower = variant.trim().to_lowercase();
            if variant_lower.is_empty() {
                continue;
            }
            if name.contains(&variant_lower) || variant_lower.contains(&name) {
                debug!("Institution {:?} matches variant {:?}", extracted, variant);
                return Flag::Yes;
            }
        }

        debug!("Institution {:?} matches no known variant", extracted);
        Flag::No
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::INSTITUTIONS_FILE;
    use pretty_assertions::assert_eq;

    fn store_with(variants: &str) -> (tempfile::TempDir, DictionaryStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INSTITUTIONS_FILE), variants).unwrap();
        let store = DictionaryStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_acronym_matches_embedded_variants() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let validator = InstitutionValidator::new(&store);

        assert_eq!(validator.validate("CUN"), Flag::Yes);
        assert_eq!(
            validator.validate("CORPORACION UNIFICADA NACIONAL DE EDUCACION SUPERIOR-CUN-BOGOTÁ D.C."),
            Flag::Yes
        );
    }

    #[test]
    fn test_truncated_fragment_matches() {
        let (_dir, store) = store_with("Corporación Unificada Nacional de Educación Superior\n");
        let validator = InstitutionValidator::new(&store);
        assert_eq!(validator.validate("unificada nacional"), Flag::Yes);
    }

    #[test]
    fn test_unrelated_institution() {
        let (_dir, store) = store_with("Corporacion Unificada Nacional\nCUN\n");
        let validator = InstitutionValidator::new(&store);
        assert_eq!(validator.validate("Universidad de Antioquia"), Flag::No);
    }

    #[test]
    fn test_sentinels_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let validator = InstitutionValidator::new(&store);

        assert_eq!(validator.validate(""), Flag::No);
        assert_eq!(validator.validate("   "), Flag::No);
        assert_eq!(validator.validate("Revision Manual"), Flag::No);
        assert_eq!(validator.validate("Revisión Manual"), Flag::No);
        assert_eq!(validator.validate(MANUAL_EXTRACTION), Flag::No);
    }

    #[test]
    fn test_containment_is_symmetric() {
        let variant = "Corporacion Unificada Nacional";
        let extracted = "CORPORACION UNIFICADA NACIONAL DE EDUCACION SUPERIOR - SEDE NORTE";
        let (_dir, store) = store_with(variant);
        let validator = InstitutionValidator::new(&store);

        assert_eq!(validator.validate(extracted), Flag::Yes);
        assert_eq!(validator.validate(variant), Flag::Yes);
    }
}
