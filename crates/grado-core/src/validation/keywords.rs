//! Dictionary keyword matching.

/// Whether `text` contains at least `min_matches` dictionary entries.
///
/// Matching is case-insensitive substring containment. Blank entries are
/// ignored and counting stops as soon as the threshold is reached.
pub fn is_valid<S: AsRef<str>>(text: &str, dictionary: &[S], min_matches: usize) -> bool {
    if text.is_empty() || dictionary.is_empty() {
        return false;
    }

    let haystack = text.to_lowercase();
    let mut matches = 0;

    for entry in dictionary {
        let keyword = entry.as_ref().trim();
        if keyword.is_empty() {
            continue;
        }
        if haystack.contains(&keyword.to_lowercase()) {
            matches += 1;
            if matches >= min_matches {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYT_KEYWORDS: [&str; 5] = ["Saber TyT", "Icfes", "Puntaje", "Técnico", "Resultados"];

    #[test]
    fn test_two_matches_accept() {
        let text = "REPORTE DE RESULTADOS SABER TYT";
        assert!(is_valid(text, &TYT_KEYWORDS, 2));
    }

    #[test]
    fn test_single_match_rejects() {
        assert!(!is_valid("Resultados del semestre", &TYT_KEYWORDS, 2));
    }

    #[test]
    fn test_case_folding_covers_accents() {
        assert!(is_valid("TÉCNICO PROFESIONAL, PUNTAJE 150", &TYT_KEYWORDS, 2));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(!is_valid("", &TYT_KEYWORDS, 1));
        assert!(!is_valid("Saber TyT", &[] as &[&str], 1));
    }

    #[test]
    fn test_blank_entries_never_match() {
        assert!(!is_valid("cualquier texto", &["", "   ", "\t"], 1));
    }

    #[test]
    fn test_monotonic_in_min_matches() {
        let texts = [
            "",
            "Icfes",
            "Saber TyT icfes",
            "Resultados Saber TyT Icfes puntaje técnico",
            "sin coincidencias",
        ];

        for text in texts {
            let results: Vec<bool> = (1..=6).map(|n| is_valid(text, &TYT_KEYWORDS, n)).collect();
            for pair in results.windows(2) {
                // a stricter threshold can never accept what a looser one rejected
                assert!(pair[0] || !pair[1], "non-monotonic for {:?}: {:?}", text, results);
            }
        }
    }

    #[test]
    fn test_owned_dictionary() {
        let dictionary = vec!["Cédula".to_string(), "Colombia".to_string()];
        assert!(is_valid("REPUBLICA DE COLOMBIA CÉDULA DE CIUDADANÍA", &dictionary, 2));
    }
}
