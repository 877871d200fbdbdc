// src/core/sanitize.rs

/// Collapse runs of whitespace (including newlines) into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case- and accent-insensitive containment for Portuguese status text.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

fn fold(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'a',
            'é' | 'ê' | 'É' | 'Ê' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'o',
            'ú' | 'Ú' => 'u',
            'ç' | 'Ç' => 'c',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(normalize_ws("  Dispõe\n sobre\t\tauxílio  "), "Dispõe sobre auxílio");
    }

    #[test]
    fn folding_ignores_case_and_accents() {
        assert!(contains_folded("Remessa ao SENADO Federal", "senado federal"));
        assert!(contains_folded("Câmara dos Deputados", "camara dos deputados"));
        assert!(!contains_folded("Arquivada", "senado"));
    }
}
