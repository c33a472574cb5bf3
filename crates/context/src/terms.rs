//! Query term extraction.

use intexta_core::text::{is_stop_word, normalize};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Extract normalized query terms.
///
/// Terms are words longer than two characters that are not Spanish stop
/// words, deduplicated in order of first appearance.
pub fn query_terms(query: &str) -> Vec<String> {
    let normalized = normalize(query);
    let mut seen = HashSet::new();

    normalized
        .unicode_words()
        .filter(|word| word.chars().count() > 2)
        .filter(|word| !is_stop_word(word))
        .filter(|word| seen.insert(*word))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_terms_without_accents() {
        assert_eq!(
            query_terms("¿Cuál es la garantía y la devolución?"),
            vec!["garantia", "devolucion"]
        );
    }

    #[test]
    fn test_drops_short_tokens_and_duplicates() {
        assert_eq!(
            query_terms("plazo de pago, PLAZO de envío"),
            vec!["plazo", "pago", "envio"]
        );
    }

    #[test]
    fn test_only_stop_words_yields_nothing() {
        assert!(query_terms("¿qué hay sobre eso?").is_empty());
        assert!(query_terms("").is_empty());
    }
}
