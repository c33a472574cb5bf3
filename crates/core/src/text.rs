//! Text helpers shared by retrieval and filtering.
//!
//! Matching in Intexta is done on a normalized form: NFKD decomposition,
//! combining marks removed, lower-cased. "Garantía" and "GARANTIA" both
//! normalize to "garantia".

use std::collections::HashSet;
use std::sync::OnceLock;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Spanish stop words in normalized form (no diacritics, lower-case).
///
/// Only words longer than two characters matter here, shorter tokens are
/// discarded before the stop-word check.
const SPANISH_STOP_WORDS: &[&str] = &[
    "que", "cual", "cuales", "como", "donde", "cuando", "quien", "quienes", "para", "por",
    "con", "sin", "los", "las", "del", "una", "uno", "unos", "unas", "sus", "este", "esta",
    "estos", "estas", "ese", "esa", "esos", "esas", "eso", "esto", "aquel", "aquella", "hay",
    "son", "era", "fue", "ser", "estar", "estan", "tiene", "tienen", "tengo", "tienes",
    "puede", "pueden", "puedes", "podria", "dime", "decir", "quiero", "queria", "saber",
    "informacion", "sobre", "entre", "hasta", "desde", "pero", "mas", "muy", "tambien",
    "todo", "todos", "toda", "todas", "algo", "alguno", "alguna", "algunos", "cuanto",
    "cuanta", "cuantos", "cuantas", "hola", "gracias", "favor", "porfa", "necesito", "busco",
    "hacer", "hace", "les", "nos", "mis", "tus", "ante", "bajo", "segun", "tras", "durante",
    "the", "and", "for", "with",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| SPANISH_STOP_WORDS.iter().copied().collect())
}

/// Normalize text for matching: strip diacritics and lower-case.
///
/// # Example
/// ```
/// use intexta_core::text::normalize;
///
/// assert_eq!(normalize("Garantía de DEVOLUCIÓN"), "garantia de devolucion");
/// ```
pub fn normalize(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether a normalized token is a Spanish stop word.
pub fn is_stop_word(normalized_token: &str) -> bool {
    stop_words().contains(normalized_token)
}

/// Number of characters (Unicode scalar values) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Keep at most `max_chars` characters of `text`, cutting on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Keep at most the last `max_chars` characters of `text`.
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let total = char_len(text);
    if total <= max_chars {
        return text;
    }
    match text.char_indices().nth(total - max_chars) {
        Some((byte_idx, _)) => &text[byte_idx..],
        None => "",
    }
}
