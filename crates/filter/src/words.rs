//! Surface tokenization shared by queries and catalog values.

/// A word of normalized text with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

const INNER: &[char] = &['+', '.', ',', '-', '_', '/', '$'];
const EDGE_TRIM: &[char] = &['.', ',', '-', '_', '/', '$'];

/// Split normalized text into words.
///
/// Words are runs of alphanumerics plus `+ . , - _ / $`; separators and
/// punctuation at either edge are dropped, so `"$100.000,"` yields
/// `"100.000"` and `"s23+"` stays intact.
pub fn words(text: &str) -> Vec<Word> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        let inside = c.is_alphanumeric() || INNER.contains(&c);
        match (inside, start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                push_word(&mut out, text, s, idx);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        push_word(&mut out, text, s, text.len());
    }

    out
}

fn push_word(out: &mut Vec<Word>, text: &str, start: usize, end: usize) {
    let raw = &text[start..end];
    let trimmed_start = raw.trim_start_matches(EDGE_TRIM);
    let lead = raw.len() - trimmed_start.len();
    let trimmed = trimmed_start.trim_end_matches(EDGE_TRIM);
    if trimmed.is_empty() {
        return;
    }
    out.push(Word {
        text: trimmed.to_string(),
        start: start + lead,
        end: start + lead + trimmed.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        words(text).into_iter().map(|w| w.text).collect()
    }

    #[test]
    fn test_words_keep_numbers_and_models() {
        assert_eq!(
            texts("galaxy s23+ de $100.000, hasta 200k?"),
            vec!["galaxy", "s23+", "de", "100.000", "hasta", "200k"]
        );
    }

    #[test]
    fn test_words_split_on_colons_and_question_marks() {
        assert_eq!(texts("¿sku:ab-12?"), vec!["sku", "ab-12"]);
    }

    #[test]
    fn test_spans_point_into_text() {
        let text = "bodega  las condes.";
        for word in words(text) {
            assert_eq!(&text[word.start..word.end], word.text);
        }
        assert_eq!(texts(text), vec!["bodega", "las", "condes"]);
    }

    #[test]
    fn test_punctuation_only_is_dropped() {
        assert!(words("- , . $").is_empty());
    }
}
