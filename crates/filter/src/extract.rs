//! Rule-based extraction of predicates from a free-text query.
//!
//! Extraction runs in passes over the normalized query words. Each pass
//! marks the words it uses as consumed so later passes do not reuse them:
//!
//! 1. explicit identifiers (`sku AB-12`)
//! 2. categorical values found in the catalogs
//! 3. numeric ranges, one per numeric field
//! 4. whatever is left becomes keywords
//!
//! Extraction never fails; a query nothing is recognized in yields no
//! predicates.

use crate::catalog::Catalogs;
use crate::number::{parse_number_word, NumberToken, Suffix};
use crate::predicate::Predicate;
use crate::schema::{FilterSchema, NumericField, Quantity, SingleValue};
use crate::words::{words, Word};
use intexta_core::text::{is_stop_word, normalize};

/// Keywords shorter than this are ignored.
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Words joining the two bounds of a range.
const RANGE_CONNECTORS: &[&str] = &["y", "a", "-", "hasta", "al"];

const UPPER_BOUND_WORDS: &[&str] = &["hasta", "maximo", "max", "bajo", "tope"];
const LOWER_BOUND_WORDS: &[&str] = &["desde", "minimo", "min", "sobre"];

/// Two-word bounds: "menos de", "mas que", "arriba de".
const UPPER_BOUND_PAIRS: &[(&str, &[&str])] = &[("menos", &["de", "que"])];
const LOWER_BOUND_PAIRS: &[(&str, &[&str])] = &[("mas", &["de", "que"]), ("arriba", &["de"])];

/// Range and unit words that never become keywords. Field words come
/// from the schema.
const KEYWORD_STOP_WORDS: &[&str] = &[
    "entre", "hasta", "desde", "maximo", "minimo", "max", "min", "mas", "menos", "de", "a",
    "y", "al", "que", "bajo", "sobre", "tope", "arriba", "precio", "precios", "valor", "gb",
    "tb", "gigas", "giga", "teras", "tera", "mil", "lucas", "clp", "pesos", "millon",
    "millones",
];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(NumberToken),
    Word(String),
    /// A consumed word; breaks every pattern
    Gap,
}

struct Query {
    words: Vec<Word>,
    consumed: Vec<bool>,
}

impl Query {
    fn new(text: &str) -> Self {
        let words = words(&normalize(text));
        let consumed = vec![false; words.len()];
        Self { words, consumed }
    }

    fn available(&self) -> Vec<bool> {
        self.consumed.iter().map(|c| !c).collect()
    }

    fn consume(&mut self, indices: &[usize]) {
        for &i in indices {
            self.consumed[i] = true;
        }
    }
}

/// Extract predicates from `query`, in the order they should be applied.
pub fn extract(query: &str, schema: &FilterSchema, catalogs: &Catalogs) -> Vec<Predicate> {
    let mut q = Query::new(query);
    let mut predicates = Vec::new();

    let mut identifier = None;
    if let Some(field) = &schema.identifier {
        if let Some((value, indices)) = find_identifier(&q.words, &field.keyword) {
            q.consume(&indices);
            identifier = Some(Predicate::IdentifierMatch {
                field: field.column.clone(),
                value,
            });
        }
    }

    for field in &schema.categorical {
        let Some(catalog) = catalogs.get(&field.column) else {
            continue;
        };
        let available = q.available();
        let keyword_at = q
            .words
            .iter()
            .enumerate()
            .position(|(i, w)| available[i] && field.keywords.iter().any(|k| *k == w.text));

        let found = keyword_at
            .and_then(|k| catalog.find(&q.words, &available, k + 1))
            .or_else(|| catalog.find(&q.words, &available, 0));

        if let Some(found) = found {
            tracing::debug!("Matched {} = {:?}", field.column, found.value);
            q.consume(&found.words);
            predicates.push(Predicate::CategoricalMatch {
                field: field.column.clone(),
                value: found.value,
            });
        }
    }

    predicates.extend(identifier);

    let tokens = lex_numbers(&mut q);
    let mut ranges = Vec::new();
    for field in &schema.numeric {
        if let Some((min, max)) = numeric_range(&tokens, field) {
            ranges.push(Predicate::NumericRange {
                field: field.column.clone(),
                min,
                max,
            });
        }
    }

    let terms = keywords(&q, schema);
    if !terms.is_empty() && !schema.keyword_columns.is_empty() {
        predicates.push(Predicate::KeywordMask {
            columns: schema.keyword_columns.clone(),
            terms,
        });
    }

    predicates.extend(ranges);

    if predicates.is_empty() {
        tracing::info!("No filters recognized in query {:?}", query);
    } else {
        tracing::debug!("Extracted {} predicate(s) from {:?}", predicates.len(), query);
    }
    predicates
}

/// `sku AB-12`, `sku-ab12`, `sku123`.
fn find_identifier(words: &[Word], keyword: &str) -> Option<(String, Vec<usize>)> {
    for (i, word) in words.iter().enumerate() {
        if word.text == keyword {
            if let Some(next) = words.get(i + 1) {
                return Some((next.text.clone(), vec![i, i + 1]));
            }
            continue;
        }
        if let Some(rest) = word.text.strip_prefix(keyword) {
            let id = rest.trim_start_matches(['-', '_', '/']);
            if id.starts_with(|c: char| c.is_ascii_digit())
                || (id.len() < rest.len() && !id.is_empty())
            {
                return Some((id.to_string(), vec![i]));
            }
        }
    }
    None
}

/// Turn unconsumed words into tokens, merging unit words into the number
/// before them. Every word that ends up in a number is consumed.
fn lex_numbers(q: &mut Query) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(q.words.len());
    let mut number_words = Vec::new();
    let mut i = 0;

    while i < q.words.len() {
        if q.consumed[i] {
            tokens.push(Token::Gap);
            i += 1;
            continue;
        }

        let text = q.words[i].text.as_str();
        if let Some(mut number) = parse_number_word(text) {
            number_words.push(i);
            if !number.suffixed {
                let unit = q
                    .words
                    .get(i + 1)
                    .filter(|_| !q.consumed[i + 1])
                    .and_then(|w| Suffix::parse(&w.text));
                if let Some(unit) = unit {
                    number = number.with_suffix(unit);
                    number_words.push(i + 1);
                    i += 1;
                }
            }
            tokens.push(Token::Number(number));
        } else if let Some((low, high)) = split_dashed(text) {
            number_words.push(i);
            tokens.push(Token::Number(low));
            tokens.push(Token::Word("-".to_string()));
            tokens.push(Token::Number(high));
        } else {
            tokens.push(Token::Word(text.to_string()));
        }
        i += 1;
    }

    q.consume(&number_words);
    propagate_units(&mut tokens);
    tokens
}

/// "100-200", "100k-200k".
fn split_dashed(text: &str) -> Option<(NumberToken, NumberToken)> {
    let (low, high) = text.split_once('-')?;
    Some((parse_number_word(low)?, parse_number_word(high)?))
}

/// In `N connector N`, each bound adopts the unit the other was written with.
fn propagate_units(tokens: &mut [Token]) {
    for i in 0..tokens.len().saturating_sub(2) {
        let (Token::Number(a), Token::Word(conn), Token::Number(b)) =
            (&tokens[i], &tokens[i + 1], &tokens[i + 2])
        else {
            continue;
        };
        if !RANGE_CONNECTORS.contains(&conn.as_str()) {
            continue;
        }
        let (mut a, mut b) = (*a, *b);
        let original_a = a;
        a.adopt_unit_of(&b);
        b.adopt_unit_of(&original_a);
        tokens[i] = Token::Number(a);
        tokens[i + 2] = Token::Number(b);
    }
}

fn of_kind(token: &Token, quantity: Quantity) -> Option<f64> {
    match token {
        Token::Number(n) if n.capacity == (quantity == Quantity::Capacity) => Some(n.value),
        _ => None,
    }
}

fn word(token: &Token) -> Option<&str> {
    match token {
        Token::Word(w) => Some(w.as_str()),
        _ => None,
    }
}

fn sorted(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Range for one numeric field: explicit range, then bound words, then
/// bare numbers.
fn numeric_range(tokens: &[Token], field: &NumericField) -> Option<(Option<f64>, Option<f64>)> {
    let kind = field.quantity;

    for w in tokens.windows(3) {
        let (Some(a), Some(conn), Some(b)) =
            (of_kind(&w[0], kind), word(&w[1]), of_kind(&w[2], kind))
        else {
            continue;
        };
        if RANGE_CONNECTORS.contains(&conn) {
            let (min, max) = sorted(a, b);
            return Some((Some(min), Some(max)));
        }
    }

    let lower = bound_after(tokens, kind, LOWER_BOUND_WORDS, LOWER_BOUND_PAIRS);
    let upper = bound_after(tokens, kind, UPPER_BOUND_WORDS, UPPER_BOUND_PAIRS);
    match (lower, upper) {
        (Some(min), Some(max)) => {
            let (min, max) = sorted(min, max);
            return Some((Some(min), Some(max)));
        }
        (None, None) => {}
        bounds => return Some(bounds),
    }

    let bare: Vec<f64> = tokens.iter().filter_map(|t| of_kind(t, kind)).take(2).collect();
    match bare.as_slice() {
        [a, b] => {
            let (min, max) = sorted(*a, *b);
            Some((Some(min), Some(max)))
        }
        [v] => match field.single_value {
            SingleValue::UpperBound => Some((None, Some(*v))),
            SingleValue::Exact => Some((Some(*v), Some(*v))),
        },
        _ => None,
    }
}

/// First number of `kind` introduced by a bound word ("hasta 50k",
/// "maximo de 200", "mas de 100k").
fn bound_after(
    tokens: &[Token],
    kind: Quantity,
    single: &[&str],
    pairs: &[(&str, &[&str])],
) -> Option<f64> {
    for (i, token) in tokens.iter().enumerate() {
        let Some(w) = word(token) else { continue };

        let value_at = if single.contains(&w) {
            Some(i + 1)
        } else {
            pairs
                .iter()
                .find(|(first, seconds)| {
                    *first == w
                        && tokens
                            .get(i + 1)
                            .and_then(word)
                            .is_some_and(|next| seconds.contains(&next))
                })
                .map(|_| i + 2)
        };
        let Some(mut at) = value_at else { continue };

        if tokens.get(at).and_then(word) == Some("de") {
            at += 1;
        }
        if let Some(value) = tokens.get(at).and_then(|t| of_kind(t, kind)) {
            return Some(value);
        }
    }
    None
}

fn keywords(q: &Query, schema: &FilterSchema) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for (word, consumed) in q.words.iter().zip(&q.consumed) {
        let text = word.text.as_str();
        let usable = !consumed
            && text.chars().count() >= MIN_KEYWORD_CHARS
            && text
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+' || c == '-')
            && !text.chars().all(|c| c.is_ascii_digit())
            && !KEYWORD_STOP_WORDS.contains(&text)
            && !schema.field_keywords().any(|k| k == text)
            && !is_stop_word(text);
        if usable && !terms.iter().any(|t| t == text) {
            terms.push(text.to_string());
        }
    }
    terms
}
