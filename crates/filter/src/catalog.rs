//! Catalogs of known categorical values.
//!
//! A catalog holds the distinct values of one column, normalized and split
//! into words. Lookups go through a first-word index so the cost grows with
//! the query, not with the catalog.

use crate::words::{words, Word};
use intexta_core::text::normalize;
use std::collections::HashMap;

/// Values shorter than this are only matched as whole words.
pub const MIN_SUBSTRING_CHARS: usize = 4;

#[derive(Debug, Clone)]
struct Entry {
    display: String,
    normalized: String,
    words: Vec<String>,
}

/// A value found in a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    /// Catalog value as it appears in the dataset
    pub value: String,
    /// Indices of the query words covered by the match
    pub words: Vec<usize>,
}

/// Distinct values of one column.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
    by_first_word: HashMap<String, Vec<usize>>,
}

impl Catalog {
    /// Build a catalog from raw values; blanks and duplicates (after
    /// normalization) are dropped and entries are kept in normalized order.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashMap<String, ()> = HashMap::new();
        let mut entries: Vec<Entry> = Vec::new();
        for value in values {
            let display = value.as_ref().trim();
            let normalized = normalize(display);
            let entry_words: Vec<String> = words(&normalized).into_iter().map(|w| w.text).collect();
            if entry_words.is_empty() || seen.insert(normalized.clone(), ()).is_some() {
                continue;
            }
            entries.push(Entry {
                display: display.to_string(),
                normalized: entry_words.join(" "),
                words: entry_words,
            });
        }
        entries.sort_by(|a, b| a.normalized.cmp(&b.normalized));

        let mut by_first_word: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_first_word
                .entry(entry.words[0].clone())
                .or_default()
                .push(idx);
        }

        Self {
            entries,
            by_first_word,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog values in normalized order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.display.as_str())
    }

    /// Whether `value` is in the catalog (normalized comparison).
    pub fn contains(&self, value: &str) -> bool {
        let normalized = words(&normalize(value))
            .into_iter()
            .map(|w| w.text)
            .collect::<Vec<_>>()
            .join(" ");
        self.entries.iter().any(|e| e.normalized == normalized)
    }

    /// Find a catalog value in the query words, considering only words
    /// from `from` onwards that `available` allows.
    ///
    /// Whole-word matches win: the earliest start, then the longest value.
    /// Otherwise a value of at least [`MIN_SUBSTRING_CHARS`] characters
    /// contained in the remaining text is accepted, longest first.
    pub fn find(&self, query: &[Word], available: &[bool], from: usize) -> Option<CatalogMatch> {
        self.find_whole_word(query, available, from)
            .or_else(|| self.find_substring(query, available, from))
    }

    fn find_whole_word(
        &self,
        query: &[Word],
        available: &[bool],
        from: usize,
    ) -> Option<CatalogMatch> {
        for start in from..query.len() {
            if !available[start] {
                continue;
            }
            let Some(candidates) = self.by_first_word.get(&query[start].text) else {
                continue;
            };

            let best = candidates
                .iter()
                .map(|&idx| &self.entries[idx])
                .filter(|entry| {
                    let end = start + entry.words.len();
                    end <= query.len()
                        && (start..end).all(|i| available[i])
                        && entry
                            .words
                            .iter()
                            .zip(&query[start..end])
                            .all(|(a, b)| *a == b.text)
                })
                .max_by_key(|entry| entry.words.len());

            if let Some(entry) = best {
                return Some(CatalogMatch {
                    value: entry.display.clone(),
                    words: (start..start + entry.words.len()).collect(),
                });
            }
        }
        None
    }

    fn find_substring(
        &self,
        query: &[Word],
        available: &[bool],
        from: usize,
    ) -> Option<CatalogMatch> {
        // Rebuild the remaining query as "w1 w2 ..." and remember where each word lands.
        let mut joined = String::new();
        let mut spans: Vec<(usize, usize, usize)> = Vec::new();
        for (idx, word) in query.iter().enumerate().skip(from) {
            if !available[idx] {
                continue;
            }
            if !joined.is_empty() {
                joined.push(' ');
            }
            let start = joined.len();
            joined.push_str(&word.text);
            spans.push((idx, start, joined.len()));
        }
        if joined.is_empty() {
            return None;
        }

        let mut best: Option<(&Entry, usize)> = None;
        for entry in &self.entries {
            if entry.normalized.chars().count() < MIN_SUBSTRING_CHARS {
                continue;
            }
            if let Some(pos) = joined.find(&entry.normalized) {
                let longer = best
                    .map(|(b, _)| entry.normalized.len() > b.normalized.len())
                    .unwrap_or(true);
                if longer {
                    best = Some((entry, pos));
                }
            }
        }

        best.map(|(entry, pos)| {
            let end = pos + entry.normalized.len();
            CatalogMatch {
                value: entry.display.clone(),
                words: spans
                    .iter()
                    .filter(|(_, s, e)| *s < end && *e > pos)
                    .map(|(idx, _, _)| *idx)
                    .collect(),
            }
        })
    }
}

/// Catalogs keyed by column name.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    by_column: HashMap<String, Catalog>,
}

impl Catalogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, catalog: Catalog) {
        self.by_column.insert(column.into(), catalog);
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, catalog: Catalog) -> Self {
        self.insert(column, catalog);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Catalog> {
        self.by_column.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }
}
