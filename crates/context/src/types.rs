//! Data types for context assembly.

use chrono::{DateTime, Utc};
use intexta_core::config::RetrievalConfig;
use intexta_core::text::char_len;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A source document handed to the assembler.
///
/// Documents are owned by the caller and never mutated by retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier (relative path, database id, ...)
    pub id: String,

    /// Name shown in the context header
    pub name: String,

    /// Full text content
    pub text: String,

    /// When the document was stored or last modified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a document without a timestamp.
    pub fn new(id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            text: text.into(),
            timestamp: None,
        }
    }

    /// Attach a timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}

/// A paragraph-level span of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit<'a> {
    /// Position among the retained units of the document
    pub index: usize,

    /// Trimmed text of the span
    pub text: &'a str,

    /// Length in characters
    pub len: usize,
}

impl<'a> Unit<'a> {
    pub fn new(index: usize, text: &'a str) -> Self {
        Self {
            index,
            text,
            len: char_len(text),
        }
    }
}

/// A unit with its relevance score.
///
/// A score of 0 means no query term matched and no bonus was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredUnit<'a> {
    pub unit: Unit<'a>,
    pub score: u32,
    pub matched_terms: Vec<String>,
}

/// A unit chosen by the selector, possibly truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedUnit<'a> {
    pub index: usize,
    pub text: Cow<'a, str>,
    pub truncated: bool,
}

/// Character budgets for one assembly call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Ceiling for the whole assembled string
    pub total: usize,

    /// Minimum characters worth giving a document before dropping it
    pub min_document: usize,
}

impl Budget {
    pub const DEFAULT_MIN_DOCUMENT: usize = 500;

    pub fn new(total: usize, min_document: usize) -> Self {
        Self {
            total,
            min_document,
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::from(&RetrievalConfig::default())
    }
}

impl From<&RetrievalConfig> for Budget {
    fn from(config: &RetrievalConfig) -> Self {
        Self::new(config.context_budget, config.min_document_chars)
    }
}

/// How a document's text was reduced to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    /// Whole text included
    Full,
    /// Highest-scoring paragraphs, in document order
    Selected,
    /// Leading characters only
    Prefix,
    /// Beginning and end with an omission marker between
    HeadTail,
}

/// What happened to one document during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub id: String,
    pub name: String,
    pub original_chars: usize,
    pub retained_chars: usize,
    pub retention: Retention,
}

/// Result of an assembly call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// Bounded context text
    pub text: String,

    /// One entry per included document, in output order
    pub documents: Vec<DocumentReport>,

    /// Documents left out because the budget ran out
    pub omitted: usize,
}

impl AssembledContext {
    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}
