//! Relevance-constrained context assembly.
//!
//! Turns a set of documents and a short query into one bounded string for the
//! generation service:
//! - [`segment`] splits text into paragraph units
//! - [`score`] ranks units against the query terms
//! - [`select`] fits the best units into a character budget
//! - [`assemble`] combines documents with headers and truncation markers
//!
//! Everything here is pure and synchronous except the corpus providers.

pub mod assemble;
pub mod corpus;
pub mod score;
pub mod segment;
pub mod select;
pub mod terms;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use assemble::{assemble, assemble_report, Assembler, EMPTY_CORPUS};
pub use corpus::{normalize_text, CorpusProvider, DirectoryCorpus};
pub use terms::query_terms;
pub use types::{AssembledContext, Budget, Document, DocumentReport, Retention, Unit};
