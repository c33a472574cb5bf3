//! Bounded multi-document context assembly.
//!
//! Every document becomes a block of `header + body + "\n"`. Blocks are
//! emitted in caller order until the budget is spent; the final string never
//! exceeds [`Budget::total`] characters.

use crate::score::score_units;
use crate::segment::segment;
use crate::select::{join_selected, select};
use crate::terms::query_terms;
use crate::types::{AssembledContext, Budget, Document, DocumentReport, Retention};
use intexta_core::text::{char_len, tail_chars, truncate_chars};

/// Returned when there are no documents at all.
pub const EMPTY_CORPUS: &str = "No hay documentos disponibles para consultar.";

/// Appended when only the beginning of a document is kept.
pub const PREFIX_MARKER: &str = "\n[... contenido truncado ...]";

/// Placed between the head and tail of a document.
pub const HEAD_TAIL_MARKER: &str = "\n[... contenido omitido ...]\n";

fn header(name: &str) -> String {
    format!("--- {} ---\n", name)
}

fn excerpt_header(name: &str, retained: usize, original: usize) -> String {
    format!(
        "--- {} (extracto: {} de {} caracteres) ---\n",
        name, retained, original
    )
}

fn omitted_marker(count: usize) -> String {
    format!(
        "[... {} documento(s) omitido(s) por límite de contexto ...]\n",
        count
    )
}

/// Assembles documents into one bounded context string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler {
    budget: Budget,
}

impl Assembler {
    pub fn new(budget: Budget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Assemble `documents` for `query`.
    ///
    /// `None` (or a blank query) means no query: oversized documents keep
    /// their head and tail. A query without usable terms, or whose terms
    /// match nothing, keeps each oversized document's prefix.
    pub fn assemble(&self, documents: &[Document], query: Option<&str>) -> AssembledContext {
        let total = self.budget.total;

        if documents.is_empty() {
            tracing::info!("No documents available for context assembly");
            return AssembledContext {
                text: truncate_chars(EMPTY_CORPUS, total).to_string(),
                documents: Vec::new(),
                omitted: 0,
            };
        }

        let terms = query
            .filter(|q| !q.trim().is_empty())
            .map(query_terms);

        if let Some(terms) = &terms {
            if terms.is_empty() {
                tracing::info!("Query has no usable terms, falling back to document prefixes");
            } else {
                tracing::debug!("Query terms: {:?}", terms);
            }
        }

        let mut text = String::new();
        let mut used = 0;
        let mut reports = Vec::with_capacity(documents.len());
        let mut omitted = 0;

        for (position, document) in documents.iter().enumerate() {
            let later = documents.len() - position - 1;
            let reserve = if later > 0 {
                char_len(&omitted_marker(later))
            } else {
                0
            };

            let original = document.char_len();
            let full_header = header(&document.name);
            let header_cost = char_len(&excerpt_header(&document.name, original, original))
                .max(char_len(&full_header))
                + 1;

            let overhead = used + header_cost + reserve;
            let available = total.saturating_sub(overhead);

            if overhead >= total || available < self.budget.min_document {
                omitted = documents.len() - position;
                let marker = omitted_marker(omitted);
                text.push_str(truncate_chars(&marker, total.saturating_sub(used)));
                tracing::info!(
                    "Context budget exhausted, omitting {} document(s) starting at '{}'",
                    omitted,
                    document.name
                );
                break;
            }

            let (block, report) = if original <= available {
                let block = format!("{}{}\n", full_header, document.text);
                let report = DocumentReport {
                    id: document.id.clone(),
                    name: document.name.clone(),
                    original_chars: original,
                    retained_chars: original,
                    retention: Retention::Full,
                };
                (block, report)
            } else {
                let (body, retention) = retain(document, terms.as_deref(), available);
                let retained = char_len(&body);
                let block = format!(
                    "{}{}\n",
                    excerpt_header(&document.name, retained, original),
                    body
                );
                tracing::debug!(
                    "Document '{}' reduced from {} to {} chars ({:?})",
                    document.name,
                    original,
                    retained,
                    retention
                );
                let report = DocumentReport {
                    id: document.id.clone(),
                    name: document.name.clone(),
                    original_chars: original,
                    retained_chars: retained,
                    retention,
                };
                (block, report)
            };

            used += char_len(&block);
            text.push_str(&block);
            reports.push(report);
        }

        tracing::info!(
            "Assembled context: {} chars from {} document(s), {} omitted",
            used,
            reports.len(),
            omitted
        );

        AssembledContext {
            text,
            documents: reports,
            omitted,
        }
    }
}

/// Reduce one oversized document to at most `available` characters.
fn retain(document: &Document, terms: Option<&[String]>, available: usize) -> (String, Retention) {
    let terms = match terms {
        None => return (head_tail(&document.text, available), Retention::HeadTail),
        Some(terms) if terms.is_empty() => {
            return (prefix(&document.text, available), Retention::Prefix)
        }
        Some(terms) => terms,
    };

    let units = segment(&document.text);
    let scored = score_units(&units, terms);
    let selected = select(&scored, available);

    if selected.is_empty() {
        tracing::info!(
            "No paragraph of '{}' matched the query, keeping its prefix",
            document.name
        );
        return (prefix(&document.text, available), Retention::Prefix);
    }

    (join_selected(&selected), Retention::Selected)
}

/// Leading characters of `text` plus a truncation marker.
pub fn prefix(text: &str, budget: usize) -> String {
    if char_len(text) <= budget {
        return text.to_string();
    }
    let marker_len = char_len(PREFIX_MARKER);
    if budget <= marker_len {
        return truncate_chars(text, budget).to_string();
    }
    format!(
        "{}{}",
        truncate_chars(text, budget - marker_len),
        PREFIX_MARKER
    )
}

/// First and last halves of `text` around an omission marker.
pub fn head_tail(text: &str, budget: usize) -> String {
    if char_len(text) <= budget {
        return text.to_string();
    }
    let marker_len = char_len(HEAD_TAIL_MARKER);
    if budget <= marker_len {
        return prefix(text, budget);
    }
    let half = (budget - marker_len) / 2;
    format!(
        "{}{}{}",
        truncate_chars(text, half),
        HEAD_TAIL_MARKER,
        tail_chars(text, half)
    )
}

/// Assemble `documents` into a string of at most `total_budget` characters.
///
/// Uses the default per-document floor. An empty `query` is treated as no
/// query.
pub fn assemble(documents: &[Document], query: &str, total_budget: usize) -> String {
    assemble_report(documents, query, total_budget).text
}

/// Like [`assemble`], but also reports how each document was reduced.
pub fn assemble_report(
    documents: &[Document],
    query: &str,
    total_budget: usize,
) -> AssembledContext {
    Assembler::new(Budget::new(total_budget, Budget::DEFAULT_MIN_DOCUMENT))
        .assemble(documents, Some(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(seed: &str, chars: usize) -> String {
        let mut text = String::new();
        while char_len(&text) < chars {
            text.push_str(seed);
            text.push(' ');
        }
        truncate_chars(text.trim_end(), chars).trim_end().to_string()
    }

    #[test]
    fn test_empty_corpus_sentinel() {
        assert_eq!(assemble(&[], "garantía", 1000), EMPTY_CORPUS);
        assert_eq!(assemble(&[], "garantía", 10), "No hay doc");
    }

    #[test]
    fn test_small_documents_are_included_whole() {
        let docs = vec![
            Document::new("1", "a.txt", "Contenido breve del primer documento."),
            Document::new("2", "b.txt", "Contenido breve del segundo documento."),
        ];
        let context = Assembler::new(Budget::new(2000, 500)).assemble(&docs, Some("contenido"));
        assert_eq!(
            context.text,
            "--- a.txt ---\nContenido breve del primer documento.\n\
             --- b.txt ---\nContenido breve del segundo documento.\n"
        );
        assert!(context
            .documents
            .iter()
            .all(|d| d.retention == Retention::Full));
        assert_eq!(context.omitted, 0);
    }

    #[test]
    fn test_no_query_uses_head_and_tail() {
        let text = format!("INICIO {} FINAL", "x".repeat(3000));
        let docs = vec![Document::new("1", "largo.txt", text)];
        let context = Assembler::new(Budget::new(1000, 500)).assemble(&docs, None);
        assert!(context.text.contains("INICIO"));
        assert!(context.text.contains("FINAL"));
        assert!(context.text.contains(HEAD_TAIL_MARKER));
        assert_eq!(context.documents[0].retention, Retention::HeadTail);
        assert!(context.char_len() <= 1000);
    }

    #[test]
    fn test_unmatched_query_falls_back_to_prefix() {
        let body = (0..20)
            .map(|i| paragraph(&format!("Sección {} sobre horarios de atención.", i), 200))
            .collect::<Vec<_>>()
            .join("\n\n");
        let docs = vec![Document::new("1", "horarios.txt", body.clone())];
        let context = Assembler::new(Budget::new(1500, 500)).assemble(&docs, Some("reembolso"));
        assert_eq!(context.documents[0].retention, Retention::Prefix);
        assert!(context.text.contains(PREFIX_MARKER));
        assert!(context.text.contains(truncate_chars(&body, 200)));
        assert!(context.char_len() <= 1500);
    }

    #[test]
    fn test_header_records_original_and_retained_sizes() {
        let body = "y".repeat(5000);
        let docs = vec![Document::new("1", "manual.pdf", body)];
        let context = Assembler::new(Budget::new(1200, 500)).assemble(&docs, None);
        let retained = context.documents[0].retained_chars;
        assert!(context.text.starts_with(&format!(
            "--- manual.pdf (extracto: {} de 5000 caracteres) ---\n",
            retained
        )));
    }

    #[test]
    fn test_budget_exhaustion_appends_omission_marker() {
        let docs: Vec<Document> = (0..4)
            .map(|i| Document::new(i.to_string(), format!("doc{}.txt", i), "z".repeat(900)))
            .collect();
        let context = Assembler::new(Budget::new(2000, 500)).assemble(&docs, None);
        assert!(context.omitted > 0);
        assert!(context
            .text
            .contains(&format!("[... {} documento(s) omitido(s)", context.omitted)));
        assert_eq!(context.documents.len() + context.omitted, 4);
        assert!(context.char_len() <= 2000);
    }

    #[test]
    fn test_tiny_budget_never_overflows() {
        let docs = vec![Document::new("1", "nombre-muy-largo-del-documento.txt", "texto")];
        for budget in [0, 1, 5, 20, 60] {
            let text = assemble(&docs, "texto", budget);
            assert!(char_len(&text) <= budget, "budget {} gave {:?}", budget, text);
        }
    }

    #[test]
    fn test_prefix_and_head_tail_helpers() {
        assert_eq!(prefix("corto", 100), "corto");
        assert_eq!(prefix(&"a".repeat(100), 10), "a".repeat(10));
        let cut = prefix(&"a".repeat(100), 50);
        assert_eq!(char_len(&cut), 50);
        assert!(cut.ends_with(PREFIX_MARKER));

        let split = head_tail(&format!("{}{}", "h".repeat(100), "t".repeat(100)), 80);
        assert!(split.starts_with('h'));
        assert!(split.ends_with('t'));
        assert!(char_len(&split) <= 80);
    }

    #[test]
    fn test_assemble_report_matches_text() {
        let docs = vec![Document::new("1", "a.txt", "Contenido breve.")];
        let report = assemble_report(&docs, "contenido", 1000);
        assert_eq!(report.text, assemble(&docs, "contenido", 1000));
        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.documents[0].retention, Retention::Full);
        assert_eq!(report.omitted, 0);
    }
}
