//! End-to-end assembly scenarios over realistic policy documents.

use crate::assemble::{Assembler, PREFIX_MARKER};
use crate::types::{Budget, Document, Retention};
use intexta_core::text::{char_len, truncate_chars};

const FILLER: &str =
    "El horario de atención al cliente es de lunes a viernes entre nueve y dieciocho horas.";
const WARRANTY: &str =
    "La garantía cubre defectos de fabricación durante doce meses desde la fecha de compra.";
const RETURNS: &str =
    "Para solicitar una devolución conserve la boleta y el embalaje original del producto.";
const BOTH: &str =
    "La garantía no aplica a golpes y la devolución del dinero se realiza en cinco días.";

fn paragraph(seed: &str, chars: usize) -> String {
    let mut text = String::new();
    while char_len(&text) < chars {
        text.push_str(seed);
        text.push(' ');
    }
    truncate_chars(text.trim_end(), chars).trim_end().to_string()
}

/// Twenty paragraphs of ~500 chars; three of them talk about warranty or returns.
fn policy_document() -> (Document, Vec<String>) {
    let mut matching = Vec::new();
    let paragraphs: Vec<String> = (0..20)
        .map(|i| match i {
            2 => paragraph(WARRANTY, 500),
            9 => paragraph(RETURNS, 500),
            15 => paragraph(BOTH, 500),
            _ => paragraph(FILLER, 500),
        })
        .inspect(|p| {
            if !p.starts_with("El horario") {
                matching.push(p.clone());
            }
        })
        .collect();
    let text = paragraphs.join("\n\n");
    (Document::new("doc-1", "politicas.txt", text), matching)
}

#[test]
fn test_query_selects_matching_paragraphs_in_order() {
    let (document, matching) = policy_document();
    let original = document.char_len();
    assert!(original >= 10_000);

    let context = Assembler::new(Budget::new(2000, 500))
        .assemble(&[document], Some("garantía devolución"));

    let body = matching.join("\n\n");
    let expected = format!(
        "--- politicas.txt (extracto: {} de {} caracteres) ---\n{}\n",
        char_len(&body),
        original,
        body
    );
    assert_eq!(context.text, expected);
    assert!(context.char_len() <= 2000);
    assert_eq!(context.documents[0].retention, Retention::Selected);
    assert!(!context.text.contains("El horario"));
}

#[test]
fn test_assembly_is_idempotent() {
    let (document, _) = policy_document();
    let docs = vec![document.clone(), Document::new("doc-2", "faq.txt", FILLER)];
    let assembler = Assembler::new(Budget::new(3000, 500));
    let first = assembler.assemble(&docs, Some("devolución"));
    let second = assembler.assemble(&docs, Some("devolución"));
    assert_eq!(first, second);
}

#[test]
fn test_selected_paragraphs_keep_document_order() {
    let (document, _) = policy_document();
    // "garantia" scores BOTH (index 15) and WARRANTY (index 2); WARRANTY must still come first.
    let context = Assembler::new(Budget::new(1500, 500)).assemble(&[document], Some("garantia"));
    let warranty_at = context.text.find("La garantía cubre").unwrap();
    let both_at = context.text.find("La garantía no aplica").unwrap();
    assert!(warranty_at < both_at);
}

#[test]
fn test_stop_word_query_returns_prefix_not_empty() {
    let (document, _) = policy_document();
    let start = truncate_chars(&document.text, 300).to_string();
    let context =
        Assembler::new(Budget::new(1000, 500)).assemble(&[document], Some("¿qué hay sobre eso?"));

    assert_eq!(context.documents[0].retention, Retention::Prefix);
    assert!(context.text.contains(&start));
    assert!(context.text.trim_end().ends_with(PREFIX_MARKER.trim()));
    assert!(context.char_len() <= 1000);
}

#[test]
fn test_later_documents_omitted_with_marker() {
    let (document, _) = policy_document();
    let docs = vec![
        document,
        Document::new("doc-2", "faq.txt", paragraph(FILLER, 2000)),
        Document::new("doc-3", "envios.txt", paragraph(FILLER, 2000)),
    ];
    let context = Assembler::new(Budget::new(1600, 500)).assemble(&docs, Some("garantía"));

    assert_eq!(context.documents.len(), 1);
    assert_eq!(context.omitted, 2);
    assert!(context
        .text
        .ends_with("[... 2 documento(s) omitido(s) por límite de contexto ...]\n"));
    assert!(context.char_len() <= 1600);
}
