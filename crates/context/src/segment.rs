//! Paragraph segmentation.

use crate::types::Unit;

/// Units shorter than this many characters are dropped as noise.
pub const MIN_UNIT_CHARS: usize = 30;

/// Fewer paragraphs than this means the text is single-spaced; split on lines.
const MIN_PARAGRAPHS: usize = 3;

/// Split text into candidate units.
///
/// Blank lines separate paragraphs. When that yields fewer than three
/// paragraphs the text is re-split on single line breaks. Units under
/// [`MIN_UNIT_CHARS`] are discarded and the survivors are numbered from 0.
pub fn segment(text: &str) -> Vec<Unit<'_>> {
    let mut spans = paragraphs(text);
    if spans.len() < MIN_PARAGRAPHS {
        spans = lines(text);
    }

    spans
        .into_iter()
        .map(str::trim)
        .filter(|span| span.chars().count() >= MIN_UNIT_CHARS)
        .enumerate()
        .map(|(index, span)| Unit::new(index, span))
        .collect()
}

/// Spans separated by one or more blank lines.
fn paragraphs(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split('\n') {
        let line_start = offset;
        let line_end = offset + line.len();
        offset = line_end + 1;

        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                spans.push(&text[s..end]);
            }
        } else {
            if start.is_none() {
                start = Some(line_start);
            }
            end = line_end;
        }
    }

    if let Some(s) = start {
        spans.push(&text[s..end]);
    }

    spans
}

fn lines(text: &str) -> Vec<&str> {
    text.split('\n').filter(|line| !line.trim().is_empty()).collect()
}
