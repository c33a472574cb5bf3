//! Budget-aware greedy selection.

use crate::types::{ScoredUnit, SelectedUnit};
use intexta_core::text::{char_len, truncate_chars};
use std::borrow::Cow;

/// Only this many top-scoring units are considered.
pub const MAX_CANDIDATES: usize = 50;

/// Below this many remaining characters an overflowing unit is skipped
/// instead of truncated.
pub const MIN_USEFUL_REMAINDER: usize = 300;

/// Appended to a truncated unit.
pub const ELLIPSIS: &str = "...";

/// Placed between selected units when they are joined.
pub const UNIT_SEPARATOR: &str = "\n\n";

/// Pick the highest-scoring units that fit in `budget` characters.
///
/// Separators between units count against the budget. Units with score 0
/// are never picked, so a query that matches nothing yields an empty
/// selection. The result is in original document order.
pub fn select<'a>(scored: &[ScoredUnit<'a>], budget: usize) -> Vec<SelectedUnit<'a>> {
    let mut ranked: Vec<&ScoredUnit<'a>> = scored.iter().filter(|s| s.score > 0).collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.unit.index.cmp(&b.unit.index))
    });
    ranked.truncate(MAX_CANDIDATES);

    let separator_len = char_len(UNIT_SEPARATOR);
    let mut used = 0;
    let mut selected: Vec<SelectedUnit<'a>> = Vec::new();

    for candidate in ranked {
        let overhead = if selected.is_empty() { 0 } else { separator_len };
        let remaining = budget.saturating_sub(used + overhead);

        if candidate.unit.len <= remaining {
            used += overhead + candidate.unit.len;
            selected.push(SelectedUnit {
                index: candidate.unit.index,
                text: Cow::Borrowed(candidate.unit.text),
                truncated: false,
            });
            continue;
        }

        if remaining < MIN_USEFUL_REMAINDER {
            continue;
        }

        let keep = remaining - char_len(ELLIPSIS);
        let text = format!(
            "{}{}",
            truncate_chars(candidate.unit.text, keep).trim_end(),
            ELLIPSIS
        );
        tracing::debug!(
            "Truncated unit {} from {} to {} chars",
            candidate.unit.index,
            candidate.unit.len,
            char_len(&text)
        );
        selected.push(SelectedUnit {
            index: candidate.unit.index,
            text: Cow::Owned(text),
            truncated: true,
        });
        break;
    }

    selected.sort_by_key(|unit| unit.index);
    selected
}

/// Join selected units in order.
pub fn join_selected(selected: &[SelectedUnit<'_>]) -> String {
    selected
        .iter()
        .map(|unit| unit.text.as_ref())
        .collect::<Vec<_>>()
        .join(UNIT_SEPARATOR)
}
