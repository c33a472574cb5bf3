//! Lexical relevance scoring.
//!
//! Scores are integers so that ranking is exact and reproducible.

use crate::types::{ScoredUnit, Unit};
use intexta_core::text::normalize;
use std::ops::RangeInclusive;

/// Points per occurrence of a query term.
pub const TERM_WEIGHT: u32 = 20;

/// Points when the unit starts with a query term.
pub const LEADING_TERM_BONUS: u32 = 10;

/// Positional bonus bands: units with index below the bound get the points.
const POSITION_BANDS: [(usize, u32); 3] = [(3, 15), (6, 10), (10, 5)];

/// Points for units of a self-contained paragraph length.
pub const LENGTH_BONUS: u32 = 5;
const LENGTH_BAND: RangeInclusive<usize> = 100..=500;

/// Score one span of text at a given position.
///
/// `terms` must already be normalized (see [`crate::terms::query_terms`]).
/// Bonuses only apply once at least one term matched.
pub fn score(text: &str, terms: &[String], index: usize) -> u32 {
    let unit = Unit::new(index, text);
    score_unit(&unit, terms).score
}

/// Score a unit, recording which terms matched.
pub fn score_unit<'a>(unit: &Unit<'a>, terms: &[String]) -> ScoredUnit<'a> {
    let haystack = normalize(unit.text);
    let mut score = 0;
    let mut matched_terms = Vec::new();

    for term in terms {
        let occurrences = haystack.matches(term.as_str()).count() as u32;
        if occurrences == 0 {
            continue;
        }
        score += occurrences * TERM_WEIGHT;
        if haystack.starts_with(term.as_str()) {
            score += LEADING_TERM_BONUS;
        }
        matched_terms.push(term.clone());
    }

    if !matched_terms.is_empty() {
        score += position_bonus(unit.index);
        if LENGTH_BAND.contains(&unit.len) {
            score += LENGTH_BONUS;
        }
    }

    ScoredUnit {
        unit: *unit,
        score,
        matched_terms,
    }
}

/// Score every unit of a document.
pub fn score_units<'a>(units: &[Unit<'a>], terms: &[String]) -> Vec<ScoredUnit<'a>> {
    units.iter().map(|unit| score_unit(unit, terms)).collect()
}

fn position_bonus(index: usize) -> u32 {
    POSITION_BANDS
        .iter()
        .find(|(bound, _)| index < *bound)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}
