//! Applying predicates to a table.

use crate::predicate::Predicate;
use crate::table::{Row, Table};
use intexta_core::text::normalize;
use std::cmp::Ordering;
use std::sync::Arc;

/// Apply `predicates` to `table` in precedence order, then sort.
///
/// Categorical matches use normalized equality, identifiers normalized
/// containment, numeric ranges inclusive bounds over rows that have a
/// value. A keyword that would leave no rows is skipped. The result is
/// sorted ascending by `sort_by`, or else by the first numeric field
/// filtered on; rows without a value keep their order at the end.
pub fn apply(table: &Table, predicates: &[Predicate], sort_by: Option<&str>) -> Table {
    if table.is_empty() || predicates.is_empty() {
        return table.clone();
    }

    let mut ordered: Vec<&Predicate> = predicates.iter().collect();
    ordered.sort_by_key(|p| p.rank());

    let mut rows: Vec<Arc<Row>> = table.rows().to_vec();
    for predicate in ordered {
        let before = rows.len();
        rows = match predicate {
            Predicate::CategoricalMatch { field, value } => {
                let wanted = normalize(value.trim());
                keep(table, rows, field, |cell| cell.normalized == wanted)
            }
            Predicate::IdentifierMatch { field, value } => {
                let wanted = normalize(value.trim());
                keep(table, rows, field, |cell| cell.normalized.contains(&wanted))
            }
            Predicate::KeywordMask { columns, terms } => {
                apply_keywords(table, rows, columns, terms)
            }
            Predicate::NumericRange { field, min, max } => keep(table, rows, field, |cell| {
                cell.number.is_some_and(|v| Predicate::contains(*min, *max, v))
            }),
        };
        tracing::debug!("{:?}: {} -> {} row(s)", predicate, before, rows.len());
    }

    let sort_column = sort_by.map(str::to_string).or_else(|| {
        predicates.iter().find_map(|p| match p {
            Predicate::NumericRange { field, .. } => Some(field.clone()),
            _ => None,
        })
    });
    if let Some(column) = sort_column.filter(|c| table.has_column(c)) {
        sort_ascending(table, &mut rows, &column);
    }

    table.with_rows(rows)
}

fn keep<F>(table: &Table, rows: Vec<Arc<Row>>, column: &str, matches: F) -> Vec<Arc<Row>>
where
    F: Fn(&crate::table::Cell) -> bool,
{
    let Some(i) = table.column_index(column) else {
        return rows;
    };
    rows.into_iter()
        .filter(|row| row.cells().get(i).is_some_and(&matches))
        .collect()
}

fn apply_keywords(
    table: &Table,
    mut rows: Vec<Arc<Row>>,
    columns: &[String],
    terms: &[String],
) -> Vec<Arc<Row>> {
    let indices: Vec<usize> = columns.iter().filter_map(|c| table.column_index(c)).collect();
    if indices.is_empty() {
        return rows;
    }

    for term in terms {
        let narrowed: Vec<Arc<Row>> = rows
            .iter()
            .filter(|row| {
                indices.iter().any(|&i| {
                    row.cells()
                        .get(i)
                        .is_some_and(|c| c.normalized.contains(term.as_str()))
                })
            })
            .cloned()
            .collect();
        if narrowed.is_empty() {
            tracing::debug!("Keyword {:?} matches no row, ignoring it", term);
            continue;
        }
        rows = narrowed;
    }
    rows
}

fn sort_ascending(table: &Table, rows: &mut [Arc<Row>], column: &str) {
    let Some(i) = table.column_index(column) else {
        return;
    };
    let key = |row: &Arc<Row>| row.cells().get(i).and_then(|c| c.number);
    rows.sort_by(|a, b| match (key(a), key(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
