//! Text renderings of tables for generation contexts and the CLI.

use crate::schema::columns;
use crate::table::Table;
use intexta_core::text::{char_len, truncate_chars};
use std::collections::{BTreeMap, HashSet};

/// Widest a rendered cell may be.
pub const MAX_CELL_CHARS: usize = 40;

/// Shown when a location summary has nothing to summarize.
pub const NO_INVENTORY: &str = "Sin datos de inventario.";

/// Format a price with Chilean digit grouping (`$1.234.567`).
pub fn format_price(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return "N/D".to_string();
    };
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[derive(Default)]
struct LocationTotals {
    items: usize,
    skus: HashSet<String>,
    value: f64,
}

/// One line per location with its item count, distinct SKUs and total
/// value, busiest location first.
pub fn location_summary(table: &Table) -> String {
    let Some(location) = table.column_index(columns::LOCATION) else {
        return NO_INVENTORY.to_string();
    };
    let sku = table.column_index(columns::SKU);
    let price = table.column_index(columns::PRICE);

    let mut totals: BTreeMap<String, LocationTotals> = BTreeMap::new();
    for row in table.rows() {
        let cells = row.cells();
        let name = cells[location].raw.trim();
        if name.is_empty() {
            continue;
        }
        let entry = totals.entry(name.to_string()).or_default();
        entry.items += 1;
        if let Some(cell) = sku.and_then(|i| cells.get(i)) {
            if !cell.normalized.is_empty() {
                entry.skus.insert(cell.normalized.clone());
            }
        }
        if let Some(value) = price.and_then(|i| cells.get(i)).and_then(|c| c.number) {
            entry.value += value;
        }
    }

    if totals.is_empty() {
        return NO_INVENTORY.to_string();
    }

    let mut lines: Vec<(String, LocationTotals)> = totals.into_iter().collect();
    lines.sort_by(|a, b| b.1.items.cmp(&a.1.items).then_with(|| a.0.cmp(&b.0)));

    lines
        .into_iter()
        .map(|(name, t)| {
            format!(
                "- {}: {} ítems, {} SKUs, valor total {}",
                name,
                t.items,
                t.skus.len(),
                format_price(Some(t.value))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render up to `limit` rows of `columns` as a fixed-width text table.
///
/// Columns missing from the table are skipped; prices are formatted with
/// [`format_price`].
pub fn render_rows(table: &Table, columns: &[&str], limit: usize) -> String {
    let present: Vec<(&str, usize)> = columns
        .iter()
        .filter_map(|c| table.column_index(c).map(|i| (*c, i)))
        .collect();
    if present.is_empty() || table.is_empty() {
        return String::new();
    }

    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .take(limit)
        .map(|row| {
            present
                .iter()
                .map(|(name, i)| {
                    let cell = &row.cells()[*i];
                    let text = if *name == columns::PRICE {
                        format_price(cell.number)
                    } else {
                        cell.raw.trim().replace(['\n', '\r'], " ")
                    };
                    truncate_chars(&text, MAX_CELL_CHARS).to_string()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = present
        .iter()
        .enumerate()
        .map(|(col, (name, _))| {
            body.iter()
                .map(|r| char_len(&r[col]))
                .chain(std::iter::once(char_len(name)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(present.iter().map(|(n, _)| *n).collect())];
    for row in &body {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}
