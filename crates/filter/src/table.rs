//! In-memory tables with pre-parsed cells.

use crate::number::{parse_capacity, parse_money};
use crate::schema::Quantity;
use intexta_core::text::normalize;
use std::collections::HashMap;
use std::sync::Arc;

/// One value: display text, its normalized form, and a cached number for
/// numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub raw: String,
    pub normalized: String,
    pub number: Option<f64>,
}

impl Cell {
    pub fn text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(raw.trim());
        Self {
            raw,
            normalized,
            number: None,
        }
    }

    fn parsed(raw: impl Into<String>, quantity: Quantity) -> Self {
        let mut cell = Self::text(raw);
        cell.number = match quantity {
            Quantity::Money => parse_money(&cell.raw),
            Quantity::Capacity => parse_capacity(&cell.raw),
        };
        cell
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// An ordered sequence of rows over a fixed set of columns.
///
/// Rows are shared between a table and the tables filtered from it.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Arc<Row>>,
}

impl Table {
    /// Build a table from string records. Columns listed in `numeric` get
    /// their number parsed once here; short records are padded with blanks.
    pub fn from_records<R, S>(
        columns: Vec<String>,
        records: R,
        numeric: &[(&str, Quantity)],
    ) -> Self
    where
        R: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        let quantities: Vec<Option<Quantity>> = columns
            .iter()
            .map(|c| numeric.iter().find(|(n, _)| *n == c.as_str()).map(|(_, q)| *q))
            .collect();

        let rows = records
            .into_iter()
            .map(|record| {
                let mut values = record.into_iter().map(Into::<String>::into);
                let cells = quantities
                    .iter()
                    .map(|quantity| {
                        let raw = values.next().unwrap_or_default();
                        match quantity {
                            Some(q) => Cell::parsed(raw, *q),
                            None => Cell::text(raw),
                        }
                    })
                    .collect();
                Arc::new(Row { cells })
            })
            .collect();

        Self::with_columns(columns, rows)
    }

    fn with_columns(columns: Vec<String>, rows: Vec<Arc<Row>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            columns,
            index,
            rows,
        }
    }

    /// Same columns, different rows.
    pub fn with_rows(&self, rows: Vec<Arc<Row>>) -> Self {
        Self {
            columns: self.columns.clone(),
            index: self.index.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of `row` in `column`, if the column exists.
    pub fn cell<'a>(&self, row: &'a Row, column: &str) -> Option<&'a Cell> {
        self.column_index(column).and_then(|i| row.cells.get(i))
    }

    /// Display values of one column, in row order.
    pub fn values<'a>(&'a self, column: &str) -> Vec<&'a str> {
        match self.column_index(column) {
            Some(i) => self.rows.iter().map(|r| r.cells[i].raw.as_str()).collect(),
            None => Vec::new(),
        }
    }

    /// First `limit` rows.
    pub fn head(&self, limit: usize) -> Self {
        self.with_rows(self.rows.iter().take(limit).cloned().collect())
    }

    /// Non-blank display values of `column`, first occurrence wins after
    /// normalization.
    pub fn distinct(&self, column: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let Some(i) = self.column_index(column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .map(|r| &r.cells[i])
            .filter(|c| !c.normalized.is_empty() && seen.insert(c.normalized.clone()))
            .map(|c| c.raw.trim().to_string())
            .collect()
    }

    /// Append a text column computed from each row.
    pub fn derive_column<F>(&self, column: &str, derive: F) -> Self
    where
        F: Fn(&Table, &Row) -> String,
    {
        let mut columns = self.columns.clone();
        columns.push(column.to_string());
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = row.cells.clone();
                cells.push(Cell::text(derive(self, row)));
                Arc::new(Row { cells })
            })
            .collect();
        Self::with_columns(columns, rows)
    }
}
