//! Query filtering for Intexta.
//!
//! Turns a free-text question about a tabular dataset into structured
//! predicates and applies them:
//!
//! ```
//! use intexta_filter::{filter, Quantity, Table};
//!
//! let table = Table::from_records(
//!     vec!["Marca".to_string(), "Precio".to_string()],
//!     vec![vec!["Samsung", "250000"], vec!["LG", "120000"]],
//!     &[("Precio", Quantity::Money)],
//! );
//! let result = filter(&table, "samsung hasta 300k");
//! assert_eq!(result.values("Marca"), vec!["Samsung"]);
//! ```

pub mod apply;
pub mod catalog;
pub mod extract;
pub mod load;
pub mod number;
pub mod predicate;
pub mod render;
pub mod schema;
pub mod table;
pub mod words;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use catalog::{Catalog, Catalogs};
pub use extract::extract;
pub use load::{
    loader_for, parse_csv, CsvFileLoader, DatasetCache, DatasetLoader, DatasetSnapshot,
    HttpCsvLoader,
};
pub use predicate::Predicate;
pub use render::{format_price, location_summary, render_rows};
pub use schema::{FilterSchema, Quantity, SingleValue};
pub use table::{Cell, Row, Table};

/// Extracts and applies predicates with one schema.
#[derive(Debug, Clone)]
pub struct QueryFilter {
    schema: FilterSchema,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::new(FilterSchema::inventory())
    }
}

impl QueryFilter {
    pub fn new(schema: FilterSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FilterSchema {
        &self.schema
    }

    /// Predicates for `query` over a table with `columns`.
    pub fn extract(&self, query: &str, columns: &[String], catalogs: &Catalogs) -> Vec<Predicate> {
        extract(query, &self.schema.restricted_to(columns), catalogs)
    }

    /// Filter a snapshot's table by `query` using its catalogs.
    pub fn filter(&self, snapshot: &DatasetSnapshot, query: &str) -> Table {
        self.filter_table(&snapshot.table, &snapshot.catalogs, query)
    }

    /// Filter `table` by `query` with precomputed catalogs.
    pub fn filter_table(&self, table: &Table, catalogs: &Catalogs, query: &str) -> Table {
        if table.is_empty() {
            return table.clone();
        }
        let schema = self.schema.restricted_to(table.columns());
        let predicates = extract(query, &schema, catalogs);
        let result = apply(table, &predicates, schema.sort_by.as_deref());
        tracing::info!(
            "Filtered {} row(s) to {} with {} predicate(s)",
            table.len(),
            result.len(),
            predicates.len()
        );
        result
    }
}

/// Filter `table` by `query` with the inventory schema, building catalogs
/// from the table itself.
pub fn filter(table: &Table, query: &str) -> Table {
    let filter = QueryFilter::default();
    let schema = filter.schema().restricted_to(table.columns());
    let catalogs = load::build_catalogs(table, &schema);
    filter.filter_table(table, &catalogs, query)
}
