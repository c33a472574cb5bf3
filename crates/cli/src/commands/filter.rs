//! Filter command handler.
//!
//! Runs the rule-based filter over a CSV file or URL and prints the rows.

use clap::Args;
use intexta_core::{config::AppConfig, AppError, AppResult};
use intexta_filter::{loader_for, render_rows, DatasetCache, QueryFilter, Table};

/// Filter a CSV inventory with a free-text query
#[derive(Args, Debug)]
pub struct FilterCommand {
    /// CSV path or URL (default: dataset.source)
    #[arg(long)]
    pub csv: Option<String>,

    /// Free-text query
    #[arg(short, long)]
    pub query: String,

    /// Maximum rows to print
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FilterCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing filter command");
        tracing::debug!("Filter command options: {:?}", self);

        let source = self
            .csv
            .clone()
            .or_else(|| config.dataset.source.clone())
            .ok_or_else(|| {
                AppError::Config("No dataset given. Use --csv or set dataset.source".to_string())
            })?;

        let cache = DatasetCache::new(loader_for(&source)?);
        let snapshot = cache.refresh().await?;

        let filter = QueryFilter::default();
        let predicates =
            filter.extract(&self.query, snapshot.table.columns(), &snapshot.catalogs);
        let filtered = filter.filter(&snapshot, &self.query);
        tracing::info!(
            "{} predicate(s) kept {} of {} row(s)",
            predicates.len(),
            filtered.len(),
            snapshot.table.len()
        );

        if self.json {
            let output = serde_json::json!({
                "source": source,
                "predicates": predicates,
                "matched": filtered.len(),
                "rows": rows_json(&filtered.head(self.limit)),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if filtered.is_empty() {
            println!("Sin resultados.");
        } else {
            let columns: Vec<&str> = filtered.columns().iter().map(String::as_str).collect();
            println!("{}", render_rows(&filtered, &columns, self.limit));
        }

        Ok(())
    }
}

fn rows_json(table: &Table) -> Vec<serde_json::Value> {
    table
        .rows()
        .iter()
        .map(|row| {
            let object = table
                .columns()
                .iter()
                .zip(row.cells())
                .map(|(column, cell)| (column.clone(), serde_json::Value::from(cell.raw.clone())))
                .collect::<serde_json::Map<_, _>>();
            serde_json::Value::Object(object)
        })
        .collect()
}
