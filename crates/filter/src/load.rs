//! Dataset loading and caching.
//!
//! Loaders turn a CSV source into a [`DatasetSnapshot`]: a table with
//! canonical column names, pre-parsed numeric cells, and the catalogs of
//! every categorical column. [`DatasetCache`] keeps the last snapshot that
//! loaded successfully.

use crate::catalog::{Catalog, Catalogs};
use crate::schema::{columns, FilterSchema, Quantity};
use crate::table::{Row, Table};
use chrono::{DateTime, Utc};
use intexta_core::text::normalize;
use intexta_core::{AppError, AppResult};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Timeout for fetching a remote dataset.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// A loaded dataset. Never mutated; a refresh produces a new snapshot.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub table: Arc<Table>,
    pub catalogs: Arc<Catalogs>,
    pub loaded_at: DateTime<Utc>,
}

impl DatasetSnapshot {
    /// Wrap a table, building catalogs for the categorical fields of `schema`.
    pub fn new(table: Table, schema: &FilterSchema) -> Self {
        let catalogs = build_catalogs(&table, schema);
        Self {
            table: Arc::new(table),
            catalogs: Arc::new(catalogs),
            loaded_at: Utc::now(),
        }
    }
}

/// Catalogs of the categorical fields of `schema` present in `table`.
pub fn build_catalogs(table: &Table, schema: &FilterSchema) -> Catalogs {
    let mut catalogs = Catalogs::new();
    for field in &schema.categorical {
        if table.has_column(&field.column) {
            catalogs.insert(field.column.clone(), Catalog::new(table.distinct(&field.column)));
        }
    }
    catalogs
}

/// Canonical column for a source header, if it has one.
pub fn canonical_column(header: &str) -> Option<&'static str> {
    let key = normalize(header.trim()).replace([' ', '_', '-'], "");
    let column = match key.as_str() {
        "producto" | "nombre" | "descripcion" => columns::NAME,
        "caracteristica" | "caracteristicas" | "detalle" => columns::FEATURES,
        "precio" | "valor" => columns::PRICE,
        "bodega" | "ubicacion" | "comuna" | "sucursal" => columns::LOCATION,
        "marca" => columns::BRAND,
        "modelo" => columns::MODEL,
        "sku" | "codigo" => columns::SKU,
        "almacenamiento" | "almacenamientogb" | "capacidad" => columns::STORAGE,
        "stock" | "cantidad" => columns::STOCK,
        _ => return None,
    };
    Some(column)
}

/// Parse CSV text into a snapshot.
///
/// Known headers are renamed to their canonical column; the first source
/// column wins when two map to the same name, and unknown headers are kept
/// as they are. A `Marca` column is derived from the first word of `Nombre`
/// when the source has none.
pub fn parse_csv(text: &str, schema: &FilterSchema) -> AppResult<DatasetSnapshot> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::Dataset(format!("Failed to read CSV header: {}", e)))?
        .clone();

    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers.iter() {
        let name = canonical_column(header)
            .map(str::to_string)
            .unwrap_or_else(|| header.to_string());
        if names.contains(&name) {
            names.push(header.to_string());
        } else {
            names.push(name);
        }
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::Dataset(format!("Failed to read CSV record: {}", e)))?;
        if record.iter().all(|v| v.trim().is_empty()) {
            continue;
        }
        records.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }

    let numeric: Vec<(&str, Quantity)> = schema
        .numeric
        .iter()
        .map(|f| (f.column.as_str(), f.quantity))
        .collect();
    let mut table = Table::from_records(names, records, &numeric);

    if !table.has_column(columns::BRAND) && table.has_column(columns::NAME) {
        table = table.derive_column(columns::BRAND, brand_from_name);
    }

    tracing::info!(
        "Parsed dataset: {} row(s), columns {:?}",
        table.len(),
        table.columns()
    );
    Ok(DatasetSnapshot::new(table, schema))
}

fn brand_from_name(table: &Table, row: &Row) -> String {
    table
        .cell(row, columns::NAME)
        .and_then(|c| c.raw.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}

/// Source of dataset snapshots.
#[async_trait::async_trait]
pub trait DatasetLoader: Send + Sync {
    /// Human-readable source, for logs
    fn source(&self) -> String;

    async fn load(&self) -> AppResult<DatasetSnapshot>;
}

/// Loads a CSV file from disk.
#[derive(Debug, Clone)]
pub struct CsvFileLoader {
    path: PathBuf,
    schema: FilterSchema,
}

impl CsvFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            schema: FilterSchema::inventory(),
        }
    }

    pub fn with_schema(mut self, schema: FilterSchema) -> Self {
        self.schema = schema;
        self
    }
}

#[async_trait::async_trait]
impl DatasetLoader for CsvFileLoader {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> AppResult<DatasetSnapshot> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_csv(&text, &self.schema)
    }
}

/// Fetches a CSV over HTTP. Google Sheets links are rewritten to their
/// CSV export URL.
#[derive(Debug, Clone)]
pub struct HttpCsvLoader {
    url: String,
    schema: FilterSchema,
    client: reqwest::Client,
}

impl HttpCsvLoader {
    pub fn new(url: impl AsRef<str>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Dataset(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            url: sheet_export_url(url.as_ref()),
            schema: FilterSchema::inventory(),
            client,
        })
    }

    pub fn with_schema(mut self, schema: FilterSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl DatasetLoader for HttpCsvLoader {
    fn source(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> AppResult<DatasetSnapshot> {
        tracing::debug!("Fetching dataset from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Dataset(format!("Failed to fetch {}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Dataset(format!(
                "Dataset source returned {} for {}",
                response.status(),
                self.url
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Dataset(format!("Failed to read dataset body: {}", e)))?;
        parse_csv(&text, &self.schema)
    }
}

/// Rewrite a Google Sheets link to its CSV export URL; other URLs are
/// returned unchanged.
pub fn sheet_export_url(url: &str) -> String {
    const MARKER: &str = "/spreadsheets/d/";
    let Some(start) = url.find(MARKER).map(|i| i + MARKER.len()) else {
        return url.to_string();
    };
    let id: String = url[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if id.is_empty() {
        return url.to_string();
    }

    let gid = url
        .find("gid=")
        .map(|i| {
            url[i + 4..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| "0".to_string());

    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        id, gid
    )
}

/// Loader for a locator: `http(s)://` URLs are fetched, anything else is a
/// file path.
pub fn loader_for(source: &str) -> AppResult<Box<dyn DatasetLoader>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Box::new(HttpCsvLoader::new(source)?))
    } else {
        Ok(Box::new(CsvFileLoader::new(source)))
    }
}

/// Holds the last snapshot that loaded successfully.
pub struct DatasetCache {
    loader: Box<dyn DatasetLoader>,
    current: RwLock<Option<Arc<DatasetSnapshot>>>,
}

impl DatasetCache {
    pub fn new(loader: Box<dyn DatasetLoader>) -> Self {
        Self {
            loader,
            current: RwLock::new(None),
        }
    }

    /// Reload from the source. On failure the previous snapshot stays
    /// current and the error is returned.
    pub async fn refresh(&self) -> AppResult<Arc<DatasetSnapshot>> {
        match self.loader.load().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                tracing::info!(
                    "Loaded dataset from {}: {} row(s)",
                    self.loader.source(),
                    snapshot.table.len()
                );
                let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
                *current = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                if self.current().is_some() {
                    tracing::warn!(
                        "Dataset refresh from {} failed, keeping previous snapshot: {}",
                        self.loader.source(),
                        e
                    );
                } else {
                    tracing::warn!("Dataset load from {} failed: {}", self.loader.source(), e);
                }
                Err(e)
            }
        }
    }

    /// Current snapshot, or `None` when nothing has loaded yet.
    pub fn current(&self) -> Option<Arc<DatasetSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Current snapshot, loading it first if there is none. Load failures
    /// yield `None`.
    pub async fn get_or_load(&self) -> Option<Arc<DatasetSnapshot>> {
        if let Some(snapshot) = self.current() {
            return Some(snapshot);
        }
        self.refresh().await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY: &str = "\
Producto,Precio,Ubicación,SKU,Almacenamiento
Samsung Galaxy A54,$329.990,Centro,SM-A54,128 GB
Xiaomi Redmi 12,149990,Maipú,XI-R12,256GB
,,,,
Apple iPhone 15,\"$899.990\",Centro,AP-I15,1 TB
";

    #[test]
    fn test_canonical_headers() {
        assert_eq!(canonical_column(" Ubicación "), Some("Bodega"));
        assert_eq!(canonical_column("PRODUCTO"), Some("Nombre"));
        assert_eq!(canonical_column("Almacenamiento_GB"), Some("AlmacenamientoGB"));
        assert_eq!(canonical_column("Color"), None);
    }

    #[test]
    fn test_parse_csv_renames_and_derives_brand() {
        let snapshot = parse_csv(INVENTORY, &FilterSchema::inventory()).unwrap();
        let table = &snapshot.table;

        assert_eq!(table.len(), 3);
        assert!(table.has_column("Bodega"));
        assert_eq!(table.values("Marca"), vec!["Samsung", "Xiaomi", "Apple"]);

        let storage: Vec<Option<f64>> = table
            .rows()
            .iter()
            .map(|r| table.cell(r, "AlmacenamientoGB").and_then(|c| c.number))
            .collect();
        assert_eq!(storage, vec![Some(128.0), Some(256.0), Some(1024.0)]);

        let brands = snapshot.catalogs.get("Marca").unwrap();
        assert_eq!(brands.len(), 3);
        assert_eq!(snapshot.catalogs.get("Bodega").unwrap().len(), 2);
    }

    #[test]
    fn test_sheet_export_url() {
        assert_eq!(
            sheet_export_url("https://docs.google.com/spreadsheets/d/abc_123-X/edit#gid=42"),
            "https://docs.google.com/spreadsheets/d/abc_123-X/export?format=csv&gid=42"
        );
        assert_eq!(
            sheet_export_url("https://docs.google.com/spreadsheets/d/abc/edit"),
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0"
        );
        assert_eq!(
            sheet_export_url("https://example.com/data.csv"),
            "https://example.com/data.csv"
        );
    }

    #[tokio::test]
    async fn test_csv_file_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.csv");
        std::fs::write(&path, INVENTORY).unwrap();

        let snapshot = CsvFileLoader::new(&path).load().await.unwrap();
        assert_eq!(snapshot.table.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = CsvFileLoader::new("/no/such/inventario.csv").load().await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
