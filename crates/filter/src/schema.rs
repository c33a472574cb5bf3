//! Which columns a query can filter on, and how.

use serde::Serialize;

/// Canonical column names of an inventory dataset.
pub mod columns {
    pub const NAME: &str = "Nombre";
    pub const FEATURES: &str = "Caracteristica";
    pub const PRICE: &str = "Precio";
    pub const LOCATION: &str = "Bodega";
    pub const BRAND: &str = "Marca";
    pub const MODEL: &str = "Modelo";
    pub const SKU: &str = "SKU";
    pub const STORAGE: &str = "AlmacenamientoGB";
    pub const STOCK: &str = "Stock";
}

/// Kind of quantity a numeric column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    /// Unitless amounts, possibly with k/mil/millon multipliers
    Money,
    /// Gigabytes; only numbers written with a GB/TB unit apply
    Capacity,
}

/// What a lone number means for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleValue {
    /// "50k" means "at most 50k"
    UpperBound,
    /// "128gb" means "exactly 128gb"
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalField {
    pub column: String,
    /// Words after which the query names a value of this field ("bodega")
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierField {
    pub column: String,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericField {
    pub column: String,
    pub quantity: Quantity,
    pub single_value: SingleValue,
}

/// Filterable columns of a dataset.
///
/// Field order is precedence order: categorical fields apply in the order
/// listed, numeric fields too.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSchema {
    pub categorical: Vec<CategoricalField>,
    pub identifier: Option<IdentifierField>,
    pub keyword_columns: Vec<String>,
    pub numeric: Vec<NumericField>,
    pub sort_by: Option<String>,
    /// Field words of fields dropped by [`FilterSchema::restricted_to`]
    pub reserved_words: Vec<String>,
}

impl FilterSchema {
    /// Schema for product inventories.
    pub fn inventory() -> Self {
        let field = |column: &str, keywords: &[&str]| CategoricalField {
            column: column.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };

        Self {
            categorical: vec![
                field(columns::BRAND, &["marca"]),
                field(columns::LOCATION, &["bodega", "ubicacion", "comuna"]),
                field(columns::MODEL, &["modelo"]),
            ],
            identifier: Some(IdentifierField {
                column: columns::SKU.to_string(),
                keyword: "sku".to_string(),
            }),
            keyword_columns: vec![columns::NAME.to_string(), columns::FEATURES.to_string()],
            numeric: vec![
                NumericField {
                    column: columns::STORAGE.to_string(),
                    quantity: Quantity::Capacity,
                    single_value: SingleValue::Exact,
                },
                NumericField {
                    column: columns::PRICE.to_string(),
                    quantity: Quantity::Money,
                    single_value: SingleValue::UpperBound,
                },
            ],
            sort_by: Some(columns::PRICE.to_string()),
            reserved_words: Vec::new(),
        }
    }

    /// Keep only the fields whose column exists in `available`. The field
    /// words of dropped fields stay reserved.
    pub fn restricted_to(&self, available: &[String]) -> Self {
        let has = |column: &str| available.iter().any(|c| c == column);
        let dropped_categorical = self
            .categorical
            .iter()
            .filter(|f| !has(&f.column))
            .flat_map(|f| f.keywords.iter().cloned());
        let dropped_identifier = self
            .identifier
            .iter()
            .filter(|f| !has(&f.column))
            .map(|f| f.keyword.clone());
        let reserved_words = self
            .reserved_words
            .iter()
            .cloned()
            .chain(dropped_categorical)
            .chain(dropped_identifier)
            .collect();
        Self {
            categorical: self
                .categorical
                .iter()
                .filter(|f| has(&f.column))
                .cloned()
                .collect(),
            identifier: self.identifier.clone().filter(|f| has(&f.column)),
            keyword_columns: self
                .keyword_columns
                .iter()
                .filter(|c| has(c))
                .cloned()
                .collect(),
            numeric: self
                .numeric
                .iter()
                .filter(|f| has(&f.column))
                .cloned()
                .collect(),
            sort_by: self.sort_by.clone().filter(|c| has(c)),
            reserved_words,
        }
    }

    /// Words that name a field rather than a value.
    pub fn field_keywords(&self) -> impl Iterator<Item = &str> {
        self.categorical
            .iter()
            .flat_map(|f| f.keywords.iter().map(String::as_str))
            .chain(self.identifier.iter().map(|f| f.keyword.as_str()))
            .chain(self.reserved_words.iter().map(String::as_str))
    }
}
