//! End-to-end filtering of small inventories.

use crate::{filter, Catalog, Catalogs, FilterSchema, Predicate, Quantity, QueryFilter, Table};

fn brand_prices() -> Table {
    Table::from_records(
        vec!["Marca".to_string(), "Precio".to_string()],
        vec![
            vec!["Samsung", "250000"],
            vec!["LG", "150000"],
            vec!["Samsung", "90000"],
            vec!["Samsung", "120000"],
            vec!["Xiaomi", "200000"],
        ],
        &[("Precio", Quantity::Money)],
    )
}

fn inventory() -> Table {
    Table::from_records(
        [
            "Nombre",
            "Caracteristica",
            "Marca",
            "Bodega",
            "SKU",
            "AlmacenamientoGB",
            "Precio",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        vec![
            vec!["Galaxy A54", "negro 5G", "Samsung", "Centro", "SM-A54-N", "128", "329990"],
            vec!["Galaxy A54", "azul 5G", "Samsung", "Maipú", "SM-A54-A", "256", "369990"],
            vec!["Redmi Note 13", "verde", "Xiaomi", "Centro", "XI-N13-V", "256", "219990"],
            vec!["iPhone 15", "negro", "Apple", "Las Condes", "AP-I15-N", "128", "899990"],
            vec!["Moto G84", "azul", "Motorola", "Centro", "MO-G84-A", "256", ""],
        ],
        &[
            ("AlmacenamientoGB", Quantity::Capacity),
            ("Precio", Quantity::Money),
        ],
    )
}

fn column<'a>(table: &'a Table, name: &str) -> Vec<&'a str> {
    table.values(name)
}

#[test]
fn test_brand_and_price_range_sorted_ascending() {
    let result = filter(&brand_prices(), "samsung entre 100000 y 300000");
    assert_eq!(column(&result, "Marca"), vec!["Samsung", "Samsung"]);
    assert_eq!(column(&result, "Precio"), vec!["120000", "250000"]);
}

#[test]
fn test_extract_between_and_upper_bound() {
    let filter = QueryFilter::default();
    let columns = vec!["Precio".to_string()];
    let catalogs = Catalogs::new();

    assert_eq!(
        filter.extract("entre 100.000 y 200k", &columns, &catalogs),
        vec![Predicate::NumericRange {
            field: "Precio".to_string(),
            min: Some(100_000.0),
            max: Some(200_000.0),
        }]
    );
    assert_eq!(
        filter.extract("hasta 50k", &columns, &catalogs),
        vec![Predicate::NumericRange {
            field: "Precio".to_string(),
            min: None,
            max: Some(50_000.0),
        }]
    );
}

#[test]
fn test_location_capacity_and_price() {
    let result = filter(&inventory(), "en bodega centro con 256gb bajo 300 mil");
    assert_eq!(column(&result, "SKU"), vec!["XI-N13-V"]);
}

#[test]
fn test_keyword_narrows_within_brand() {
    let result = filter(&inventory(), "samsung azul");
    assert_eq!(column(&result, "SKU"), vec!["SM-A54-A"]);
}

#[test]
fn test_unknown_keyword_is_rolled_back() {
    let result = filter(&inventory(), "samsung fucsia");
    assert_eq!(column(&result, "SKU"), vec!["SM-A54-N", "SM-A54-A"]);
}

#[test]
fn test_sku_lookup() {
    let result = filter(&inventory(), "tienes el sku xi-n13?");
    assert_eq!(column(&result, "Nombre"), vec!["Redmi Note 13"]);
}

#[test]
fn test_unpriced_rows_sort_last() {
    let result = filter(&inventory(), "que hay en centro");
    assert_eq!(
        column(&result, "SKU"),
        vec!["XI-N13-V", "SM-A54-N", "MO-G84-A"]
    );
}

#[test]
fn test_query_without_filters_keeps_every_row() {
    let table = inventory();
    let result = filter(&table, "hola");
    assert_eq!(result.len(), table.len());
}

#[test]
fn test_empty_table() {
    assert!(filter(&Table::default(), "samsung hasta 100k").is_empty());
}

#[test]
fn test_schema_without_location_ignores_location_words() {
    let schema = FilterSchema::inventory().restricted_to(&["Marca".to_string()]);
    let catalogs = Catalogs::new().with("Marca", Catalog::new(["Samsung"]));
    let predicates = QueryFilter::new(schema).extract(
        "samsung bodega centro",
        &["Marca".to_string()],
        &catalogs,
    );
    assert_eq!(
        predicates,
        vec![Predicate::CategoricalMatch {
            field: "Marca".to_string(),
            value: "Samsung".to_string(),
        }]
    );
}
