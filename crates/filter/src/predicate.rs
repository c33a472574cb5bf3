//! Filter conditions and their application order.

use serde::Serialize;

/// One condition extracted from a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Inclusive bounds over a numeric column; at least one bound is set
    NumericRange {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Normalized equality on a categorical column
    CategoricalMatch { field: String, value: String },
    /// Normalized substring match on an identifier column
    IdentifierMatch { field: String, value: String },
    /// Each term must appear in at least one of the columns
    KeywordMask { columns: Vec<String>, terms: Vec<String> },
}

impl Predicate {
    /// Precedence rank when applying predicates; lower applies first.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::CategoricalMatch { .. } => 0,
            Self::IdentifierMatch { .. } => 1,
            Self::KeywordMask { .. } => 2,
            Self::NumericRange { .. } => 3,
        }
    }

    /// Whether `value` satisfies a numeric range.
    pub fn contains(min: Option<f64>, max: Option<f64>, value: f64) -> bool {
        min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(Predicate::contains(Some(100.0), Some(200.0), 100.0));
        assert!(Predicate::contains(Some(100.0), Some(200.0), 200.0));
        assert!(!Predicate::contains(Some(100.0), Some(200.0), 200.5));
        assert!(Predicate::contains(None, Some(50.0), 0.0));
        assert!(!Predicate::contains(Some(10.0), None, 9.0));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let predicate = Predicate::NumericRange {
            field: "Precio".to_string(),
            min: None,
            max: Some(50_000.0),
        };
        let json = serde_json::to_value(&predicate).unwrap();
        assert_eq!(json["kind"], "numeric_range");
        assert_eq!(json["max"], 50_000.0);
        assert!(json["min"].is_null());
    }
}
