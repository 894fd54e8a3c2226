//! CSV schema contract: the boundary between data ingestion and the rule engine.
//!
//! Defines the exact column names of the raw dataset (generator output) and of
//! the processed dataset (ETL output) that the detector consumes. Headers are
//! checked before any row is parsed.

use thiserror::Error;

/// Columns of the processed dataset, in canonical order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "date",
    "product",
    "region",
    "customer_segment",
    "quantity",
    "revenue",
    "cost",
    "profit",
    "profit_margin",
    "week",
    "month",
    "churn_risk",
];

/// Columns of the raw dataset, in canonical order.
pub const RAW_COLUMNS: &[&str] = &[
    "date",
    "product",
    "region",
    "customer_segment",
    "quantity",
    "revenue",
    "cost",
    "profit",
    "churn_risk",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

impl SchemaError {
    pub fn missing(&self) -> &[String] {
        match self {
            SchemaError::MissingColumns(cols) => cols,
        }
    }
}

/// Columns from `expected` absent from `headers`, in `expected` order.
pub fn missing_columns<'a, S: AsRef<str>>(expected: &[&'a str], headers: &[S]) -> Vec<&'a str> {
    expected
        .iter()
        .filter(|col| !headers.iter().any(|h| h.as_ref().trim() == **col))
        .copied()
        .collect()
}

/// Validate headers against the processed-dataset contract.
///
/// Extra columns are accepted; every missing column is reported at once.
pub fn validate_columns<S: AsRef<str>>(headers: &[S]) -> Result<(), SchemaError> {
    validate_against(REQUIRED_COLUMNS, headers)
}

/// Validate headers against an arbitrary column contract.
pub fn validate_against<S: AsRef<str>>(expected: &[&str], headers: &[S]) -> Result<(), SchemaError> {
    let missing = missing_columns(expected, headers);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(
            missing.into_iter().map(str::to_string).collect(),
        ))
    }
}
