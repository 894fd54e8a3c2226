//! Dataset loading for the runner.
//!
//! Reads a processed transactions CSV through the core ingestion layer and
//! attaches provenance: the source path, the data-quality warnings raised
//! while re-deriving columns, and a BLAKE3 fingerprint of the rows.

use std::path::{Path, PathBuf};

use bizpulse_core::data::{read_transactions_path, DataError};
use bizpulse_core::Transaction;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found: {0}")]
    NotFound(PathBuf),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// A loaded dataset with provenance.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub transactions: Vec<Transaction>,
    /// Dataset hash for fingerprinting (BLAKE3 over all rows).
    pub dataset_hash: String,
    /// Disagreements between supplied and recomputed derived columns.
    pub data_quality_warnings: Vec<String>,
    pub source_path: PathBuf,
}

impl LoadedData {
    /// Wrap in-memory rows (e.g. synthetic data) with a computed hash.
    pub fn from_transactions(transactions: Vec<Transaction>, source_path: impl Into<PathBuf>) -> Self {
        let dataset_hash = compute_dataset_hash(&transactions);
        Self {
            transactions,
            dataset_hash,
            data_quality_warnings: Vec::new(),
            source_path: source_path.into(),
        }
    }

    /// First 12 hex characters of the dataset hash.
    pub fn short_hash(&self) -> &str {
        &self.dataset_hash[..12.min(self.dataset_hash.len())]
    }
}

/// Load a processed dataset from `path`.
pub fn load_dataset(path: &Path) -> Result<LoadedData, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ingested = read_transactions_path(path)?;
    let dataset_hash = compute_dataset_hash(&ingested.transactions);

    info!(
        path = %path.display(),
        rows = ingested.transactions.len(),
        hash = %dataset_hash.get(..12).unwrap_or_default(),
        "loaded dataset"
    );
    for warning in &ingested.warnings {
        warn!(%warning, "data quality");
    }

    Ok(LoadedData {
        transactions: ingested.transactions,
        dataset_hash,
        data_quality_warnings: ingested.warnings,
        source_path: path.to_path_buf(),
    })
}

/// Compute a deterministic BLAKE3 hash over all rows.
///
/// Covers every input field in row order; derived fields are functions of
/// those and are left out.
pub fn compute_dataset_hash(transactions: &[Transaction]) -> String {
    let mut hasher = blake3::Hasher::new();

    for tx in transactions {
        hasher.update(tx.date().to_string().as_bytes());
        for text in [tx.product(), tx.region(), tx.customer_segment()] {
            hasher.update(&(text.len() as u64).to_le_bytes());
            hasher.update(text.as_bytes());
        }
        hasher.update(&tx.quantity().to_le_bytes());
        hasher.update(&tx.revenue().to_le_bytes());
        hasher.update(&tx.cost().to_le_bytes());
        hasher.update(tx.churn_risk().as_str().as_bytes());
    }

    hasher.finalize().to_hex().to_string()
}
