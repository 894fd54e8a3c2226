use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::data::record::{check_amounts, TransactionRecord};
use crate::domain::Transaction;
use crate::schema::{self, SchemaError};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

impl DataError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn from_row(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        DataError::InvalidRow {
            line,
            reason: err.to_string(),
        }
    }
}

/// Transactions read from a processed CSV, plus data-quality warnings.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<String>,
}

/// Read a processed dataset.
///
/// The header row is validated first; a schema mismatch halts before any
/// row is parsed.
pub fn read_transactions<R: Read>(reader: R) -> Result<IngestedData, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    schema::validate_columns(&headers)?;

    let mut data = IngestedData::default();
    for (index, row) in rdr.deserialize::<TransactionRecord>().enumerate() {
        let record = row.map_err(DataError::from_row)?;
        // Line 1 is the header.
        let line = index + 2;
        check_amounts(record.revenue, record.cost).map_err(|reason| DataError::InvalidRow {
            line: line as u64,
            reason,
        })?;
        let (tx, mismatches) = record.into_transaction();
        data.warnings
            .extend(mismatches.into_iter().map(|m| format!("line {line}: {m}")));
        data.transactions.push(tx);
    }

    debug!(
        rows = data.transactions.len(),
        warnings = data.warnings.len(),
        "ingested processed dataset"
    );
    if !data.warnings.is_empty() {
        warn!(
            count = data.warnings.len(),
            "supplied derived columns disagree with recomputed values"
        );
    }

    Ok(data)
}

pub fn read_transactions_path(path: &Path) -> Result<IngestedData, DataError> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    read_transactions(file)
}
