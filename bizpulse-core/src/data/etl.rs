//! Raw → processed ETL.
//!
//! Drops rows with any empty field, attaches margin, ISO week and month, and
//! writes the processed layout the detector reads.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::data::ingest::DataError;
use crate::data::record::{check_amounts, parse_date, TransactionRecord};
use crate::domain::{ChurnRisk, Transaction};
use crate::schema::{self, RAW_COLUMNS};

/// Row counts for one ETL pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EtlSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Raw row with every field optional, so incomplete rows can be dropped
/// instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct RawRow {
    date: Option<String>,
    product: Option<String>,
    region: Option<String>,
    customer_segment: Option<String>,
    quantity: Option<u32>,
    revenue: Option<f64>,
    cost: Option<f64>,
    profit: Option<f64>,
    churn_risk: Option<ChurnRisk>,
}

impl RawRow {
    fn complete(self) -> Option<(String, String, String, String, u32, f64, f64, ChurnRisk)> {
        let text = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        // `profit` must be present even though it is re-derived.
        self.profit?;
        Some((
            text(self.date)?,
            text(self.product)?,
            text(self.region)?,
            text(self.customer_segment)?,
            self.quantity?,
            self.revenue?,
            self.cost?,
            self.churn_risk?,
        ))
    }
}

/// Parse raw rows into processed transactions.
///
/// Returns the transactions and the number of incomplete rows dropped.
pub fn process_raw<R: Read>(reader: R) -> Result<(Vec<Transaction>, usize), DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    schema::validate_against(RAW_COLUMNS, &headers)?;

    let mut transactions = Vec::new();
    let mut dropped = 0;
    for (index, row) in rdr.deserialize::<RawRow>().enumerate() {
        let row = row.map_err(DataError::from_row)?;
        let Some((date, product, region, segment, quantity, revenue, cost, churn)) = row.complete()
        else {
            dropped += 1;
            continue;
        };
        let line = (index + 2) as u64;
        let date: NaiveDate = parse_date(&date).map_err(|e| DataError::InvalidRow {
            line,
            reason: format!("invalid date '{date}': {e}"),
        })?;
        check_amounts(revenue, cost).map_err(|reason| DataError::InvalidRow { line, reason })?;
        transactions.push(Transaction::new(
            date, product, region, segment, quantity, revenue, cost, churn,
        ));
    }

    Ok((transactions, dropped))
}

/// Write transactions in the processed layout.
pub fn write_transactions<W: Write>(writer: W, transactions: &[Transaction]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for tx in transactions {
        wtr.serialize(TransactionRecord::from(tx))?;
    }
    wtr.flush().map_err(|e| DataError::Csv(e.into()))?;
    Ok(())
}

/// Run the ETL from a raw CSV file to a processed CSV file.
pub fn run_etl(raw_path: &Path, processed_path: &Path) -> Result<EtlSummary, DataError> {
    let raw = File::open(raw_path).map_err(|e| DataError::io(raw_path, e))?;
    let (transactions, dropped) = process_raw(raw)?;

    if let Some(parent) = processed_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
        }
    }
    let out = File::create(processed_path).map_err(|e| DataError::io(processed_path, e))?;
    write_transactions(out, &transactions)?;

    let summary = EtlSummary {
        rows_read: transactions.len() + dropped,
        rows_kept: transactions.len(),
        rows_dropped: dropped,
    };
    info!(
        read = summary.rows_read,
        kept = summary.rows_kept,
        dropped = summary.rows_dropped,
        output = %processed_path.display(),
        "ETL complete"
    );
    Ok(summary)
}
