//! Data ingestion, ETL and synthetic dataset generation

pub mod etl;
pub mod ingest;
pub mod record;
pub mod synthetic;

pub use etl::{process_raw, run_etl, write_transactions, EtlSummary};
pub use ingest::{read_transactions, read_transactions_path, DataError, IngestedData};
pub use record::TransactionRecord;
pub use synthetic::{generate, write_raw_csv, SyntheticConfig};
