//! BizPulse Runner: configuration, dataset loading, analysis and reports.
//!
//! This crate builds on `bizpulse-core` to provide:
//! - TOML configuration for rule thresholds and report layout
//! - Dataset loading with provenance (BLAKE3 hash, data-quality warnings)
//! - The sequential analysis pipeline (detect → health → narrate)
//! - Dated text reports, signal JSON export and a markdown dashboard

pub mod config;
pub mod data_loader;
pub mod pipeline;
pub mod reporting;

pub use config::{ConfigError, PulseConfig, ReportConfig};
pub use data_loader::{compute_dataset_hash, load_dataset, LoadError, LoadedData};
pub use pipeline::{analyze, Analysis};
pub use reporting::{export_analysis, write_text_report, MarkdownReportGenerator, ReportPaths};
