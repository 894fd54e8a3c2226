//! Reporting and export pipeline.

pub mod export;
pub mod markdown;
pub mod text;

pub use export::{export_analysis, ReportPaths};
pub use markdown::MarkdownReportGenerator;
pub use text::write_text_report;
