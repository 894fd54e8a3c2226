//! Dated plain-text insights report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

pub const REPORT_TITLE: &str = "WEEKLY BUSINESS INSIGHTS REPORT";

/// `weekly_business_report_YYYY_MM_DD.txt`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("weekly_business_report_{}.txt", date.format("%Y_%m_%d"))
}

/// Title, a 40-character rule, a blank line, then the narrative.
pub fn render_text_report(narrative: &str) -> String {
    format!("{REPORT_TITLE}\n{}\n\n{narrative}", "=".repeat(40))
}

/// Write the report for `date` into `dir`, creating it if needed.
/// An existing report for the same date is overwritten.
pub fn write_text_report(dir: &Path, date: NaiveDate, narrative: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;
    let path = dir.join(report_file_name(date));
    std::fs::write(&path, render_text_report(narrative))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
