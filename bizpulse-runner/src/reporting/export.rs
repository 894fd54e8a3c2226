//! Export orchestrator for the report bundle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::data_loader::LoadedData;
use crate::pipeline::Analysis;
use crate::reporting::markdown::MarkdownReportGenerator;
use crate::reporting::text::write_text_report;

/// Paths written by one export.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub text_report: PathBuf,
    pub signals_json: PathBuf,
    pub dashboard_markdown: Option<PathBuf>,
}

/// Contents of `signals.json`.
#[derive(Debug, Serialize)]
struct SignalsExport<'a> {
    generated_at: String,
    dataset: String,
    dataset_hash: &'a str,
    rows: usize,
    health: &'static str,
    signals: &'a [bizpulse_core::Signal],
    rule_errors: Vec<String>,
}

/// Write the dated text report, `signals.json`, and optionally `dashboard.md`
/// into `output_dir`.
pub fn export_analysis(
    output_dir: impl AsRef<Path>,
    generated_at: NaiveDateTime,
    data: &LoadedData,
    analysis: &Analysis,
    dashboard: Option<&MarkdownReportGenerator>,
) -> Result<ReportPaths> {
    let output_dir = output_dir.as_ref();
    let text_report = write_text_report(output_dir, generated_at.date(), &analysis.narrative)?;

    let signals_json = output_dir.join("signals.json");
    let export = SignalsExport {
        generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        dataset: data.source_path.display().to_string(),
        dataset_hash: &data.dataset_hash,
        rows: data.transactions.len(),
        health: analysis.health.label(),
        signals: &analysis.signals,
        rule_errors: analysis.rule_errors.iter().map(ToString::to_string).collect(),
    };
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize signals")?;
    std::fs::write(&signals_json, json)
        .with_context(|| format!("Failed to write {}", signals_json.display()))?;

    let dashboard_markdown = match dashboard {
        Some(generator) => {
            let path = output_dir.join("dashboard.md");
            std::fs::write(&path, generator.generate(data, analysis, generated_at))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Some(path)
        }
        None => None,
    };

    info!(
        dir = %output_dir.display(),
        signals = analysis.signals.len(),
        dashboard = dashboard_markdown.is_some(),
        "report exported"
    );

    Ok(ReportPaths {
        text_report,
        signals_json,
        dashboard_markdown,
    })
}
