//! BizPulse CLI: dataset preparation, signal detection and weekly reports.
//!
//! Commands:
//! - `generate`: write a seeded synthetic raw dataset
//! - `etl`: clean a raw dataset and derive margin/week/month columns
//! - `signals`: list detected business signals (text or JSON)
//! - `insights`: print overall health and the executive narrative
//! - `report`: write the dated text report, signals JSON and optional dashboard

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bizpulse_core::data::{self, run_etl, SyntheticConfig};
use bizpulse_core::Severity;
use bizpulse_runner::{
    analyze, export_analysis, load_dataset, Analysis, LoadedData, MarkdownReportGenerator, PulseConfig,
};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

const DEFAULT_RAW: &str = "data/raw/business_data.csv";
const DEFAULT_PROCESSED: &str = "data/processed/business_data_processed.csv";

#[derive(Parser)]
#[command(
    name = "bizpulse",
    about = "BizPulse CLI: business signal detection and weekly insight reports"
)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a seeded synthetic raw dataset.
    Generate {
        /// Output CSV path.
        #[arg(long, default_value = DEFAULT_RAW)]
        output: PathBuf,

        /// Number of transactions.
        #[arg(long, default_value_t = 5000)]
        records: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Clean a raw dataset and write the processed layout.
    Etl {
        /// Raw CSV input.
        #[arg(long, default_value = DEFAULT_RAW)]
        raw: PathBuf,

        /// Processed CSV output.
        #[arg(long, default_value = DEFAULT_PROCESSED)]
        processed: PathBuf,
    },
    /// List detected business signals.
    Signals {
        #[command(flatten)]
        input: InputArgs,

        /// Print signals and rule errors as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print overall health and the executive narrative.
    Insights {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write the dated text report, signals.json and optionally dashboard.md.
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory. Overrides `report.output_dir` from the config.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Also write the markdown dashboard.
        #[arg(long, default_value_t = false)]
        markdown: bool,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// Processed dataset (CSV with the twelve required columns).
    #[arg(long, default_value = DEFAULT_PROCESSED)]
    data: PathBuf,

    /// TOML config with rule thresholds and report settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl InputArgs {
    fn load(&self) -> Result<(PulseConfig, LoadedData)> {
        let config = match &self.config {
            Some(path) => PulseConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => PulseConfig::default(),
        };
        let data = load_dataset(&self.data)?;
        Ok((config, data))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            output,
            records,
            seed,
        } => run_generate(&output, records, seed),
        Commands::Etl { raw, processed } => run_etl_cmd(&raw, &processed),
        Commands::Signals { input, json } => run_signals(&input, json),
        Commands::Insights { input } => run_insights(&input),
        Commands::Report {
            input,
            output_dir,
            markdown,
        } => run_report(&input, output_dir, markdown),
    }
}

fn run_generate(output: &Path, records: usize, seed: u64) -> Result<()> {
    let config = SyntheticConfig {
        records,
        seed,
        ..SyntheticConfig::default()
    };
    let rows = data::generate(&config);
    data::synthetic::write_raw_csv_path(output, &rows)?;
    info!(rows = rows.len(), seed, path = %output.display(), "synthetic dataset written");
    println!("Wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}

fn run_etl_cmd(raw: &Path, processed: &Path) -> Result<()> {
    let summary = run_etl(raw, processed)?;
    println!(
        "ETL complete: {} read, {} kept, {} dropped → {}",
        summary.rows_read,
        summary.rows_kept,
        summary.rows_dropped,
        processed.display()
    );
    Ok(())
}

fn run_signals(input: &InputArgs, json: bool) -> Result<()> {
    let (config, data) = input.load()?;
    let analysis = analyze(&data.transactions, &config.rules);

    if json {
        let out = serde_json::json!({
            "signals": analysis.signals,
            "rule_errors": analysis.rule_errors,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print!("{}", signals_text(&data, &analysis));
    Ok(())
}

fn run_insights(input: &InputArgs) -> Result<()> {
    let (config, data) = input.load()?;
    let analysis = analyze(&data.transactions, &config.rules);

    println!();
    println!("=== Business Health: {} ===", analysis.health);
    println!();
    println!("{}", analysis.narrative);
    print_warnings(&data, &analysis);
    Ok(())
}

fn run_report(input: &InputArgs, output_dir: Option<PathBuf>, markdown: bool) -> Result<()> {
    let (config, data) = input.load()?;
    let analysis = analyze(&data.transactions, &config.rules);

    let output_dir = output_dir.unwrap_or_else(|| config.report.output_dir.clone());
    let generator = MarkdownReportGenerator::from_config(&config.report);
    let generated_at = chrono::Local::now().naive_local();
    let paths = export_analysis(
        &output_dir,
        generated_at,
        &data,
        &analysis,
        markdown.then_some(&generator),
    )?;

    println!("Health:        {}", analysis.health);
    println!("Signals:       {} ({} high)", analysis.signals.len(), analysis.high_signal_count());
    println!("Text report:   {}", paths.text_report.display());
    println!("Signals JSON:  {}", paths.signals_json.display());
    if let Some(path) = &paths.dashboard_markdown {
        println!("Dashboard:     {}", path.display());
    }
    print_warnings(&data, &analysis);
    Ok(())
}

fn signals_text(data: &LoadedData, analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("=== Business Signals ({}) ===\n", analysis.signals.len()));
    if analysis.signals.is_empty() {
        out.push_str("No significant risk signals detected.\n");
    }
    for signal in &analysis.signals {
        let tag = match signal.severity() {
            Severity::High => "HIGH  ",
            Severity::Medium => "MEDIUM",
        };
        out.push_str(&format!(
            "[{tag}] {}\n",
            bizpulse_core::narrative::summary_line(signal)
        ));
    }
    out.push('\n');
    out.push_str(&format!("Health: {}\n", analysis.health));
    for line in warning_lines(data, analysis) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Rule errors first, then data-quality warnings from ingestion.
fn warning_lines(data: &LoadedData, analysis: &Analysis) -> Vec<String> {
    analysis
        .rule_errors
        .iter()
        .map(|err| format!("RULE ERROR: {err}"))
        .chain(
            data.data_quality_warnings
                .iter()
                .map(|warn| format!("WARNING: {warn}")),
        )
        .collect()
}

fn print_warnings(data: &LoadedData, analysis: &Analysis) {
    let lines = warning_lines(data, analysis);
    if !lines.is_empty() {
        println!();
    }
    for line in lines {
        println!("{line}");
    }
}
