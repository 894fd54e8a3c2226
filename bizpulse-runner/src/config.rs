//! Serializable analysis configuration.
//!
//! Loaded from a TOML file; every field has a default, so an empty file
//! (or no file) reproduces the stock thresholds:
//!
//! ```toml
//! [rules]
//! drop_threshold = 0.15
//! severe_drop_threshold = 0.25
//! baseline_window = 4
//! include_current_week = true
//! low_margin_threshold = 0.25
//! churn_count_threshold = 500
//!
//! [report]
//! output_dir = "reports"
//! recent_margin_rows = 50
//! raw_row_limit = 200
//! ```

use std::path::{Path, PathBuf};

use bizpulse_core::RuleConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration: rule thresholds plus report layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub rules: RuleConfig,
    pub report: ReportConfig,
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory that receives the dated text report and exports.
    pub output_dir: PathBuf,
    /// Rows (most recent by date) averaged into the "recent margin" figure.
    pub recent_margin_rows: usize,
    /// Cap on the raw rows listed in the markdown dashboard; `None` lists all.
    pub raw_row_limit: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            recent_margin_rows: 50,
            raw_row_limit: Some(200),
        }
    }
}

impl PulseConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds the detector cannot use meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.rules;
        if rules.baseline_window == 0 {
            return Err(ConfigError::Invalid("baseline_window must be at least 1".into()));
        }
        non_negative("drop_threshold", rules.drop_threshold)?;
        non_negative("severe_drop_threshold", rules.severe_drop_threshold)?;
        non_negative("low_margin_threshold", rules.low_margin_threshold)?;
        if rules.severe_drop_threshold < rules.drop_threshold {
            return Err(ConfigError::Invalid(format!(
                "severe_drop_threshold ({}) is below drop_threshold ({})",
                rules.severe_drop_threshold, rules.drop_threshold
            )));
        }
        if self.report.recent_margin_rows == 0 {
            return Err(ConfigError::Invalid("recent_margin_rows must be at least 1".into()));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{name} must be a finite non-negative number, got {value}"
        )));
    }
    Ok(())
}
