//! Signal: a typed, severity-ranked finding produced by one threshold rule.
//!
//! Signals are value objects: they carry no identity beyond their content and
//! are rebuilt from the dataset on every detection pass.

use serde::{Deserialize, Serialize};

/// Ordinal risk level. `High` sorts above `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product/region pair that contributed the most revenue in a week.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Drivers {
    pub product: String,
    pub region: String,
}

/// The kind of a signal, without its payload.
///
/// Declaration order is the fixed order recommendations are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    RevenueDrop,
    HighChurn,
    LowMargin,
    RegionalUnderperformance,
}

impl SignalKind {
    pub const ALL: [SignalKind; 4] = [
        SignalKind::RevenueDrop,
        SignalKind::HighChurn,
        SignalKind::LowMargin,
        SignalKind::RegionalUnderperformance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::RevenueDrop => "revenue_drop",
            SignalKind::HighChurn => "high_churn",
            SignalKind::LowMargin => "low_margin",
            SignalKind::RegionalUnderperformance => "regional_underperformance",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A business signal.
///
/// Serialized with a `signal` tag so the JSON form reads
/// `{"signal": "revenue_drop", "week": 5, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    RevenueDrop {
        week: u32,
        /// Signed percentage change vs. the baseline, one decimal.
        change_pct: f64,
        #[serde(rename = "baseline")]
        baseline_label: String,
        severity: Severity,
        drivers: Drivers,
    },
    LowMargin {
        /// Mean margin as a percentage, one decimal.
        avg_margin: f64,
        severity: Severity,
    },
    HighChurn {
        count: usize,
        severity: Severity,
    },
    RegionalUnderperformance {
        region: String,
        severity: Severity,
    },
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::RevenueDrop { .. } => SignalKind::RevenueDrop,
            Signal::LowMargin { .. } => SignalKind::LowMargin,
            Signal::HighChurn { .. } => SignalKind::HighChurn,
            Signal::RegionalUnderperformance { .. } => SignalKind::RegionalUnderperformance,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Signal::RevenueDrop { severity, .. }
            | Signal::LowMargin { severity, .. }
            | Signal::HighChurn { severity, .. }
            | Signal::RegionalUnderperformance { severity, .. } => *severity,
        }
    }

    pub fn is_high(&self) -> bool {
        self.severity() == Severity::High
    }
}
