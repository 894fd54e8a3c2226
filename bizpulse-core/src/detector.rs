//! Signal detection: fixed threshold rules over aggregated transactions.
//!
//! # Invariants
//! - Detection is a pure function of the rows and the [`RuleConfig`]: same
//!   input, same signals in the same order.
//! - The four rules are evaluated independently. A rule that cannot be
//!   evaluated records a [`RuleError`] and the others still run.
//! - Regional underperformance has no threshold: it fires on every non-empty
//!   dataset, naming the region with the lowest total profit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate;
use crate::domain::{ChurnRisk, HealthStatus, Severity, Signal, SignalKind, Transaction};
use crate::metrics::round_to;

/// Rule thresholds.
///
/// Defaults reproduce the reference behaviour:
/// - revenue drop: change below -15% of a 4-week trailing average
///   (current week included), HIGH below -25%
/// - low margin: mean margin below 25%
/// - high churn: more than 500 rows with High churn risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Fractional drop vs. baseline that raises a revenue-drop signal.
    pub drop_threshold: f64,
    /// Fractional drop vs. baseline that makes the signal HIGH.
    pub severe_drop_threshold: f64,
    /// Number of weeks averaged into the baseline.
    pub baseline_window: usize,
    /// Whether the baseline window ends at (and includes) the week under test.
    pub include_current_week: bool,
    /// Mean margin (fraction) below which a low-margin signal is raised.
    pub low_margin_threshold: f64,
    /// High-churn row count that must be exceeded.
    pub churn_count_threshold: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            drop_threshold: 0.15,
            severe_drop_threshold: 0.25,
            baseline_window: 4,
            include_current_week: true,
            low_margin_threshold: 0.25,
            churn_count_threshold: 500,
        }
    }
}

impl RuleConfig {
    /// Human-readable name of the baseline, e.g. `"4-week average"`.
    pub fn baseline_label(&self) -> String {
        format!("{}-week average", self.baseline_window)
    }
}

/// Why a rule could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum RuleError {
    #[error("{rule}: dataset is empty")]
    EmptyDataset { rule: SignalKind },

    #[error("{rule}: insufficient data ({detail})")]
    InsufficientData { rule: SignalKind, detail: String },
}

impl RuleError {
    pub fn rule(&self) -> SignalKind {
        match self {
            RuleError::EmptyDataset { rule } | RuleError::InsufficientData { rule, .. } => *rule,
        }
    }
}

/// Output of one detection pass: the signals plus any per-rule failures.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Detection {
    pub signals: Vec<Signal>,
    pub errors: Vec<RuleError>,
}

impl Detection {
    /// True when every rule evaluated without error.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn health(&self) -> HealthStatus {
        health_status(&self.signals)
    }
}

/// A single threshold rule.
///
/// Each finding is either a signal or the reason it could not be computed;
/// a rule may return several of each (one per week for revenue drops).
pub trait Rule: Send + Sync {
    fn kind(&self) -> SignalKind;

    fn evaluate(&self, rows: &[Transaction]) -> Vec<Result<Signal, RuleError>>;
}

/// Revenue drop vs. a trailing weekly baseline, one finding per week.
#[derive(Debug, Clone)]
pub struct RevenueDropRule {
    pub threshold: f64,
    pub severe_threshold: f64,
    pub window: usize,
    pub include_current: bool,
    pub baseline_label: String,
}

impl Rule for RevenueDropRule {
    fn kind(&self) -> SignalKind {
        SignalKind::RevenueDrop
    }

    fn evaluate(&self, rows: &[Transaction]) -> Vec<Result<Signal, RuleError>> {
        let weekly = aggregate::weekly_revenue(rows);
        let baselines = aggregate::rolling_baseline(&weekly, self.window, self.include_current);

        let mut findings = Vec::new();
        for (week, baseline) in weekly.iter().zip(baselines) {
            let Some(baseline) = baseline else {
                continue;
            };
            if baseline == 0.0 {
                findings.push(Err(RuleError::InsufficientData {
                    rule: self.kind(),
                    detail: format!("zero revenue baseline for week {}", week.week),
                }));
                continue;
            }

            let change = (week.revenue - baseline) / baseline;
            if !change.is_finite() {
                findings.push(Err(RuleError::InsufficientData {
                    rule: self.kind(),
                    detail: format!("non-finite revenue change for week {}", week.week),
                }));
                continue;
            }
            if change >= -self.threshold {
                continue;
            }

            let Some(drivers) = aggregate::top_driver(rows, week.week) else {
                findings.push(Err(RuleError::InsufficientData {
                    rule: self.kind(),
                    detail: format!("no rows to attribute week {}", week.week),
                }));
                continue;
            };

            let severity = if change < -self.severe_threshold {
                Severity::High
            } else {
                Severity::Medium
            };
            findings.push(Ok(Signal::RevenueDrop {
                week: week.week,
                change_pct: round_to(change * 100.0, 1),
                baseline_label: self.baseline_label.clone(),
                severity,
                drivers,
            }));
        }
        findings
    }
}

/// Mean margin below a floor.
#[derive(Debug, Clone)]
pub struct LowMarginRule {
    pub threshold: f64,
}

impl Rule for LowMarginRule {
    fn kind(&self) -> SignalKind {
        SignalKind::LowMargin
    }

    fn evaluate(&self, rows: &[Transaction]) -> Vec<Result<Signal, RuleError>> {
        let Some(avg_margin) = aggregate::mean_margin(rows) else {
            return vec![Err(RuleError::EmptyDataset { rule: self.kind() })];
        };
        if !avg_margin.is_finite() {
            return vec![Err(RuleError::InsufficientData {
                rule: self.kind(),
                detail: "non-finite mean margin".into(),
            })];
        }
        if avg_margin < self.threshold {
            vec![Ok(Signal::LowMargin {
                avg_margin: round_to(avg_margin * 100.0, 1),
                severity: Severity::Medium,
            })]
        } else {
            Vec::new()
        }
    }
}

/// Too many high-churn-risk transactions.
#[derive(Debug, Clone)]
pub struct HighChurnRule {
    pub threshold: usize,
}

impl Rule for HighChurnRule {
    fn kind(&self) -> SignalKind {
        SignalKind::HighChurn
    }

    fn evaluate(&self, rows: &[Transaction]) -> Vec<Result<Signal, RuleError>> {
        let count = aggregate::churn_count(rows, ChurnRisk::High);
        if count > self.threshold {
            vec![Ok(Signal::HighChurn {
                count,
                severity: Severity::High,
            })]
        } else {
            Vec::new()
        }
    }
}

/// Always names the region with the lowest total profit.
#[derive(Debug, Clone, Default)]
pub struct RegionalUnderperformanceRule;

impl Rule for RegionalUnderperformanceRule {
    fn kind(&self) -> SignalKind {
        SignalKind::RegionalUnderperformance
    }

    fn evaluate(&self, rows: &[Transaction]) -> Vec<Result<Signal, RuleError>> {
        let profits = aggregate::region_profit(rows);
        match aggregate::worst_region(&profits) {
            Some(region) => vec![Ok(Signal::RegionalUnderperformance {
                region: region.to_string(),
                severity: Severity::Medium,
            })],
            None => vec![Err(RuleError::EmptyDataset { rule: self.kind() })],
        }
    }
}

/// The four rules in evaluation order.
pub fn rules(config: &RuleConfig) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(RevenueDropRule {
            threshold: config.drop_threshold,
            severe_threshold: config.severe_drop_threshold,
            window: config.baseline_window,
            include_current: config.include_current_week,
            baseline_label: config.baseline_label(),
        }),
        Box::new(LowMarginRule {
            threshold: config.low_margin_threshold,
        }),
        Box::new(HighChurnRule {
            threshold: config.churn_count_threshold,
        }),
        Box::new(RegionalUnderperformanceRule),
    ]
}

/// Run every rule over `rows` and collect signals and rule errors.
pub fn detect_signals(rows: &[Transaction], config: &RuleConfig) -> Detection {
    let mut detection = Detection::default();
    for rule in rules(config) {
        for finding in rule.evaluate(rows) {
            match finding {
                Ok(signal) => detection.signals.push(signal),
                Err(err) => detection.errors.push(err),
            }
        }
    }
    detection
}

/// Overall health from the signal list alone.
pub fn health_status(signals: &[Signal]) -> HealthStatus {
    HealthStatus::from_signals(signals)
}
