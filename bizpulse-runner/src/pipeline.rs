//! Analysis pipeline: detect → health → narrate.
//!
//! Strictly sequential. Each stage consumes the previous stage's output and
//! nothing else; the dataset is an explicit argument.

use bizpulse_core::{detect_signals, render_narrative, HealthStatus, RuleConfig, RuleError, Signal, Transaction};
use serde::Serialize;
use tracing::{debug, warn};

/// Everything derived from one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub signals: Vec<Signal>,
    pub rule_errors: Vec<RuleError>,
    pub health: HealthStatus,
    pub narrative: String,
}

impl Analysis {
    pub fn high_signal_count(&self) -> usize {
        self.signals.iter().filter(|s| s.is_high()).count()
    }
}

/// Run the detector, derive health from its signals, render the narrative.
pub fn analyze(rows: &[Transaction], rules: &RuleConfig) -> Analysis {
    let detection = detect_signals(rows, rules);
    for err in &detection.errors {
        warn!(rule = %err.rule(), error = %err, "rule could not be evaluated");
    }

    let health = detection.health();
    let narrative = render_narrative(&detection.signals);
    debug!(
        rows = rows.len(),
        signals = detection.signals.len(),
        health = %health,
        "analysis complete"
    );

    Analysis {
        signals: detection.signals,
        rule_errors: detection.errors,
        health,
        narrative,
    }
}
