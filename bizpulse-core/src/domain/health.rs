//! Overall business health, derived only from the signal list.

use serde::{Deserialize, Serialize};

use super::signal::{Severity, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    NeedsAttention,
    Monitor,
    Stable,
}

impl HealthStatus {
    /// High severity anywhere wins, then medium, otherwise stable.
    pub fn from_signals(signals: &[Signal]) -> Self {
        match signals.iter().map(Signal::severity).max() {
            Some(Severity::High) => HealthStatus::NeedsAttention,
            Some(Severity::Medium) => HealthStatus::Monitor,
            None => HealthStatus::Stable,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::NeedsAttention => "Needs Attention",
            HealthStatus::Monitor => "Monitor",
            HealthStatus::Stable => "Stable",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
