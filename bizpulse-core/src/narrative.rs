//! Narrative rendering: deterministic text over a signal list.
//!
//! The "insight" text is a fixed template expansion: one observation per
//! signal in the order received, then one recommendation per signal kind
//! present, in [`SignalKind`] order.

use crate::domain::{Severity, Signal, SignalKind};

/// Text returned when there are no signals.
pub const STABLE_MESSAGE: &str =
    "Business performance is stable with no significant risk signals detected.";

/// Headline wording: `"Needs Immediate Attention"` when any signal is HIGH,
/// otherwise `"Monitor Closely"`.
pub fn headline(signals: &[Signal]) -> &'static str {
    if signals.iter().any(|s| s.severity() == Severity::High) {
        "Needs Immediate Attention"
    } else {
        "Monitor Closely"
    }
}

/// Observation sentence for one signal.
pub fn observation(signal: &Signal) -> String {
    match signal {
        Signal::RevenueDrop {
            week,
            change_pct,
            baseline_label,
            drivers,
            ..
        } => format!(
            "Revenue declined {:.1}% in Week {} compared to the {}, primarily driven by {} in the {} region.",
            change_pct.abs(),
            week,
            baseline_label,
            drivers.product,
            drivers.region
        ),
        Signal::HighChurn { count, .. } => format!(
            "{count} transactions show high churn risk, indicating potential customer retention issues."
        ),
        Signal::LowMargin { avg_margin, .. } => format!(
            "Average profit margin is {avg_margin:.1}%, suggesting pricing or cost pressure."
        ),
        Signal::RegionalUnderperformance { region, .. } => {
            format!("The {region} region is underperforming in total profit.")
        }
    }
}

/// Short one-line form used in dashboards.
pub fn summary_line(signal: &Signal) -> String {
    match signal {
        Signal::RevenueDrop {
            week,
            change_pct,
            baseline_label,
            ..
        } => format!(
            "Revenue dropped {:.1}% in week {} (vs {}).",
            change_pct.abs(),
            week,
            baseline_label
        ),
        Signal::HighChurn { count, .. } => format!("{count} transactions show high churn risk."),
        Signal::LowMargin { avg_margin, .. } => format!("Average profit margin is {avg_margin:.1}%."),
        Signal::RegionalUnderperformance { region, .. } => {
            format!("{region} region is underperforming in total profit.")
        }
    }
}

/// Fixed recommendation for a signal kind.
pub fn recommendation(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::RevenueDrop => "Investigate product- and region-level demand drivers.",
        SignalKind::HighChurn => "Launch targeted retention initiatives.",
        SignalKind::LowMargin => "Review pricing and cost structures.",
        SignalKind::RegionalUnderperformance => "Conduct regional performance audits.",
    }
}

/// One recommendation per kind present, in fixed kind order.
pub fn recommendations(signals: &[Signal]) -> Vec<&'static str> {
    SignalKind::ALL
        .iter()
        .filter(|kind| signals.iter().any(|s| s.kind() == **kind))
        .map(|kind| recommendation(*kind))
        .collect()
}

/// Render the full narrative.
pub fn render_narrative(signals: &[Signal]) -> String {
    if signals.is_empty() {
        return STABLE_MESSAGE.to_string();
    }

    let mut lines = Vec::with_capacity(signals.len() + 8);
    lines.push(format!("⚠️ Overall Business Health: {}\n", headline(signals)));
    lines.push("Key Observations:".to_string());
    lines.extend(signals.iter().map(|s| format!("- {}", observation(s))));
    lines.push("\nRecommended Actions:".to_string());
    lines.extend(recommendations(signals).into_iter().map(|r| format!("- {r}")));
    lines.join("\n")
}
