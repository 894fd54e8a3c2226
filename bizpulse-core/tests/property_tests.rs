//! Property tests for detector and narrative invariants.
//!
//! Uses proptest to verify:
//! 1. Determinism: same rows, same signals, same narrative
//! 2. Revenue drop fires iff the weekly change is below the threshold, with
//!    HIGH severity iff it is strictly below the severe threshold
//! 3. Low margin fires iff the mean margin is below the threshold
//! 4. High churn fires iff the High-risk count exceeds the threshold
//! 5. Regional underperformance fires exactly once for non-empty data
//! 6. Recommendations are de-duplicated and follow kind order

use std::collections::{BTreeMap, BTreeSet};

use bizpulse_core::domain::{ChurnRisk, Signal, SignalKind, Transaction};
use bizpulse_core::narrative::{recommendation, recommendations};
use bizpulse_core::{detect_signals, health_status, render_narrative, HealthStatus, RuleConfig};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

const REGIONS: [&str; 4] = ["East", "North", "South", "West"];
const PRODUCTS: [&str; 3] = ["Product_A", "Product_B", "Product_C"];

fn monday(week: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::weeks(i64::from(week) - 1)
}

fn arb_churn() -> impl Strategy<Value = ChurnRisk> {
    prop_oneof![
        Just(ChurnRisk::Low),
        Just(ChurnRisk::Medium),
        Just(ChurnRisk::High),
    ]
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        1u32..=20,
        0usize..PRODUCTS.len(),
        0usize..REGIONS.len(),
        1u32..20,
        (1.0..5000.0_f64).prop_map(|r| (r * 100.0).round() / 100.0),
        0.3..1.1_f64,
        arb_churn(),
    )
        .prop_map(|(week, p, r, qty, revenue, cost_ratio, churn)| {
            Transaction::new(
                monday(week),
                PRODUCTS[p],
                REGIONS[r],
                "Returning",
                qty,
                revenue,
                (revenue * cost_ratio * 100.0).round() / 100.0,
                churn,
            )
        })
}

fn arb_rows() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(arb_transaction(), 1..120)
}

/// One row per consecutive week with the given revenues.
fn weekly_rows(revenues: &[f64]) -> Vec<Transaction> {
    revenues
        .iter()
        .enumerate()
        .map(|(i, &rev)| {
            Transaction::new(
                monday(i as u32 + 1),
                "Product_A",
                "North",
                "New",
                1,
                rev,
                rev * 0.5,
                ChurnRisk::Low,
            )
        })
        .collect()
}

// ── 1. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn detection_is_deterministic(rows in arb_rows()) {
        let config = RuleConfig::default();
        let first = detect_signals(&rows, &config);
        let second = detect_signals(&rows, &config);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            render_narrative(&first.signals),
            render_narrative(&second.signals)
        );
    }
}

// ── 2. Revenue drop iff below threshold ──────────────────────────────

proptest! {
    /// Using the prior-weeks baseline, a week is flagged exactly when its
    /// change against the mean of the previous four weeks is below -15%.
    #[test]
    fn revenue_drop_iff_change_below_threshold(
        revenues in prop::collection::vec(100.0..10_000.0_f64, 5..16),
    ) {
        let config = RuleConfig {
            include_current_week: false,
            ..RuleConfig::default()
        };
        let detection = detect_signals(&weekly_rows(&revenues), &config);

        let flagged: BTreeSet<u32> = detection
            .signals
            .iter()
            .filter_map(|s| match s {
                Signal::RevenueDrop { week, .. } => Some(*week),
                _ => None,
            })
            .collect();

        let mut expected = BTreeSet::new();
        for i in 4..revenues.len() {
            let base: f64 = revenues[i - 4..i].iter().sum::<f64>() / 4.0;
            let change = (revenues[i] - base) / base;
            if change < -config.drop_threshold {
                expected.insert(i as u32 + 1);
            }
        }
        prop_assert_eq!(flagged, expected);
        prop_assert!(detection.errors.is_empty());
    }

    /// With the default configuration the window ends at the current week.
    /// Severity follows the unrounded change, HIGH only when strictly below
    /// -25%.
    #[test]
    fn revenue_drop_iff_change_below_threshold_default_window(
        revenues in prop::collection::vec(100.0..10_000.0_f64, 4..16),
    ) {
        let config = RuleConfig::default();
        let detection = detect_signals(&weekly_rows(&revenues), &config);

        let flagged: BTreeMap<u32, bool> = detection
            .signals
            .iter()
            .filter_map(|s| match s {
                Signal::RevenueDrop { week, .. } => Some((*week, s.is_high())),
                _ => None,
            })
            .collect();

        let mut expected = BTreeMap::new();
        for i in 3..revenues.len() {
            let base: f64 = revenues[i - 3..=i].iter().sum::<f64>() / 4.0;
            let change = (revenues[i] - base) / base;
            if change < -config.drop_threshold {
                expected.insert(i as u32 + 1, change < -config.severe_drop_threshold);
            }
        }
        prop_assert_eq!(flagged, expected);
        prop_assert!(detection.errors.is_empty());
    }

    /// Severity is HIGH exactly when the rounded percentage is past the severe
    /// threshold (modulo rounding at the boundary).
    #[test]
    fn revenue_drop_severity_matches_magnitude(
        revenues in prop::collection::vec(100.0..10_000.0_f64, 5..16),
    ) {
        let detection = detect_signals(&weekly_rows(&revenues), &RuleConfig::default());
        for signal in &detection.signals {
            if let Signal::RevenueDrop { change_pct, severity, .. } = signal {
                prop_assert!(*change_pct <= -15.0);
                if *change_pct < -25.1 {
                    prop_assert!(signal.is_high(), "{} not high", change_pct);
                }
                if *change_pct > -24.9 {
                    prop_assert!(!signal.is_high(), "{} high as {:?}", change_pct, severity);
                }
            }
        }
    }
}

// ── 3. Low margin iff mean below threshold ───────────────────────────

proptest! {
    #[test]
    fn low_margin_iff_mean_below_threshold(rows in arb_rows()) {
        let detection = detect_signals(&rows, &RuleConfig::default());
        let mean = rows.iter().map(Transaction::profit_margin).sum::<f64>() / rows.len() as f64;
        let fired = detection.signals.iter().any(|s| s.kind() == SignalKind::LowMargin);
        prop_assert_eq!(fired, mean < 0.25);
    }
}

// ── 4. High churn iff count above threshold ──────────────────────────

proptest! {
    #[test]
    fn high_churn_iff_count_exceeds_threshold(
        rows in arb_rows(),
        threshold in 0usize..60,
    ) {
        let config = RuleConfig {
            churn_count_threshold: threshold,
            ..RuleConfig::default()
        };
        let detection = detect_signals(&rows, &config);
        let count = rows.iter().filter(|t| t.churn_risk() == ChurnRisk::High).count();

        let churn: Vec<&Signal> = detection
            .signals
            .iter()
            .filter(|s| s.kind() == SignalKind::HighChurn)
            .collect();
        if count > threshold {
            prop_assert_eq!(churn.len(), 1);
            let is_expected = matches!(churn[0], Signal::HighChurn { count: c, .. } if *c == count);
            prop_assert!(is_expected);
            prop_assert!(churn[0].is_high());
        } else {
            prop_assert!(churn.is_empty());
        }
    }
}

// ── 5. Regional underperformance ─────────────────────────────────────

proptest! {
    #[test]
    fn regional_signal_always_present_once(rows in arb_rows()) {
        let detection = detect_signals(&rows, &RuleConfig::default());
        let regional: Vec<&Signal> = detection
            .signals
            .iter()
            .filter(|s| s.kind() == SignalKind::RegionalUnderperformance)
            .collect();
        prop_assert_eq!(regional.len(), 1);
        // Any non-empty dataset is at least Monitor.
        prop_assert_ne!(health_status(&detection.signals), HealthStatus::Stable);
    }
}

// ── 6. Recommendations ───────────────────────────────────────────────

fn arb_signal() -> impl Strategy<Value = Signal> {
    use bizpulse_core::domain::{Drivers, Severity};
    prop_oneof![
        (1u32..53, -90.0..-15.1_f64).prop_map(|(week, pct)| Signal::RevenueDrop {
            week,
            change_pct: (pct * 10.0).round() / 10.0,
            baseline_label: "4-week average".into(),
            severity: if pct < -25.0 { Severity::High } else { Severity::Medium },
            drivers: Drivers {
                product: "Product_B".into(),
                region: "South".into(),
            },
        }),
        (0.0..24.9_f64).prop_map(|m| Signal::LowMargin {
            avg_margin: (m * 10.0).round() / 10.0,
            severity: Severity::Medium,
        }),
        (501usize..2000).prop_map(|count| Signal::HighChurn {
            count,
            severity: Severity::High,
        }),
        (0usize..REGIONS.len()).prop_map(|r| Signal::RegionalUnderperformance {
            region: REGIONS[r].into(),
            severity: Severity::Medium,
        }),
    ]
}

proptest! {
    #[test]
    fn recommendations_are_distinct_and_ordered(
        signals in prop::collection::vec(arb_signal(), 0..12),
    ) {
        let recs = recommendations(&signals);
        let kinds: BTreeSet<SignalKind> = signals.iter().map(Signal::kind).collect();
        prop_assert_eq!(recs.len(), kinds.len());

        let expected: Vec<&str> = SignalKind::ALL
            .iter()
            .filter(|k| kinds.contains(k))
            .map(|k| recommendation(*k))
            .collect();
        prop_assert_eq!(&recs, &expected);

        let text = render_narrative(&signals);
        if signals.is_empty() {
            prop_assert!(!text.contains("Recommended Actions"));
        } else {
            let actions = text.split("Recommended Actions:").nth(1).unwrap_or_default();
            prop_assert_eq!(actions.lines().filter(|l| l.starts_with("- ")).count(), kinds.len());
            // One observation bullet per signal.
            let observations = text.split("Key Observations:").nth(1).unwrap_or_default();
            let observations = observations.split("Recommended Actions:").next().unwrap_or_default();
            prop_assert_eq!(
                observations.lines().filter(|l| l.starts_with("- ")).count(),
                signals.len()
            );
        }
    }
}
