//! BizPulse Core: transaction domain, aggregation, signal rules and narrative.
//!
//! This crate contains the signal-detection engine:
//! - Domain types (transactions, signals, severity, health status)
//! - CSV schema contract, ingestion, raw → processed ETL, synthetic data
//! - Weekly and categorical aggregates
//! - Four independent threshold rules producing typed signals
//! - Deterministic narrative rendering over the signal list

pub mod aggregate;
pub mod data;
pub mod detector;
pub mod domain;
pub mod metrics;
pub mod narrative;
pub mod schema;

pub use detector::{detect_signals, health_status, Detection, RuleConfig, RuleError};
pub use domain::{ChurnRisk, Drivers, HealthStatus, Severity, Signal, SignalKind, Transaction};
pub use narrative::render_narrative;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a request handler would hand across
    /// threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Transaction>();
        require_sync::<Transaction>();
        require_send::<Signal>();
        require_sync::<Signal>();
        require_send::<Detection>();
        require_sync::<Detection>();
        require_send::<RuleConfig>();
        require_sync::<RuleConfig>();
        require_send::<RuleError>();
        require_sync::<RuleError>();
        require_send::<HealthStatus>();
        require_sync::<HealthStatus>();
        require_send::<Box<dyn detector::Rule>>();
        require_sync::<Box<dyn detector::Rule>>();
        require_send::<data::IngestedData>();
        require_sync::<data::IngestedData>();
    }

    /// Architecture contract: rules see rows only, never prior detections.
    ///
    /// `Rule::evaluate` takes `&self` and the row slice. There is no place to
    /// keep signal history between calls.
    #[test]
    fn rule_trait_takes_rows_only() {
        fn _check_trait_object_builds(
            rule: &dyn detector::Rule,
            rows: &[Transaction],
        ) -> Vec<Result<Signal, RuleError>> {
            rule.evaluate(rows)
        }
    }

    #[test]
    fn detection_is_repeatable() {
        let rows = data::generate(&data::SyntheticConfig {
            records: 400,
            ..Default::default()
        })
        .into_iter()
        .map(Transaction::from)
        .collect::<Vec<_>>();

        let config = RuleConfig::default();
        let first = detect_signals(&rows, &config);
        let second = detect_signals(&rows, &config);
        assert_eq!(first, second);
        assert_eq!(render_narrative(&first.signals), render_narrative(&second.signals));
    }
}
