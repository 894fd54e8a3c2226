//! Domain types for BizPulse

pub mod health;
pub mod signal;
pub mod transaction;

pub use health::HealthStatus;
pub use signal::{Drivers, Severity, Signal, SignalKind};
pub use transaction::{ChurnRisk, RawTransaction, Transaction};
