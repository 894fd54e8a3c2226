//! On-disk row layout of the processed dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{ChurnRisk, Transaction};

/// Tolerance for supplied money/margin values vs. the derived ones.
/// Upstream files round cost and profit to cents independently.
const DERIVED_TOLERANCE: f64 = 0.011;

/// One processed CSV row, field order matching `schema::REQUIRED_COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub product: String,
    pub region: String,
    pub customer_segment: String,
    pub quantity: u32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub profit_margin: f64,
    pub week: u32,
    pub month: u32,
    pub churn_risk: ChurnRisk,
}

impl TransactionRecord {
    /// Build the transaction, re-deriving profit, margin, week and month.
    ///
    /// Returns a description of every supplied derived value that disagrees
    /// with the recomputed one. Disagreements are data-quality warnings; the
    /// derived values always win.
    pub fn into_transaction(self) -> (Transaction, Vec<String>) {
        let tx = Transaction::new(
            self.date,
            self.product,
            self.region,
            self.customer_segment,
            self.quantity,
            self.revenue,
            self.cost,
            self.churn_risk,
        );

        let mut mismatches = Vec::new();
        if (self.profit - tx.profit()).abs() > DERIVED_TOLERANCE {
            mismatches.push(format!(
                "profit {} differs from revenue - cost {:.2}",
                self.profit,
                tx.profit()
            ));
        }
        if (self.profit_margin - tx.profit_margin()).abs() > DERIVED_TOLERANCE {
            mismatches.push(format!(
                "profit_margin {} differs from derived {:.2}",
                self.profit_margin,
                tx.profit_margin()
            ));
        }
        if self.week != tx.week() {
            mismatches.push(format!(
                "week {} differs from ISO week {} of {}",
                self.week,
                tx.week(),
                tx.date()
            ));
        }
        if self.month != tx.month() {
            mismatches.push(format!(
                "month {} differs from month {} of {}",
                self.month,
                tx.month(),
                tx.date()
            ));
        }

        (tx, mismatches)
    }
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            date: tx.date(),
            product: tx.product().to_string(),
            region: tx.region().to_string(),
            customer_segment: tx.customer_segment().to_string(),
            quantity: tx.quantity(),
            revenue: tx.revenue(),
            cost: tx.cost(),
            profit: tx.profit(),
            profit_margin: tx.profit_margin(),
            week: tx.week(),
            month: tx.month(),
            churn_risk: tx.churn_risk(),
        }
    }
}

/// Reject money amounts that are negative, NaN or infinite.
pub(crate) fn check_amounts(revenue: f64, cost: f64) -> Result<(), String> {
    for (name, value) in [("revenue", revenue), ("cost", cost)] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a non-negative number, got {value}"));
        }
    }
    Ok(())
}

/// Parse a calendar date, accepting a trailing time component
/// (`2024-01-01 00:00:00` or `2024-01-01T00:00:00`).
pub(crate) fn parse_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    let day = text
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_date(&text).map_err(|e| serde::de::Error::custom(format!("invalid date '{text}': {e}")))
}
