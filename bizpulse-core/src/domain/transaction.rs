//! Transaction: the fundamental business data unit.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::metrics;

/// Churn risk bucket attached to every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChurnRisk {
    Low,
    Medium,
    High,
}

impl ChurnRisk {
    pub const ALL: [ChurnRisk; 3] = [ChurnRisk::Low, ChurnRisk::Medium, ChurnRisk::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnRisk::Low => "Low",
            ChurnRisk::Medium => "Medium",
            ChurnRisk::High => "High",
        }
    }
}

impl std::fmt::Display for ChurnRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw transaction as it leaves the generator, before the ETL step
/// attaches margin and calendar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub date: NaiveDate,
    pub product: String,
    pub region: String,
    pub customer_segment: String,
    pub quantity: u32,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub churn_risk: ChurnRisk,
}

/// One processed transaction row.
///
/// `profit`, `profit_margin`, `week` and `month` are always derived from the
/// other fields by the constructor. Fields are private so a transaction can
/// never carry a margin or week that disagrees with its inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    date: NaiveDate,
    product: String,
    region: String,
    customer_segment: String,
    quantity: u32,
    revenue: f64,
    cost: f64,
    profit: f64,
    profit_margin: f64,
    week: u32,
    month: u32,
    churn_risk: ChurnRisk,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        product: impl Into<String>,
        region: impl Into<String>,
        customer_segment: impl Into<String>,
        quantity: u32,
        revenue: f64,
        cost: f64,
        churn_risk: ChurnRisk,
    ) -> Self {
        let profit = metrics::profit(revenue, cost);
        Self {
            date,
            product: product.into(),
            region: region.into(),
            customer_segment: customer_segment.into(),
            quantity,
            revenue,
            cost,
            profit,
            profit_margin: metrics::round_to(metrics::profit_margin(revenue, cost), 2),
            week: date.iso_week().week(),
            month: date.month(),
            churn_risk,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn customer_segment(&self) -> &str {
        &self.customer_segment
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// `revenue - cost`.
    pub fn profit(&self) -> f64 {
        self.profit
    }

    /// `profit / revenue` rounded to two decimals, 0 for zero revenue.
    pub fn profit_margin(&self) -> f64 {
        self.profit_margin
    }

    /// ISO week of year (1-53).
    pub fn week(&self) -> u32 {
        self.week
    }

    /// Calendar month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn churn_risk(&self) -> ChurnRisk {
        self.churn_risk
    }
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        Transaction::new(
            raw.date,
            raw.product,
            raw.region,
            raw.customer_segment,
            raw.quantity,
            raw.revenue,
            raw.cost,
            raw.churn_risk,
        )
    }
}
