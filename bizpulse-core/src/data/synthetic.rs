//! Seeded synthetic business dataset.
//!
//! Produces raw transactions (no margin/week/month yet) for demos and tests.
//! Same seed, same rows.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::ingest::DataError;
use crate::domain::{ChurnRisk, RawTransaction};
use crate::metrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub records: usize,
    pub seed: u64,
    pub start_date: NaiveDate,
    /// Dates are drawn uniformly from `start_date .. start_date + days`.
    pub days: u32,
    pub regions: Vec<String>,
    pub products: Vec<String>,
    pub segments: Vec<String>,
    /// Quantity range, inclusive.
    pub quantity: (u32, u32),
    /// Unit price range, inclusive.
    pub unit_price: (u32, u32),
    /// Cost as a fraction of revenue, half-open `[lo, hi)`.
    pub cost_ratio: (f64, f64),
    /// Probabilities of Low, Medium and High churn risk.
    pub churn_weights: [f64; 3],
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        let names = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            records: 5000,
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days: 180,
            regions: names(&["North", "South", "East", "West"]),
            products: names(&["Product_A", "Product_B", "Product_C", "Product_D"]),
            segments: names(&["New", "Returning", "High Value"]),
            quantity: (1, 19),
            unit_price: (200, 1499),
            cost_ratio: (0.55, 0.75),
            churn_weights: [0.60, 0.25, 0.15],
        }
    }
}

/// Generate raw transactions.
///
/// Returns no rows when any category list is empty or `days` is zero.
pub fn generate(config: &SyntheticConfig) -> Vec<RawTransaction> {
    if config.regions.is_empty()
        || config.products.is_empty()
        || config.segments.is_empty()
        || config.days == 0
    {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.records)
        .map(|_| {
            let offset = rng.gen_range(0..config.days);
            let date = config.start_date + Duration::days(i64::from(offset));
            let product = pick(&mut rng, &config.products);
            let region = pick(&mut rng, &config.regions);
            let segment = pick(&mut rng, &config.segments);

            let quantity = rng.gen_range(config.quantity.0..=config.quantity.1.max(config.quantity.0));
            let price =
                rng.gen_range(config.unit_price.0..=config.unit_price.1.max(config.unit_price.0));
            let revenue = f64::from(quantity) * f64::from(price);

            let (lo, hi) = config.cost_ratio;
            let ratio = if hi > lo { rng.gen_range(lo..hi) } else { lo };
            let cost = revenue * ratio;
            let profit = metrics::profit(revenue, cost);

            RawTransaction {
                date,
                product,
                region,
                customer_segment: segment,
                quantity,
                revenue,
                cost: metrics::round_to(cost, 2),
                profit: metrics::round_to(profit, 2),
                churn_risk: churn(&mut rng, &config.churn_weights),
            }
        })
        .collect()
}

fn pick(rng: &mut StdRng, items: &[String]) -> String {
    items[rng.gen_range(0..items.len())].clone()
}

fn churn(rng: &mut StdRng, weights: &[f64; 3]) -> ChurnRisk {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return ChurnRisk::Low;
    }
    let mut draw = rng.gen::<f64>() * total;
    for (risk, weight) in ChurnRisk::ALL.iter().zip(weights) {
        if draw < *weight {
            return *risk;
        }
        draw -= weight;
    }
    ChurnRisk::High
}

/// Write raw transactions as CSV (raw column layout).
pub fn write_raw_csv<W: Write>(writer: W, rows: &[RawTransaction]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| DataError::Csv(e.into()))?;
    Ok(())
}

/// Write raw transactions to a file, creating parent directories.
pub fn write_raw_csv_path(path: &Path, rows: &[RawTransaction]) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
        }
    }
    let file = File::create(path).map_err(|e| DataError::io(path, e))?;
    write_raw_csv(file, rows)
}
