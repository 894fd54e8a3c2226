//! Aggregations over transaction rows.
//!
//! Every grouping uses ordered maps so results come out sorted by key and
//! ties resolve the same way on every run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ChurnRisk, Drivers, Transaction};

/// Total revenue for one ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRevenue {
    pub week: u32,
    pub revenue: f64,
}

/// Sum of revenue per week, ascending by week. Only weeks present in the
/// data appear.
pub fn weekly_revenue(rows: &[Transaction]) -> Vec<WeeklyRevenue> {
    let mut by_week: BTreeMap<u32, f64> = BTreeMap::new();
    for tx in rows {
        *by_week.entry(tx.week()).or_insert(0.0) += tx.revenue();
    }
    by_week
        .into_iter()
        .map(|(week, revenue)| WeeklyRevenue { week, revenue })
        .collect()
}

/// Trailing mean of weekly revenue, aligned to each entry of `weekly`.
///
/// The window is positional over the weeks present, not calendar weeks.
/// With `include_current` the window is the `window` entries ending at the
/// current one; otherwise it is the `window` entries before it. Entries
/// without a full window are `None`.
pub fn rolling_baseline(weekly: &[WeeklyRevenue], window: usize, include_current: bool) -> Vec<Option<f64>> {
    let n = weekly.len();
    let mut result = vec![None; n];
    if window == 0 {
        return result;
    }

    let first = if include_current { window - 1 } else { window };
    for (i, slot) in result.iter_mut().enumerate().skip(first) {
        let end = if include_current { i + 1 } else { i };
        let sum: f64 = weekly[end - window..end].iter().map(|w| w.revenue).sum();
        *slot = Some(sum / window as f64);
    }

    result
}

/// The product/region pair with the highest summed revenue in `week`.
///
/// Ties go to the smallest `(product, region)` in ascending order.
/// `None` when the week has no rows.
pub fn top_driver(rows: &[Transaction], week: u32) -> Option<Drivers> {
    let mut by_pair: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for tx in rows.iter().filter(|tx| tx.week() == week) {
        *by_pair.entry((tx.product(), tx.region())).or_insert(0.0) += tx.revenue();
    }

    let mut best: Option<((&str, &str), f64)> = None;
    for (pair, revenue) in by_pair {
        match best {
            Some((_, top)) if revenue <= top => {}
            _ => best = Some((pair, revenue)),
        }
    }

    best.map(|((product, region), _)| Drivers {
        product: product.to_string(),
        region: region.to_string(),
    })
}

/// Sum of profit per region, ascending by region.
pub fn region_profit(rows: &[Transaction]) -> BTreeMap<String, f64> {
    let mut by_region: BTreeMap<String, f64> = BTreeMap::new();
    for tx in rows {
        match by_region.get_mut(tx.region()) {
            Some(total) => *total += tx.profit(),
            None => {
                by_region.insert(tx.region().to_string(), tx.profit());
            }
        }
    }
    by_region
}

/// Region with the lowest total profit; ties go to the first region in
/// ascending order.
pub fn worst_region(profits: &BTreeMap<String, f64>) -> Option<&str> {
    let mut worst: Option<(&str, f64)> = None;
    for (region, profit) in profits {
        match worst {
            Some((_, low)) if *profit >= low => {}
            _ => worst = Some((region.as_str(), *profit)),
        }
    }
    worst.map(|(region, _)| region)
}

/// Mean `profit_margin` over all rows, `None` for no rows.
pub fn mean_margin(rows: &[Transaction]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let sum: f64 = rows.iter().map(Transaction::profit_margin).sum();
    Some(sum / rows.len() as f64)
}

/// Mean margin per week, ascending by week.
pub fn weekly_margin(rows: &[Transaction]) -> Vec<(u32, f64)> {
    let mut by_week: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for tx in rows {
        let entry = by_week.entry(tx.week()).or_insert((0.0, 0));
        entry.0 += tx.profit_margin();
        entry.1 += 1;
    }
    by_week
        .into_iter()
        .map(|(week, (sum, count))| (week, sum / count as f64))
        .collect()
}

/// Mean margin of the `n` most recent rows by date.
///
/// Rows sharing a date keep their input order (stable sort), so the cut is
/// reproducible.
pub fn recent_margin(rows: &[Transaction], n: usize) -> Option<f64> {
    if rows.is_empty() || n == 0 {
        return None;
    }
    let mut sorted: Vec<&Transaction> = rows.iter().collect();
    sorted.sort_by_key(|tx| tx.date());
    let tail = &sorted[sorted.len().saturating_sub(n)..];
    let sum: f64 = tail.iter().map(|tx| tx.profit_margin()).sum();
    Some(sum / tail.len() as f64)
}

/// Number of rows in the `risk` churn bucket.
pub fn churn_count(rows: &[Transaction], risk: ChurnRisk) -> usize {
    rows.iter().filter(|tx| tx.churn_risk() == risk).count()
}
