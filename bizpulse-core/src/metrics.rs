//! Per-transaction KPI helpers.

/// Profit for a sale.
pub fn profit(sales: f64, cost: f64) -> f64 {
    sales - cost
}

/// Profit as a fraction of sales. Zero sales yield a zero margin.
pub fn profit_margin(sales: f64, cost: f64) -> f64 {
    if sales == 0.0 {
        return 0.0;
    }
    (sales - cost) / sales
}

/// Amount given away by a percentage discount.
pub fn discount_impact(sales: f64, discount_percent: f64) -> f64 {
    sales * (discount_percent / 100.0)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
