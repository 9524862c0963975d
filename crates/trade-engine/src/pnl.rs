//! Position P&L arithmetic
//!
//! Prices are per-share spread prices; `fees` is whatever fee total the
//! caller wants charged against the position.

pub fn calculate_pnl(credit: f64, debit: f64, fees: f64, quantity: u32) -> f64 {
    (credit - debit - fees) * f64::from(quantity)
}

pub fn calculate_max_loss(width: f64, credit: f64, fees: f64, quantity: u32) -> f64 {
    (width - credit + fees) * f64::from(quantity)
}

pub fn calculate_max_profit(credit: f64, fees: f64, quantity: u32) -> f64 {
    (credit - fees) * f64::from(quantity)
}

/// Net profit over net risk; `None` when nothing is at risk
pub fn calculate_return_on_risk(credit: f64, width: f64, fees: f64) -> Option<f64> {
    let risk = width - credit + fees;
    if risk == 0.0 {
        None
    } else {
        Some((credit - fees) / risk)
    }
}
