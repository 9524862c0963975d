use crate::{MarketDataProviderKind, SpreadWidth};

// Scanner filter defaults
pub fn default_min_dte() -> u32 {
    7
}

pub fn default_max_dte() -> u32 {
    10
}

pub fn default_min_ivr() -> f64 {
    25.0
}

pub fn default_preferred_ivr() -> f64 {
    35.0
}

pub fn default_target_delta() -> f64 {
    0.16
}

pub fn default_delta_range() -> f64 {
    0.05
}

pub fn default_min_credit_percent() -> f64 {
    0.05
}

pub fn default_max_credit_percent() -> f64 {
    0.07
}

pub fn default_spread_width() -> SpreadWidth {
    SpreadWidth::TwoAndAHalf
}

// OCO defaults
pub fn default_take_profit_percent() -> f64 {
    0.5
}

pub fn default_stop_loss_multiplier() -> f64 {
    2.0
}

pub fn default_time_stop_days() -> u32 {
    2
}

// Fee schedule defaults (per contract)
pub fn default_commission_per_contract() -> f64 {
    0.0
}

pub fn default_clearing_fee_per_contract() -> f64 {
    0.65
}

pub fn default_orf_fee_per_contract() -> f64 {
    0.000119
}

pub fn default_taf_fee_per_contract() -> f64 {
    0.000119
}

// Market data defaults
pub fn default_provider_kind() -> MarketDataProviderKind {
    MarketDataProviderKind::Static
}

pub fn default_polygon_base_url() -> String {
    "https://api.polygon.io".to_string()
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}
