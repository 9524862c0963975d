//! Exit bracket levels
//!
//! The time stop is plain calendar arithmetic; weekends and market
//! holidays are not skipped.

use chrono::{Days, NaiveDate, Utc};
use config::OcoConfig;

use crate::types::OcoLevels;

/// Exit levels for a spread opened today
pub fn compute_oco_levels(credit: f64, config: &OcoConfig) -> OcoLevels {
    compute_oco_levels_at(credit, config, Utc::now().date_naive())
}

pub fn compute_oco_levels_at(credit: f64, config: &OcoConfig, today: NaiveDate) -> OcoLevels {
    let time_stop = today
        .checked_add_days(Days::new(u64::from(config.time_stop_days)))
        .unwrap_or(NaiveDate::MAX);

    OcoLevels {
        take_profit: credit * config.take_profit_percent,
        stop_loss: credit * config.stop_loss_multiplier,
        time_stop,
    }
}
