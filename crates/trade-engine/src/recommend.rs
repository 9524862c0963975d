//! One-shot trade recommendation
//!
//! Builds the spread for a request, then prices the round trip and the
//! exit bracket for a single contract.

use std::num::NonZeroU32;
use std::ops::RangeInclusive;

use chrono::{Days, NaiveDate};
use common::{OptionChainSnapshot, OptionSide, Ticker};
use config::OcoConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;
use crate::fees::FeeModel;
use crate::oco::compute_oco_levels_at;
use crate::spread::build_spread;
use crate::types::{OcoLevels, Spread, TradeData, TradeFees};
use crate::Result;

const DTE_RANGE: RangeInclusive<u32> = 1..=45;
const TARGET_DELTA_RANGE: RangeInclusive<f64> = 0.0..=1.0;
const WIDTH_RANGE: RangeInclusive<f64> = 1.0..=10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecommendationRequest {
    pub ticker: Ticker,
    pub side: OptionSide,
    pub dte: u32,
    /// Delta magnitude, e.g. 0.16 for either side
    pub target_delta: f64,
    pub width: f64,
}

impl TradeRecommendationRequest {
    pub fn validate(&self) -> Result<()> {
        if self.ticker.is_empty() {
            return Err(EngineError::InvalidRequest("ticker is required".to_string()));
        }
        if !DTE_RANGE.contains(&self.dte) {
            return Err(EngineError::InvalidRequest(format!(
                "dte must be between 1 and 45, got {}",
                self.dte
            )));
        }
        if !TARGET_DELTA_RANGE.contains(&self.target_delta) {
            return Err(EngineError::InvalidRequest(format!(
                "target delta must be between 0 and 1, got {}",
                self.target_delta
            )));
        }
        if !WIDTH_RANGE.contains(&self.width) {
            return Err(EngineError::InvalidRequest(format!(
                "width must be between 1 and 10, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

/// A priced spread ready to be placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecommendation {
    pub spread: Spread,
    pub fees: TradeFees,
    pub oco: OcoLevels,
    /// Calendar days from the recommendation date to expiry
    pub dte: i64,
}

impl TradeRecommendation {
    pub fn trade_data(&self) -> TradeData {
        self.spread.trade_data(self.dte)
    }
}

/// Expiry date `dte` calendar days after `today`
pub fn expiry_for_dte(today: NaiveDate, dte: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(dte)))
        .unwrap_or(NaiveDate::MAX)
}

/// Put deltas are matched with the sign the chain uses
fn signed_target_delta(chain: &OptionChainSnapshot, side: OptionSide, target: f64) -> f64 {
    match side {
        OptionSide::Put if chain.puts.iter().any(|quote| quote.delta < 0.0) => -target,
        _ => target,
    }
}

pub fn recommend_trade(
    chain: &OptionChainSnapshot,
    request: &TradeRecommendationRequest,
    fee_model: &FeeModel,
    oco_config: &OcoConfig,
    today: NaiveDate,
) -> Result<TradeRecommendation> {
    request.validate()?;

    if chain.ticker != request.ticker {
        return Err(EngineError::InvalidRequest(format!(
            "chain is for {}, request is for {}",
            chain.ticker, request.ticker
        )));
    }

    let target = signed_target_delta(chain, request.side, request.target_delta);
    let spread = build_spread(chain, request.side, target, request.width)?;
    let fees = fee_model.compute(request.side, NonZeroU32::MIN, false, false);
    let oco = compute_oco_levels_at(spread.net_credit, oco_config, today);

    info!(
        ticker = %spread.ticker,
        side = %spread.side,
        short_strike = spread.short_leg.strike,
        long_strike = spread.long_leg.strike,
        net_credit = spread.net_credit,
        "Trade recommendation ready"
    );

    Ok(TradeRecommendation {
        dte: chain.days_to_expiry(today),
        spread,
        fees,
        oco,
    })
}
