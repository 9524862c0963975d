//! Delta-targeted vertical spread construction
//!
//! The short leg is the quote whose delta is closest to the target; ties
//! go to the earlier quote in chain order. The long leg must sit exactly
//! `width` further out of the money: above the short strike for calls,
//! below it for puts. Strikes are compared with exact equality. A quote
//! `width` away on the in-the-money side is never taken as the long leg.

use common::{OptionChainSnapshot, OptionQuote, OptionSide};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::types::Spread;
use crate::Result;

/// Build a credit spread on one side of `chain`
pub fn build_spread(
    chain: &OptionChainSnapshot,
    side: OptionSide,
    target_delta: f64,
    width: f64,
) -> Result<Spread> {
    if !width.is_finite() || width <= 0.0 {
        return Err(EngineError::InvalidWidth {
            ticker: chain.ticker.clone(),
            side,
            width,
        });
    }

    let quotes = chain.quotes(side);
    if quotes.len() < 2 {
        warn!(ticker = %chain.ticker, %side, available = quotes.len(), "Not enough quotes for a spread");
        return Err(EngineError::InsufficientOptions {
            ticker: chain.ticker.clone(),
            side,
            available: quotes.len(),
        });
    }

    let short_leg = select_short_leg(quotes, target_delta).ok_or_else(|| {
        EngineError::InsufficientOptions {
            ticker: chain.ticker.clone(),
            side,
            available: quotes.len(),
        }
    })?;

    let long_leg = find_long_leg(quotes, side, short_leg.strike, width).ok_or_else(|| {
        warn!(ticker = %chain.ticker, %side, short_strike = short_leg.strike, width, "No long leg at exact width");
        EngineError::NoMatchingLongLeg {
            ticker: chain.ticker.clone(),
            side,
            short_strike: short_leg.strike,
            width,
        }
    })?;

    let spread = price_spread(chain, side, width, *short_leg, *long_leg);

    debug!(
        ticker = %spread.ticker,
        %side,
        short_strike = spread.short_leg.strike,
        long_strike = spread.long_leg.strike,
        net_credit = spread.net_credit,
        credit_percent = spread.credit_percent,
        "Built spread"
    );

    Ok(spread)
}

/// First quote minimising `|delta - target|`
fn select_short_leg(quotes: &[OptionQuote], target_delta: f64) -> Option<&OptionQuote> {
    quotes.iter().min_by(|a, b| {
        let da = (a.delta - target_delta).abs();
        let db = (b.delta - target_delta).abs();
        da.total_cmp(&db)
    })
}

fn find_long_leg(
    quotes: &[OptionQuote],
    side: OptionSide,
    short_strike: f64,
    width: f64,
) -> Option<&OptionQuote> {
    quotes.iter().find(|quote| match side {
        OptionSide::Call => quote.strike - short_strike == width,
        OptionSide::Put => short_strike - quote.strike == width,
    })
}

fn price_spread(
    chain: &OptionChainSnapshot,
    side: OptionSide,
    width: f64,
    short_leg: OptionQuote,
    long_leg: OptionQuote,
) -> Spread {
    let credit = short_leg.mid();
    let debit = long_leg.mid();
    let net_credit = credit - debit;
    let max_risk = width - net_credit;
    let max_profit = net_credit;

    let risk_reward_ratio = if max_risk == 0.0 {
        None
    } else {
        Some(max_profit / max_risk)
    };

    let breakeven = match side {
        OptionSide::Call => short_leg.strike + net_credit,
        OptionSide::Put => short_leg.strike - net_credit,
    };

    Spread {
        ticker: chain.ticker.clone(),
        side,
        expiry: chain.expiry,
        width,
        short_leg,
        long_leg,
        credit,
        debit,
        net_credit,
        max_risk,
        max_profit,
        credit_percent: net_credit / width * 100.0,
        risk_reward_ratio,
        breakeven,
    }
}
