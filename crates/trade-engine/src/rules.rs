//! Single-trade gate
//!
//! Scores one concrete trade against fixed thresholds. The weights are
//! independent of [`crate::scanner::ScannerEngine`], which triages
//! tickers before any spread exists.

use std::ops::RangeInclusive;

use chrono::{NaiveDate, Utc};
use common::{MarketDataSnapshot, OptionSide, Ticker};
use tracing::debug;

use crate::types::{TradeData, TradeValidation};

/// Days before earnings during which new trades are avoided
pub const EARNINGS_WINDOW_DAYS: RangeInclusive<i64> = 7..=14;

pub const PASS_SCORE: i32 = 60;
pub const MAX_REASONS: usize = 2;

const DTE_RANGE: RangeInclusive<i64> = 7..=10;
const DELTA_RANGE: RangeInclusive<f64> = 0.15..=0.20;
const CREDIT_PERCENT_RANGE: RangeInclusive<f64> = 5.0..=7.0;
const PREFERRED_IVR: f64 = 35.0;
const MIN_IVR: f64 = 25.0;
const RSI_OVERBOUGHT: f64 = 65.0;

const DTE_SCORE: i32 = 20;
const PREFERRED_IVR_SCORE: i32 = 25;
const ACCEPTABLE_IVR_SCORE: i32 = 15;
const DELTA_SCORE: i32 = 20;
const CREDIT_SCORE: i32 = 20;
const BELOW_EMA_SCORE: i32 = 10;
const OVERBOUGHT_SCORE: i32 = 5;
const EARNINGS_PENALTY: i32 = 30;

/// Days to earnings when they fall inside the avoidance window
pub(crate) fn earnings_in_window(market_data: &MarketDataSnapshot, today: NaiveDate) -> Option<i64> {
    market_data
        .days_to_earnings(today)
        .filter(|days| EARNINGS_WINDOW_DAYS.contains(days))
}

/// Score a trade as of today
pub fn validate_trade(
    ticker: &Ticker,
    market_data: &MarketDataSnapshot,
    trade: &TradeData,
) -> TradeValidation {
    validate_trade_at(ticker, market_data, trade, Utc::now().date_naive())
}

pub fn validate_trade_at(
    ticker: &Ticker,
    market_data: &MarketDataSnapshot,
    trade: &TradeData,
    today: NaiveDate,
) -> TradeValidation {
    let mut reasons = Vec::new();
    let mut score = 0;

    if DTE_RANGE.contains(&trade.dte) {
        score += DTE_SCORE;
    } else {
        reasons.push(format!("DTE {} outside preferred range (7-10)", trade.dte));
    }

    // Unknown IVR neither scores nor counts against the trade
    match market_data.iv_rank {
        Some(ivr) if ivr >= PREFERRED_IVR => score += PREFERRED_IVR_SCORE,
        Some(ivr) if ivr >= MIN_IVR => {
            score += ACCEPTABLE_IVR_SCORE;
            reasons.push(format!(
                "IVR {:.1}% acceptable but not optimal (prefer >= 35%)",
                ivr
            ));
        }
        Some(ivr) => reasons.push(format!("IVR {:.1}% too low (need >= 25%)", ivr)),
        None => {}
    }

    if DELTA_RANGE.contains(&trade.delta) {
        score += DELTA_SCORE;
    } else {
        reasons.push(format!(
            "delta {:.2} outside target range (0.15-0.20)",
            trade.delta
        ));
    }

    let credit_percent = trade.credit / trade.width * 100.0;
    if CREDIT_PERCENT_RANGE.contains(&credit_percent) {
        score += CREDIT_SCORE;
    } else {
        reasons.push(format!(
            "credit {:.1}% outside preferred range (5-7%)",
            credit_percent
        ));
    }

    if trade.side == OptionSide::Call {
        let below_ema = market_data
            .ema10
            .is_some_and(|ema| market_data.price < ema);
        let overbought = market_data.rsi14.is_some_and(|rsi| rsi > RSI_OVERBOUGHT);

        if below_ema {
            score += BELOW_EMA_SCORE;
        } else if overbought {
            score += OVERBOUGHT_SCORE;
            reasons.push("price above 10-EMA with RSI above 65, consider put spreads instead".to_string());
        } else {
            reasons.push("call spread not ideal, price above 10-EMA and RSI not overbought".to_string());
        }
    }

    if let Some(days) = earnings_in_window(market_data, today) {
        reasons.push(format!("earnings in {} days - avoid trade", days));
        score -= EARNINGS_PENALTY;
    }

    let passes = score >= PASS_SCORE && reasons.len() <= MAX_REASONS;

    debug!(%ticker, score, passes, reasons = reasons.len(), "Validated trade");

    TradeValidation {
        passes,
        reasons,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn good_call() -> TradeData {
        TradeData {
            dte: 8,
            delta: 0.16,
            credit: 0.15,
            width: 2.5,
            side: OptionSide::Call,
        }
    }

    fn market(ivr: f64) -> MarketDataSnapshot {
        MarketDataSnapshot::new("AAPL", 150.0)
            .with_iv_rank(ivr)
            .with_ema10(155.0)
            .with_rsi14(50.0)
    }

    #[test]
    fn test_ideal_call_trade() {
        let ticker = Ticker::new("AAPL");
        let result = validate_trade_at(&ticker, &market(40.0), &good_call(), today());

        assert_eq!(result.score, 20 + 25 + 20 + 20 + 10);
        assert!(result.reasons.is_empty());
        assert!(result.passes);
    }

    #[test]
    fn test_acceptable_ivr_adds_note() {
        let ticker = Ticker::new("AAPL");
        let result = validate_trade_at(&ticker, &market(30.0), &good_call(), today());

        assert_eq!(result.score, 85);
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].starts_with("IVR 30.0%"));
        assert!(result.passes);
    }

    #[test]
    fn test_low_and_missing_ivr() {
        let ticker = Ticker::new("AAPL");

        let low = validate_trade_at(&ticker, &market(10.0), &good_call(), today());
        assert_eq!(low.score, 70);
        assert!(low.reasons[0].contains("too low"));

        let unknown = MarketDataSnapshot::new("AAPL", 150.0).with_ema10(155.0);
        let missing = validate_trade_at(&ticker, &unknown, &good_call(), today());
        assert_eq!(missing.score, 70);
        assert!(missing.reasons.is_empty());
    }

    #[test]
    fn test_out_of_range_trade_fails() {
        let ticker = Ticker::new("AAPL");
        let trade = TradeData {
            dte: 21,
            delta: 0.30,
            credit: 0.50,
            ..good_call()
        };

        let result = validate_trade_at(&ticker, &market(40.0), &trade, today());
        assert_eq!(result.score, 35);
        assert_eq!(result.reasons.len(), 3);
        assert!(!result.passes);
    }

    #[test]
    fn test_too_many_reasons_fails_despite_score() {
        let ticker = Ticker::new("AAPL");
        let overbought = MarketDataSnapshot::new("AAPL", 160.0)
            .with_iv_rank(30.0)
            .with_ema10(155.0)
            .with_rsi14(70.0);

        let late = TradeData {
            dte: 21,
            ..good_call()
        };
        let result = validate_trade_at(&ticker, &overbought, &late, today());
        assert_eq!(result.score, 60);
        assert_eq!(result.reasons.len(), 3);
        assert!(!result.passes);

        let result = validate_trade_at(&ticker, &overbought, &good_call(), today());
        assert_eq!(result.score, 80);
        assert_eq!(result.reasons.len(), 2);
        assert!(result.passes);
    }

    #[test]
    fn test_call_trend_checks() {
        let ticker = Ticker::new("AAPL");

        let overbought = MarketDataSnapshot::new("AAPL", 160.0)
            .with_iv_rank(40.0)
            .with_ema10(155.0)
            .with_rsi14(70.0);
        let result = validate_trade_at(&ticker, &overbought, &good_call(), today());
        assert_eq!(result.score, 90);
        assert!(result.reasons[0].contains("consider put spreads"));

        let neutral = overbought.clone().with_rsi14(55.0);
        let result = validate_trade_at(&ticker, &neutral, &good_call(), today());
        assert_eq!(result.score, 85);
        assert!(result.reasons[0].contains("call spread not ideal"));
    }

    #[test]
    fn test_put_trade_skips_trend() {
        let ticker = Ticker::new("AAPL");
        let above_ema = MarketDataSnapshot::new("AAPL", 160.0)
            .with_iv_rank(40.0)
            .with_ema10(155.0)
            .with_rsi14(50.0);
        let trade = TradeData {
            side: OptionSide::Put,
            ..good_call()
        };

        let result = validate_trade_at(&ticker, &above_ema, &trade, today());
        assert_eq!(result.score, 85);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_earnings_penalty() {
        let ticker = Ticker::new("AAPL");
        let earnings = today() + chrono::Days::new(10);
        let snapshot = market(40.0).with_earnings_date(earnings);

        let result = validate_trade_at(&ticker, &snapshot, &good_call(), today());
        assert_eq!(result.score, 95 - 30);
        assert_eq!(result.reasons, vec!["earnings in 10 days - avoid trade".to_string()]);
        assert!(result.passes);
    }

    #[test]
    fn test_earnings_window_bounds() {
        let ticker = Ticker::new("AAPL");
        for (days, penalised) in [(6, false), (7, true), (14, true), (15, false)] {
            let snapshot = market(40.0).with_earnings_date(today() + chrono::Days::new(days));
            let result = validate_trade_at(&ticker, &snapshot, &good_call(), today());
            assert_eq!(result.score == 65, penalised, "days = {}", days);
        }
    }
}
