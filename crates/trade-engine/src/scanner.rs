//! Batch ticker triage
//!
//! Scores each ticker's market snapshot on IV rank, trend and earnings
//! proximity, then ranks the batch. Missing or unusable data produces a
//! failing result instead of an error, so one bad ticker never sinks a scan.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use common::{MarketDataSnapshot, Ticker};
use config::ScannerFilters;
use tracing::{debug, info};

use crate::rules::earnings_in_window;
use crate::types::ScannerResult;
use crate::Result;

pub const REASON_NO_MARKET_DATA: &str = "no market data available";
pub const REASON_INVALID_PRICE: &str = "invalid or missing price data";
pub const REASON_NO_IVR: &str = "IVR data not available";
pub const REASON_NO_INDICATORS: &str = "technical indicators not available";
pub const REASON_NEUTRAL_TREND: &str = "neutral trend, price above 10-EMA and RSI not overbought";
pub const REASON_EARNINGS: &str = "within earnings window - avoid trading";

pub const PASS_SCORE: i32 = 40;
pub const MAX_REASONS: usize = 3;

const PREFERRED_IVR_SCORE: i32 = 30;
const MIN_IVR_SCORE: i32 = 20;
const BELOW_EMA_SCORE: i32 = 15;
const OVERBOUGHT_SCORE: i32 = 10;
const EARNINGS_PENALTY: i32 = 50;
const RSI_OVERBOUGHT: f64 = 65.0;

/// Scores tickers against a validated set of filters
#[derive(Debug, Clone)]
pub struct ScannerEngine {
    filters: ScannerFilters,
}

impl ScannerEngine {
    /// Rejects filters that break any configuration invariant
    pub fn new(filters: ScannerFilters) -> Result<Self> {
        let filters = filters.validated()?;
        Ok(Self { filters })
    }

    pub fn filters(&self) -> &ScannerFilters {
        &self.filters
    }

    /// Scan as of today
    pub fn scan_tickers(
        &self,
        tickers: &[Ticker],
        market_data: &HashMap<Ticker, MarketDataSnapshot>,
    ) -> Vec<ScannerResult> {
        self.scan_tickers_at(tickers, market_data, Utc::now().date_naive())
    }

    /// Results sorted by descending score; equal scores keep input order
    pub fn scan_tickers_at(
        &self,
        tickers: &[Ticker],
        market_data: &HashMap<Ticker, MarketDataSnapshot>,
        today: NaiveDate,
    ) -> Vec<ScannerResult> {
        let mut results: Vec<ScannerResult> = tickers
            .iter()
            .map(|ticker| match market_data.get(ticker) {
                Some(snapshot) => self.evaluate_ticker(ticker, snapshot, today),
                None => {
                    debug!(%ticker, "No market data for ticker");
                    ScannerResult {
                        ticker: ticker.clone(),
                        market_data: MarketDataSnapshot::placeholder(ticker.clone()),
                        passes: false,
                        score: 0,
                        reasons: vec![REASON_NO_MARKET_DATA.to_string()],
                        recommendations: Vec::new(),
                    }
                }
            })
            .collect();

        results.sort_by_key(|result| Reverse(result.score));

        info!(
            scanned = results.len(),
            passed = results.iter().filter(|r| r.passes).count(),
            "Scan complete"
        );

        results
    }

    fn evaluate_ticker(
        &self,
        ticker: &Ticker,
        snapshot: &MarketDataSnapshot,
        today: NaiveDate,
    ) -> ScannerResult {
        let mut reasons = Vec::new();
        let mut recommendations = Vec::new();
        let mut score = 0;

        if !snapshot.has_valid_price() {
            debug!(%ticker, price = snapshot.price, "Rejected ticker without a usable price");
            return ScannerResult {
                ticker: ticker.clone(),
                market_data: snapshot.clone(),
                passes: false,
                score: 0,
                reasons: vec![REASON_INVALID_PRICE.to_string()],
                recommendations,
            };
        }

        match snapshot.iv_rank {
            Some(ivr) if ivr >= self.filters.preferred_ivr => score += PREFERRED_IVR_SCORE,
            Some(ivr) if ivr >= self.filters.min_ivr => {
                score += MIN_IVR_SCORE;
                reasons.push(format!(
                    "IVR {:.1}% acceptable but not optimal (prefer >= {}%)",
                    ivr, self.filters.preferred_ivr
                ));
            }
            Some(ivr) => reasons.push(format!(
                "IVR {:.1}% too low (need >= {}%)",
                ivr, self.filters.min_ivr
            )),
            None => reasons.push(REASON_NO_IVR.to_string()),
        }

        match (snapshot.ema10, snapshot.rsi14) {
            (Some(ema10), Some(rsi14)) => {
                if snapshot.price < ema10 {
                    score += BELOW_EMA_SCORE;
                    recommendations.push("consider call spreads, price below 10-EMA".to_string());
                } else if rsi14 > RSI_OVERBOUGHT {
                    score += OVERBOUGHT_SCORE;
                    recommendations.push("consider put spreads, RSI overbought".to_string());
                } else {
                    reasons.push(REASON_NEUTRAL_TREND.to_string());
                }
            }
            _ => reasons.push(REASON_NO_INDICATORS.to_string()),
        }

        if earnings_in_window(snapshot, today).is_some() {
            reasons.push(REASON_EARNINGS.to_string());
            score -= EARNINGS_PENALTY;
        }

        let passes = score >= PASS_SCORE && reasons.len() <= MAX_REASONS;

        if passes {
            recommendations.push(format!(
                "Strong candidate for {}-wide spreads",
                self.filters.spread_width
            ));
            recommendations.push(format!("Target delta around {}", self.filters.target_delta));
            recommendations.push(format!("Look for {} credit", self.credit_band()));
        }

        debug!(%ticker, score, passes, reasons = reasons.len(), "Evaluated ticker");

        ScannerResult {
            ticker: ticker.clone(),
            market_data: snapshot.clone(),
            passes,
            score,
            reasons,
            recommendations,
        }
    }

    /// Narrative summary for a scan result
    pub fn generate_recommendations(&self, result: &ScannerResult) -> Vec<String> {
        if !result.passes {
            return vec!["does not meet criteria".to_string()];
        }

        let data = &result.market_data;
        let mut recommendations = vec!["meets basic criteria".to_string()];

        if data.iv_rank.is_some_and(|ivr| ivr >= self.filters.preferred_ivr) {
            recommendations.push("high IVR, excellent for premium selling".to_string());
        }
        if data.ema10.is_some_and(|ema| data.price < ema) {
            recommendations.push("price below 10-EMA, good for call spreads".to_string());
        }
        if data.rsi14.is_some_and(|rsi| rsi > RSI_OVERBOUGHT) {
            recommendations.push("RSI overbought, good for put spreads".to_string());
        }

        recommendations.push(format!("target {}-wide spreads", self.filters.spread_width));
        recommendations.push(format!("look for {} credit", self.credit_band()));
        recommendations
    }

    /// Credit band as whole percentages, e.g. "5-7%"
    fn credit_band(&self) -> String {
        format!(
            "{}-{}%",
            as_percent(self.filters.min_credit_percent),
            as_percent(self.filters.max_credit_percent)
        )
    }
}

/// Fraction to percentage, rounded to two decimals
fn as_percent(fraction: f64) -> f64 {
    (fraction * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Days;
    use crate::EngineError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn engine() -> ScannerEngine {
        ScannerEngine::new(ScannerFilters::default()).unwrap()
    }

    fn scan(snapshots: Vec<MarketDataSnapshot>) -> Vec<ScannerResult> {
        let tickers: Vec<Ticker> = snapshots.iter().map(|s| s.ticker.clone()).collect();
        let map = snapshots.into_iter().map(|s| (s.ticker.clone(), s)).collect();
        engine().scan_tickers_at(&tickers, &map, today())
    }

    fn trending(ticker: &str, ivr: f64) -> MarketDataSnapshot {
        MarketDataSnapshot::new(ticker, 150.0)
            .with_iv_rank(ivr)
            .with_ema10(155.0)
            .with_rsi14(50.0)
    }

    fn aapl() -> MarketDataSnapshot {
        trending("AAPL", 40.0)
    }

    #[test]
    fn test_rejects_invalid_filters() {
        let filters = ScannerFilters {
            max_dte: 3,
            ..ScannerFilters::default()
        };
        assert_matches!(ScannerEngine::new(filters), Err(EngineError::Config(_)));
    }

    #[test]
    fn test_strong_candidate() {
        let results = scan(vec![aapl()]);
        let result = &results[0];

        assert_eq!(result.score, 45);
        assert!(result.passes);
        assert!(result.reasons.is_empty());
        assert_eq!(
            result.recommendations,
            vec![
                "consider call spreads, price below 10-EMA".to_string(),
                "Strong candidate for 2.5-wide spreads".to_string(),
                "Target delta around 0.16".to_string(),
                "Look for 5-7% credit".to_string(),
            ]
        );
    }

    #[test]
    fn test_invalid_price() {
        let results = scan(vec![MarketDataSnapshot::new("XYZ", 0.0).with_iv_rank(80.0)]);

        assert_eq!(results[0].score, 0);
        assert!(!results[0].passes);
        assert_eq!(results[0].reasons, vec![REASON_INVALID_PRICE.to_string()]);
        assert!(results[0].recommendations.is_empty());
    }

    #[test]
    fn test_missing_snapshot() {
        let tickers = vec![Ticker::new("AAPL"), Ticker::new("GHOST")];
        let map = HashMap::from([(Ticker::new("AAPL"), aapl())]);

        let results = engine().scan_tickers_at(&tickers, &map, today());

        assert_eq!(results[0].ticker.as_str(), "AAPL");
        assert_eq!(results[1].ticker.as_str(), "GHOST");
        assert_eq!(results[1].score, 0);
        assert!(!results[1].passes);
        assert_eq!(results[1].reasons, vec![REASON_NO_MARKET_DATA.to_string()]);
        assert_eq!(results[1].market_data.price, 0.0);
    }

    #[test]
    fn test_ivr_tiers() {
        let acceptable = scan(vec![aapl().with_iv_rank(30.0)]);
        assert_eq!(acceptable[0].score, 35);
        assert!(acceptable[0].reasons[0].contains("acceptable but not optimal (prefer >= 35%)"));
        assert!(!acceptable[0].passes);

        let low = scan(vec![aapl().with_iv_rank(10.0)]);
        assert_eq!(low[0].score, 15);
        assert!(low[0].reasons[0].contains("too low (need >= 25%)"));

        let unknown = scan(vec![MarketDataSnapshot::new("AAPL", 150.0)
            .with_ema10(155.0)
            .with_rsi14(50.0)]);
        assert_eq!(unknown[0].score, 15);
        assert_eq!(unknown[0].reasons, vec![REASON_NO_IVR.to_string()]);
    }

    #[test]
    fn test_trend_tiers() {
        let overbought = scan(vec![aapl().with_ema10(140.0).with_rsi14(70.0)]);
        assert_eq!(overbought[0].score, 40);
        assert!(overbought[0].passes);
        assert_eq!(overbought[0].recommendations[0], "consider put spreads, RSI overbought");

        let neutral = scan(vec![aapl().with_ema10(140.0)]);
        assert_eq!(neutral[0].score, 30);
        assert_eq!(neutral[0].reasons, vec![REASON_NEUTRAL_TREND.to_string()]);

        let no_rsi = scan(vec![MarketDataSnapshot::new("AAPL", 150.0)
            .with_iv_rank(40.0)
            .with_ema10(155.0)]);
        assert_eq!(no_rsi[0].score, 30);
        assert_eq!(no_rsi[0].reasons, vec![REASON_NO_INDICATORS.to_string()]);
    }

    #[test]
    fn test_earnings_penalty() {
        let snapshot = aapl().with_earnings_date(today() + Days::new(10));
        let results = scan(vec![snapshot]);

        assert_eq!(results[0].score, 45 - 50);
        assert!(!results[0].passes);
        assert_eq!(results[0].reasons, vec![REASON_EARNINGS.to_string()]);
    }

    #[test]
    fn test_earnings_outside_window() {
        let soon = scan(vec![aapl().with_earnings_date(today() + Days::new(3))]);
        assert_eq!(soon[0].score, 45);

        let past = scan(vec![aapl().with_earnings_date(today() - Days::new(10))]);
        assert_eq!(past[0].score, 45);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let snapshots = vec![
            MarketDataSnapshot::new("LOW", 0.0),
            trending("TIE1", 30.0),
            trending("TOP", 40.0),
            trending("TIE2", 30.0),
            trending("TIE3", 30.0),
        ];

        let results = scan(snapshots);
        let order: Vec<&str> = results.iter().map(|r| r.ticker.as_str()).collect();

        assert_eq!(order, vec!["TOP", "TIE1", "TIE2", "TIE3", "LOW"]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_generate_recommendations() {
        let engine = engine();
        let results = scan(vec![aapl(), MarketDataSnapshot::new("XYZ", 0.0)]);

        assert_eq!(
            engine.generate_recommendations(&results[0]),
            vec![
                "meets basic criteria".to_string(),
                "high IVR, excellent for premium selling".to_string(),
                "price below 10-EMA, good for call spreads".to_string(),
                "target 2.5-wide spreads".to_string(),
                "look for 5-7% credit".to_string(),
            ]
        );
        assert_eq!(
            engine.generate_recommendations(&results[1]),
            vec!["does not meet criteria".to_string()]
        );
    }

    #[test]
    fn test_as_percent() {
        assert_eq!(as_percent(0.05), 5.0);
        assert_eq!(as_percent(0.07), 7.0);
        assert_eq!(as_percent(0.125), 12.5);
    }
}
