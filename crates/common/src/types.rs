//! Common types used across SpreadScan
//!
//! This module provides the market and option-chain snapshots that flow
//! from the data providers into the trade engine. Optional indicator fields
//! are `Option<f64>` so that "unknown" is never confused with zero.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Option side of a vertical spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    /// Call options
    Call,
    /// Put options
    Put,
}

impl OptionSide {
    /// Returns true for the call side
    pub fn is_call(&self) -> bool {
        matches!(self, OptionSide::Call)
    }

    /// Returns true for the put side
    pub fn is_put(&self) -> bool {
        matches!(self, OptionSide::Put)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionSide::Call => "call",
            OptionSide::Put => "put",
        }
    }
}

impl std::fmt::Display for OptionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OptionSide {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "call" => Ok(OptionSide::Call),
            "put" => Ok(OptionSide::Put),
            other => Err(format!("unknown option side: {}", other)),
        }
    }
}

/// Underlying ticker symbol (e.g., "AAPL", "SPY")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Create a new Ticker, normalised to upper case
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Get the ticker as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}

impl std::borrow::Borrow<str> for Ticker {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Point-in-time market data for one underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataSnapshot {
    pub ticker: Ticker,
    /// Last price; zero marks a placeholder for a failed fetch
    pub price: f64,
    #[serde(default)]
    pub implied_vol: Option<f64>,
    /// Implied-volatility rank, 0-100
    #[serde(default)]
    pub iv_rank: Option<f64>,
    #[serde(default)]
    pub ema10: Option<f64>,
    /// 14-period RSI, 0-100
    #[serde(default)]
    pub rsi14: Option<f64>,
    #[serde(default)]
    pub earnings_date: Option<NaiveDate>,
    #[serde(default = "Utc::now")]
    pub observed_at: DateTime<Utc>,
}

impl MarketDataSnapshot {
    /// Create a snapshot with only a price; indicators are unknown
    pub fn new(ticker: impl Into<Ticker>, price: f64) -> Self {
        Self {
            ticker: ticker.into(),
            price,
            implied_vol: None,
            iv_rank: None,
            ema10: None,
            rsi14: None,
            earnings_date: None,
            observed_at: Utc::now(),
        }
    }

    /// Zero-price stand-in used when a fetch for `ticker` fails
    pub fn placeholder(ticker: impl Into<Ticker>) -> Self {
        Self::new(ticker, 0.0)
    }

    pub fn with_implied_vol(mut self, iv: f64) -> Self {
        self.implied_vol = Some(iv);
        self
    }

    pub fn with_iv_rank(mut self, ivr: f64) -> Self {
        self.iv_rank = Some(ivr);
        self
    }

    pub fn with_ema10(mut self, ema10: f64) -> Self {
        self.ema10 = Some(ema10);
        self
    }

    pub fn with_rsi14(mut self, rsi14: f64) -> Self {
        self.rsi14 = Some(rsi14);
        self
    }

    pub fn with_earnings_date(mut self, date: NaiveDate) -> Self {
        self.earnings_date = Some(date);
        self
    }

    pub fn with_observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = at;
        self
    }

    /// True when the price can be used for scoring
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    /// Signed calendar days from `today` to the earnings date, if known
    pub fn days_to_earnings(&self, today: NaiveDate) -> Option<i64> {
        self.earnings_date
            .map(|date| date.signed_duration_since(today).num_days())
    }

    /// Check the documented ranges of the provider-supplied fields
    pub fn validate(&self) -> crate::Result<()> {
        if self.ticker.is_empty() {
            return Err(crate::Error::invalid_input("ticker is empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(crate::Error::invalid_input(format!(
                "{}: price must be a non-negative number, got {}",
                self.ticker, self.price
            )));
        }
        if let Some(ivr) = self.iv_rank {
            if !(0.0..=100.0).contains(&ivr) {
                return Err(crate::Error::invalid_input(format!(
                    "{}: iv_rank must be between 0 and 100, got {}",
                    self.ticker, ivr
                )));
            }
        }
        if let Some(rsi) = self.rsi14 {
            if !(0.0..=100.0).contains(&rsi) {
                return Err(crate::Error::invalid_input(format!(
                    "{}: rsi14 must be between 0 and 100, got {}",
                    self.ticker, rsi
                )));
            }
        }
        Ok(())
    }
}

/// Quote and greeks for one option contract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
    /// Signed delta as supplied by the provider
    pub delta: f64,
    #[serde(default)]
    pub gamma: f64,
    /// Signed theta as supplied by the provider
    #[serde(default)]
    pub theta: f64,
    #[serde(default)]
    pub vega: f64,
    #[serde(default)]
    pub implied_vol: f64,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub open_interest: u64,
}

impl OptionQuote {
    /// Minimal quote with zeroed secondary greeks
    pub fn new(strike: f64, bid: f64, ask: f64, delta: f64) -> Self {
        Self {
            strike,
            bid,
            ask,
            delta,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            implied_vol: 0.0,
            volume: 0,
            open_interest: 0,
        }
    }

    /// Mid price `(bid + ask) / 2`
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    pub fn validate(&self) -> crate::Result<()> {
        let non_negative = [
            ("strike", self.strike),
            ("bid", self.bid),
            ("ask", self.ask),
            ("gamma", self.gamma),
            ("vega", self.vega),
            ("implied_vol", self.implied_vol),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::Error::invalid_input(format!(
                    "strike {}: {} must be non-negative, got {}",
                    self.strike, field, value
                )));
            }
        }
        if !self.delta.is_finite() || !self.theta.is_finite() {
            return Err(crate::Error::invalid_input(format!(
                "strike {}: greeks must be finite",
                self.strike
            )));
        }
        Ok(())
    }
}

/// One expiry of an option chain, quotes kept in provider order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChainSnapshot {
    pub ticker: Ticker,
    pub expiry: NaiveDate,
    #[serde(default)]
    pub calls: Vec<OptionQuote>,
    #[serde(default)]
    pub puts: Vec<OptionQuote>,
}

impl OptionChainSnapshot {
    pub fn new(ticker: impl Into<Ticker>, expiry: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            expiry,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Quotes for the requested side, in chain order
    pub fn quotes(&self, side: OptionSide) -> &[OptionQuote] {
        match side {
            OptionSide::Call => &self.calls,
            OptionSide::Put => &self.puts,
        }
    }

    pub fn days_to_expiry(&self, today: NaiveDate) -> i64 {
        self.expiry.signed_duration_since(today).num_days()
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.calls
            .iter()
            .chain(self.puts.iter())
            .try_for_each(|quote| quote.validate())
    }
}
