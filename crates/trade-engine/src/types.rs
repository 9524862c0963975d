use chrono::NaiveDate;
use common::{MarketDataSnapshot, OptionQuote, OptionSide, Ticker};
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A vertical credit spread built from one chain expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub ticker: Ticker,
    pub side: OptionSide,
    pub expiry: NaiveDate,
    pub width: f64,
    pub short_leg: OptionQuote,
    pub long_leg: OptionQuote,
    /// Mid price received for the short leg
    pub credit: f64,
    /// Mid price paid for the long leg
    pub debit: f64,
    pub net_credit: f64,
    pub max_risk: f64,
    pub max_profit: f64,
    /// Net credit as a percentage of width
    pub credit_percent: f64,
    /// `max_profit / max_risk`; `None` when the spread carries no risk
    pub risk_reward_ratio: Option<f64>,
    pub breakeven: f64,
}

impl Spread {
    /// Inputs for the single-trade gate; delta is taken as a magnitude
    pub fn trade_data(&self, dte: i64) -> TradeData {
        TradeData {
            dte,
            delta: self.short_leg.delta.abs(),
            credit: self.net_credit,
            width: self.width,
            side: self.side,
        }
    }

    /// Conventional strategy name, e.g. "bear call spread"
    pub fn strategy(&self) -> &'static str {
        match self.side {
            OptionSide::Call => "bear call spread",
            OptionSide::Put => "bull put spread",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub commission: f64,
    pub clearing_fee: f64,
    pub regulatory_fees: f64,
    pub total: f64,
}

impl FeeBreakdown {
    pub fn new(commission: f64, clearing_fee: f64, regulatory_fees: f64) -> Self {
        Self {
            commission,
            clearing_fee,
            regulatory_fees,
            total: commission + clearing_fee + regulatory_fees,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

impl Add for FeeBreakdown {
    type Output = FeeBreakdown;

    fn add(self, rhs: FeeBreakdown) -> FeeBreakdown {
        FeeBreakdown {
            commission: self.commission + rhs.commission,
            clearing_fee: self.clearing_fee + rhs.clearing_fee,
            regulatory_fees: self.regulatory_fees + rhs.regulatory_fees,
            total: self.total + rhs.total,
        }
    }
}

/// Fees to open, close, and open-then-close a position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeFees {
    pub entry: FeeBreakdown,
    pub exit: FeeBreakdown,
    pub round_trip: FeeBreakdown,
}

impl TradeFees {
    pub fn new(entry: FeeBreakdown, exit: FeeBreakdown) -> Self {
        Self {
            entry,
            exit,
            round_trip: entry + exit,
        }
    }
}

/// One-cancels-other exit bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcoLevels {
    /// Debit at which to buy the spread back for profit
    pub take_profit: f64,
    /// Debit at which to buy the spread back for a loss
    pub stop_loss: f64,
    /// Calendar date to exit regardless of price
    pub time_stop: NaiveDate,
}

/// Outcome of scanning one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerResult {
    pub ticker: Ticker,
    pub market_data: MarketDataSnapshot,
    pub passes: bool,
    pub score: i32,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Candidate trade parameters checked by the single-trade gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeData {
    pub dte: i64,
    pub delta: f64,
    pub credit: f64,
    pub width: f64,
    pub side: OptionSide,
}

/// Verdict of the single-trade gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeValidation {
    pub passes: bool,
    pub reasons: Vec<String>,
    pub score: i32,
}
