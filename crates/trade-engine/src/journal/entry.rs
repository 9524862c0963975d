use chrono::{DateTime, NaiveDate, Utc};
use common::{OptionSide, Ticker};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::pnl::calculate_pnl;
use crate::recommend::TradeRecommendation;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// One journaled trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLogEntry {
    pub id: Uuid,
    pub ticker: Ticker,
    pub side: OptionSide,
    pub strategy: String,
    pub expiry: NaiveDate,
    pub dte: i64,
    pub short_strike: f64,
    pub long_strike: f64,
    pub width: f64,
    pub credit: f64,
    pub oco_take_profit: f64,
    pub oco_stop_loss: f64,
    pub delta_short: f64,
    /// Data source the trade was priced from
    pub provider: String,
    pub account: String,
    pub notes: Option<String>,
    pub status: TradeStatus,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub exit_price: Option<f64>,
    pub pnl: Option<f64>,
    pub fees_entry: f64,
    pub fees_exit: f64,
    pub fees_round_trip: f64,
}

impl TradeLogEntry {
    /// Open a trade from a recommendation
    pub fn from_recommendation(rec: &TradeRecommendation, opened_at: DateTime<Utc>) -> Self {
        let spread = &rec.spread;
        Self {
            id: Uuid::new_v4(),
            ticker: spread.ticker.clone(),
            side: spread.side,
            strategy: spread.strategy().to_string(),
            expiry: spread.expiry,
            dte: rec.dte,
            short_strike: spread.short_leg.strike,
            long_strike: spread.long_leg.strike,
            width: spread.width,
            credit: spread.net_credit,
            oco_take_profit: rec.oco.take_profit,
            oco_stop_loss: rec.oco.stop_loss,
            delta_short: spread.short_leg.delta,
            provider: String::new(),
            account: String::new(),
            notes: None,
            status: TradeStatus::Open,
            opened_at,
            closed_at: None,
            exit_price: None,
            pnl: None,
            fees_entry: rec.fees.entry.total,
            fees_exit: rec.fees.exit.total,
            fees_round_trip: rec.fees.round_trip.total,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Close at `exit_price`, charging the round-trip fees for one spread
    pub fn close(&mut self, exit_price: f64, notes: Option<String>, at: DateTime<Utc>) -> Result<()> {
        if !self.is_open() {
            return Err(EngineError::TradeAlreadyClosed(self.id));
        }

        self.status = TradeStatus::Closed;
        self.closed_at = Some(at);
        self.exit_price = Some(exit_price);
        self.pnl = Some(calculate_pnl(self.credit, exit_price, self.fees_round_trip, 1));
        if notes.is_some() {
            self.notes = notes;
        }
        Ok(())
    }
}
