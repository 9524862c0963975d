//! Trade journal
//!
//! Records recommended trades as they are opened and closed, and derives
//! summary statistics from the log.

pub mod entry;
pub mod memory;
pub mod traits;

pub use entry::{TradeLogEntry, TradeStatus};
pub use memory::InMemoryTradeStore;
pub use traits::TradeStore;

use serde::{Deserialize, Serialize};

/// Summary over a set of journal entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalStats {
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub winning_trades: usize,
    /// Winning share of closed trades, 0-100; zero when nothing is closed
    pub win_rate: f64,
    pub total_pnl: f64,
    /// Round-trip fees across every trade
    pub total_fees: f64,
}

impl JournalStats {
    pub fn from_entries(entries: &[TradeLogEntry]) -> Self {
        let closed: Vec<&TradeLogEntry> = entries
            .iter()
            .filter(|entry| entry.status == TradeStatus::Closed)
            .collect();

        let winning_trades = closed
            .iter()
            .filter(|entry| entry.pnl.is_some_and(|pnl| pnl > 0.0))
            .count();

        let win_rate = if closed.is_empty() {
            0.0
        } else {
            winning_trades as f64 / closed.len() as f64 * 100.0
        };

        Self {
            total_trades: entries.len(),
            open_trades: entries.len() - closed.len(),
            closed_trades: closed.len(),
            winning_trades,
            win_rate,
            total_pnl: closed.iter().filter_map(|entry| entry.pnl).sum(),
            total_fees: entries.iter().map(|entry| entry.fees_round_trip).sum(),
        }
    }
}
