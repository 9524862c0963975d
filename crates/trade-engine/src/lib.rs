//! Trade Evaluation & Recommendation Engine for SpreadScan
//!
//! This crate turns market and option-chain snapshots into scored,
//! fully-priced credit spread candidates.
//!
//! # Core Components
//!
//! - [`fees`] - Per-leg fee schedule, entry/exit/round-trip breakdown
//! - [`pnl`] - Profit, loss and return-on-risk arithmetic
//! - [`spread`] - Delta-targeted vertical spread construction
//! - [`oco`] - Take-profit, stop-loss and time-stop exit levels
//! - [`rules`] - Single-trade gate (`validate_trade`)
//! - [`scanner`] - Batch ticker triage (`ScannerEngine`)
//! - [`recommend`] - Spread + fees + exits for one request
//! - [`journal`] - Trade log and its statistics
//!
//! Every component except the journal store is a pure function over
//! immutable snapshots. Functions that depend on the current date have an
//! `_at` variant taking `today` explicitly.

pub mod error;
pub mod fees;
pub mod journal;
pub mod oco;
pub mod pnl;
pub mod recommend;
pub mod rules;
pub mod scanner;
pub mod spread;
pub mod types;

pub use error::EngineError;
pub use fees::{compute_fees, FeeModel};
pub use journal::{InMemoryTradeStore, JournalStats, TradeLogEntry, TradeStatus, TradeStore};
pub use oco::{compute_oco_levels, compute_oco_levels_at};
pub use recommend::{expiry_for_dte, recommend_trade, TradeRecommendation, TradeRecommendationRequest};
pub use rules::{validate_trade, validate_trade_at};
pub use scanner::ScannerEngine;
pub use spread::build_spread;
pub use types::*;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
