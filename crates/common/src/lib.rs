//! Common types and utilities for SpreadScan
//!
//! This crate provides the shared snapshot types consumed by every other
//! SpreadScan crate. Snapshots are produced by a data provider and are
//! read-only from then on.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Shared domain types (Ticker, OptionSide, MarketDataSnapshot, OptionChainSnapshot)

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
