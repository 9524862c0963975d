//! Trade engine error types

use common::{OptionSide, Ticker};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while building or recording a trade
#[derive(Error, Debug)]
pub enum EngineError {
    /// Fewer than two quotes on the requested side of the chain
    #[error("Insufficient options for {ticker} {side} spread: {available} quotes, need at least 2")]
    InsufficientOptions {
        ticker: Ticker,
        side: OptionSide,
        available: usize,
    },

    /// No quote exactly `width` away from the short strike
    #[error("No long leg for {ticker} {side} spread: nothing exactly {width} from short strike {short_strike}")]
    NoMatchingLongLeg {
        ticker: Ticker,
        side: OptionSide,
        short_strike: f64,
        width: f64,
    },

    /// Spread width must be positive and finite
    #[error("Invalid spread width for {ticker} {side} spread: {width}")]
    InvalidWidth {
        ticker: Ticker,
        side: OptionSide,
        width: f64,
    },

    /// Invalid recommendation request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("Trade not found: {0}")]
    TradeNotFound(Uuid),

    #[error("Trade already closed: {0}")]
    TradeAlreadyClosed(Uuid),
}

impl EngineError {
    /// True for failures caused by a chain that cannot support the spread
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            EngineError::InsufficientOptions { .. } | EngineError::NoMatchingLongLeg { .. }
        )
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InsufficientOptions { .. } => "insufficient_options",
            EngineError::NoMatchingLongLeg { .. } => "no_matching_long_leg",
            EngineError::InvalidWidth { .. } => "invalid_width",
            EngineError::InvalidRequest(_) => "invalid_request",
            EngineError::Config(_) => "config",
            EngineError::TradeNotFound(_) => "trade_not_found",
            EngineError::TradeAlreadyClosed(_) => "trade_already_closed",
        }
    }
}
