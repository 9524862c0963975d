//! Market data error types

use thiserror::Error;

/// Errors that can occur while fetching market data
///
/// Every per-ticker variant names the ticker it failed for.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Transport failure talking to the provider
    #[error("Connection error for {ticker}: {message}")]
    Connection { ticker: String, message: String },

    /// Provider answered with an error status or unusable body
    #[error("Provider error for {ticker}: {message}")]
    Provider { ticker: String, message: String },

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Provider has nothing for this request
    #[error("Data not available for {ticker}: {message}")]
    DataNotAvailable { ticker: String, message: String },

    /// Fixture file could not be read or parsed
    #[error("Fixture error: {0}")]
    Fixture(String),
}

impl MarketDataError {
    pub fn not_available(ticker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataNotAvailable {
            ticker: ticker.into(),
            message: message.into(),
        }
    }

    /// Ticker the failure relates to, when there is one
    pub fn ticker(&self) -> Option<&str> {
        match self {
            MarketDataError::Connection { ticker, .. }
            | MarketDataError::Provider { ticker, .. }
            | MarketDataError::DataNotAvailable { ticker, .. } => Some(ticker),
            MarketDataError::InvalidSymbol(symbol) => Some(symbol),
            MarketDataError::Fixture(_) => None,
        }
    }
}
