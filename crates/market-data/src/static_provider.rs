//! Fixture-backed provider
//!
//! Serves snapshots and chains loaded once from a JSON document:
//!
//! ```json
//! {
//!   "market_data": [{ "ticker": "AAPL", "price": 150.0, "iv_rank": 40.0 }],
//!   "chains": [{ "ticker": "AAPL", "expiry": "2024-03-15", "calls": [], "puts": [] }]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{MarketDataSnapshot, OptionChainSnapshot, Ticker};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{MarketDataError, MarketDataProvider, OptionChainProvider, Result};

#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    market_data: Vec<MarketDataSnapshot>,
    #[serde(default)]
    chains: Vec<OptionChainSnapshot>,
}

/// In-memory provider for fixtures, demos and tests
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    snapshots: HashMap<Ticker, MarketDataSnapshot>,
    chains: HashMap<Ticker, BTreeMap<NaiveDate, OptionChainSnapshot>>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MarketDataError::Fixture(format!("failed to read {}: {}", path.display(), e))
        })?;

        let provider = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            tickers = provider.snapshots.len(),
            chains = provider.chain_count(),
            "Loaded market data fixture"
        );
        Ok(provider)
    }

    /// Parse a fixture document; every snapshot and chain is validated
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)
            .map_err(|e| MarketDataError::Fixture(format!("invalid fixture: {}", e)))?;

        let mut provider = Self::new();
        for snapshot in fixture.market_data {
            snapshot
                .validate()
                .map_err(|e| MarketDataError::Fixture(e.to_string()))?;
            provider = provider.with_snapshot(snapshot);
        }
        for chain in fixture.chains {
            chain.validate().map_err(|e| {
                MarketDataError::Fixture(format!("{} {}: {}", chain.ticker, chain.expiry, e))
            })?;
            provider = provider.with_chain(chain);
        }
        Ok(provider)
    }

    /// Add or replace a snapshot
    pub fn with_snapshot(mut self, snapshot: MarketDataSnapshot) -> Self {
        self.snapshots.insert(snapshot.ticker.clone(), snapshot);
        self
    }

    /// Add or replace the chain for its ticker and expiry
    pub fn with_chain(mut self, chain: OptionChainSnapshot) -> Self {
        self.chains
            .entry(chain.ticker.clone())
            .or_default()
            .insert(chain.expiry, chain);
        self
    }

    /// Tickers with a snapshot, sorted
    pub fn tickers(&self) -> Vec<Ticker> {
        let mut tickers: Vec<Ticker> = self.snapshots.keys().cloned().collect();
        tickers.sort();
        tickers
    }

    fn chain_count(&self) -> usize {
        self.chains.values().map(BTreeMap::len).sum()
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketData {
    async fn market_data(&self, ticker: &Ticker) -> Result<MarketDataSnapshot> {
        debug!(%ticker, "Serving fixture snapshot");
        self.snapshots
            .get(ticker)
            .cloned()
            .ok_or_else(|| MarketDataError::not_available(ticker.as_str(), "no snapshot in fixture"))
    }
}

#[async_trait]
impl OptionChainProvider for StaticMarketData {
    async fn option_chain(&self, ticker: &Ticker, expiry: NaiveDate) -> Result<OptionChainSnapshot> {
        self.chains
            .get(ticker)
            .and_then(|by_expiry| by_expiry.get(&expiry))
            .cloned()
            .ok_or_else(|| {
                MarketDataError::not_available(ticker.as_str(), format!("no chain for {}", expiry))
            })
    }

    async fn expirations(&self, ticker: &Ticker) -> Result<Vec<NaiveDate>> {
        Ok(self
            .chains
            .get(ticker)
            .map(|by_expiry| by_expiry.keys().copied().collect())
            .unwrap_or_default())
    }
}
