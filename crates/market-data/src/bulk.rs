//! Concurrent fetch for a batch of tickers
//!
//! Every ticker is requested at once. A failed request is logged and
//! replaced with a zero-price placeholder, which the scanner later scores
//! as "invalid or missing price data". The batch itself never fails.

use std::collections::HashMap;

use common::{MarketDataSnapshot, Ticker};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::{MarketDataError, MarketDataProvider};

/// Outcome of a bulk fetch
#[derive(Debug, Default)]
pub struct BulkFetch {
    /// One snapshot per requested ticker, in request order
    pub snapshots: Vec<MarketDataSnapshot>,
    /// Tickers whose snapshot is a placeholder, with the cause
    pub failures: Vec<(Ticker, MarketDataError)>,
}

impl BulkFetch {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Index snapshots by ticker for the scanner
    pub fn into_map(self) -> HashMap<Ticker, MarketDataSnapshot> {
        self.snapshots
            .into_iter()
            .map(|snapshot| (snapshot.ticker.clone(), snapshot))
            .collect()
    }
}

/// Fetch snapshots for all tickers concurrently
pub async fn fetch_bulk<P>(provider: &P, tickers: &[Ticker]) -> BulkFetch
where
    P: MarketDataProvider + ?Sized,
{
    let results = join_all(tickers.iter().map(|ticker| provider.market_data(ticker))).await;

    let mut fetch = BulkFetch::default();
    for (ticker, result) in tickers.iter().zip(results) {
        match result {
            Ok(snapshot) => fetch.snapshots.push(snapshot),
            Err(e) => {
                warn!(%ticker, error = %e, "Market data fetch failed, using placeholder");
                fetch.snapshots.push(MarketDataSnapshot::placeholder(ticker.clone()));
                fetch.failures.push((ticker.clone(), e));
            }
        }
    }

    debug!(
        requested = tickers.len(),
        failed = fetch.failures.len(),
        "Bulk market data fetch complete"
    );
    fetch
}
