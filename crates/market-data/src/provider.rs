//! Collaborator contracts consumed by the trade engine

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{MarketDataSnapshot, OptionChainSnapshot, Ticker};

use crate::Result;

/// Source of per-ticker market snapshots
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch the latest snapshot for one ticker
    async fn market_data(&self, ticker: &Ticker) -> Result<MarketDataSnapshot>;
}

/// Source of option chains
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionChainProvider: Send + Sync {
    /// Fetch the chain for one ticker and expiry
    async fn option_chain(&self, ticker: &Ticker, expiry: NaiveDate)
        -> Result<OptionChainSnapshot>;

    /// Listed expirations for a ticker, ascending
    async fn expirations(&self, ticker: &Ticker) -> Result<Vec<NaiveDate>>;
}

/// First expiry on or after `target`, from an ascending list
pub fn nearest_expiry_on_or_after(expirations: &[NaiveDate], target: NaiveDate) -> Option<NaiveDate> {
    expirations.iter().copied().find(|expiry| *expiry >= target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nearest_expiry() {
        let expirations = vec![date(2024, 3, 8), date(2024, 3, 15), date(2024, 3, 22)];

        assert_eq!(
            nearest_expiry_on_or_after(&expirations, date(2024, 3, 10)),
            Some(date(2024, 3, 15))
        );
        assert_eq!(
            nearest_expiry_on_or_after(&expirations, date(2024, 3, 15)),
            Some(date(2024, 3, 15))
        );
        assert_eq!(nearest_expiry_on_or_after(&expirations, date(2024, 4, 1)), None);
    }
}
