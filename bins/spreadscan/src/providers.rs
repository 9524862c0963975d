//! Provider wiring from configuration

use std::sync::Arc;

use anyhow::{Context, Result};
use config::{MarketDataProviderKind, MarketDataSettings};
use market_data::{MarketDataProvider, OptionChainProvider, StaticMarketData};
use tracing::info;

/// Data sources handed to the engine's boundary functions
pub struct Providers {
    pub market: Arc<dyn MarketDataProvider>,
    /// Absent when the configured source has no option chains
    pub chains: Option<Arc<dyn OptionChainProvider>>,
}

impl Providers {
    pub fn from_settings(settings: &MarketDataSettings) -> Result<Self> {
        info!(provider = settings.provider.as_str(), "Configuring market data provider");

        match settings.provider {
            MarketDataProviderKind::Static => {
                let path = settings
                    .fixture_path
                    .as_deref()
                    .context("market_data.fixture_path is required for the static provider")?;
                let fixture = Arc::new(
                    StaticMarketData::from_file(path)
                        .with_context(|| format!("Failed to load fixture {}", path))?,
                );
                Ok(Self {
                    market: fixture.clone(),
                    chains: Some(fixture),
                })
            }
            MarketDataProviderKind::Polygon => polygon(settings),
        }
    }
}

#[cfg(feature = "polygon")]
fn polygon(settings: &MarketDataSettings) -> Result<Providers> {
    let api_key = settings
        .api_key
        .as_deref()
        .context("market_data.api_key is required for the polygon provider")?;

    Ok(Providers {
        market: Arc::new(market_data::PolygonClient::new(&settings.base_url, api_key)),
        chains: None,
    })
}

#[cfg(not(feature = "polygon"))]
fn polygon(_settings: &MarketDataSettings) -> Result<Providers> {
    anyhow::bail!("spreadscan was built without the `polygon` feature")
}
