//! Polygon.io last-trade client
//!
//! Only the last trade price is fetched. Indicator fields stay unknown, so
//! the scanner reports them as missing rather than scoring them.

use async_trait::async_trait;
use common::{MarketDataSnapshot, Ticker};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{MarketDataError, MarketDataProvider, Result};

#[derive(Debug, Deserialize)]
struct LastTradeResponse {
    #[serde(default)]
    results: Option<LastTrade>,
}

#[derive(Debug, Deserialize)]
struct LastTrade {
    #[serde(default)]
    p: Option<f64>,
}

/// Extract the last trade price from a `/v2/last/trade` response body
pub fn parse_last_trade(ticker: &Ticker, body: &str) -> Result<f64> {
    let response: LastTradeResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::Provider {
            ticker: ticker.to_string(),
            message: format!("invalid response: {}", e),
        })?;

    response
        .results
        .and_then(|trade| trade.p)
        .ok_or_else(|| MarketDataError::not_available(ticker.as_str(), "no last trade"))
}

pub struct PolygonClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PolygonClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn last_trade_url(&self, ticker: &Ticker) -> String {
        format!("{}/v2/last/trade/{}", self.base_url, ticker)
    }
}

#[async_trait]
impl MarketDataProvider for PolygonClient {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn market_data(&self, ticker: &Ticker) -> Result<MarketDataSnapshot> {
        let connection_error = |e: reqwest::Error| MarketDataError::Connection {
            ticker: ticker.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(self.last_trade_url(ticker))
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::Provider {
                ticker: ticker.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await.map_err(connection_error)?;
        let price = parse_last_trade(ticker, &body)?;
        debug!(price, "Fetched last trade");

        Ok(MarketDataSnapshot::new(ticker.clone(), price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_last_trade() {
        let ticker = Ticker::new("AAPL");
        let body = r#"{"status":"OK","results":{"T":"AAPL","p":189.37,"s":100}}"#;
        assert_eq!(parse_last_trade(&ticker, body).unwrap(), 189.37);
    }

    #[test]
    fn test_parse_last_trade_without_results() {
        let ticker = Ticker::new("AAPL");
        assert_matches!(
            parse_last_trade(&ticker, r#"{"status":"NOT_FOUND"}"#),
            Err(MarketDataError::DataNotAvailable { .. })
        );
        assert_matches!(
            parse_last_trade(&ticker, "not json"),
            Err(MarketDataError::Provider { .. })
        );
    }

    #[test]
    fn test_url_building() {
        let client = PolygonClient::new("https://api.polygon.io/", "key");
        assert_eq!(
            client.last_trade_url(&Ticker::new("spy")),
            "https://api.polygon.io/v2/last/trade/SPY"
        );
    }
}
