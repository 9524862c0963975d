use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::EngineError;
use crate::journal::{TradeLogEntry, TradeStore};
use crate::Result;

#[derive(Default)]
pub struct InMemoryTradeStore {
    entries: RwLock<Vec<TradeLogEntry>>,
}

impl InMemoryTradeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TradeStore for InMemoryTradeStore {
    async fn append(&self, entry: TradeLogEntry) -> Result<()> {
        info!(id = %entry.id, ticker = %entry.ticker, strategy = %entry.strategy, "Trade logged");
        self.entries.write().push(entry);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TradeLogEntry>> {
        Ok(self.entries.read().iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<TradeLogEntry>> {
        Ok(self.entries.read().clone())
    }

    async fn close(
        &self,
        id: Uuid,
        exit_price: f64,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<TradeLogEntry> {
        let mut entries = self.entries.write();
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EngineError::TradeNotFound(id))?;

        entry.close(exit_price, notes, at)?;
        info!(%id, exit_price, pnl = ?entry.pnl, "Trade closed");
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::FeeModel;
    use crate::journal::{JournalStats, TradeStatus};
    use crate::recommend::{recommend_trade, TradeRecommendationRequest};
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use common::{OptionChainSnapshot, OptionQuote, OptionSide, Ticker};
    use config::OcoConfig;

    fn entry() -> TradeLogEntry {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut chain =
            OptionChainSnapshot::new("AAPL", NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
        chain.calls = vec![
            OptionQuote::new(160.0, 0.95, 1.05, 0.16),
            OptionQuote::new(162.5, 0.60, 0.70, 0.11),
        ];
        let request = TradeRecommendationRequest {
            ticker: Ticker::new("AAPL"),
            side: OptionSide::Call,
            dte: 8,
            target_delta: 0.16,
            width: 2.5,
        };
        let rec = recommend_trade(&chain, &request, &FeeModel::default(), &OcoConfig::default(), today)
            .unwrap();

        TradeLogEntry::from_recommendation(&rec, Utc::now())
            .with_provider("static")
            .with_account("paper")
    }

    #[tokio::test]
    async fn test_append_get_list() {
        let store = InMemoryTradeStore::new();
        let first = entry();
        let second = entry();

        store.append(first.clone()).await.unwrap();
        store.append(second.clone()).await.unwrap();

        assert_eq!(store.get(first.id).await.unwrap(), Some(first.clone()));
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].id, second.id);
        assert_eq!(all[0].strategy, "bear call spread");
        assert_eq!(all[0].short_strike, 160.0);
        assert_eq!(all[0].long_strike, 162.5);
        assert_eq!(all[0].provider, "static");
    }

    #[tokio::test]
    async fn test_close_trade() {
        let store = InMemoryTradeStore::new();
        let trade = entry();
        let id = trade.id;
        store.append(trade.clone()).await.unwrap();

        let closed = store
            .close(id, 0.10, Some("took profit".to_string()), Utc::now())
            .await
            .unwrap();

        assert_eq!(closed.status, TradeStatus::Closed);
        assert_eq!(closed.exit_price, Some(0.10));
        assert_eq!(closed.notes.as_deref(), Some("took profit"));
        let expected = trade.credit - 0.10 - trade.fees_round_trip;
        assert!((closed.pnl.unwrap() - expected).abs() < 1e-12);

        assert_matches!(
            store.close(id, 0.05, None, Utc::now()).await,
            Err(EngineError::TradeAlreadyClosed(closed_id)) if closed_id == id
        );
        assert_matches!(
            store.close(Uuid::new_v4(), 0.05, None, Utc::now()).await,
            Err(EngineError::TradeNotFound(_))
        );
    }

    #[tokio::test]
    async fn test_stats() {
        let store = InMemoryTradeStore::new();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let trade = entry();
            ids.push(trade.id);
            store.append(trade).await.unwrap();
        }

        // Net credit 0.35 less 2.6 of fees cannot win on a single contract
        store.close(ids[0], 0.0, None, Utc::now()).await.unwrap();

        let stats = JournalStats::from_entries(&store.list().await.unwrap());
        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.open_trades, 2);
        assert_eq!(stats.closed_trades, 1);
        assert_eq!(stats.winning_trades, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert!(stats.total_pnl < 0.0);
        assert!(stats.total_fees > 0.0);
    }

    #[test]
    fn test_stats_win_rate() {
        let mut winner = entry();
        winner.fees_round_trip = 0.0;
        winner.close(0.05, None, Utc::now()).unwrap();

        let mut loser = entry();
        loser.close(1.0, None, Utc::now()).unwrap();

        let stats = JournalStats::from_entries(&[winner, loser, entry()]);
        assert_eq!(stats.closed_trades, 2);
        assert_eq!(stats.winning_trades, 1);
        assert_eq!(stats.win_rate, 50.0);

        assert_eq!(JournalStats::from_entries(&[]), JournalStats::default());
    }
}
