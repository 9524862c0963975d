use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::journal::TradeLogEntry;
use crate::Result;

#[async_trait]
pub trait TradeStore: Send + Sync {
    async fn append(&self, entry: TradeLogEntry) -> Result<()>;

    async fn get(&self, id: Uuid) -> Result<Option<TradeLogEntry>>;

    /// Every entry in the order it was appended
    async fn list(&self) -> Result<Vec<TradeLogEntry>>;

    async fn close(
        &self,
        id: Uuid,
        exit_price: f64,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<TradeLogEntry>;
}
