//! Market Data Providers for SpreadScan
//!
//! This crate is the boundary between the trade engine and the outside
//! world. It defines the collaborator contracts the engine consumes and
//! ships the providers the CLI can wire in.
//!
//! # Core Components
//!
//! - [`provider`] - `MarketDataProvider` / `OptionChainProvider` traits
//! - [`bulk`] - Concurrent, fail-open snapshot fetch for a ticker batch
//! - [`static_provider`] - Snapshots and chains from a JSON fixture
//! - `polygon` - Polygon.io last-trade client (feature `polygon`)
//!
//! # Key Invariants
//!
//! - One ticker's failed fetch never aborts a batch; it degrades to a
//!   zero-price placeholder snapshot for that ticker only
//! - Providers hand out immutable snapshots; nothing downstream mutates them
//! - No retries or timeouts are applied here beyond the HTTP client's own

pub mod bulk;
pub mod error;
#[cfg(feature = "polygon")]
pub mod polygon;
pub mod provider;
pub mod static_provider;

pub use bulk::{fetch_bulk, BulkFetch};
pub use error::MarketDataError;
#[cfg(feature = "polygon")]
pub use polygon::PolygonClient;
pub use provider::{nearest_expiry_on_or_after, MarketDataProvider, OptionChainProvider};
pub use static_provider::StaticMarketData;

pub type Result<T> = std::result::Result<T, MarketDataError>;
