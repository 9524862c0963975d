//! Observability for SpreadScan
//!
//! - [`logging`] - `tracing` subscriber setup, logs to stderr
//! - [`metrics`] - Prometheus exporter and scan counters
//!
//! Both are initialised once by the binary. Library crates only emit
//! `tracing` events; metrics are recorded at the binary boundary.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat, DEFAULT_DIRECTIVES};
pub use metrics::{init_metrics, ScanMetrics};
