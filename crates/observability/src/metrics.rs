//! Prometheus metrics infrastructure
//!
//! Metrics are recorded at the application boundary; the trade engine
//! itself stays free of side effects.

use metrics::{counter, histogram, Counter, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Initialize the Prometheus metrics exporter
///
/// Starts an HTTP listener exposing `/metrics` on the given port.
///
/// ```ignore
/// observability::metrics::init_metrics(9090)?;
/// // Metrics available at http://localhost:9090/metrics
/// ```
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Screening and construction metrics
///
/// # Metrics
///
/// * `scanner_tickers_scanned_total` - Tickers evaluated by the scanner
/// * `scanner_tickers_passed_total` - Tickers that met the screening criteria
/// * `scanner_scan_duration_seconds` - Wall time of a full scan, fetch included
/// * `spread_build_failures_total{reason}` - Rejected spread constructions
/// * `market_data_fetch_failures_total` - Fetches replaced by a placeholder
#[derive(Clone)]
pub struct ScanMetrics {
    tickers_scanned: Counter,
    tickers_passed: Counter,
    scan_duration: Histogram,
    fetch_failures: Counter,
    component: String,
}

impl ScanMetrics {
    /// Create metrics labelled with the calling component (e.g. "cli")
    pub fn new(component: &str) -> Self {
        let name = component.to_string();

        Self {
            tickers_scanned: counter!("scanner_tickers_scanned_total", "component" => name.clone()),
            tickers_passed: counter!("scanner_tickers_passed_total", "component" => name.clone()),
            scan_duration: histogram!("scanner_scan_duration_seconds", "component" => name.clone()),
            fetch_failures: counter!("market_data_fetch_failures_total", "component" => name.clone()),
            component: name,
        }
    }

    /// Record one completed scan
    pub fn record_scan(&self, duration: Duration, scanned: usize, passed: usize) {
        self.tickers_scanned.increment(scanned as u64);
        self.tickers_passed.increment(passed as u64);
        self.scan_duration.record(duration.as_secs_f64());
    }

    pub fn record_fetch_failures(&self, count: usize) {
        self.fetch_failures.increment(count as u64);
    }

    /// Record a spread that could not be built, keyed by failure kind
    pub fn record_spread_failure(&self, reason: &'static str) {
        counter!(
            "spread_build_failures_total",
            "component" => self.component.clone(),
            "reason" => reason
        )
        .increment(1);
    }

    pub fn component(&self) -> &str {
        &self.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_metrics_without_recorder() {
        // No recorder installed: every call is a no-op
        let metrics = ScanMetrics::new("test");
        metrics.record_scan(Duration::from_millis(5), 3, 1);
        metrics.record_fetch_failures(1);
        metrics.record_spread_failure("no_matching_long_leg");
        assert_eq!(metrics.component(), "test");
    }
}
