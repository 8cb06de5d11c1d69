//! Metrics collection and exposition.
//!
//! # Metrics
//! - `oracle_records_dispatched_total` (counter): record transactions handed to the dispatcher
//! - `oracle_submissions_total` (counter): submissions by `result` (`ok`, `error`)
//! - `oracle_balance_und` (gauge): operator balance at the last check
//! - `oracle_rpc_retries_total` (counter): transient RPC failures retried, by `op`
//!
//! Without an installed exporter the macros are no-ops, so recording is always safe.

use alloy::primitives::U256;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::error::format_und;

/// Install the Prometheus exporter with an HTTP scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_dispatched() {
    ::metrics::counter!("oracle_records_dispatched_total").increment(1);
}

/// Count one submission outcome.
pub fn record_submission(success: bool) {
    let result = if success { "ok" } else { "error" };
    ::metrics::counter!("oracle_submissions_total", "result" => result).increment(1);
}

pub fn record_balance(balance: &U256) {
    let und = format_und(balance).parse::<f64>().unwrap_or(f64::MAX);
    ::metrics::gauge!("oracle_balance_und").set(und);
}

pub fn record_retry(op: &'static str) {
    ::metrics::counter!("oracle_rpc_retries_total", "op" => op).increment(1);
}
