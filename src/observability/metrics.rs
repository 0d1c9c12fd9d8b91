//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by outcome (`handled`, `not_found`, `rejected`)
//! - `router_fallbacks_total` (counter): handler declines that moved on to another rule
//! - `router_request_duration_seconds` (histogram): time spent in the switch
//! - `router_active_rules` (gauge): rules in the current switch

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::Dispatch;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record how a request left the switch.
pub fn record_dispatch(dispatch: &Dispatch<'_>, start: Instant) {
    let outcome = match dispatch {
        Dispatch::Handled { .. } => "handled",
        Dispatch::NotFound { .. } => "not_found",
    };
    counter!("router_requests_total", "outcome" => outcome).increment(1);
    let fallbacks = fallbacks(dispatch);
    if fallbacks > 0 {
        counter!("router_fallbacks_total").increment(fallbacks as u64);
    }
    histogram!("router_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Declines that passed the request on to another rule. The last decline
/// before a 404 has no rule left to pass to.
fn fallbacks(dispatch: &Dispatch<'_>) -> usize {
    match dispatch {
        Dispatch::Handled { rank, .. } => *rank,
        Dispatch::NotFound { declined } => declined.saturating_sub(1),
    }
}

/// Record a request refused before routing (e.g., body too large).
pub fn record_rejected() {
    counter!("router_requests_total", "outcome" => "rejected").increment(1);
}

/// Publish the number of rules in the active switch.
pub fn set_active_rules(count: usize) {
    gauge!("router_active_rules").set(count as f64);
}
