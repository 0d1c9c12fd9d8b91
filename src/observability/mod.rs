//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP layer and switch produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - The routing core only emits trace-level events; outcomes are logged
//!   and counted by the HTTP layer
//! - Metrics are cheap (atomic increments); recording without an installed
//!   exporter is a no-op

pub mod logging;
pub mod metrics;
