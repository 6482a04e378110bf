//! hottrack-telemetry - Prometheus metrics for the hot-tracking engine
//!
//! Provides:
//! - `HotTrackMetrics`: Prometheus counters, gauges, and histograms covering
//!   the size account, ingress rate, eviction activity, and bucket
//!   occupancy.
//! - `MetricsServer`: HTTP server for Prometheus scraping.

pub mod metrics;
pub mod server;

pub use metrics::HotTrackMetrics;
pub use server::MetricsServer;
