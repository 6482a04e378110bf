//! Prometheus metrics registry for the hot-tracking engine.
//!
//! Provides typed, labeled counters, gauges, and a histogram covering the
//! size account, ingress rate, and eviction activity that `hottrack-core`
//! itself never reports on its own — callers (the daemon, or a test
//! harness) push observations in after each ingress call or aging tick.

use hottrack_core::HotRoot;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

/// Central metrics registry holding every hot-tracking metric.
pub struct HotTrackMetrics {
    registry: Registry,
    /// Gauge: number of tracked objects per kind (inode, range).
    pub items_total: IntGaugeVec,
    /// Gauge: total tracked bytes across both kinds.
    pub size_bytes: prometheus::IntGauge,
    /// Counter: ingress calls by operation (read, write).
    pub ingress_total: IntCounterVec,
    /// Counter: evicted objects by trigger (watermark, shrinker).
    pub evictions_total: IntCounterVec,
    /// Histogram: per-bucket population observed once per aging sweep.
    pub bucket_occupancy: HistogramVec,
}

impl HotTrackMetrics {
    /// Creates a new `HotTrackMetrics` with all metrics registered.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new_custom(Some("hottrack".to_string()), None)?;

        let items_total = IntGaugeVec::new(
            Opts::new("items_total", "Number of tracked objects by kind"),
            &["kind"],
        )?;
        registry.register(Box::new(items_total.clone()))?;

        let size_bytes = prometheus::IntGauge::new(
            "size_bytes",
            "Total tracked bytes across inode and range items",
        )?;
        registry.register(Box::new(size_bytes.clone()))?;

        let ingress_total = IntCounterVec::new(
            Opts::new("ingress_total", "Total record_access calls"),
            &["op"],
        )?;
        registry.register(Box::new(ingress_total.clone()))?;

        let evictions_total = IntCounterVec::new(
            Opts::new("evictions_total", "Total evicted objects by trigger"),
            &["trigger"],
        )?;
        registry.register(Box::new(evictions_total.clone()))?;

        let bucket_occupancy = HistogramVec::new(
            HistogramOpts::new(
                "bucket_occupancy",
                "Heat-map bucket population observed per aging sweep",
            )
            .buckets(vec![0.0, 1.0, 8.0, 64.0, 512.0, 4096.0, f64::INFINITY]),
            &["kind"],
        )?;
        registry.register(Box::new(bucket_occupancy.clone()))?;

        Ok(Self {
            registry,
            items_total,
            size_bytes,
            ingress_total,
            evictions_total,
            bucket_occupancy,
        })
    }

    // ========================================================================
    // Recording helpers
    // ========================================================================

    /// Set the tracked-object gauge for one kind ("inode" or "range").
    pub fn set_items_total(&self, kind: &str, count: i64) {
        self.items_total.with_label_values(&[kind]).set(count);
    }

    /// Set the total tracked bytes gauge.
    pub fn set_size_bytes(&self, bytes: i64) {
        self.size_bytes.set(bytes);
    }

    /// Record one ingress call ("read" or "write").
    pub fn record_ingress(&self, op: &str) {
        self.ingress_total.with_label_values(&[op]).inc();
    }

    /// Record `count` objects evicted by a given trigger ("watermark" or
    /// "shrinker").
    pub fn record_evictions(&self, trigger: &str, count: u64) {
        self.evictions_total
            .with_label_values(&[trigger])
            .inc_by(count);
    }

    /// Observe one bucket's population for a given kind.
    pub fn observe_bucket_occupancy(&self, kind: &str, population: usize) {
        self.bucket_occupancy
            .with_label_values(&[kind])
            .observe(population as f64);
    }

    /// Refresh the gauges that can be read straight off a `HotRoot` without
    /// any extra bookkeeping. Called by the daemon after each aging tick;
    /// the per-ingress counters and eviction counters are pushed from the
    /// call sites that actually observe those events.
    pub fn refresh_from_root(&self, root: &HotRoot) {
        self.set_items_total("inode", root.inode_count() as i64);
        self.set_items_total("range", root.range_count() as i64);
        self.set_size_bytes(root.size_account().bytes() as i64);
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Encode all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
