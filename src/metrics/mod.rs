// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Event projection (throughput, failures, latency) per event kind
// - Listing amendment outcomes
// - Broker payloads that could not be decoded
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the indexer
pub struct Metrics {
    registry: Registry,

    // Projection Metrics
    pub events_projected: IntCounterVec,
    pub events_failed: IntCounterVec,
    pub projection_duration: HistogramVec,

    // Amendment Metrics
    pub listing_amendments: IntCounterVec,

    // Ingestion Metrics
    pub payloads_rejected: IntCounter,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let events_projected = IntCounterVec::new(
            Opts::new("indexer_events_projected_total", "Total events projected into records"),
            &["event_type"],
        )?;
        registry.register(Box::new(events_projected.clone()))?;

        let events_failed = IntCounterVec::new(
            Opts::new("indexer_events_failed_total", "Total events that failed projection"),
            &["event_type", "reason"],
        )?;
        registry.register(Box::new(events_failed.clone()))?;

        let projection_duration = HistogramVec::new(
            HistogramOpts::new("indexer_projection_duration_seconds", "Event projection duration")
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
            &["event_type"],
        )?;
        registry.register(Box::new(projection_duration.clone()))?;

        let listing_amendments = IntCounterVec::new(
            Opts::new(
                "indexer_listing_amendments_total",
                "Listing cancellation amendments by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(listing_amendments.clone()))?;

        let payloads_rejected = IntCounter::new(
            "indexer_payloads_rejected_total",
            "Broker messages that could not be decoded into a market event",
        )?;
        registry.register(Box::new(payloads_rejected.clone()))?;

        Ok(Self {
            registry,
            events_projected,
            events_failed,
            projection_duration,
            listing_amendments,
            payloads_rejected,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record a successful projection
    pub fn record_projected(&self, event_type: &str, duration_secs: f64) {
        self.events_projected.with_label_values(&[event_type]).inc();
        self.projection_duration.with_label_values(&[event_type]).observe(duration_secs);
    }

    /// Helper to record a failed projection
    pub fn record_failed(&self, event_type: &str, reason: &str, duration_secs: f64) {
        self.events_failed.with_label_values(&[event_type, reason]).inc();
        self.projection_duration.with_label_values(&[event_type]).observe(duration_secs);
    }

    pub fn record_amendment(&self, outcome: &str) {
        self.listing_amendments.with_label_values(&[outcome]).inc();
    }

    pub fn record_rejected_payload(&self) {
        self.payloads_rejected.inc();
    }
}
