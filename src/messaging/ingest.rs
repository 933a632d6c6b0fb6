use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use crate::config::FailurePolicy;
use crate::domain::market::{MarketProjector, Projected};
use crate::metrics::Metrics;
use crate::projection::core::EventKind;
use crate::projection::store::RecordStore;
use super::decoder::decode_occurrence;

// ============================================================================
// Event Ingestor
// ============================================================================
//
// Decodes one broker payload, projects it, and applies the failure policy.
// Transport-agnostic so the policy can be exercised without a broker.
//
// ============================================================================

pub struct EventIngestor<S: RecordStore + ?Sized> {
    projector: MarketProjector<S>,
    metrics: Arc<Metrics>,
    policy: FailurePolicy,
}

impl<S: RecordStore + ?Sized> EventIngestor<S> {
    pub fn new(projector: MarketProjector<S>, metrics: Arc<Metrics>, policy: FailurePolicy) -> Self {
        Self {
            projector,
            metrics,
            policy,
        }
    }

    pub fn projector(&self) -> &MarketProjector<S> {
        &self.projector
    }

    /// Handle one payload.
    ///
    /// - `Ok(Some(_))`: projected; safe to commit.
    /// - `Ok(None)`: failed but skipped under `FailurePolicy::Skip`; safe to commit.
    /// - `Err(_)`: failed under `FailurePolicy::Halt`; do not commit, stop consuming.
    pub async fn ingest(&self, payload: Option<&[u8]>) -> Result<Option<Projected>> {
        let occurrence = match decode_occurrence(payload) {
            Ok(occurrence) => occurrence,
            Err(e) => {
                self.metrics.record_rejected_payload();
                tracing::error!(error = %e, policy = ?self.policy, "❌ Could not decode event payload");
                return self.on_failure(anyhow::Error::new(e).context("decoding event payload"));
            }
        };

        let event_type = occurrence.event.kind();
        let started = Instant::now();

        match self.projector.project(&occurrence).await {
            Ok(projected) => {
                self.metrics
                    .record_projected(event_type, started.elapsed().as_secs_f64());
                if let Some(amendment) = &projected.amendment {
                    self.metrics.record_amendment(amendment.label());
                }

                tracing::info!(
                    event_type = %event_type,
                    key = %projected.key,
                    block_number = occurrence.block_number,
                    block_time = ?occurrence.block_time(),
                    tx_hash = %occurrence.transaction_hash,
                    log_index = occurrence.log_index,
                    "✅ Projected event"
                );
                Ok(Some(projected))
            }
            Err(e) => {
                self.metrics
                    .record_failed(event_type, e.reason(), started.elapsed().as_secs_f64());
                tracing::error!(
                    error = %e,
                    event_type = %event_type,
                    block_number = occurrence.block_number,
                    tx_hash = %occurrence.transaction_hash,
                    log_index = occurrence.log_index,
                    policy = ?self.policy,
                    "❌ Failed to project event"
                );
                self.on_failure(anyhow::Error::new(e).context(format!(
                    "projecting {} at {}:{}",
                    event_type, occurrence.transaction_hash, occurrence.log_index
                )))
            }
        }
    }

    fn on_failure(&self, error: anyhow::Error) -> Result<Option<Projected>> {
        match self.policy {
            FailurePolicy::Halt => Err(error),
            FailurePolicy::Skip => Ok(None),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
