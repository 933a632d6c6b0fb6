use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifier::{occurrence_key, RecordKey};
use crate::primitives::TxHash;

// ============================================================================
// Event Occurrence - Chain Event Envelope
// ============================================================================
//
// Wraps a decoded contract event with where it happened on chain.
// This is GENERIC and works with ANY event payload type.
//
// ============================================================================

/// Generic event occurrence - wraps any event payload with log metadata
///
/// Type Parameter:
/// - `E`: The event payload (one market event, or the `MarketEvent` union)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventOccurrence<E> {
    // Event Payload
    pub event: E,

    // Log Position
    pub transaction_hash: TxHash,
    pub log_index: u32,

    // Containing Block
    pub block_number: u64,
    pub block_timestamp: u64,
}

impl<E> EventOccurrence<E> {
    pub fn new(
        event: E,
        transaction_hash: TxHash,
        log_index: u32,
        block_number: u64,
        block_timestamp: u64,
    ) -> Self {
        Self {
            event,
            transaction_hash,
            log_index,
            block_number,
            block_timestamp,
        }
    }

    /// Key for a record that belongs to this occurrence alone.
    pub fn occurrence_key(&self) -> RecordKey {
        occurrence_key(&self.transaction_hash, self.log_index)
    }

    /// Bookkeeping fields copied onto every record projected from this event.
    pub fn stamp(&self) -> BlockStamp {
        BlockStamp {
            block_number: self.block_number,
            block_timestamp: self.block_timestamp,
            transaction_hash: self.transaction_hash,
        }
    }

    pub fn block_time(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.block_timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Same occurrence metadata around a different payload.
    pub fn with_event<T>(&self, event: T) -> EventOccurrence<T> {
        EventOccurrence {
            event,
            transaction_hash: self.transaction_hash,
            log_index: self.log_index,
            block_number: self.block_number,
            block_timestamp: self.block_timestamp,
        }
    }
}

/// Block and transaction a record was projected from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockStamp {
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: TxHash,
}

// ============================================================================
// Event Kind Trait
// ============================================================================

/// Every event payload names its kind; used for logs and metric labels.
pub trait EventKind {
    fn kind(&self) -> &'static str;
}

// ============================================================================
// Tests
// ============================================================================
