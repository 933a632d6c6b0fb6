use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::identifier::RecordKey;
use super::event::BlockStamp;

// ============================================================================
// Record - Projected Read Model Row
// ============================================================================
//
// Key Principles:
// 1. One record kind per event schema, keyed by a byte string
// 2. Records are created once and never deleted
// 3. Only explicitly amendable fields change after creation
//
// ============================================================================

/// Generic record trait - every persisted record kind implements this
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Record kind name; keys are unique per kind.
    const KIND: &'static str;

    fn key(&self) -> &RecordKey;

    fn stamp(&self) -> &BlockStamp;
}
