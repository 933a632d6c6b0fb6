use async_trait::async_trait;

use crate::identifier::RecordKey;
use crate::projection::core::Record;
use crate::projection::error::{ProjectionError, StoreError};

// ============================================================================
// Record Store - Key-Value Persistence Boundary
// ============================================================================
//
// The store is owned by the host; projectors receive a handle to it.
// Backends only move opaque JSON payloads around (kind, key) slots.
//
// Responsibilities:
// 1. Strict create: an occupied (kind, key) slot is a DuplicateKey error
// 2. Point lookup by (kind, key)
// 3. Replace of an existing slot (amendments)
// 4. Per-kind counts
//
// Concurrent access across streams is the backend's concern; nothing here
// takes locks on behalf of callers.
//
// ============================================================================

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record. Must fail with `StoreError::DuplicateKey` when the
    /// slot is already occupied; never overwrites.
    async fn insert(&self, kind: &'static str, key: &RecordKey, payload: String)
        -> Result<(), StoreError>;

    async fn fetch(&self, kind: &'static str, key: &RecordKey) -> Result<Option<String>, StoreError>;

    /// Overwrite an existing record. Fails with `StoreError::NotFound` when
    /// the slot was never created.
    async fn replace(&self, kind: &'static str, key: &RecordKey, payload: String)
        -> Result<(), StoreError>;

    async fn count(&self, kind: &'static str) -> Result<u64, StoreError>;
}

// ============================================================================
// Typed Helpers
// ============================================================================

/// Persist a freshly projected record (single create, not upsert).
pub async fn create_record<S, R>(store: &S, record: &R) -> Result<(), ProjectionError>
where
    S: RecordStore + ?Sized,
    R: Record,
{
    let payload = encode(record)?;
    store.insert(R::KIND, record.key(), payload).await?;
    Ok(())
}

/// Load a record by key; `Ok(None)` when absent.
pub async fn load_record<S, R>(store: &S, key: &RecordKey) -> Result<Option<R>, ProjectionError>
where
    S: RecordStore + ?Sized,
    R: Record,
{
    match store.fetch(R::KIND, key).await? {
        Some(payload) => {
            let record = serde_json::from_str(&payload).map_err(|source| {
                ProjectionError::Serialization { kind: R::KIND, source }
            })?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

/// Persist a mutation of a previously created record.
pub async fn save_record<S, R>(store: &S, record: &R) -> Result<(), ProjectionError>
where
    S: RecordStore + ?Sized,
    R: Record,
{
    let payload = encode(record)?;
    store.replace(R::KIND, record.key(), payload).await?;
    Ok(())
}

fn encode<R: Record>(record: &R) -> Result<String, ProjectionError> {
    serde_json::to_string(record)
        .map_err(|source| ProjectionError::Serialization { kind: R::KIND, source })
}
