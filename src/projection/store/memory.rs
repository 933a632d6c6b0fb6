use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::identifier::RecordKey;
use crate::projection::error::StoreError;
use super::record_store::RecordStore;

/// In-process record store.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<&'static str, BTreeMap<RecordKey, String>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(
        &self,
        kind: &'static str,
        key: &RecordKey,
        payload: String,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let slots = records.entry(kind).or_default();
        if slots.contains_key(key) {
            return Err(StoreError::DuplicateKey { kind, key: key.clone() });
        }
        slots.insert(key.clone(), payload);
        Ok(())
    }

    async fn fetch(&self, kind: &'static str, key: &RecordKey) -> Result<Option<String>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(kind)
            .and_then(|slots| slots.get(key))
            .cloned())
    }

    async fn replace(
        &self,
        kind: &'static str,
        key: &RecordKey,
        payload: String,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(kind).and_then(|slots| slots.get_mut(key)) {
            Some(slot) => {
                *slot = payload;
                Ok(())
            }
            None => Err(StoreError::NotFound { kind, key: key.clone() }),
        }
    }

    async fn count(&self, kind: &'static str) -> Result<u64, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(kind)
            .map_or(0, |slots| slots.len() as u64))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
