use anyhow::anyhow;
use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::response::query_result::QueryResult;
use scylla::value::{CqlValue, Row};
use std::sync::Arc;

use crate::identifier::RecordKey;
use crate::projection::error::StoreError;
use super::record_store::RecordStore;

// ============================================================================
// ScyllaDB Record Store
// ============================================================================
//
// All record kinds share one table partitioned by kind and clustered by key,
// so a partition scan returns keys in byte order.
//
// Strict creates and amendments use lightweight transactions:
// - INSERT ... IF NOT EXISTS   -> [applied] = false means DuplicateKey
// - UPDATE ... IF EXISTS       -> [applied] = false means NotFound
//
// ============================================================================

pub struct ScyllaRecordStore {
    session: Arc<Session>,
}

impl ScyllaRecordStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Connect to `node`, create the keyspace and table if needed, and bind
    /// the session to the keyspace.
    pub async fn connect(node: &str, keyspace: &str) -> anyhow::Result<Self> {
        tracing::info!(node = %node, keyspace = %keyspace, "Connecting to ScyllaDB...");
        let session: Session = SessionBuilder::new().known_node(node).build().await?;

        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {keyspace} WITH REPLICATION = \
                     {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
                ),
                &[],
            )
            .await?;
        session.use_keyspace(keyspace, false).await?;

        session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS records (
                    kind text,
                    id blob,
                    payload text,
                    PRIMARY KEY ((kind), id)
                )",
                &[],
            )
            .await?;

        tracing::info!(keyspace = %keyspace, "Record table ready");
        Ok(Self::new(Arc::new(session)))
    }
}

fn backend<E>(err: E) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Backend(anyhow::Error::new(err))
}

/// Read the `[applied]` column of a lightweight-transaction result.
fn lwt_applied(result: QueryResult) -> Result<bool, StoreError> {
    let rows = result.into_rows_result().map_err(backend)?;
    let row = rows.maybe_first_row::<Row>().map_err(backend)?;
    match row.and_then(|row| row.columns.into_iter().next().flatten()) {
        Some(CqlValue::Boolean(applied)) => Ok(applied),
        other => Err(StoreError::Backend(anyhow!(
            "unexpected lightweight transaction result: {other:?}"
        ))),
    }
}

#[async_trait]
impl RecordStore for ScyllaRecordStore {
    async fn insert(
        &self,
        kind: &'static str,
        key: &RecordKey,
        payload: String,
    ) -> Result<(), StoreError> {
        let result = self
            .session
            .query_unpaged(
                "INSERT INTO records (kind, id, payload) VALUES (?, ?, ?) IF NOT EXISTS",
                (kind, key.as_bytes().to_vec(), payload),
            )
            .await
            .map_err(backend)?;

        if !lwt_applied(result)? {
            return Err(StoreError::DuplicateKey { kind, key: key.clone() });
        }

        tracing::debug!(kind = %kind, key = %key, "Inserted record");
        Ok(())
    }

    async fn fetch(&self, kind: &'static str, key: &RecordKey) -> Result<Option<String>, StoreError> {
        let result = self
            .session
            .query_unpaged(
                "SELECT payload FROM records WHERE kind = ? AND id = ?",
                (kind, key.as_bytes().to_vec()),
            )
            .await
            .map_err(backend)?;

        let rows = result.into_rows_result().map_err(backend)?;
        let row = rows.maybe_first_row::<(String,)>().map_err(backend)?;
        Ok(row.map(|(payload,)| payload))
    }

    async fn replace(
        &self,
        kind: &'static str,
        key: &RecordKey,
        payload: String,
    ) -> Result<(), StoreError> {
        let result = self
            .session
            .query_unpaged(
                "UPDATE records SET payload = ? WHERE kind = ? AND id = ? IF EXISTS",
                (payload, kind, key.as_bytes().to_vec()),
            )
            .await
            .map_err(backend)?;

        if !lwt_applied(result)? {
            return Err(StoreError::NotFound { kind, key: key.clone() });
        }

        tracing::debug!(kind = %kind, key = %key, "Replaced record");
        Ok(())
    }

    async fn count(&self, kind: &'static str) -> Result<u64, StoreError> {
        let result = self
            .session
            .query_unpaged("SELECT COUNT(*) FROM records WHERE kind = ?", (kind,))
            .await
            .map_err(backend)?;

        let rows = result.into_rows_result().map_err(backend)?;
        match rows.maybe_first_row::<(i64,)>().map_err(backend)? {
            Some((count,)) => Ok(u64::try_from(count).unwrap_or(0)),
            None => Ok(0),
        }
    }
}

// ============================================================================
// Integration Tests (live cluster)
// ============================================================================
