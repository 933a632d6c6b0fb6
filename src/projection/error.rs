use crate::identifier::{IdentifierError, RecordKey};

// ============================================================================
// Projection Errors
// ============================================================================

/// Failures reported by a record store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate {kind} record at key {key}")]
    DuplicateKey { kind: &'static str, key: RecordKey },

    #[error("{kind} record at key {key} does not exist")]
    NotFound { kind: &'static str, key: RecordKey },

    #[error("record store backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Failure to project a single event. Nothing of the event is persisted when
/// one of these is returned before the first write.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to (de)serialize {kind} record: {source}")]
    Serialization {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ProjectionError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::Store(StoreError::DuplicateKey { .. }))
    }

    pub fn is_identifier_overflow(&self) -> bool {
        matches!(self, Self::Identifier(IdentifierError::Overflow { .. }))
    }

    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Identifier(_) => "identifier_overflow",
            Self::Store(StoreError::DuplicateKey { .. }) => "duplicate_key",
            Self::Store(StoreError::NotFound { .. }) => "record_not_found",
            Self::Store(StoreError::Backend(_)) => "store_backend",
            Self::Serialization { .. } => "serialization",
        }
    }
}
