use crate::primitives::{TxHash, Uint};
use super::key::RecordKey;

// ============================================================================
// Fixed-Width Identifier Codec
// ============================================================================
//
// Encodes an unbounded unsigned integer as exactly W big-endian bytes,
// left-padded with zeros. Two properties follow and are relied upon:
//
// 1. Key equality is integer equality (lookup by recomputed key works).
// 2. Lexicographic key order is numeric order (sorted scans stay sorted).
//
// Values that need more than W bytes are rejected, never truncated.
//
// ============================================================================

/// Width of listing identifiers.
pub const LISTING_ID_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier overflow: {value} needs {required} bytes but the id width is {width}")]
    Overflow {
        value: Uint,
        required: usize,
        width: usize,
    },
}

/// Encode `value` into exactly `W` big-endian bytes.
pub fn encode_fixed_width_id<const W: usize>(value: &Uint) -> Result<[u8; W], IdentifierError> {
    let minimal = value.as_be_bytes();
    if minimal.len() > W {
        return Err(IdentifierError::Overflow {
            value: value.clone(),
            required: minimal.len(),
            width: W,
        });
    }

    let mut id = [0u8; W];
    id[W - minimal.len()..].copy_from_slice(minimal);
    Ok(id)
}

/// Inverse of [`encode_fixed_width_id`] for any width.
pub fn decode_fixed_width_id(id: &[u8]) -> Uint {
    Uint::from_be_slice(id)
}

/// Key of the listing record for `listing_id`.
pub fn listing_key(listing_id: &Uint) -> Result<RecordKey, IdentifierError> {
    let id = encode_fixed_width_id::<LISTING_ID_WIDTH>(listing_id)?;
    Ok(RecordKey::from_bytes(id))
}

/// Key of a per-occurrence log record: the transaction hash followed by the
/// log index as four little-endian bytes.
pub fn occurrence_key(transaction_hash: &TxHash, log_index: u32) -> RecordKey {
    let mut key = Vec::with_capacity(TxHash::LEN + 4);
    key.extend_from_slice(transaction_hash.as_bytes());
    key.extend_from_slice(&log_index.to_le_bytes());
    RecordKey::from_bytes(key)
}

// ============================================================================
// Unit Tests
// ============================================================================
