use crate::domain::market::MarketEvent;
use crate::projection::core::EventOccurrence;

// ============================================================================
// Broker Payload Decoding
// ============================================================================
//
// One broker message carries one JSON-encoded event occurrence:
//
// {
//   "event": { "type": "ListingCreated", "data": { ... } },
//   "transaction_hash": "0x...",
//   "log_index": 0,
//   "block_number": 123,
//   "block_timestamp": 1700000000
// }
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("message has no payload")]
    EmptyPayload,

    #[error("malformed event payload: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn decode_occurrence(payload: Option<&[u8]>) -> Result<EventOccurrence<MarketEvent>, DecodeError> {
    match payload {
        Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(bytes)?),
        _ => Err(DecodeError::EmptyPayload),
    }
}
