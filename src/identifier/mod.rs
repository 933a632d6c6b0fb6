// ============================================================================
// Record Identifiers
// ============================================================================
//
// Key derivation for persisted records:
// - Occurrence keys: transaction hash ++ log index (log records)
// - Domain keys: fixed-width encoding of a listing id (listing records)
//
// ============================================================================

pub mod codec;
pub mod key;

pub use codec::{
    decode_fixed_width_id, encode_fixed_width_id, listing_key, occurrence_key, IdentifierError,
    LISTING_ID_WIDTH,
};
pub use key::RecordKey;
