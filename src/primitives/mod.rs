// ============================================================================
// Primitive Value Types
// ============================================================================
//
// On-chain value types carried by market events: unbounded unsigned
// integers and fixed-length byte strings.
//
// ============================================================================

pub mod fixed_bytes;
pub mod uint;

pub use fixed_bytes::{Address, B256, ParseBytesError, TxHash};
pub use uint::{ParseUintError, Uint};
