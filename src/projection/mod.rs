// ============================================================================
// Projection Infrastructure
// ============================================================================
//
// Generic, reusable event-to-record projection infrastructure.
// Market-specific handlers are in src/domain/
//
// ============================================================================

// Core abstractions (GENERIC - works with any record kind)
pub mod core;
pub mod error;
pub mod store;

pub use self::core::*;
pub use error::{ProjectionError, StoreError};
pub use store::*;
