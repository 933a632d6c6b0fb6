// ============================================================================
// Projection Core - Generic Abstractions
// ============================================================================
//
// GENERIC, reusable projection building blocks: the event envelope and the
// record trait. No market-specific code lives here.
//
// ============================================================================

pub mod event;
pub mod record;

pub use event::{BlockStamp, EventKind, EventOccurrence};
pub use record::Record;
