// ============================================================================
// Market Domain - NFT marketplace contract projection
// ============================================================================
//
// This module contains ALL market-specific code:
// - Events (ListingCreated, ListingCancelled, NFTPurchased, etc.)
// - Records (one persisted kind per event kind)
// - Projector (MarketProjector: per-kind handlers + listing amendment)
//
// This is completely separate from the generic projection infrastructure.
//
// ============================================================================

pub mod events;
pub mod projector;
pub mod records;

#[cfg(test)]
pub mod mock_events;

// Re-export for convenience
pub use events::*;
pub use projector::*;
pub use records::*;
