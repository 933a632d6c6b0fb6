// ============================================================================
// Domain Layer - Contract-specific projections
// ============================================================================
//
// Each indexed contract has its own subdirectory with:
// - Events
// - Records
// - Projector
//
// This layer is completely separate from the projection infrastructure.
//
// ============================================================================

pub mod market;
