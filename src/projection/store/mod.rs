// ============================================================================
// Projection Store - Generic Persistence Layer
// ============================================================================
//
// The RecordStore boundary plus its backends:
// - InMemoryRecordStore: tests and local runs
// - ScyllaRecordStore: durable storage
//
// ============================================================================

pub mod memory;
pub mod record_store;
pub mod scylla_store;

pub use memory::InMemoryRecordStore;
pub use record_store::{create_record, load_record, save_record, RecordStore};
pub use scylla_store::ScyllaRecordStore;
