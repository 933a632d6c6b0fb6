pub mod decoder;
pub mod ingest;
pub mod redpanda;

pub use decoder::{decode_occurrence, DecodeError};
pub use ingest::EventIngestor;
pub use redpanda::RedpandaEventSource;
