// ============================================================================
// NFT Market Indexer
// ============================================================================
//
// Projects market contract events into durable, queryable records.
//
// Structure:
// - primitives/  - On-chain value types (Uint, Address, B256)
// - identifier/  - Record keys and the fixed-width identifier codec
// - projection/  - Generic envelope, record trait, record stores
// - domain/      - Market events, records and the projector
// - messaging/   - Broker decoding and the Redpanda consumer
// - metrics/     - Prometheus metrics and HTTP exporter
//
// ============================================================================

pub mod config;
pub mod domain;
pub mod identifier;
pub mod messaging;
pub mod metrics;
pub mod primitives;
pub mod projection;
