use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

// ============================================================================
// Indexer Configuration
// ============================================================================
//
// Read once at startup from INDEXER_* environment variables. Unset variables
// fall back to local-development defaults; malformed values abort startup.
//
// ============================================================================

pub const DEFAULT_BROKERS: &str = "127.0.0.1:9092";
pub const DEFAULT_TOPIC: &str = "nft-market-events";
pub const DEFAULT_GROUP_ID: &str = "nft-market-indexer";
pub const DEFAULT_SCYLLA_NODE: &str = "127.0.0.1:9042";
pub const DEFAULT_KEYSPACE: &str = "nft_market_ks";
pub const DEFAULT_METRICS_PORT: u16 = 9090;

/// Record store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Scylla,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scylla" => Ok(StoreBackend::Scylla),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("unknown store backend {other:?} (expected scylla or memory)"),
        }
    }
}

/// What the ingestion loop does when an event cannot be projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop consuming; the failed message is not committed.
    Halt,
    /// Log, count, commit, and move on to the next message.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "halt" => Ok(FailurePolicy::Halt),
            "skip" => Ok(FailurePolicy::Skip),
            other => anyhow::bail!("unknown failure policy {other:?} (expected halt or skip)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
    pub store: StoreBackend,
    pub scylla_node: String,
    pub keyspace: String,
    pub metrics_port: u16,
    pub failure_policy: FailurePolicy,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            brokers: DEFAULT_BROKERS.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            group_id: DEFAULT_GROUP_ID.to_string(),
            store: StoreBackend::Scylla,
            scylla_node: DEFAULT_SCYLLA_NODE.to_string(),
            keyspace: DEFAULT_KEYSPACE.to_string(),
            metrics_port: DEFAULT_METRICS_PORT,
            failure_policy: FailurePolicy::Halt,
        }
    }
}

impl IndexerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let keyspace = lookup("INDEXER_KEYSPACE").unwrap_or(defaults.keyspace);
        if keyspace.is_empty() || !keyspace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            anyhow::bail!("INDEXER_KEYSPACE must be a plain CQL identifier, got {keyspace:?}");
        }

        Ok(Self {
            brokers: lookup("INDEXER_BROKERS").unwrap_or(defaults.brokers),
            topic: lookup("INDEXER_TOPIC").unwrap_or(defaults.topic),
            group_id: lookup("INDEXER_GROUP_ID").unwrap_or(defaults.group_id),
            store: parse_var(&lookup, "INDEXER_STORE", defaults.store)?,
            scylla_node: lookup("INDEXER_SCYLLA_NODE").unwrap_or(defaults.scylla_node),
            keyspace,
            metrics_port: parse_var(&lookup, "INDEXER_METRICS_PORT", defaults.metrics_port)?,
            failure_policy: parse_var(&lookup, "INDEXER_FAILURE_POLICY", defaults.failure_policy)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Into<anyhow::Error>,
{
    match lookup(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("invalid value for {name}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<IndexerConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IndexerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, IndexerConfig::default());
        assert_eq!(config.failure_policy, FailurePolicy::Halt);
        assert_eq!(config.store, StoreBackend::Scylla);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("INDEXER_TOPIC", "market-v4"),
            ("INDEXER_STORE", "memory"),
            ("INDEXER_METRICS_PORT", "9191"),
            ("INDEXER_FAILURE_POLICY", "Skip"),
        ])
        .unwrap();

        assert_eq!(config.topic, "market-v4");
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.metrics_port, 9191);
        assert_eq!(config.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.brokers, DEFAULT_BROKERS);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_from(&[("INDEXER_METRICS_PORT", "http")]).is_err());
        assert!(config_from(&[("INDEXER_FAILURE_POLICY", "retry")]).is_err());
        assert!(config_from(&[("INDEXER_STORE", "postgres")]).is_err());
        assert!(config_from(&[("INDEXER_KEYSPACE", "ks; DROP")]).is_err());
    }
}
