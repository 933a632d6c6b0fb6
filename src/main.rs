use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nft_market_indexer::config::{IndexerConfig, StoreBackend};
use nft_market_indexer::domain::market::MarketProjector;
use nft_market_indexer::messaging::{EventIngestor, RedpandaEventSource};
use nft_market_indexer::metrics::{self, Metrics};
use nft_market_indexer::projection::store::{InMemoryRecordStore, RecordStore, ScyllaRecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,nft_market_indexer=debug")),
        )
        .init();

    tracing::info!("🚀 Starting NFT market indexer");

    // === 1. Load configuration ===
    let config = IndexerConfig::from_env()?;
    tracing::info!(?config, "Loaded configuration");

    // === 2. Initialize Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // Start metrics HTTP server in background thread
    let metrics_registry = Arc::new(metrics.registry().clone());
    let metrics_port = config.metrics_port;
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Failed to build metrics runtime: {}", e);
                return;
            }
        };
        rt.block_on(async {
            if let Err(e) = metrics::start_metrics_server(metrics_registry, metrics_port).await {
                tracing::error!("Metrics server error: {}", e);
            }
        });
    });

    // === 3. Open the record store ===
    let store: Arc<dyn RecordStore> = match config.store {
        StoreBackend::Scylla => {
            Arc::new(ScyllaRecordStore::connect(&config.scylla_node, &config.keyspace).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; records are lost on exit");
            Arc::new(InMemoryRecordStore::new())
        }
    };

    // === 4. Wire projector and ingestion ===
    let ingestor = EventIngestor::new(
        MarketProjector::new(store),
        metrics.clone(),
        config.failure_policy,
    );
    let source = RedpandaEventSource::new(&config.brokers, &config.group_id, &config.topic)?;

    // === 5. Consume until the stream ends or a failure halts ingestion ===
    source.run(&ingestor).await?;

    tracing::info!("🎉 Indexer stopped");
    Ok(())
}
