use anyhow::{Context, Result};
use futures_util::StreamExt;
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    Message,
};

use crate::projection::store::RecordStore;
use super::ingest::EventIngestor;

// ============================================================================
// Redpanda Event Source
// ============================================================================
//
// Consumes JSON-encoded event occurrences from one topic and hands them to
// the ingestor strictly one at a time: the next message is not pulled until
// the current one is projected (or skipped) and its offset committed.
//
// Ordering across partitions is the producer's concern; a single-partition
// topic preserves chain order end to end.
//
// ============================================================================

pub struct RedpandaEventSource {
    consumer: StreamConsumer,
    topic: String,
}

impl RedpandaEventSource {
    pub fn new(brokers: &str, group_id: &str, topic: &str) -> Result<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .create()
            .context("Failed to create Redpanda consumer")?;

        consumer
            .subscribe(&[topic])
            .with_context(|| format!("Failed to subscribe to {topic}"))?;

        tracing::info!(brokers = %brokers, group_id = %group_id, topic = %topic, "📡 Subscribed to event topic");

        Ok(Self {
            consumer,
            topic: topic.to_string(),
        })
    }

    /// Consume until the stream ends or the ingestor halts.
    pub async fn run<S: RecordStore + ?Sized>(&self, ingestor: &EventIngestor<S>) -> Result<()> {
        let mut stream = self.consumer.stream();

        while let Some(message) = stream.next().await {
            let message = message.context("Redpanda consumer error")?;

            tracing::debug!(
                topic = %self.topic,
                partition = message.partition(),
                offset = message.offset(),
                "Received event message"
            );

            ingestor.ingest(message.payload()).await.with_context(|| {
                format!(
                    "halted at {}[{}]@{}",
                    self.topic,
                    message.partition(),
                    message.offset()
                )
            })?;

            self.consumer
                .commit_message(&message, CommitMode::Async)
                .context("Failed to commit offset")?;
        }

        tracing::info!(topic = %self.topic, "Event stream ended");
        Ok(())
    }
}
