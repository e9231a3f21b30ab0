//! Envelope emission
//!
//! The emitter encodes a record and hands the bytes to the publish interface
//! on the collector's fixed output topic.

use crate::app::adapters::publisher::Publisher;
use crate::app::models::TelemetryRecord;
use crate::app::services::envelope;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Publishes records of one collector on one topic
#[derive(Clone)]
pub struct Emitter {
    publisher: Arc<dyn Publisher>,
    topic: String,
}

impl Emitter {
    pub fn new(publisher: Arc<dyn Publisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }

    /// Encode and publish one record
    pub async fn emit(&self, record: &TelemetryRecord) -> Result<()> {
        let payload = envelope::encode(record)?;
        info!("Sending {} Telemetry", record.collector_type);
        self.publisher.publish(&self.topic, payload).await?;
        debug!(
            "Published {} envelope for device {} ({} fields)",
            record.collector_type,
            record.device_id,
            record.fields.len()
        );
        Ok(())
    }

    /// Publish raw bytes unchanged (used by the relay)
    pub async fn forward(&self, payload: Vec<u8>) -> Result<()> {
        self.publisher.publish(&self.topic, payload).await
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter").field("topic", &self.topic).finish()
    }
}
