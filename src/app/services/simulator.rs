//! Leaf-device simulator
//!
//! Stands in for a downstream sensor: sends batches of random readings, one
//! message every few seconds, with a long pause between batches. Each channel
//! draws from its own seeded generator, so the sequence of readings is the
//! same on every run.

use crate::Result;
use crate::app::adapters::publisher::Publisher;
use crate::app::services::collector::cycle_timestamp;
use crate::config::SimulatorConfig;
use crate::constants::simulator::{CHANNELS, COLLECTOR_TYPE, READING_UPPER_BOUND};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Seeded reading generator for every simulated channel
pub struct LeafSimulator {
    config: SimulatorConfig,
    channels: Vec<(&'static str, StdRng)>,
}

impl LeafSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let channels = CHANNELS
            .iter()
            .map(|(name, seed)| (*name, StdRng::seed_from_u64(*seed)))
            .collect();
        Self { config, channels }
    }

    /// Draw the next reading of every channel
    pub fn build_reading(&mut self, time: &str) -> Value {
        let mut reading = Map::new();
        reading.insert("CollectorType".to_string(), Value::from(COLLECTOR_TYPE));
        reading.insert("Time".to_string(), Value::from(time));
        for (name, rng) in &mut self.channels {
            let value: u32 = rng.gen_range(0..READING_UPPER_BOUND);
            reading.insert(name.to_string(), Value::from(value));
        }
        Value::Object(reading)
    }

    /// Send one batch of `message_count` messages
    ///
    /// A failed send is logged and the batch continues.
    pub async fn send_batch(&mut self, publisher: &Arc<dyn Publisher>) -> Result<usize> {
        let mut sent = 0;
        for count in 0..self.config.message_count {
            let time = cycle_timestamp();
            let reading = self.build_reading(&time);
            let payload = serde_json::to_vec(&reading)?;

            info!("Leaf Device: {}> Sending message: {}, Data: [{}]", time, count, reading);
            match publisher.publish(&self.config.topic, payload).await {
                Ok(()) => sent += 1,
                Err(e) => warn!("Leaf Device: failed with the following error. {}", e),
            }

            tokio::time::sleep(self.config.message_interval()).await;
        }
        Ok(sent)
    }

    /// Send batches forever
    pub async fn run(mut self, publisher: Arc<dyn Publisher>) -> Result<()> {
        info!(
            "Leaf Device: attempting to send {} messages per batch to {}",
            self.config.message_count, self.config.topic
        );
        loop {
            self.send_batch(&publisher).await?;
            tokio::time::sleep(self.config.batch_pause()).await;
        }
    }
}

impl std::fmt::Debug for LeafSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafSimulator")
            .field("config", &self.config)
            .field("channels", &self.channels.len())
            .finish()
    }
}
