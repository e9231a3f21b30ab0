//! Inbound message relay
//!
//! Every message arriving on the input topic is counted, logged and, unless
//! its body is empty, forwarded unchanged on the output topic.

use crate::Result;
use crate::app::adapters::publisher::InboundMessage;
use crate::app::services::emitter::Emitter;
use crate::app::services::supervisor::report_failure;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info};

const RELAY_COMPONENT: &str = "MessageRelay";

/// Forwards inbound messages to the output topic
#[derive(Debug, Clone)]
pub struct MessageRelay {
    counter: Arc<AtomicU64>,
    emitter: Emitter,
}

impl MessageRelay {
    pub fn new(emitter: Emitter) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(0)),
            emitter,
        }
    }

    /// Messages received so far, forwarded or not
    pub fn count(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Relay one message and return its sequence number (starting at 1)
    pub async fn pipe(&self, message: &InboundMessage) -> Result<u64> {
        let sequence = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let body = String::from_utf8_lossy(&message.payload);
        info!("Received message: {}, Body: [{}]", sequence, body);

        if !body.is_empty() {
            self.emitter.forward(message.payload.clone()).await?;
            info!("Received message sent");
        }

        Ok(sequence)
    }

    /// Relay until the inbound queue closes
    ///
    /// A failed forward is logged and the relay moves on to the next message.
    pub async fn run(self, mut inbound: mpsc::Receiver<InboundMessage>) -> Result<()> {
        while let Some(message) = inbound.recv().await {
            if let Err(e) = self.pipe(&message).await {
                report_failure(RELAY_COMPONENT, "Forwarding", &e);
            }
        }
        debug!("Inbound queue closed after {} messages", self.count());
        Ok(())
    }
}
