//! Publish interface and its implementations
//!
//! The collectors only ever need `publish(topic, bytes)`. [`MqttPublisher`]
//! provides it over a single broker session established at startup,
//! [`StdoutPublisher`] prints envelopes for dry runs and [`MemoryPublisher`]
//! records them for inspection.

use crate::config::BrokerConfig;
use crate::constants::{MQTT_REQUEST_CAPACITY, RELAY_QUEUE_CAPACITY};
use crate::{Error, Result};
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Sink for canonical envelope bytes
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()>;
}

/// A message received on a subscribed topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// MQTT session publishing with QoS 1
pub struct MqttPublisher {
    client: AsyncClient,
    qos: QoS,
}

/// Handles returned by [`MqttPublisher::connect`]
pub struct MqttSession {
    pub publisher: MqttPublisher,

    /// Messages arriving on the subscribed input topic
    pub inbound: mpsc::Receiver<InboundMessage>,

    /// Event loop task; finishes on the first connection error
    pub event_loop: JoinHandle<()>,
}

impl MqttPublisher {
    /// Open the broker session and optionally subscribe to an input topic
    ///
    /// The connection is not retried: when the event loop reports an error it
    /// logs it and stops. Inbound messages are queued without waiting, since
    /// the relay publishes through this same event loop.
    pub async fn connect(config: &BrokerConfig, input_topic: Option<&str>) -> Result<MqttSession> {
        let mut mqtt_options = MqttOptions::new(&config.client_id, &config.host, config.port);
        mqtt_options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
        mqtt_options.set_clean_session(true);

        let (client, mut eventloop) = AsyncClient::new(mqtt_options, MQTT_REQUEST_CAPACITY);

        if let Some(topic) = input_topic {
            client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .map_err(|e| Error::publish(topic, format!("Subscribe failed: {}", e)))?;
            debug!("Subscribed to input topic: {}", topic);
        }

        let (tx, inbound) = mpsc::channel(RELAY_QUEUE_CAPACITY);
        let host = config.host.clone();

        let event_loop = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let message = InboundMessage {
                            topic: publish.topic.clone(),
                            payload: publish.payload.to_vec(),
                        };
                        queue_inbound(&tx, message);
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("Connected to MQTT broker: {}", host);
                    }
                    Ok(notification) => {
                        trace!("MQTT Event: {:?}", notification);
                    }
                    Err(e) => {
                        error!("MQTT Connection error: {:?}", e);
                        break;
                    }
                }
            }
        });

        Ok(MqttSession {
            publisher: MqttPublisher {
                client,
                qos: QoS::AtLeastOnce,
            },
            inbound,
            event_loop,
        })
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.client.disconnect().await?;
        debug!("Disconnect requested");
        Ok(())
    }
}

/// Hand an inbound message to the relay queue without blocking the event loop
///
/// Returns whether the message was queued; when the queue is full the message
/// is dropped.
pub fn queue_inbound(tx: &mpsc::Sender<InboundMessage>, message: InboundMessage) -> bool {
    match tx.try_send(message) {
        Ok(()) => true,
        Err(TrySendError::Full(message)) => {
            warn!(
                "Inbound queue full, dropping message on {} ({} bytes)",
                message.topic,
                message.payload.len()
            );
            false
        }
        Err(TrySendError::Closed(_)) => {
            debug!("Inbound queue closed, dropping message");
            false
        }
    }
}

#[async_trait]
impl Publisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(topic, self.qos, false, payload)
            .await
            .map_err(|e| Error::publish(topic, e.to_string()))?;
        trace!("Published message to topic: {}", topic);
        Ok(())
    }
}

/// Writes each payload to stdout, one per line
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPublisher;

#[async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "[{}] {}", topic, String::from_utf8_lossy(&payload))
            .map_err(|e| Error::io("Failed to write envelope to stdout", e))?;
        Ok(())
    }
}

/// Recorded publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl PublishedMessage {
    /// Parse the payload as JSON
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.payload)?)
    }
}

/// Keeps every published message in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryPublisher {
    messages: Arc<Mutex<Vec<PublishedMessage>>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.messages.lock().await.push(PublishedMessage {
            topic: topic.to_string(),
            payload,
        });
        Ok(())
    }
}
