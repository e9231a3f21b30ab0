//! Configuration management and validation.
//!
//! Provides configuration structures for the collectors, the broker session
//! and the leaf-device simulator. Values are layered: built-in defaults,
//! then environment variables, then command-line overrides.

use crate::app::models::CollectorKind;
use crate::constants::{self, env_vars, simulator};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Settings for a single collector process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Which dataset format this process replays
    pub kind: CollectorKind,

    /// Value of the `Collector` envelope key
    pub collector_name: String,

    /// Dataset file read once at startup
    pub data_file: PathBuf,

    /// Tag mapping file (row-replay collector only)
    pub map_file: Option<PathBuf>,

    /// Fixed device identifier (markup collector only)
    pub device_id: Option<String>,

    /// Delay between replay cycles in seconds
    pub pacing_secs: u64,

    /// Topic envelopes and relayed messages are published on
    pub output_topic: String,

    /// Topic the relay subscribes to
    pub input_topic: String,
}

impl CollectorConfig {
    /// Defaults for the given collector
    pub fn for_kind(kind: CollectorKind) -> Self {
        Self {
            kind,
            collector_name: kind.collector_name().to_string(),
            data_file: kind.default_data_file(),
            map_file: match kind {
                CollectorKind::Vessel1 => Some(PathBuf::from(constants::VESSEL1_MAP_FILE)),
                _ => None,
            },
            device_id: match kind {
                CollectorKind::Vessel3 => Some(constants::VESSEL3_DEVICE_ID.to_string()),
                _ => None,
            },
            pacing_secs: kind.default_pacing().as_secs(),
            output_topic: constants::DEFAULT_OUTPUT_TOPIC.to_string(),
            input_topic: constants::DEFAULT_INPUT_TOPIC.to_string(),
        }
    }

    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self
    }

    pub fn with_map_file(mut self, map_file: impl Into<PathBuf>) -> Self {
        self.map_file = Some(map_file.into());
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_pacing_secs(mut self, pacing_secs: u64) -> Self {
        self.pacing_secs = pacing_secs;
        self
    }

    pub fn with_output_topic(mut self, topic: impl Into<String>) -> Self {
        self.output_topic = topic.into();
        self
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_secs(self.pacing_secs)
    }

    /// Apply `VESSEL_*` environment overrides
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(env_vars::DATA_FILE) {
            self.data_file = PathBuf::from(path);
        }
        if let Some(path) = lookup(env_vars::MAP_FILE) {
            self.map_file = Some(PathBuf::from(path));
        }
        if let Some(device_id) = lookup(env_vars::DEVICE_ID) {
            self.device_id = Some(device_id);
        }
        if let Some(secs) = lookup(env_vars::PACING_SECS) {
            self.pacing_secs = secs.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    env_vars::PACING_SECS,
                    secs
                ))
            })?;
        }
        if let Some(topic) = lookup(env_vars::OUTPUT_TOPIC) {
            self.output_topic = topic;
        }
        if let Some(topic) = lookup(env_vars::INPUT_TOPIC) {
            self.input_topic = topic;
        }
        Ok(self)
    }

    /// Validate collector settings
    pub fn validate(&self) -> Result<()> {
        if self.collector_name.trim().is_empty() {
            return Err(Error::configuration("Collector name cannot be empty"));
        }
        if self.output_topic.trim().is_empty() {
            return Err(Error::configuration("Output topic cannot be empty"));
        }
        if self.kind == CollectorKind::Vessel1 && self.map_file.is_none() {
            return Err(Error::configuration(
                "Row-replay collector requires a tag mapping file",
            ));
        }
        if self.kind == CollectorKind::Vessel3
            && self.device_id.as_deref().is_none_or(|id| id.trim().is_empty())
        {
            return Err(Error::configuration(
                "Markup collector requires a device identifier",
            ));
        }
        Ok(())
    }
}

/// Broker session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_BROKER_HOST.to_string(),
            port: constants::DEFAULT_BROKER_PORT,
            client_id: constants::DEFAULT_CLIENT_ID.to_string(),
            keep_alive_secs: constants::DEFAULT_KEEP_ALIVE_SECS,
        }
    }
}

impl BrokerConfig {
    /// Parse a connection string
    ///
    /// Accepts either `mqtt://host[:port]` or `;`-separated `Key=Value`
    /// pairs with a required `HostName` and optional `Port`, `DeviceId` or
    /// `ClientId`. Unknown keys (e.g. `SharedAccessKey`) are ignored.
    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        let trimmed = connection_string.trim();
        if trimmed.is_empty() {
            return Err(Error::configuration("Connection string is empty"));
        }

        let mut config = Self::default();

        if let Some(rest) = trimmed
            .strip_prefix("mqtt://")
            .or_else(|| trimmed.strip_prefix("tcp://"))
        {
            let authority = rest.trim_end_matches('/');
            match authority.rsplit_once(':') {
                Some((host, port)) => {
                    config.host = host.to_string();
                    config.port = parse_port(port)?;
                }
                None => config.host = authority.to_string(),
            }
            if config.host.is_empty() {
                return Err(Error::configuration("Connection string has no host"));
            }
            return Ok(config);
        }

        let mut host = None;
        for pair in trimmed.split(';').filter(|pair| !pair.trim().is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::configuration(format!("Malformed connection string segment '{}'", pair))
            })?;
            match key.trim() {
                "HostName" => host = Some(value.trim().to_string()),
                "Port" => config.port = parse_port(value)?,
                "DeviceId" | "ClientId" => config.client_id = value.trim().to_string(),
                other => debug!("Ignoring connection string key '{}'", other),
            }
        }

        config.host = host
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::configuration("Connection string is missing HostName"))?;
        Ok(config)
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|_| Error::configuration(format!("Invalid broker port '{}'", raw.trim())))
}

/// Leaf-device simulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Messages per batch
    pub message_count: usize,

    pub message_interval_secs: u64,
    pub batch_pause_secs: u64,
    pub topic: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            message_count: simulator::DEFAULT_MESSAGE_COUNT,
            message_interval_secs: simulator::MESSAGE_INTERVAL.as_secs(),
            batch_pause_secs: simulator::BATCH_PAUSE.as_secs(),
            topic: simulator::DEFAULT_TOPIC.to_string(),
        }
    }
}

impl SimulatorConfig {
    /// Apply the `MESSAGE_COUNT` override; an unparseable value keeps the default
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(env_vars::MESSAGE_COUNT).filter(|v| !v.trim().is_empty()) {
            match raw.trim().parse::<usize>() {
                Ok(count) => self.message_count = count,
                Err(_) => warn!(
                    "Invalid number of messages in env variable {}. {} set to {}",
                    env_vars::MESSAGE_COUNT,
                    env_vars::MESSAGE_COUNT,
                    self.message_count
                ),
            }
        }
        self
    }

    pub fn with_message_count(mut self, message_count: usize) -> Self {
        self.message_count = message_count;
        self
    }

    pub fn message_interval(&self) -> Duration {
        Duration::from_secs(self.message_interval_secs)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_secs(self.batch_pause_secs)
    }
}

/// Complete configuration of a collector process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub collector: CollectorConfig,
    pub broker: BrokerConfig,
}

impl Config {
    /// Load configuration with layered approach: defaults <- environment
    pub fn load_layered<F>(kind: CollectorKind, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let collector = CollectorConfig::for_kind(kind).apply_env(&lookup)?;

        let mut broker = match lookup(env_vars::BROKER_CONNECTION_STRING) {
            Some(connection_string) => BrokerConfig::from_connection_string(&connection_string)?,
            None => BrokerConfig::default(),
        };
        if broker.client_id == constants::DEFAULT_CLIENT_ID {
            broker.client_id = collector.collector_name.clone();
        }

        Ok(Self { collector, broker })
    }

    /// Load from the process environment
    pub fn from_env(kind: CollectorKind) -> Result<Self> {
        Self::load_layered(kind, |key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<()> {
        self.collector.validate()?;
        if self.broker.host.trim().is_empty() {
            return Err(Error::configuration("Broker host cannot be empty"));
        }
        Ok(())
    }
}
