//! Data models for vessel telemetry
//!
//! This module contains the core data structures shared by the three
//! collectors: tag mapping entries, telemetry records and their fields, and
//! the collector identities with their resilience tiers.

use crate::constants::{self, envelope_keys};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// =============================================================================
// Collector Identity
// =============================================================================

/// The three dataset formats, one collector per format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollectorKind {
    /// Tag-mapped CSV rows grouped per device
    Vessel1,
    /// Sectioned CSV with min/max columns
    Vessel2,
    /// HTML table dump read in fixed strides
    Vessel3,
}

impl CollectorKind {
    /// Value of the `Collector` envelope key
    pub fn collector_name(&self) -> &'static str {
        match self {
            CollectorKind::Vessel1 => constants::VESSEL1_COLLECTOR_NAME,
            CollectorKind::Vessel2 => constants::VESSEL2_COLLECTOR_NAME,
            CollectorKind::Vessel3 => constants::VESSEL3_COLLECTOR_NAME,
        }
    }

    /// Value of the `CollectorType` envelope key
    pub fn collector_type(&self) -> &'static str {
        match self {
            CollectorKind::Vessel1 => constants::VESSEL1_COLLECTOR_TYPE,
            CollectorKind::Vessel2 => constants::VESSEL2_COLLECTOR_TYPE,
            CollectorKind::Vessel3 => constants::VESSEL3_COLLECTOR_TYPE,
        }
    }

    pub fn default_data_file(&self) -> PathBuf {
        PathBuf::from(match self {
            CollectorKind::Vessel1 => constants::VESSEL1_DATA_FILE,
            CollectorKind::Vessel2 => constants::VESSEL2_DATA_FILE,
            CollectorKind::Vessel3 => constants::VESSEL3_DATA_FILE,
        })
    }

    pub fn default_pacing(&self) -> Duration {
        match self {
            CollectorKind::Vessel1 => constants::VESSEL1_PACING,
            CollectorKind::Vessel2 => constants::VESSEL2_PACING,
            CollectorKind::Vessel3 => constants::VESSEL3_PACING,
        }
    }

    /// How a failure of this collector's replay loop is handled
    pub fn resilience(&self) -> Resilience {
        match self {
            CollectorKind::Vessel1 | CollectorKind::Vessel3 => Resilience::Fatal,
            CollectorKind::Vessel2 => Resilience::Contained,
        }
    }
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collector_type())
    }
}

impl FromStr for CollectorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "vessel1" => Ok(CollectorKind::Vessel1),
            "vessel2" => Ok(CollectorKind::Vessel2),
            "vessel3" => Ok(CollectorKind::Vessel3),
            other => Err(Error::configuration(format!(
                "Unknown collector '{}' (expected vessel1, vessel2 or vessel3)",
                other
            ))),
        }
    }
}

/// Failure handling tier of a supervised task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resilience {
    /// Failure ends the task and terminates the process
    Fatal,
    /// Failure is logged, the task stops for good, the process keeps running
    Contained,
}

// =============================================================================
// Tag Mapping
// =============================================================================

/// One line of a tag mapping file: `tagKey,deviceID,channel,unit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapEntry {
    /// Column header this entry reads from
    pub tag_key: String,

    /// Device the channel belongs to; records are grouped on this
    pub device_id: String,

    /// Channel name as written in the mapping file (unsanitized)
    pub channel: String,

    /// Unit of measure emitted as `<channel>_UOM`
    pub unit: String,
}

impl TagMapEntry {
    pub fn new(
        tag_key: impl Into<String>,
        device_id: impl Into<String>,
        channel: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            tag_key: tag_key.into(),
            device_id: device_id.into(),
            channel: channel.into(),
            unit: unit.into(),
        }
    }

    /// Channel name usable as an envelope key
    pub fn field_name(&self) -> String {
        sanitize_field_name(&self.channel)
    }
}

// =============================================================================
// Telemetry Records
// =============================================================================

/// A single field value, either numeric or passed through as text
///
/// Numbers keep the digits of their source text, so `100` is published as
/// `100` and long decimals are not rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(Number),
    Text(String),
}

impl Reading {
    /// Parse a decimal reading, rejecting empty and non-finite input
    pub fn parse_decimal(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let value = trimmed.parse::<f64>().map_err(|e| {
            Error::data_validation(format!("Invalid decimal value '{}': {}", trimmed, e))
        })?;

        if !value.is_finite() {
            return Err(Error::data_validation(format!(
                "Non-finite decimal value '{}'",
                trimmed
            )));
        }

        // Forms JSON has no literal for (`+5`, `.5`, `5.`) fall back to the float
        let number = match trimmed.parse::<Number>() {
            Ok(number) => number,
            Err(_) => Number::from_f64(value).ok_or_else(|| {
                Error::data_validation(format!("Unrepresentable decimal value '{}'", trimmed))
            })?,
        };

        Ok(Reading::Number(number))
    }
}

/// One named field of a telemetry record
///
/// A field flattens into the envelope as `<name>`, then `<name>_UOM` when a
/// unit is present, then `<name>_<key>` for every extra pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Sanitized field name
    pub name: String,

    pub value: Reading,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Ordered companion values (alarm statuses in markup records)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl FieldValue {
    /// Create a field; the name is sanitized
    pub fn new(name: &str, value: Reading) -> Self {
        Self {
            name: sanitize_field_name(name),
            value,
            unit: None,
            extra: Vec::new(),
        }
    }

    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self::new(name, Reading::Text(value.into()))
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Envelope keys this field produces, in emission order
    pub fn flattened_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(2 + self.extra.len());
        keys.push(self.name.clone());
        if self.unit.is_some() {
            keys.push(self.unit_key());
        }
        for (key, _) in &self.extra {
            keys.push(format!("{}_{}", self.name, key));
        }
        keys
    }

    pub fn unit_key(&self) -> String {
        format!("{}_{}", self.name, envelope_keys::UOM_SUFFIX)
    }
}

/// A normalized telemetry record, one envelope on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub collector: String,
    pub collector_type: String,
    pub device_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    /// Cycle timestamp, shared by every record of one replay cycle
    pub timestamp: String,

    pub fields: Vec<FieldValue>,
}

impl TelemetryRecord {
    pub fn new(
        collector: impl Into<String>,
        collector_type: impl Into<String>,
        device_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            collector: collector.into(),
            collector_type: collector_type.into(),
            device_id: device_id.into(),
            device_type: None,
            timestamp: timestamp.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    pub fn push_field(&mut self, field: FieldValue) {
        self.fields.push(field);
    }

    /// Every envelope key of this record: metadata first, then fields
    pub fn flattened_keys(&self) -> Vec<String> {
        let mut keys = vec![
            envelope_keys::COLLECTOR.to_string(),
            envelope_keys::COLLECTOR_TYPE.to_string(),
            envelope_keys::DEVICE_ID.to_string(),
        ];
        if self.device_type.is_some() {
            keys.push(envelope_keys::DEVICE_TYPE.to_string());
        }
        keys.push(envelope_keys::DATE_TIME.to_string());
        keys.extend(self.fields.iter().flat_map(FieldValue::flattened_keys));
        keys
    }
}

/// Replace spaces and hyphens with underscores
pub fn sanitize_field_name(name: &str) -> String {
    name.replace([' ', '-'], "_")
}
