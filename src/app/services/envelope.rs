//! Envelope encoding
//!
//! A [`TelemetryRecord`] becomes a flat JSON object: metadata keys first
//! (`Collector`, `CollectorType`, `DeviceID`, optional `DeviceType`,
//! `DateTime`), then every field flattened in source order. The object is
//! built with `serde_json` directly, so quotes and separators inside source
//! values are escaped rather than corrupting the document.

use crate::app::models::{FieldValue, Reading, TelemetryRecord};
use crate::constants::envelope_keys;
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Build the envelope object for a record
pub fn to_value(record: &TelemetryRecord) -> Value {
    let mut object = Map::new();
    object.insert(
        envelope_keys::COLLECTOR.to_string(),
        Value::String(record.collector.clone()),
    );
    object.insert(
        envelope_keys::COLLECTOR_TYPE.to_string(),
        Value::String(record.collector_type.clone()),
    );
    object.insert(
        envelope_keys::DEVICE_ID.to_string(),
        Value::String(record.device_id.clone()),
    );
    if let Some(device_type) = &record.device_type {
        object.insert(
            envelope_keys::DEVICE_TYPE.to_string(),
            Value::String(device_type.clone()),
        );
    }
    object.insert(
        envelope_keys::DATE_TIME.to_string(),
        Value::String(record.timestamp.clone()),
    );

    for field in &record.fields {
        flatten_field(field, &mut object);
    }

    Value::Object(object)
}

/// Canonical envelope bytes for a record
pub fn encode(record: &TelemetryRecord) -> Result<Vec<u8>> {
    let value = to_value(record);
    serde_json::to_vec(&value)
        .map_err(|e| Error::envelope(format!("Failed to encode {} envelope", record.device_id), e))
}

fn flatten_field(field: &FieldValue, object: &mut Map<String, Value>) {
    object.insert(field.name.clone(), reading_value(&field.value));
    if let Some(unit) = &field.unit {
        object.insert(field.unit_key(), Value::String(unit.clone()));
    }
    for (key, value) in &field.extra {
        object.insert(format!("{}_{}", field.name, key), Value::String(value.clone()));
    }
}

fn reading_value(reading: &Reading) -> Value {
    match reading {
        Reading::Number(number) => Value::Number(number.clone()),
        Reading::Text(text) => Value::String(text.clone()),
    }
}
