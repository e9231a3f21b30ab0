//! Application constants for the vessel collectors
//!
//! This module contains collector identities, default file names, pacing
//! intervals, parser markers and broker defaults used throughout the crate.

use std::time::Duration;

// =============================================================================
// Collector Identity
// =============================================================================

/// Collector names as they appear in the `Collector` envelope key
pub const VESSEL1_COLLECTOR_NAME: &str = "Vessel1Collector";
pub const VESSEL2_COLLECTOR_NAME: &str = "Vessel2Collector";
pub const VESSEL3_COLLECTOR_NAME: &str = "Vessel3Collector";

/// Values of the `CollectorType` envelope key
pub const VESSEL1_COLLECTOR_TYPE: &str = "Vessel1";
pub const VESSEL2_COLLECTOR_TYPE: &str = "Vessel2";
pub const VESSEL3_COLLECTOR_TYPE: &str = "Vessel3";

/// Device identifier stamped on every markup record
pub const VESSEL3_DEVICE_ID: &str = "FoulingBench";

// =============================================================================
// Dataset Files
// =============================================================================

/// Default tag mapping file for the row-replay collector
pub const VESSEL1_MAP_FILE: &str = "Vessel1TagMapping.csv";

/// Default dataset files, resolved relative to the working directory
pub const VESSEL1_DATA_FILE: &str = "Vessel1DataSet.csv";
pub const VESSEL2_DATA_FILE: &str = "Vessel2DataSet.csv";
pub const VESSEL3_DATA_FILE: &str = "Vessel3DataSet.html";

// =============================================================================
// Pacing
// =============================================================================

/// Delay between replay cycles of each collector
pub const VESSEL1_PACING: Duration = Duration::from_secs(60);
pub const VESSEL2_PACING: Duration = Duration::from_secs(600);
pub const VESSEL3_PACING: Duration = Duration::from_secs(30);

// =============================================================================
// Envelope Keys
// =============================================================================

pub mod envelope_keys {
    pub const COLLECTOR: &str = "Collector";
    pub const COLLECTOR_TYPE: &str = "CollectorType";
    pub const DEVICE_ID: &str = "DeviceID";
    pub const DEVICE_TYPE: &str = "DeviceType";
    pub const DATE_TIME: &str = "DateTime";

    /// Suffix for the unit-of-measure companion of a field
    pub const UOM_SUFFIX: &str = "UOM";
}

/// Timestamp rendering used for `DateTime` (local time, `M/d/yyyy h:mm:ss AM`)
pub const DATETIME_FORMAT: &str = "%-m/%-d/%Y %-I:%M:%S %p";

// =============================================================================
// Sectioned CSV Markers
// =============================================================================

pub mod section_markers {
    /// First field of the row listing channel tags
    pub const TAG: &str = "Tag";

    /// First field of the row listing channel units
    pub const UNIT: &str = "Unit";

    /// First field of the row that separates header sections from data
    pub const DATE: &str = "Date";

    pub const DEVICE_TYPE: &str = "Device Type";
    pub const SERIAL_NO: &str = "Serial No.";

    /// Column of the first reading in a data row
    pub const FIRST_VALUE_COLUMN: usize = 3;

    /// Micro-sign conductivity unit after a lossy decode
    pub const MISENCODED_MICROSIEMENS: &[&str] = &["?S/cm", "\u{FFFD}S/cm"];
    pub const MICROSIEMENS: &str = "uS/cm";

    pub const MIN_SUFFIX: &str = "MIN";
    pub const MAX_SUFFIX: &str = "MAX";
}

// =============================================================================
// Markup Layout
// =============================================================================

pub mod markup_layout {
    /// Index of the first channel-name cell
    pub const FIRST_CHANNEL_CELL: usize = 9;

    /// Cells per channel: name, four alarm statuses, value, unit
    pub const CHANNEL_STRIDE: usize = 7;

    pub const ALARM_STATUS_COUNT: usize = 4;
    pub const VALUE_OFFSET: usize = 5;
    pub const UNIT_OFFSET: usize = 6;

    /// Cell text of a blank placeholder cell after entity decoding
    pub const PLACEHOLDER_TEXT: &str = "\u{a0}";
    pub const PLACEHOLDER_ENTITY: &str = "&nbsp;";
}

// =============================================================================
// Broker Defaults
// =============================================================================

/// Topic every envelope and relayed message is published on
pub const DEFAULT_OUTPUT_TOPIC: &str = "output1";

/// Topic the relay listens on
pub const DEFAULT_INPUT_TOPIC: &str = "input1";

pub const DEFAULT_BROKER_HOST: &str = "localhost";
pub const DEFAULT_BROKER_PORT: u16 = 1883;
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 30;

/// Client identifier used when neither the connection string nor the
/// collector supplies one
pub const DEFAULT_CLIENT_ID: &str = "vessel-collector";

/// Capacity of the rumqttc request channel
pub const MQTT_REQUEST_CAPACITY: usize = 10;

/// Capacity of the inbound relay queue
pub const RELAY_QUEUE_CAPACITY: usize = 64;

// =============================================================================
// Environment Variables
// =============================================================================

pub mod env_vars {
    pub const DATA_FILE: &str = "VESSEL_DATA_FILE";
    pub const MAP_FILE: &str = "VESSEL_MAP_FILE";
    pub const DEVICE_ID: &str = "VESSEL_DEVICE_ID";
    pub const PACING_SECS: &str = "VESSEL_PACING_SECS";
    pub const OUTPUT_TOPIC: &str = "VESSEL_OUTPUT_TOPIC";
    pub const INPUT_TOPIC: &str = "VESSEL_INPUT_TOPIC";
    pub const BROKER_CONNECTION_STRING: &str = "BROKER_CONNECTION_STRING";
    pub const DEVICE_CONNECTION_STRING: &str = "DEVICE_CONNECTION_STRING";
    pub const MESSAGE_COUNT: &str = "MESSAGE_COUNT";
}

// =============================================================================
// Simulator
// =============================================================================

pub mod simulator {
    use std::time::Duration;

    pub const COLLECTOR_TYPE: &str = "VesselAdapter";
    pub const DEFAULT_MESSAGE_COUNT: usize = 10;
    pub const MESSAGE_INTERVAL: Duration = Duration::from_secs(5);
    pub const BATCH_PAUSE: Duration = Duration::from_secs(300);

    /// Exclusive upper bound of a simulated reading
    pub const READING_UPPER_BOUND: u32 = 100;

    /// Simulated channels and the seed of each channel's generator
    pub const CHANNELS: &[(&str, u64)] = &[
        ("I2CPressure", 10),
        ("I2CTemperature", 20),
        ("Conductivity1", 30),
        ("Conductivity2", 40),
        ("Flow", 50),
        ("Pressure1", 60),
        ("Pressure2", 70),
    ];

    pub const DEFAULT_TOPIC: &str = "devices/leaf/messages/events";
}
