//! Vessel Collectors Library
//!
//! Replays static instrument exports as a paced stream of telemetry envelopes
//! published to an MQTT broker.
//!
//! This library provides tools for:
//! - Loading tag mappings that bind CSV columns to device channels
//! - Replaying tag-mapped CSV rows grouped per device (`Vessel1`)
//! - Extracting min/max readings from sectioned instrument CSV (`Vessel2`)
//! - Extracting fixed-stride channel cells from HTML table dumps (`Vessel3`)
//! - Encoding records as canonical JSON envelopes and publishing them
//! - Relaying inbound broker messages and simulating a leaf device

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod collector;
        pub mod emitter;
        pub mod envelope;
        pub mod markup_extractor;
        pub mod relay;
        pub mod row_replay;
        pub mod sectioned_parser;
        pub mod simulator;
        pub mod supervisor;
        pub mod tag_map;
    }
    pub mod adapters {
        pub mod dataset;
        pub mod publisher;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CollectorKind, FieldValue, Reading, TagMapEntry, TelemetryRecord};
pub use config::Config;

/// Result type alias for the vessel collectors
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for loading, replaying and publishing vessel telemetry
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Tag mapping line could not be loaded
    #[error("Tag map error in file '{file}' at line {line}: {message}")]
    TagMap {
        file: String,
        line: usize,
        message: String,
    },

    /// Sectioned CSV layout error (missing tag, unit or metadata value)
    #[error("Section format error: {message}")]
    SectionFormat { message: String },

    /// Markup dataset error (selector, truncated stride)
    #[error("Markup error: {message}")]
    Markup { message: String },

    /// A source value could not be converted
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Envelope encoding failed
    #[error("Envelope encoding error: {message}")]
    Envelope {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Publishing to the broker failed
    #[error("Publish error on topic '{topic}': {message}")]
    Publish { topic: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Supervised task panicked or was aborted
    #[error("Task '{task}' did not complete: {message}")]
    TaskJoin { task: String, message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a tag map error for a specific line (1-based)
    pub fn tag_map(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::TagMap {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a sectioned CSV format error
    pub fn section_format(message: impl Into<String>) -> Self {
        Self::SectionFormat {
            message: message.into(),
        }
    }

    /// Create a markup dataset error
    pub fn markup(message: impl Into<String>) -> Self {
        Self::Markup {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create an envelope encoding error
    pub fn envelope(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Envelope {
            message: message.into(),
            source,
        }
    }

    /// Create a publish error
    pub fn publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a task join error
    pub fn task_join(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskJoin {
            task: task.into(),
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Envelope {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<rumqttc::ClientError> for Error {
    fn from(error: rumqttc::ClientError) -> Self {
        Self::Publish {
            topic: "(session)".to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_keeps_source() {
        let error = Error::io(
            "Failed to read map",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(error.to_string().contains("Failed to read map"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_tag_map_error_display() {
        let error = Error::tag_map("map.csv", 3, "expected 4 fields, found 2");
        assert_eq!(
            error.to_string(),
            "Tag map error in file 'map.csv' at line 3: expected 4 fields, found 2"
        );
    }
}
