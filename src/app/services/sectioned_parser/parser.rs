//! Line-by-line state machine for sectioned instrument CSV
//!
//! Lines are split on commas with empty fields dropped, so `a,,b` is read as
//! two fields. Lines with no fields are skipped. Until the `Date` marker row
//! the parser collects header metadata; every row after it is a data row and
//! produces one record as soon as it is fed.

use super::header::{SectionHeader, metadata_value};
use super::record_parser::parse_data_row;
use crate::Result;
use crate::app::models::TelemetryRecord;
use crate::constants::section_markers::{DATE, DEVICE_TYPE, SERIAL_NO, TAG, UNIT};
use tracing::{trace, warn};

/// Parser state for one pass over the dataset
#[derive(Debug, Clone)]
pub struct SectionParser {
    collector_name: String,
    reading_measurements: bool,
    header: SectionHeader,
    lines_seen: usize,
}

impl SectionParser {
    pub fn new(collector_name: impl Into<String>) -> Self {
        Self {
            collector_name: collector_name.into(),
            reading_measurements: false,
            header: SectionHeader::new(),
            lines_seen: 0,
        }
    }

    pub fn header(&self) -> &SectionHeader {
        &self.header
    }

    /// Whether the `Date` marker has been passed
    pub fn reading_measurements(&self) -> bool {
        self.reading_measurements
    }

    /// Feed one line; returns a record for data rows
    pub fn feed(&mut self, line: &str, timestamp: &str) -> Result<Option<TelemetryRecord>> {
        self.lines_seen += 1;

        let fields: Vec<&str> = line.split(',').filter(|field| !field.is_empty()).collect();
        if fields.is_empty() {
            return Ok(None);
        }

        if self.reading_measurements {
            let record = parse_data_row(&fields, &self.header, &self.collector_name, timestamp)
                .map_err(|e| {
                    crate::Error::section_format(format!("Line {}: {}", self.lines_seen, e))
                })?;
            return Ok(Some(record));
        }

        match fields[0] {
            TAG => self.header.add_tags(&fields[1..]),
            UNIT => self.header.add_units(&fields[1..]),
            DATE => {
                trace!("Data section starts at line {}", self.lines_seen);
                let unmatched = self.header.unmatched_units();
                if unmatched > 0 {
                    warn!(
                        "{}: {} units declared without a tag are ignored ({} tags, {} units)",
                        self.collector_name,
                        unmatched,
                        self.header.tags.len(),
                        self.header.units.len()
                    );
                }
                self.reading_measurements = true;
            }
            DEVICE_TYPE => self.header.device_type = metadata_value(&fields)?,
            SERIAL_NO => self.header.device_id = metadata_value(&fields)?,
            _ => {}
        }

        Ok(None)
    }

    /// Parse a whole text, collecting every record
    pub fn parse_all(&mut self, text: &str, timestamp: &str) -> Result<Vec<TelemetryRecord>> {
        let mut records = Vec::new();
        for line in text.lines() {
            if let Some(record) = self.feed(line, timestamp)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}
