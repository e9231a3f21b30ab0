//! Header section state of a sectioned instrument CSV
//!
//! Rows before the `Date` marker describe the data that follows: the channel
//! tags, their units, the device type and its serial number.

use crate::app::models::sanitize_field_name;
use crate::constants::section_markers::{MICROSIEMENS, MISENCODED_MICROSIEMENS};
use crate::{Error, Result};

/// Metadata collected from the header rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionHeader {
    /// Sanitized channel tags, in column order
    pub tags: Vec<String>,

    /// Units matching `tags` by position
    pub units: Vec<String>,

    pub device_type: String,

    /// Serial number, used as the device identifier
    pub device_id: String,
}

impl SectionHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the values of a `Tag` row
    pub fn add_tags(&mut self, values: &[&str]) {
        self.tags
            .extend(values.iter().map(|tag| sanitize_field_name(tag.trim())));
    }

    /// Append the values of a `Unit` row
    pub fn add_units(&mut self, values: &[&str]) {
        self.units.extend(values.iter().map(|unit| normalize_unit(unit)));
    }

    /// Tag and unit for a reading column pair
    pub fn channel(&self, channel_index: usize) -> Result<(&str, &str)> {
        let tag = self.tags.get(channel_index).ok_or_else(|| {
            Error::section_format(format!(
                "No tag for channel {} ({} tags declared)",
                channel_index,
                self.tags.len()
            ))
        })?;
        let unit = self.units.get(channel_index).ok_or_else(|| {
            Error::section_format(format!(
                "No unit for channel {} ({} units declared)",
                channel_index,
                self.units.len()
            ))
        })?;
        Ok((tag, unit))
    }

    /// Units declared beyond the last tag; data rows never read them
    pub fn unmatched_units(&self) -> usize {
        self.units.len().saturating_sub(self.tags.len())
    }

    pub fn tag(&self, channel_index: usize) -> Result<&str> {
        self.tags.get(channel_index).map(String::as_str).ok_or_else(|| {
            Error::section_format(format!(
                "No tag for channel {} ({} tags declared)",
                channel_index,
                self.tags.len()
            ))
        })
    }
}

/// Trim a unit and repair the mis-encoded micro-siemens unit
pub fn normalize_unit(raw: &str) -> String {
    let trimmed = raw.trim();
    if MISENCODED_MICROSIEMENS.contains(&trimmed) {
        MICROSIEMENS.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Second field of a metadata row, trimmed
pub fn metadata_value(fields: &[&str]) -> Result<String> {
    fields
        .get(1)
        .map(|value| value.trim().to_string())
        .ok_or_else(|| {
            Error::section_format(format!("Metadata row '{}' has no value", fields[0]))
        })
}
