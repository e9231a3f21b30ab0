//! Data row parsing for sectioned instrument CSV
//!
//! Readings start at column 3 and come in pairs per channel: the odd column
//! holds the minimum, the even column the maximum. Channel `k` covers columns
//! `3 + 2k` and `4 + 2k`.

use super::header::SectionHeader;
use crate::app::models::{FieldValue, Reading, TelemetryRecord};
use crate::constants::VESSEL2_COLLECTOR_TYPE;
use crate::constants::envelope_keys::UOM_SUFFIX;
use crate::constants::section_markers::{FIRST_VALUE_COLUMN, MAX_SUFFIX, MIN_SUFFIX};
use crate::{Error, Result};

/// Build the record of one data row
///
/// Per channel the fields are `<tag>_MIN`, `<tag>_MAX`, `<tag>_UOM`. A
/// trailing minimum without its maximum yields only `<tag>_MIN`.
pub fn parse_data_row(
    fields: &[&str],
    header: &SectionHeader,
    collector_name: &str,
    timestamp: &str,
) -> Result<TelemetryRecord> {
    let mut record = TelemetryRecord::new(
        collector_name,
        VESSEL2_COLLECTOR_TYPE,
        &header.device_id,
        timestamp,
    )
    .with_device_type(&header.device_type);

    for (column, raw) in fields.iter().enumerate().skip(FIRST_VALUE_COLUMN) {
        let channel_index = (column - FIRST_VALUE_COLUMN) / 2;
        let value = parse_reading(raw, column)?;

        if column % 2 == 0 {
            let (tag, unit) = header.channel(channel_index)?;
            record.push_field(FieldValue::new(&format!("{}_{}", tag, MAX_SUFFIX), value));
            record.push_field(FieldValue::text(&format!("{}_{}", tag, UOM_SUFFIX), unit));
        } else {
            let tag = header.tag(channel_index)?;
            record.push_field(FieldValue::new(&format!("{}_{}", tag, MIN_SUFFIX), value));
        }
    }

    Ok(record)
}

fn parse_reading(raw: &str, column: usize) -> Result<Reading> {
    Reading::parse_decimal(raw)
        .map_err(|e| Error::data_validation(format!("Column {}: {}", column, e)))
}
