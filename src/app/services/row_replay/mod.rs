//! Row-replay engine for tag-mapped CSV datasets (`Vessel1`)
//!
//! The dataset's first line names the columns; every later line is one
//! sample row. The tag map says which columns belong to which device and
//! channel. For each row the engine emits one record per device, holding the
//! device's channels in tag-map order, each paired with a `_UOM` unit field.
//!
//! A cycle replays every row with a single timestamp taken at cycle start,
//! then the engine sleeps for the pacing delay and starts over from the first
//! data row.

use crate::app::adapters::dataset::{LineDataset, display_name};
use crate::app::models::{FieldValue, Reading, TagMapEntry, TelemetryRecord};
use crate::app::services::collector::cycle_timestamp;
use crate::app::services::emitter::Emitter;
use crate::app::services::tag_map::TagMap;
use crate::constants::VESSEL1_COLLECTOR_TYPE;
use crate::{Error, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod column_index;

#[cfg(test)]
pub mod tests;

pub use column_index::ColumnIndex;

/// A tag-map entry bound to its header column
#[derive(Debug, Clone)]
pub struct MappedChannel {
    pub entry: TagMapEntry,

    /// Sanitized channel name
    pub field_name: String,

    /// Column the value is read from
    pub column: usize,
}

/// Consecutive channels of one device in the device-sorted tag map
#[derive(Debug, Clone)]
pub struct DeviceGroup {
    pub device_id: String,
    pub channels: Vec<MappedChannel>,
}

/// Replays tag-mapped CSV rows as per-device records
#[derive(Debug, Clone)]
pub struct RowReplayEngine {
    collector_name: String,
    file_name: String,
    groups: Vec<DeviceGroup>,
    rows: Vec<String>,
}

impl RowReplayEngine {
    /// Bind the tag map to the dataset header
    ///
    /// A tag key that names no header column falls back to column 0.
    pub fn new(collector_name: impl Into<String>, tag_map: &TagMap, dataset: LineDataset) -> Result<Self> {
        let collector_name = collector_name.into();
        let file_name = display_name(&dataset.path);

        let mut lines = dataset.lines.into_iter();
        let header = lines.next().ok_or_else(|| {
            Error::data_validation(format!("Dataset {} has no header line", file_name))
        })?;
        let columns = ColumnIndex::from_header(&header);
        let rows: Vec<String> = lines.collect();

        let groups = group_by_device(tag_map.sorted_by_device(), &columns, &collector_name);

        debug!(
            "{}: {} columns, {} rows, {} device groups",
            collector_name,
            columns.len(),
            rows.len(),
            groups.len()
        );

        Ok(Self {
            collector_name,
            file_name,
            groups,
            rows,
        })
    }

    pub fn groups(&self) -> &[DeviceGroup] {
        &self.groups
    }

    /// Build the record of one device group for one row
    pub fn build_record(
        &self,
        group: &DeviceGroup,
        row_number: usize,
        readings: &[&str],
        timestamp: &str,
    ) -> Result<TelemetryRecord> {
        let mut record = TelemetryRecord::new(
            &self.collector_name,
            VESSEL1_COLLECTOR_TYPE,
            &group.device_id,
            timestamp,
        );

        for channel in &group.channels {
            let raw = readings.get(channel.column).ok_or_else(|| {
                Error::data_validation(format!(
                    "{} row {}: no column {} for tag '{}'",
                    self.file_name, row_number, channel.column, channel.entry.tag_key
                ))
            })?;
            let value = Reading::parse_decimal(raw).map_err(|e| {
                Error::data_validation(format!(
                    "{} row {}, tag '{}': {}",
                    self.file_name, row_number, channel.entry.tag_key, e
                ))
            })?;

            record.push_field(
                FieldValue::new(&channel.field_name, value).with_unit(&channel.entry.unit),
            );
        }

        Ok(record)
    }

    /// All records of one row, one per device group in device order
    pub fn records_for_row(&self, row_number: usize, timestamp: &str) -> Result<Vec<TelemetryRecord>> {
        let row = self.rows.get(row_number).ok_or_else(|| {
            Error::data_validation(format!("{} has no data row {}", self.file_name, row_number))
        })?;
        let readings: Vec<&str> = row.split(',').collect();

        self.groups
            .iter()
            .map(|group| self.build_record(group, row_number, &readings, timestamp))
            .collect()
    }

    /// Replay every data row once with a shared timestamp
    ///
    /// Records are published as soon as each device group is complete, so a
    /// conversion failure leaves earlier records of the row published.
    pub async fn run_cycle(&self, emitter: &Emitter, timestamp: &str) -> Result<usize> {
        let mut published = 0;

        for (row_number, row) in self.rows.iter().enumerate() {
            let readings: Vec<&str> = row.split(',').collect();
            for group in &self.groups {
                let record = self.build_record(group, row_number, &readings, timestamp)?;
                emitter.emit(&record).await?;
                published += 1;
            }
        }

        Ok(published)
    }

    /// Replay forever, pausing `pacing` after each full pass
    ///
    /// Returns only on failure.
    pub async fn run(self, emitter: Emitter, pacing: Duration) -> Result<()> {
        if self.groups.is_empty() {
            warn!(
                "{}: tag map is empty, cycles will publish nothing",
                self.collector_name
            );
        }

        loop {
            let timestamp = cycle_timestamp();
            let published = self.run_cycle(&emitter, &timestamp).await?;
            info!(
                "{}: File {} - replayed {} rows as {} records.",
                self.collector_name,
                self.file_name,
                self.rows.len(),
                published
            );
            tokio::time::sleep(pacing).await;
        }
    }
}

/// Split device-sorted entries into runs of equal device identifiers
fn group_by_device(
    sorted_entries: Vec<TagMapEntry>,
    columns: &ColumnIndex,
    collector_name: &str,
) -> Vec<DeviceGroup> {
    let mut groups: Vec<DeviceGroup> = Vec::new();

    for entry in sorted_entries {
        let column = columns.position(&entry.tag_key).unwrap_or_else(|| {
            warn!(
                "{}: tag '{}' not found in header, reading column 0",
                collector_name, entry.tag_key
            );
            0
        });
        let channel = MappedChannel {
            field_name: entry.field_name(),
            column,
            entry,
        };

        match groups.last_mut() {
            Some(group) if group.device_id == channel.entry.device_id => {
                group.channels.push(channel)
            }
            _ => groups.push(DeviceGroup {
                device_id: channel.entry.device_id.clone(),
                channels: vec![channel],
            }),
        }
    }

    groups
}
