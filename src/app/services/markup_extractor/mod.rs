//! Fixed-stride markup extractor (`Vessel3`)
//!
//! The cell list produced by [`loader::load_cells`] has a fixed layout: nine
//! leading caption cells, then seven cells per channel (name, four alarm
//! statuses, value, unit). Every poll turns the whole list into one
//! multi-channel record; the cells never change after startup.

pub mod loader;

#[cfg(test)]
pub mod tests;

pub use loader::load_cells;

use crate::app::adapters::dataset::TextDataset;
use crate::app::models::{FieldValue, TelemetryRecord};
use crate::app::services::collector::cycle_timestamp;
use crate::app::services::emitter::Emitter;
use crate::constants::VESSEL3_COLLECTOR_TYPE;
use crate::constants::markup_layout::{
    ALARM_STATUS_COUNT, CHANNEL_STRIDE, FIRST_CHANNEL_CELL, UNIT_OFFSET, VALUE_OFFSET,
};
use crate::{Error, Result};
use std::time::Duration;
use tracing::info;

/// Polls a cached cell list as one record per cycle
#[derive(Debug, Clone)]
pub struct MarkupExtractor {
    collector_name: String,
    device_id: String,
    file_name: String,
    cells: Vec<String>,
}

impl MarkupExtractor {
    pub fn new(
        collector_name: impl Into<String>,
        device_id: impl Into<String>,
        file_name: impl Into<String>,
        cells: Vec<String>,
    ) -> Self {
        Self {
            collector_name: collector_name.into(),
            device_id: device_id.into(),
            file_name: file_name.into(),
            cells,
        }
    }

    /// Build an extractor from a loaded HTML dataset
    pub fn from_dataset(
        collector_name: impl Into<String>,
        device_id: impl Into<String>,
        dataset: &TextDataset,
    ) -> Result<Self> {
        let cells = load_cells(&dataset.text)?;
        Ok(Self::new(collector_name, device_id, dataset.file_name(), cells))
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Number of channel strides starting in the cell list
    pub fn channel_count(&self) -> usize {
        self.cells
            .len()
            .saturating_sub(FIRST_CHANNEL_CELL)
            .div_ceil(CHANNEL_STRIDE)
    }

    /// Build the record for one poll
    ///
    /// A stride that starts inside the list but runs past its end is an
    /// error; nothing partial is returned.
    pub fn build_record(&self, timestamp: &str) -> Result<TelemetryRecord> {
        let mut record = TelemetryRecord::new(
            &self.collector_name,
            VESSEL3_COLLECTOR_TYPE,
            &self.device_id,
            timestamp,
        );

        for start in (FIRST_CHANNEL_CELL..self.cells.len()).step_by(CHANNEL_STRIDE) {
            let stride = self.cells.get(start..start + CHANNEL_STRIDE).ok_or_else(|| {
                Error::markup(format!(
                    "Truncated channel at cell {}: {} cells remain, {} expected",
                    start,
                    self.cells.len() - start,
                    CHANNEL_STRIDE
                ))
            })?;

            let mut field = FieldValue::text(&stride[0], stride[VALUE_OFFSET].as_str())
                .with_unit(stride[UNIT_OFFSET].as_str());
            for status in 1..=ALARM_STATUS_COUNT {
                field = field.with_extra(format!("AlarmStatus{}", status), stride[status].as_str());
            }
            record.push_field(field);
        }

        Ok(record)
    }

    pub async fn run_cycle(&self, emitter: &Emitter, timestamp: &str) -> Result<()> {
        let record = self.build_record(timestamp)?;
        emitter.emit(&record).await
    }

    /// Poll forever, pausing `pacing` after each record
    pub async fn run(self, emitter: Emitter, pacing: Duration) -> Result<()> {
        loop {
            let timestamp = cycle_timestamp();
            self.run_cycle(&emitter, &timestamp).await?;
            info!(
                "{}: File {} - processed successfully.",
                self.collector_name, self.file_name
            );
            tokio::time::sleep(pacing).await;
        }
    }
}
