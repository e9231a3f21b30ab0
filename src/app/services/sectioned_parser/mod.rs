//! Sectioned instrument CSV extractor (`Vessel2`)
//!
//! The dataset is an instrument export with a header section (device type,
//! serial number, tag and unit rows), a `Date` marker row, then data rows of
//! min/max reading pairs. Each cycle re-parses the cached text from the top
//! with fresh state and publishes one record per data row as it goes.
//!
//! ## Components
//!
//! - [`header`] - header section state and unit repair
//! - [`record_parser`] - data row to record conversion
//! - [`parser`] - the line-by-line state machine

pub mod header;
pub mod parser;
pub mod record_parser;

#[cfg(test)]
pub mod tests;

pub use header::SectionHeader;
pub use parser::SectionParser;

use crate::Result;
use crate::app::adapters::dataset::TextDataset;
use crate::app::services::collector::cycle_timestamp;
use crate::app::services::emitter::Emitter;
use std::time::Duration;
use tracing::info;

/// Replays a cached sectioned CSV as per-row min/max records
#[derive(Debug, Clone)]
pub struct SectionedExtractor {
    collector_name: String,
    dataset: TextDataset,
}

impl SectionedExtractor {
    pub fn new(collector_name: impl Into<String>, dataset: TextDataset) -> Self {
        Self {
            collector_name: collector_name.into(),
            dataset,
        }
    }

    /// One pass over the cached text, publishing each record as it is parsed
    pub async fn run_cycle(&self, emitter: &Emitter, timestamp: &str) -> Result<usize> {
        let mut parser = SectionParser::new(&self.collector_name);
        let mut published = 0;

        for line in self.dataset.text.lines() {
            if let Some(record) = parser.feed(line, timestamp)? {
                emitter.emit(&record).await?;
                published += 1;
            }
        }

        Ok(published)
    }

    /// Replay forever, pausing `pacing` after each pass
    ///
    /// Returns on the first failure; the caller decides whether to restart
    /// (this crate never does).
    pub async fn run(self, emitter: Emitter, pacing: Duration) -> Result<()> {
        loop {
            let timestamp = cycle_timestamp();
            let published = self.run_cycle(&emitter, &timestamp).await?;
            info!(
                "{}: File {} - processed successfully ({} records).",
                self.collector_name,
                self.dataset.file_name(),
                published
            );
            tokio::time::sleep(pacing).await;
        }
    }
}
