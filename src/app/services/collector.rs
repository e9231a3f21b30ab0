//! Collector assembly and dispatch
//!
//! Binds a [`CollectorConfig`] to one of the three replay engines, loads its
//! dataset snapshot and runs the engine under the supervision tier of its
//! kind.

use crate::Result;
use crate::app::adapters::dataset::{LineDataset, TextDataset, dataset_exists};
use crate::app::models::{CollectorKind, Resilience};
use crate::app::services::emitter::Emitter;
use crate::app::services::markup_extractor::MarkupExtractor;
use crate::app::services::row_replay::RowReplayEngine;
use crate::app::services::sectioned_parser::SectionedExtractor;
use crate::app::services::supervisor::{SupervisedTask, spawn_supervised};
use crate::app::services::tag_map::TagMap;
use crate::config::CollectorConfig;
use crate::constants::{DATETIME_FORMAT, VESSEL1_MAP_FILE, VESSEL3_DEVICE_ID};
use chrono::Local;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Timestamp shared by every record of one cycle
pub fn cycle_timestamp() -> String {
    Local::now().format(DATETIME_FORMAT).to_string()
}

/// A collector ready to replay its dataset
#[derive(Debug)]
pub enum Collector {
    RowReplay(RowReplayEngine),

    /// The sectioned dataset is read when the task starts, so a read failure
    /// is contained like any later parse failure.
    Sectioned {
        collector_name: String,
        path: PathBuf,
    },

    Markup(MarkupExtractor),
}

impl Collector {
    /// Load the dataset named by `config`
    ///
    /// Returns `None` when the dataset file does not exist; the collector
    /// then has nothing to do and the process stays idle.
    pub async fn prepare(config: &CollectorConfig) -> Result<Option<Self>> {
        let name = &config.collector_name;

        if !dataset_exists(&config.data_file).await {
            warn!(
                "{}: Data file {} not found.",
                name,
                config.data_file.display()
            );
            return Ok(None);
        }

        info!(
            "{}: Retrieving device data from file {}...",
            name,
            config.data_file.display()
        );

        let collector = match config.kind {
            CollectorKind::Vessel1 => {
                let map_file = config
                    .map_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(VESSEL1_MAP_FILE));
                let tag_map = TagMap::load_and_report(&map_file, name).await;
                let dataset = LineDataset::load(&config.data_file).await?;
                Collector::RowReplay(RowReplayEngine::new(name.as_str(), &tag_map, dataset)?)
            }
            CollectorKind::Vessel2 => Collector::Sectioned {
                collector_name: name.clone(),
                path: config.data_file.clone(),
            },
            CollectorKind::Vessel3 => {
                let device_id = config.device_id.as_deref().unwrap_or(VESSEL3_DEVICE_ID);
                let dataset = TextDataset::load(&config.data_file).await?;
                Collector::Markup(MarkupExtractor::from_dataset(
                    name.as_str(),
                    device_id,
                    &dataset,
                )?)
            }
        };

        Ok(Some(collector))
    }

    pub fn kind(&self) -> CollectorKind {
        match self {
            Collector::RowReplay(_) => CollectorKind::Vessel1,
            Collector::Sectioned { .. } => CollectorKind::Vessel2,
            Collector::Markup(_) => CollectorKind::Vessel3,
        }
    }

    pub fn resilience(&self) -> Resilience {
        self.kind().resilience()
    }

    /// Run the replay loop until it fails
    pub async fn run(self, emitter: Emitter, pacing: Duration) -> Result<()> {
        match self {
            Collector::RowReplay(engine) => engine.run(emitter, pacing).await,
            Collector::Sectioned {
                collector_name,
                path,
            } => {
                let dataset = TextDataset::load(&path).await?;
                SectionedExtractor::new(collector_name, dataset)
                    .run(emitter, pacing)
                    .await
            }
            Collector::Markup(extractor) => extractor.run(emitter, pacing).await,
        }
    }

    /// Run a single cycle and return the number of records published
    pub async fn run_once(&self, emitter: &Emitter) -> Result<usize> {
        let timestamp = cycle_timestamp();
        match self {
            Collector::RowReplay(engine) => engine.run_cycle(emitter, &timestamp).await,
            Collector::Sectioned {
                collector_name,
                path,
            } => {
                let dataset = TextDataset::load(path).await?;
                SectionedExtractor::new(collector_name.as_str(), dataset)
                    .run_cycle(emitter, &timestamp)
                    .await
            }
            Collector::Markup(extractor) => {
                extractor.run_cycle(emitter, &timestamp).await?;
                Ok(1)
            }
        }
    }

    /// Spawn the replay loop under the tier of this collector's kind
    pub fn spawn(self, emitter: Emitter, pacing: Duration) -> SupervisedTask {
        let name = self.kind().collector_name();
        let resilience = self.resilience();
        spawn_supervised(name, resilience, self.run(emitter, pacing))
    }
}
