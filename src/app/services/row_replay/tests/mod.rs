//! Fixtures for row-replay tests

use crate::app::adapters::dataset::LineDataset;
use crate::app::adapters::publisher::MemoryPublisher;
use crate::app::services::emitter::Emitter;
use crate::app::services::row_replay::RowReplayEngine;
use crate::app::services::tag_map::TagMap;
use std::sync::Arc;


/// Build an engine from inline mapping and dataset text
pub fn create_engine(mapping: &str, dataset: &[&str]) -> RowReplayEngine {
    let (tag_map, stats) = TagMap::parse_str(mapping, "map.csv");
    assert!(stats.is_complete(), "fixture mapping must load completely");
    RowReplayEngine::new(
        "Vessel1Collector",
        &tag_map,
        LineDataset::from_lines("Vessel1DataSet.csv", dataset.iter().copied()),
    )
    .unwrap()
}

/// Emitter recording into a memory publisher
pub fn create_emitter() -> (Emitter, MemoryPublisher) {
    let publisher = MemoryPublisher::new();
    (Emitter::new(Arc::new(publisher.clone()), "output1"), publisher)
}
