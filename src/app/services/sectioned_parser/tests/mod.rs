//! Fixtures for sectioned extractor tests

use crate::app::adapters::dataset::TextDataset;
use crate::app::adapters::publisher::MemoryPublisher;
use crate::app::services::emitter::Emitter;
use crate::app::services::sectioned_parser::{SectionParser, SectionedExtractor};
use std::sync::Arc;

mod parser_tests;

/// Instrument export with two channels and two data rows
pub const SAMPLE_EXPORT: &str = "\
Instrument Export,,,
Device Type,CondMeter 200
Serial No.,SN-4411

Tag,Conductivity,Water Temp
Unit,?S/cm,degC
Date,Time,Interval,Conductivity Min,Conductivity Max,Water Temp Min,Water Temp Max
01/06/2024,08:00,60,1.1,1.9,20.1,20.8
01/06/2024,08:01,60,1.2,2.0,20.2,20.9
";

pub fn create_parser() -> SectionParser {
    SectionParser::new("Vessel2Collector")
}

pub fn create_extractor(text: &str) -> SectionedExtractor {
    SectionedExtractor::new(
        "Vessel2Collector",
        TextDataset::from_text("Vessel2DataSet.csv", text),
    )
}

/// Emitter recording into a memory publisher
pub fn create_emitter() -> (Emitter, MemoryPublisher) {
    let publisher = MemoryPublisher::new();
    (Emitter::new(Arc::new(publisher.clone()), "output1"), publisher)
}
