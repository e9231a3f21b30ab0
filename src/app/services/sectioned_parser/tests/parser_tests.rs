//! Tests for the header state machine and min/max row parsing

use super::*;
use crate::Error;
use crate::app::models::Reading;
use crate::app::services::sectioned_parser::header::normalize_unit;

fn decimal(text: &str) -> Reading {
    Reading::Number(text.parse().unwrap())
}

#[test]
fn test_header_rows_produce_no_records() {
    let mut parser = create_parser();
    assert!(parser.feed("Device Type,CondMeter 200", "ts").unwrap().is_none());
    assert!(parser.feed("Serial No.,SN-4411", "ts").unwrap().is_none());
    assert!(parser.feed("Tag,Conductivity,Water Temp", "ts").unwrap().is_none());
    assert!(parser.feed("Unit,?S/cm,degC", "ts").unwrap().is_none());
    assert!(!parser.reading_measurements());

    assert!(parser.feed("Date,Time", "ts").unwrap().is_none());
    assert!(parser.reading_measurements());

    let header = parser.header();
    assert_eq!(header.device_type, "CondMeter 200");
    assert_eq!(header.device_id, "SN-4411");
    assert_eq!(header.tags, vec!["Conductivity", "Water_Temp"]);
    assert_eq!(header.units, vec!["uS/cm", "degC"]);
}

#[test]
fn test_record_layout_per_row() {
    let records = create_parser().parse_all(SAMPLE_EXPORT, "ts").unwrap();
    assert_eq!(records.len(), 2);

    let record = &records[0];
    assert_eq!(record.collector, "Vessel2Collector");
    assert_eq!(record.collector_type, "Vessel2");
    assert_eq!(record.device_id, "SN-4411");
    assert_eq!(record.device_type.as_deref(), Some("CondMeter 200"));

    // 2 channels: 4 values, 2 units, 5 metadata keys
    let keys = record.flattened_keys();
    assert_eq!(keys.len(), 11);
    assert_eq!(
        &keys[5..],
        &[
            "Conductivity_MIN",
            "Conductivity_MAX",
            "Conductivity_UOM",
            "Water_Temp_MIN",
            "Water_Temp_MAX",
            "Water_Temp_UOM",
        ]
    );

    assert_eq!(record.fields[0].value, decimal("1.1"));
    assert_eq!(record.fields[1].value, decimal("1.9"));
    assert_eq!(record.fields[2].value, Reading::Text("uS/cm".to_string()));
    assert_eq!(records[1].fields[4].value, decimal("20.9"));
}

#[test]
fn test_empty_fields_are_dropped() {
    let mut parser = create_parser();
    parser.feed("Tag,,Flow", "ts").unwrap();
    parser.feed("Unit,,l/h,,", "ts").unwrap();
    parser.feed("Date", "ts").unwrap();

    let record = parser.feed("d,,t,60,1.0,,2.0", "ts").unwrap().unwrap();
    assert_eq!(record.fields.len(), 3);
    assert_eq!(record.fields[0].name, "Flow_MIN");
    assert_eq!(record.fields[2].value, Reading::Text("l/h".to_string()));
}

#[test]
fn test_blank_lines_are_skipped() {
    let mut parser = create_parser();
    parser.feed("Date", "ts").unwrap();
    assert!(parser.feed("", "ts").unwrap().is_none());
    assert!(parser.feed(",,,", "ts").unwrap().is_none());
}

#[test]
fn test_microsiemens_repair() {
    assert_eq!(normalize_unit("?S/cm"), "uS/cm");
    assert_eq!(normalize_unit(" \u{FFFD}S/cm "), "uS/cm");
    assert_eq!(normalize_unit("mS/cm"), "mS/cm");
}

#[test]
fn test_missing_unit_fails() {
    let mut parser = create_parser();
    parser.feed("Tag,Conductivity", "ts").unwrap();
    parser.feed("Date", "ts").unwrap();

    let result = parser.feed("d,t,60,1.0,2.0", "ts");
    assert!(matches!(result, Err(Error::SectionFormat { .. })));
}

#[test]
fn test_more_readings_than_tags_fails() {
    let mut parser = create_parser();
    parser.feed("Tag,Conductivity", "ts").unwrap();
    parser.feed("Unit,uS/cm", "ts").unwrap();
    parser.feed("Date", "ts").unwrap();

    assert!(parser.feed("d,t,60,1.0,2.0,3.0", "ts").is_err());
}

#[test]
fn test_extra_units_are_ignored() {
    let mut parser = create_parser();
    parser.feed("Tag,Flow", "ts").unwrap();
    parser.feed("Unit,l/h,bar,degC", "ts").unwrap();
    assert_eq!(parser.header().unmatched_units(), 2);
    parser.feed("Date", "ts").unwrap();

    let record = parser.feed("d,t,60,4,5", "ts").unwrap().unwrap();
    let names: Vec<&str> = record.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Flow_MIN", "Flow_MAX", "Flow_UOM"]);
}

#[test]
fn test_unit_row_matching_tags_has_no_unmatched_units() {
    let mut parser = create_parser();
    parser.feed("Tag,Flow,Pressure", "ts").unwrap();
    parser.feed("Unit,l/h", "ts").unwrap();
    assert_eq!(parser.header().unmatched_units(), 0);
}

#[test]
fn test_non_numeric_reading_fails() {
    let mut parser = create_parser();
    parser.feed("Tag,Conductivity", "ts").unwrap();
    parser.feed("Unit,uS/cm", "ts").unwrap();
    parser.feed("Date", "ts").unwrap();

    assert!(parser.feed("d,t,60,---,2.0", "ts").is_err());
}

#[test]
fn test_metadata_row_without_value_fails() {
    let mut parser = create_parser();
    let result = parser.feed("Serial No.", "ts");
    assert!(matches!(result, Err(Error::SectionFormat { .. })));
}
