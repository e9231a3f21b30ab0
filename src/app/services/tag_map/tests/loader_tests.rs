//! Tests for tag map loading

use super::*;
use crate::Error;
use crate::app::models::TagMapEntry;
use crate::app::services::tag_map::TagMap;
use crate::app::services::tag_map::loader::parse_mapping_line;
use std::path::Path;

#[test]
fn test_parse_complete_mapping() {
    let (map, stats) = TagMap::parse_str(create_test_mapping(), "map.csv");

    assert!(stats.is_complete());
    assert_eq!(stats.lines_read, 5);
    assert_eq!(stats.entries_loaded, 5);
    assert_eq!(map.len(), 5);
    assert_eq!(map.device_count(), 3);

    let entry = map.get("PT301").unwrap();
    assert_eq!(entry.device_id, "PUMP-2");
    assert_eq!(entry.channel, "Outlet Pressure");
    assert_eq!(entry.unit, "bar");
    assert_eq!(entry.field_name(), "Outlet_Pressure");
}

#[test]
fn test_entries_keep_file_order() {
    let (map, _) = TagMap::parse_str(create_test_mapping(), "map.csv");
    let keys: Vec<&str> = map.entries().iter().map(|e| e.tag_key.as_str()).collect();
    assert_eq!(keys, vec!["TT101", "FT201", "PT301", "TT102", "CT401"]);
}

#[test]
fn test_sorted_by_device_is_stable() {
    let (map, _) = TagMap::parse_str(create_test_mapping(), "map.csv");
    let sorted: Vec<(String, String)> = map
        .sorted_by_device()
        .into_iter()
        .map(|e| (e.device_id, e.tag_key))
        .collect();

    assert_eq!(
        sorted,
        vec![
            ("DOSER".to_string(), "CT401".to_string()),
            ("PUMP-1".to_string(), "FT201".to_string()),
            ("PUMP-1".to_string(), "TT102".to_string()),
            ("PUMP-2".to_string(), "TT101".to_string()),
            ("PUMP-2".to_string(), "PT301".to_string()),
        ]
    );
}

#[test]
fn test_malformed_line_keeps_prefix() {
    // Line 3 is malformed: the first two entries survive, nothing after it
    let content = "A,D1,Temp,C\nB,D1,Flow,l/h\nC,D2\nD,D2,Level,m\n";
    let (map, stats) = TagMap::parse_str(content, "map.csv");

    assert_eq!(map.len(), 2);
    assert!(map.contains_key("A"));
    assert!(map.contains_key("B"));
    assert!(!map.contains_key("D"));
    assert_eq!(stats.lines_read, 3);
    assert!(matches!(stats.failure, Some(Error::TagMap { line: 3, .. })));
}

#[test]
fn test_malformed_first_line_yields_empty_map() {
    let (map, stats) = TagMap::parse_str("garbage\nA,D1,Temp,C\n", "map.csv");
    assert!(map.is_empty());
    assert!(!stats.is_complete());
}

#[test]
fn test_duplicate_key_stops_loading() {
    let content = "A,D1,Temp,C\nA,D2,Temp,C\nB,D2,Flow,l/h\n";
    let (map, stats) = TagMap::parse_str(content, "map.csv");

    assert_eq!(map.len(), 1);
    assert_eq!(map.get("A").unwrap().device_id, "D1");
    assert!(matches!(stats.failure, Some(Error::TagMap { line: 2, .. })));
}

#[test]
fn test_blank_line_is_malformed() {
    let content = "A,D1,Temp,C\n\nB,D1,Flow,l/h\n";
    let (map, stats) = TagMap::parse_str(content, "map.csv");
    assert_eq!(map.len(), 1);
    assert!(matches!(stats.failure, Some(Error::TagMap { line: 2, .. })));
}

#[test]
fn test_extra_fields_are_ignored() {
    let entry = parse_mapping_line("A,D1,Temp,C,ignored", "map.csv", 1).unwrap();
    assert_eq!(entry, TagMapEntry::new("A", "D1", "Temp", "C"));
}

#[tokio::test]
async fn test_load_from_file() {
    let file = create_temp_file("T1,D1,Temp,C\r\nT2,D1,Flow,l/h\r\n");
    let (map, stats) = TagMap::load(file.path()).await;
    assert!(stats.is_complete());
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("T2").unwrap().unit, "l/h");
}

#[tokio::test]
async fn test_load_missing_file_is_not_fatal() {
    let map = TagMap::load_and_report(Path::new("/nonexistent/map.csv"), "Vessel1Collector").await;
    assert!(map.is_empty());
}
