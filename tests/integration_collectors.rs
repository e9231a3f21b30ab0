//! End-to-end tests: dataset files on disk through to published envelopes

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vessel_collectors::app::adapters::publisher::MemoryPublisher;
use vessel_collectors::app::models::Resilience;
use vessel_collectors::app::services::collector::Collector;
use vessel_collectors::app::services::emitter::Emitter;
use vessel_collectors::app::services::supervisor::TaskOutcome;
use vessel_collectors::config::CollectorConfig;
use vessel_collectors::{CollectorKind, Error};

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn create_emitter() -> (Emitter, MemoryPublisher) {
    let publisher = MemoryPublisher::new();
    (Emitter::new(Arc::new(publisher.clone()), "output1"), publisher)
}

fn vessel1_config(dir: &TempDir, mapping: &str, dataset: &str) -> CollectorConfig {
    let map_file = write_file(dir, "Vessel1TagMapping.csv", mapping.as_bytes());
    let data_file = write_file(dir, "Vessel1DataSet.csv", dataset.as_bytes());
    CollectorConfig::for_kind(CollectorKind::Vessel1)
        .with_map_file(map_file)
        .with_data_file(data_file)
}

#[tokio::test]
async fn test_row_replay_envelope() {
    let dir = TempDir::new().unwrap();
    let config = vessel1_config(
        &dir,
        "T1,D1,Temp,C\nT2,D2,Flow Rate,l/h\n",
        "Time,T1,T2\r\n08:00,23.5,4\r\n",
    );

    let collector = Collector::prepare(&config).await.unwrap().unwrap();
    let (emitter, publisher) = create_emitter();
    assert_eq!(collector.run_once(&emitter).await.unwrap(), 2);

    let messages = publisher.messages().await;
    let first = String::from_utf8(messages[0].payload.clone()).unwrap();
    assert!(first.starts_with(
        "{\"Collector\":\"Vessel1Collector\",\"CollectorType\":\"Vessel1\",\"DeviceID\":\"D1\",\"DateTime\":\""
    ));
    assert!(first.ends_with(",\"Temp\":23.5,\"Temp_UOM\":\"C\"}"));

    let second = messages[1].json().unwrap();
    assert_eq!(second["DeviceID"], "D2");
    assert_eq!(second["Flow_Rate"], 4.0);
    assert_eq!(second["Flow_Rate_UOM"], "l/h");
}

#[tokio::test]
async fn test_byte_order_marks_do_not_hide_tags() {
    let dir = TempDir::new().unwrap();
    let map_file = write_file(&dir, "Vessel1TagMapping.csv", b"\xEF\xBB\xBFT1,D1,Temp,C\n");
    let data_file = write_file(&dir, "Vessel1DataSet.csv", b"\xEF\xBB\xBFTime,T1\n08:00,23.5\n");
    let config = CollectorConfig::for_kind(CollectorKind::Vessel1)
        .with_map_file(map_file)
        .with_data_file(data_file);

    let collector = Collector::prepare(&config).await.unwrap().unwrap();
    let (emitter, publisher) = create_emitter();
    assert_eq!(collector.run_once(&emitter).await.unwrap(), 1);

    let json = publisher.messages().await[0].json().unwrap();
    assert_eq!(json["Temp"], 23.5);
}

#[tokio::test]
async fn test_sectioned_exact_digits() {
    let dir = TempDir::new().unwrap();
    let data_file = write_file(
        &dir,
        "Vessel2DataSet.csv",
        b"\xEF\xBB\xBFDevice Type,FlowMeter\nTag,Flow\nUnit,l/h\nDate\nd,t,60,100,12345678901234567890.5\n",
    );

    let config = CollectorConfig::for_kind(CollectorKind::Vessel2).with_data_file(data_file);
    let collector = Collector::prepare(&config).await.unwrap().unwrap();
    let (emitter, publisher) = create_emitter();
    assert_eq!(collector.run_once(&emitter).await.unwrap(), 1);

    let payload = String::from_utf8(publisher.messages().await[0].payload.clone()).unwrap();
    assert!(payload.contains("\"DeviceType\":\"FlowMeter\""));
    assert!(payload.ends_with(
        "\"Flow_MIN\":100,\"Flow_MAX\":12345678901234567890.5,\"Flow_UOM\":\"l/h\"}"
    ));
}

#[tokio::test]
async fn test_bad_mapping_line_keeps_prefix() {
    let dir = TempDir::new().unwrap();
    let config = vessel1_config(
        &dir,
        "T1,D1,Temp,C\nbroken line\nT2,D1,Flow,l/h\n",
        "T1,T2\n1,2\n",
    );

    let collector = Collector::prepare(&config).await.unwrap().unwrap();
    let (emitter, publisher) = create_emitter();
    collector.run_once(&emitter).await.unwrap();

    let json = publisher.messages().await[0].json().unwrap();
    assert_eq!(json["Temp"], 1.0);
    assert!(json.get("Flow").is_none());
}

#[tokio::test]
async fn test_row_replay_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = vessel1_config(&dir, "T1,D1,Temp,C\n", "T1\nnot-a-number\n");

    let collector = Collector::prepare(&config).await.unwrap().unwrap();
    assert_eq!(collector.resilience(), Resilience::Fatal);

    let (emitter, _publisher) = create_emitter();
    let result = collector.spawn(emitter, Duration::from_secs(60)).join().await;
    assert!(matches!(result, Err(Error::DataValidation { .. })));
}

#[tokio::test]
async fn test_sectioned_latin1_micro_sign() {
    let dir = TempDir::new().unwrap();
    let mut content = b"Device Type,CondMeter\nSerial No.,SN-1\nTag,Cond\nUnit,".to_vec();
    content.push(0xB5);
    content.extend_from_slice(b"S/cm\nDate,Time\n01/06/2024,08:00,60,1.5,2.5\n");
    let data_file = write_file(&dir, "Vessel2DataSet.csv", &content);

    let config = CollectorConfig::for_kind(CollectorKind::Vessel2).with_data_file(data_file);
    let collector = Collector::prepare(&config).await.unwrap().unwrap();
    let (emitter, publisher) = create_emitter();
    assert_eq!(collector.run_once(&emitter).await.unwrap(), 1);

    let json = publisher.messages().await[0].json().unwrap();
    assert_eq!(json["DeviceType"], "CondMeter");
    assert_eq!(json["DeviceID"], "SN-1");
    assert_eq!(json["Cond_MIN"], 1.5);
    assert_eq!(json["Cond_MAX"], 2.5);
    assert_eq!(json["Cond_UOM"], "uS/cm");
}

#[tokio::test(start_paused = true)]
async fn test_sectioned_failure_is_contained() {
    let dir = TempDir::new().unwrap();
    let data_file = write_file(
        &dir,
        "Vessel2DataSet.csv",
        b"Tag,Cond\nUnit,uS/cm\nDate\nd,t,60,1.0,2.0\nd,t,60,1.0,2.0,3.0\n",
    );

    let config = CollectorConfig::for_kind(CollectorKind::Vessel2).with_data_file(data_file);
    let collector = Collector::prepare(&config).await.unwrap().unwrap();
    assert_eq!(collector.resilience(), Resilience::Contained);

    let (emitter, publisher) = create_emitter();
    let outcome = collector
        .spawn(emitter, Duration::from_secs(600))
        .join()
        .await
        .unwrap();

    assert!(matches!(outcome, TaskOutcome::Disabled { .. }));
    assert_eq!(publisher.len().await, 1);
}

#[tokio::test]
async fn test_markup_dump() {
    let dir = TempDir::new().unwrap();
    let mut html = String::from("<html><body><table><tr>");
    for i in 0..9 {
        html.push_str(&format!("<td>Header {}</td>", i));
    }
    html.push_str("<td>&nbsp;</td></tr><tr>");
    for cell in ["Outlet Temp", "OK", "OK", "OK", "Low", "18.4", "degC"] {
        html.push_str(&format!("<td>{}</td>", cell));
    }
    html.push_str("</tr></table></body></html>");
    let data_file = write_file(&dir, "Vessel3DataSet.html", html.as_bytes());

    let config = CollectorConfig::for_kind(CollectorKind::Vessel3)
        .with_data_file(data_file)
        .with_device_id("Bench7");
    let collector = Collector::prepare(&config).await.unwrap().unwrap();
    let (emitter, publisher) = create_emitter();
    assert_eq!(collector.run_once(&emitter).await.unwrap(), 1);

    let json = publisher.messages().await[0].json().unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        vec![
            "Collector",
            "CollectorType",
            "DeviceID",
            "DateTime",
            "Outlet_Temp",
            "Outlet_Temp_UOM",
            "Outlet_Temp_AlarmStatus1",
            "Outlet_Temp_AlarmStatus2",
            "Outlet_Temp_AlarmStatus3",
            "Outlet_Temp_AlarmStatus4",
        ]
    );
    assert_eq!(json["DeviceID"], "Bench7");
    assert_eq!(json["Outlet_Temp"], "18.4");
    assert_eq!(json["Outlet_Temp_AlarmStatus4"], "Low");
}

#[tokio::test]
async fn test_missing_dataset_prepares_nothing() {
    let dir = TempDir::new().unwrap();
    for kind in [
        CollectorKind::Vessel1,
        CollectorKind::Vessel2,
        CollectorKind::Vessel3,
    ] {
        let config =
            CollectorConfig::for_kind(kind).with_data_file(dir.path().join("missing.dat"));
        assert!(Collector::prepare(&config).await.unwrap().is_none());
    }
}
