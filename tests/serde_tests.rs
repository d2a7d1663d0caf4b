//! JSON shape of presentation snapshots
//!
//! Run with: cargo test --features serde

#![cfg(feature = "serde")]

use sensor_hub::{IngestionLoop, IterSource, SensorRegistry};
use serde_json::json;

#[test]
fn test_snapshot_json() {
    let mut registry = SensorRegistry::new();
    let mut source = IterSource::new(["T T-001 23.5", "T T-001 21.0", "P P-010 100"]);
    IngestionLoop::new().run(&mut source, &mut registry).unwrap();

    let value = serde_json::to_value(registry.snapshots()).unwrap();
    assert_eq!(
        value,
        json!([
            {
                "id": "T-001",
                "kind": "float",
                "reading_count": 2,
                "values": [23.5, 21.0],
                "aggregate": { "type": "minimum", "value": 21.0 }
            },
            {
                "id": "P-010",
                "kind": "integer",
                "reading_count": 1,
                "values": [100],
                "aggregate": { "type": "mean", "value": 100.0 }
            }
        ])
    );
}

#[test]
fn test_empty_snapshot_json() {
    let mut registry = SensorRegistry::new();
    registry
        .find_or_create("P-1", sensor_hub::NumericKind::Integer)
        .unwrap();

    let value = serde_json::to_value(registry.find("P-1").unwrap().describe()).unwrap();
    assert_eq!(value["aggregate"], serde_json::Value::Null);
    assert_eq!(value["reading_count"], 0);
}

#[test]
fn test_report_json() {
    let mut registry = SensorRegistry::new();
    let mut source = IterSource::new(["T a 1.0", "junk"]);
    let report = IngestionLoop::new().run(&mut source, &mut registry).unwrap();

    let value = serde_json::to_value(report).unwrap();
    assert_eq!(value["stop_reason"], "end_of_stream");
    assert_eq!(value["stats"]["accepted"], 1);
    assert_eq!(value["stats"]["malformed"], 1);
}
