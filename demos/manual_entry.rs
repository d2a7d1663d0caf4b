//! Manual entry and protocol replay example
//!
//! This example creates sensors by hand, then replays a captured device log
//! into the same registry and prints the processed results.
//!
//! Run with: `cargo run --example manual_entry`

use sensor_hub::{IngestionLoop, IterSource, LineOutcome, Sensor, SensorRegistry};

fn main() {
    println!("=== Sensor Hub Manual Entry Example ===\n");

    let mut registry = SensorRegistry::new();

    // Manual creation, like options 1 and 2 of the interactive menu
    registry.insert(Sensor::temperature("T-001").unwrap()).unwrap();
    registry.insert(Sensor::pressure("P-105").unwrap()).unwrap();

    // Manual readings
    registry.find_mut("T-001").unwrap().add_reading(45.3).unwrap();
    registry.find_mut("T-001").unwrap().add_reading(42.1).unwrap();
    registry.find_mut("P-105").unwrap().add_reading(80i64).unwrap();
    registry.find_mut("P-105").unwrap().add_reading(85i64).unwrap();

    // Captured device output
    let capture = vec![
        "=== Simulador de sensores ===",
        "Formato: T ID VALOR  o  P ID VALOR",
        "T T-001 23.5",
        "P P-010 101325",
        "42.5",
        "T T-002 19.8",
        "P T-001 7",
        "X foo 1",
        "P P-010 101298",
    ];

    println!("{:<40} Outcome", "Line");
    println!("{}", "-".repeat(90));

    let mut source = IterSource::new(capture.iter().copied());
    let mut lines = capture.iter();
    let report = IngestionLoop::new()
        .run_with(&mut source, &mut registry, |outcome| {
            let line = lines.next().copied().unwrap_or_default();
            if !matches!(outcome, LineOutcome::Ignored) {
                println!("{:<40} {}", line, outcome);
            }
        })
        .unwrap();

    println!("\n=== Summary ===");
    println!("Lines read:        {}", report.stats.lines);
    println!("Readings accepted: {}", report.stats.accepted);
    println!("Malformed lines:   {}", report.stats.malformed);
    println!("Rejected readings: {}", report.stats.rejected);

    println!("\n=== Processing ===");
    for sensor in registry.iter() {
        println!("{}", sensor.describe());
    }

    let released = registry.teardown();
    println!("\nReleased {} sensors", released);
}
