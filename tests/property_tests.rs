//! Randomized property checks for ingestion and aggregation
//!
//! Every test uses a seeded RNG so failures are reproducible.

use std::collections::HashSet;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sensor_hub::{Aggregate, IngestionLoop, IterSource, NumericKind, SensorRegistry};

const SEEDS: [u64; 4] = [1, 7, 42, 2025];

#[test]
fn prop_registry_size_equals_distinct_ids() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut lines = Vec::new();
        let mut ids = HashSet::new();

        for _ in 0..500 {
            let n: u32 = rng.gen_range(0..60);
            // Tag letter is derived from the id so no kind conflicts occur
            let (tag, id) = if n % 2 == 0 {
                ("T", format!("T-{:03}", n))
            } else {
                ("P", format!("P-{:03}", n))
            };
            let value = if tag == "T" {
                format!("{:.2}", rng.gen_range(-40.0..85.0))
            } else {
                rng.gen_range(90_000..110_000i64).to_string()
            };
            lines.push(format!("{} {} {}", tag, id, value));
            ids.insert(id);
        }

        let mut registry = SensorRegistry::new();
        let report = IngestionLoop::new()
            .run(&mut IterSource::new(lines), &mut registry)
            .unwrap();

        assert_eq!(report.stats.accepted, 500, "seed {}", seed);
        assert_eq!(registry.len(), ids.len(), "seed {}", seed);
        assert_eq!(report.stats.created as usize, ids.len(), "seed {}", seed);
    }
}

#[test]
fn prop_integer_sensor_processes_to_mean() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = rng.gen_range(1..300);
        let values: Vec<i64> = (0..count)
            .map(|_| rng.gen_range(-1_000_000..1_000_000))
            .collect();

        let lines = values.iter().map(|v| format!("P P-1 {}", v));
        let mut registry = SensorRegistry::new();
        IngestionLoop::new()
            .run(&mut IterSource::new(lines), &mut registry)
            .unwrap();

        let expected = values.iter().sum::<i64>() as f64 / values.len() as f64;
        let aggregate = registry.find("P-1").unwrap().process().unwrap();
        assert!(matches!(aggregate, Aggregate::Mean(_)));
        assert_relative_eq!(aggregate.value(), expected, epsilon = 1e-9);
    }
}

#[test]
fn prop_float_sensor_processes_to_minimum() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = rng.gen_range(1..300);
        let values: Vec<f64> = (0..count).map(|_| rng.gen_range(-50.0..150.0)).collect();

        // `{}` prints the shortest representation that parses back exactly
        let lines = values.iter().map(|v| format!("T T-1 {}", v));
        let mut registry = SensorRegistry::new();
        IngestionLoop::new()
            .run(&mut IterSource::new(lines), &mut registry)
            .unwrap();

        let expected = values.iter().copied().fold(f64::INFINITY, f64::min);
        let sensor = registry.find("T-1").unwrap();
        assert_eq!(sensor.kind(), NumericKind::Float);
        assert_eq!(sensor.len(), values.len());
        assert_eq!(sensor.process(), Ok(Aggregate::Minimum(expected)));
    }
}

#[test]
fn prop_kind_conflicts_never_change_history_length() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = SensorRegistry::new();
        let mut ingest = IngestionLoop::new();
        ingest.apply(&mut registry, "T S 20.0");

        let mut expected_len = 1;
        for _ in 0..200 {
            if rng.gen_bool(0.5) {
                ingest.apply(&mut registry, &format!("P S {}", rng.gen_range(0..100)));
            } else {
                ingest.apply(&mut registry, &format!("T S {:.1}", rng.gen_range(0.0..30.0)));
                expected_len += 1;
            }
            assert_eq!(registry.find("S").unwrap().len(), expected_len);
        }
        assert_eq!(ingest.stats().accepted as usize, expected_len);
    }
}
