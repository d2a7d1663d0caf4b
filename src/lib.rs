//! # Sensor Hub
//!
//! A registry of heterogeneous sensors fed by a tolerant line protocol.
//!
//! ## Key Features
//!
//! - **Typed histories**: Pressure sensors keep integer readings, temperature
//!   sensors keep float readings, and a sensor's kind never changes
//! - **Kind-specific processing**: Mean for pressure, minimum for temperature
//! - **Tolerant protocol**: Every input line is classified, nothing aborts
//!   ingestion
//! - **Cancellable ingestion**: Blocking line sources can be stopped from
//!   another thread
//!
//! ## Quick Start
//!
//! ```rust
//! use sensor_hub::{classify, Aggregate, Command, NumericKind, Sensor, SensorRegistry};
//!
//! let mut registry = SensorRegistry::new();
//!
//! // Manual entry
//! registry.insert(Sensor::temperature("T-001").unwrap()).unwrap();
//! registry.find_mut("T-001").unwrap().add_reading(23.5).unwrap();
//!
//! // Protocol entry
//! if let Command::Record { kind, id, value } = classify("T T-001 19.0") {
//!     let (sensor, _created) = registry.find_or_create(&id, kind).unwrap();
//!     sensor.add_reading(value).unwrap();
//! }
//!
//! let sensor = registry.find("T-001").unwrap();
//! assert_eq!(sensor.kind(), NumericKind::Float);
//! assert_eq!(sensor.process().unwrap(), Aggregate::Minimum(19.0));
//! ```
//!
//! ## Modules
//!
//! - [`reading`]: Numeric kinds and tagged readings
//! - [`history`]: Append-only histories and their aggregation
//! - [`sensor`]: Sensors and presentation snapshots
//! - [`registry`]: Insertion-ordered sensor collection
//! - [`classifier`]: Line protocol classification
//! - [`ingest`]: Line sources and the ingestion loop
//! - [`config`]: Configuration types

// Modules
pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod ingest;
pub mod reading;
pub mod registry;
pub mod sensor;

// Re-exports for convenient access
pub use classifier::{classify, Classifier, Command, MalformedReason};
pub use config::{ClassifierConfig, IngestConfig, RegistryConfig};
pub use error::{IngestError, Result, SensorError};
pub use history::{ReadingHistory, Sample};
pub use ingest::{
    IngestReport, IngestStats, IngestionLoop, IterSource, LineOutcome, LineSource, LoopState,
    ReaderSource, Step, StopHandle, StopReason,
};
pub use reading::{NumericKind, Reading};
pub use registry::SensorRegistry;
pub use sensor::{Aggregate, Sensor, SensorId, SensorSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default serial speed of the reference firmware, in baud
pub const DEFAULT_BAUD_RATE: u32 = 9600;
