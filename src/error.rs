//! Error types for Sensor Hub
//!
//! This module defines the error types used by the registry, the sensors
//! and the ingestion loop. Line classification problems are not errors:
//! they are reported as [`crate::classifier::MalformedReason`] values.

use thiserror::Error;

use crate::reading::NumericKind;

/// Result type alias for registry and sensor operations
pub type Result<T> = std::result::Result<T, SensorError>;

/// Errors raised by sensor and registry operations
///
/// Every variant is local to the call that produced it: the registry and
/// the sensor involved are left exactly as they were before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    /// Sensor identifier is empty
    #[error("Invalid sensor id: identifier must not be empty")]
    InvalidId,

    /// A sensor with this identifier is already registered
    #[error("Duplicate sensor id: {0}")]
    DuplicateId(String),

    /// Reading kind differs from the sensor's established kind
    #[error("Kind mismatch for sensor {id}: sensor holds {expected} readings, got {actual}")]
    KindMismatch {
        id: String,
        expected: NumericKind,
        actual: NumericKind,
    },

    /// Float reading is NaN or infinite
    #[error("Non-finite value for sensor {id}: {value}")]
    NonFiniteValue { id: String, value: f64 },

    /// Aggregate requested on a sensor with no readings
    #[error("Empty history for sensor {0}: no readings to process")]
    EmptyHistory(String),

    /// Registry capacity reached
    #[error("Registry full: maximum {max} sensors reached")]
    RegistryFull { max: usize },
}

impl SensorError {
    /// Short reason tag used in one-line diagnostics
    pub fn tag(&self) -> &'static str {
        match self {
            SensorError::InvalidId => "invalid id",
            SensorError::DuplicateId(_) => "duplicate id",
            SensorError::KindMismatch { .. } => "kind mismatch",
            SensorError::NonFiniteValue { .. } => "non-finite value",
            SensorError::EmptyHistory(_) => "empty history",
            SensorError::RegistryFull { .. } => "registry full",
        }
    }
}

/// Errors that end an ingestion run abnormally
#[derive(Error, Debug)]
pub enum IngestError {
    /// The line source reported a transport fault
    #[error("Line source transport error: {0}")]
    Transport(#[from] std::io::Error),
}
