// Sensor Hub CLI - Error types
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

use sensor_hub::{IngestError, SensorError};
use thiserror::Error;

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    /// Serial port could not be opened or configured
    #[error("cannot open serial port {port}: {source}")]
    OpenPort {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Serial port enumeration failed
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Local I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ingestion stopped on a transport failure
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Registry or sensor operation failed
    #[error(transparent)]
    Sensor(#[from] SensorError),

    /// JSON output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Background ingestion task panicked or was cancelled
    #[error("ingestion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
