// Sensor Hub CLI - Device listener
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Runs the ingestion loop on a blocking task and stops it on Ctrl-C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sensor_hub::{IngestConfig, IngestReport, IngestionLoop, LineOutcome, SensorRegistry};
use tracing::{info, warn};

use crate::error::CliError;
use crate::source::{self, SourceSpec};

/// Ingest lines from `spec` into `registry` until the source ends, the line
/// budget is spent or the user presses Ctrl-C.
///
/// The registry is handed back even when the run fails, so readings accepted
/// before a transport fault are not lost.
pub async fn listen(
    spec: SourceSpec,
    registry: SensorRegistry,
    config: IngestConfig,
) -> (SensorRegistry, Result<IngestReport, CliError>) {
    let mut ingest = IngestionLoop::with_config(config);
    let stop = ingest.stop_handle();

    info!("Listening on {} (Ctrl-C to stop)", spec.describe());

    let mut task = tokio::task::spawn_blocking(move || {
        let mut registry = registry;
        let result = source::open(&spec).and_then(|mut source| {
            let mut accepted = 0u64;
            ingest
                .run_with(&mut source, &mut registry, |outcome| {
                    if let LineOutcome::Accepted { .. } = outcome {
                        accepted += 1;
                        println!("[{}] {}", accepted, outcome);
                    }
                })
                .map_err(CliError::from)
        });
        (registry, result)
    });

    let joined = tokio::select! {
        joined = &mut task => joined,
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    info!("Stop requested, waiting for the current read to finish");
                    stop.stop();
                }
                Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
            }
            task.await
        }
    };

    match joined {
        Ok(outcome) => outcome,
        Err(e) => (SensorRegistry::new(), Err(CliError::Task(e))),
    }
}

/// Tracks whether a listener currently owns Ctrl-C
///
/// Once `tokio::signal::ctrl_c` has been awaited the default SIGINT action
/// is gone for the rest of the process, so interactive front ends pair
/// [`listen`] with [`exit_on_idle_interrupt`] and mark listener runs here.
#[derive(Debug, Clone, Default)]
pub struct ListenGate {
    active: Arc<AtomicBool>,
}

impl ListenGate {
    /// Mark a listener as running until the guard is dropped
    pub fn enter(&self) -> ListenGuard {
        self.active.store(true, Ordering::SeqCst);
        ListenGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// Check if a listener is running
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Clears the [`ListenGate`] on drop
#[derive(Debug)]
pub struct ListenGuard {
    active: Arc<AtomicBool>,
}

impl Drop for ListenGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Exit the process on Ctrl-C unless a listener is running
///
/// While the gate is active the interrupt belongs to [`listen`], which stops
/// its ingestion loop instead.
pub async fn exit_on_idle_interrupt(gate: ListenGate) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            return;
        }
        if !gate.is_active() {
            info!("Interrupted");
            std::process::exit(130);
        }
    }
}
