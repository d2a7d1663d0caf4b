// Sensor Hub CLI - Interactive shell
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Menu-driven shell over a single sensor registry.
//!
//! Sensors created by hand and sensors discovered by listening to a device
//! share the same registry, so readings from both paths are processed
//! together.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use sensor_hub::{IngestConfig, NumericKind, Reading, Sensor, SensorError, SensorRegistry};
use tokio::runtime::Handle;
use tracing::error;

use crate::listen::{listen, ListenGate};
use crate::source::SourceSpec;

const MENU: &str = "\
==================================
Sensor Hub
==================================
1) Create temperature sensor (T)
2) Create pressure sensor (P)
3) Record reading
4) Process all sensors
5) List sensors
6) Listen to a device
0) Quit (release sensors)
==================================";

/// Settings for the "listen" menu option.
#[derive(Debug, Clone)]
pub struct Listener {
    /// Runtime that drives the listener task
    pub handle: Handle,
    /// Serial speed
    pub baud: u32,
    /// Serial read timeout
    pub timeout: Duration,
    /// Pause after opening a serial device
    pub settle: Duration,
    /// Ingestion settings
    pub ingest: IngestConfig,
    /// Marks listener runs so menu-level Ctrl-C still quits
    pub gate: ListenGate,
}

impl Listener {
    fn spec_for(&self, target: &str) -> SourceSpec {
        if Path::new(target).is_file() {
            SourceSpec::File(target.into())
        } else {
            SourceSpec::Serial {
                port: target.to_string(),
                baud: self.baud,
                timeout: self.timeout,
                settle: self.settle,
            }
        }
    }
}

/// Interactive shell
pub struct Shell<R, W> {
    input: R,
    output: W,
    registry: SensorRegistry,
    listener: Option<Listener>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell without device access
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            registry: SensorRegistry::new(),
            listener: None,
        }
    }

    /// Enable the "listen" option
    pub fn with_listener(mut self, listener: Listener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Registry owned by the shell
    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    /// Run the menu loop until the user quits or input ends
    ///
    /// Returns the number of sensors released on exit.
    pub fn run(&mut self) -> io::Result<usize> {
        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let choice = match self.prompt("Select an option: ")? {
                Some(choice) => choice,
                None => break,
            };
            match choice.as_str() {
                "1" => self.create(NumericKind::Float)?,
                "2" => self.create(NumericKind::Integer)?,
                "3" => self.record()?,
                "4" => self.process_all()?,
                "5" => self.list()?,
                "6" => self.listen()?,
                "0" => break,
                other => writeln!(self.output, "Unknown option '{}'", other)?,
            }
        }

        let released = self.registry.teardown();
        writeln!(self.output, "Released {} sensor(s)", released)?;
        Ok(released)
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        ask(&mut self.input, &mut self.output, text)
    }

    fn create(&mut self, kind: NumericKind) -> io::Result<()> {
        let example = match kind {
            NumericKind::Float => "T-001",
            NumericKind::Integer => "P-105",
        };
        let id = match self.prompt(&format!("Sensor id (e.g. {}): ", example))? {
            Some(id) => id,
            None => return Ok(()),
        };

        let result = Sensor::new(id, kind).and_then(|sensor| {
            self.registry
                .insert(sensor)
                .map(|sensor| sensor.id().to_string())
        });
        match result {
            Ok(id) => writeln!(
                self.output,
                "Created {} sensor '{}' ({} readings in {})",
                kind.quantity(),
                id,
                kind,
                kind.unit()
            ),
            Err(e) => writeln!(self.output, "Cannot create sensor: {}", e),
        }
    }

    fn record(&mut self) -> io::Result<()> {
        if self.registry.is_empty() {
            return writeln!(self.output, "No sensors registered yet");
        }
        let id = match self.prompt("Sensor id: ")? {
            Some(id) => id,
            None => return Ok(()),
        };

        let Shell {
            input,
            output,
            registry,
            ..
        } = self;
        let sensor = match registry.find_mut(&id) {
            Some(sensor) => sensor,
            None => return writeln!(output, "Sensor '{}' not found", id),
        };
        let kind = sensor.kind();

        let text = match ask(input, output, &format!("Value ({}): ", kind.unit()))? {
            Some(text) => text,
            None => return Ok(()),
        };
        let value = match parse_value(kind, &text) {
            Some(value) => value,
            None => {
                return writeln!(
                    output,
                    "Invalid {} value '{}': expected {}",
                    kind.quantity(),
                    text,
                    kind
                )
            }
        };

        match sensor.add_reading(value) {
            Ok(()) => writeln!(
                output,
                "Recorded {} for '{}' ({} reading(s))",
                value,
                id,
                sensor.len()
            ),
            Err(e) => writeln!(output, "Cannot record reading: {}", e),
        }
    }

    fn process_all(&mut self) -> io::Result<()> {
        if self.registry.is_empty() {
            return writeln!(self.output, "No sensors registered yet");
        }
        for sensor in &self.registry {
            match sensor.process() {
                Ok(aggregate) => writeln!(
                    self.output,
                    "{} ({}): {}",
                    sensor.id(),
                    sensor.kind().quantity(),
                    aggregate
                )?,
                Err(SensorError::EmptyHistory(_)) => writeln!(
                    self.output,
                    "{} ({}): no readings to process",
                    sensor.id(),
                    sensor.kind().quantity()
                )?,
                Err(e) => writeln!(self.output, "{}: {}", sensor.id(), e)?,
            }
        }
        Ok(())
    }

    fn list(&mut self) -> io::Result<()> {
        if self.registry.is_empty() {
            return writeln!(self.output, "No sensors registered yet");
        }
        for snapshot in self.registry.snapshots() {
            writeln!(self.output, "{}", snapshot)?;
            let values: Vec<String> = snapshot.values.iter().map(Reading::to_string).collect();
            if !values.is_empty() {
                writeln!(self.output, "    {}", values.join(", "))?;
            }
        }
        Ok(())
    }

    fn listen(&mut self) -> io::Result<()> {
        let listener = match &self.listener {
            Some(listener) => listener.clone(),
            None => return writeln!(self.output, "Device access is not available"),
        };
        writeln!(
            self.output,
            "Common ports: /dev/ttyACM0, /dev/ttyUSB0, /dev/cu.usbmodem*, COM3"
        )?;
        let target = match self.prompt("Port or capture file: ")? {
            Some(target) if !target.is_empty() => target,
            _ => return Ok(()),
        };

        let spec = listener.spec_for(&target);
        let registry = std::mem::take(&mut self.registry);
        let (registry, result) = {
            let _active = listener.gate.enter();
            listener
                .handle
                .block_on(listen(spec, registry, listener.ingest.clone()))
        };
        self.registry = registry;

        match result {
            Ok(report) => writeln!(
                self.output,
                "Stopped ({:?}): {} line(s), {} reading(s) accepted, {} sensor(s) created",
                report.stop_reason, report.stats.lines, report.stats.accepted, report.stats.created
            ),
            Err(e) => {
                error!("Listening failed: {}", e);
                writeln!(self.output, "Listening failed: {}", e)
            }
        }
    }
}

/// Print `text` and read one trimmed answer, `None` at end of input
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Parse a manually entered value for a sensor of `kind`
fn parse_value(kind: NumericKind, text: &str) -> Option<Reading> {
    match kind {
        NumericKind::Integer => text.parse::<i64>().ok().map(Reading::Integer),
        NumericKind::Float => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Reading::Float),
    }
}
