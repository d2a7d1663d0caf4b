// Sensor Hub CLI - Line source selection
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Opening line sources for the ingestion loop.
//!
//! Serial devices are opened 8N1 without flow control and with a read
//! timeout, so the ingestion loop regains control regularly and can honor
//! a stop request even when the device is silent.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use sensor_hub::{LineSource, ReaderSource};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, StopBits};
use tracing::{debug, info};

use crate::error::CliError;

/// Boxed line source that can move to a blocking task.
pub type BoxedSource = Box<dyn LineSource + Send>;

/// Where protocol lines come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    /// Serial device.
    Serial {
        /// Device path (`/dev/ttyACM0`, `COM3`, ...).
        port: String,
        /// Speed in baud.
        baud: u32,
        /// Read timeout; bounds the latency of a stop request.
        timeout: Duration,
        /// Pause after opening, for boards that reset on connect.
        settle: Duration,
    },
    /// Captured log file.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

impl SourceSpec {
    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            SourceSpec::Serial { port, baud, .. } => format!("serial port {} at {} bps", port, baud),
            SourceSpec::File(path) => format!("file {}", path.display()),
            SourceSpec::Stdin => "standard input".to_string(),
        }
    }
}

/// Open the source described by `spec`.
pub fn open(spec: &SourceSpec) -> Result<BoxedSource, CliError> {
    match spec {
        SourceSpec::Serial {
            port,
            baud,
            timeout,
            settle,
        } => {
            let serial = serialport::new(port.as_str(), *baud)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(*timeout)
                .open()
                .map_err(|source| CliError::OpenPort {
                    port: port.clone(),
                    source,
                })?;

            info!("Port {} opened at {} bps", port, baud);
            if !settle.is_zero() {
                debug!("Waiting {:?} for the device to settle", settle);
                std::thread::sleep(*settle);
            }
            serial.clear(ClearBuffer::All).map_err(|source| CliError::OpenPort {
                port: port.clone(),
                source,
            })?;

            Ok(Box::new(ReaderSource::new(BufReader::new(serial))))
        }
        SourceSpec::File(path) => {
            let file = File::open(path)?;
            Ok(Box::new(ReaderSource::new(BufReader::new(file))))
        }
        SourceSpec::Stdin => Ok(Box::new(ReaderSource::new(BufReader::new(std::io::stdin())))),
    }
}

/// Print the serial ports visible on this machine.
pub fn list_ports() -> Result<(), CliError> {
    let ports = serialport::available_ports()?;
    if ports.is_empty() {
        println!("No serial ports found");
        println!("Common names:");
        println!("  Linux:   /dev/ttyACM0, /dev/ttyUSB0");
        println!("  macOS:   /dev/cu.usbmodem*, /dev/cu.usbserial*");
        println!("  Windows: COM3, COM4, ...");
        return Ok(());
    }
    for port in ports {
        let detail = match port.port_type {
            serialport::SerialPortType::UsbPort(usb) => format!(
                "USB {:04x}:{:04x} {}",
                usb.vid,
                usb.pid,
                usb.product.unwrap_or_default()
            ),
            serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
            serialport::SerialPortType::PciPort => "PCI".to_string(),
            serialport::SerialPortType::Unknown => "unknown".to_string(),
        };
        println!("{:<24} {}", port.port_name, detail);
    }
    Ok(())
}
