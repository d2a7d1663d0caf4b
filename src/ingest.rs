// Sensor Hub - Polymorphic sensor registry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Ingestion loop
//!
//! The [`IngestionLoop`] pulls lines from a [`LineSource`], classifies them
//! and applies the resulting commands to a [`SensorRegistry`]. Bad input
//! never stops the loop: every line produces exactly one [`LineOutcome`].
//! A run ends when the source reports end of stream, when the
//! [`StopHandle`] is triggered, or when the source fails.
//!
//! # Cancellation
//!
//! `read_line` is the only call that may block. Sources that can wait
//! forever (serial devices) should be opened with a read timeout and report
//! it as [`io::ErrorKind::TimedOut`] or [`io::ErrorKind::WouldBlock`]. The
//! loop treats those as idle polls: it checks the stop handle and reads
//! again, so a stop request is honored within one timeout period.
//!
//! # Example
//!
//! ```rust
//! use sensor_hub::{IngestionLoop, IterSource, SensorRegistry, StopReason};
//!
//! let mut registry = SensorRegistry::new();
//! let mut source = IterSource::new(["T T-001 23.5", "P P-010 101325", "noise"]);
//!
//! let report = IngestionLoop::new().run(&mut source, &mut registry).unwrap();
//! assert_eq!(report.stats.accepted, 2);
//! assert_eq!(report.stats.malformed, 1);
//! assert_eq!(report.stop_reason, StopReason::EndOfStream);
//! assert_eq!(registry.len(), 2);
//! ```

use std::fmt;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info, trace, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::classifier::{Classifier, Command, MalformedReason};
use crate::config::IngestConfig;
use crate::error::{IngestError, SensorError};
use crate::reading::{NumericKind, Reading};
use crate::registry::SensorRegistry;

/// Supplier of raw protocol lines
pub trait LineSource {
    /// Read the next line, without its terminator
    ///
    /// Returns `Ok(None)` at end of stream. `TimedOut`, `WouldBlock` and
    /// `Interrupted` errors mean "no line yet" and may be retried; any
    /// other error is a transport fault.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        (**self).read_line()
    }
}

/// Longest partial line [`ReaderSource`] buffers by default, in bytes
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Line source assembling lines from a byte stream
///
/// Both `\n` and `\r` terminate a line and empty lines are skipped, so
/// `\r\n` device output yields one line per reading. Bytes are decoded
/// lossily as UTF-8. A partial line survives read errors and is completed
/// by later reads. A line longer than the configured maximum is dropped up
/// to its terminator.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    pending: Vec<u8>,
    max_line_len: usize,
    discarding: bool,
}

impl<R: BufRead> ReaderSource<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self::with_max_line_len(reader, DEFAULT_MAX_LINE_LEN)
    }

    /// Wrap a buffered reader with a custom line length limit
    pub fn with_max_line_len(reader: R, max_line_len: usize) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            max_line_len,
            discarding: false,
        }
    }

    /// Bytes received since the last complete line
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    fn take_pending(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        line
    }

    fn overflowed(&mut self) -> bool {
        if self.pending.len() <= self.max_line_len {
            return false;
        }
        warn!(
            "Dropping line longer than {} bytes without terminator",
            self.max_line_len
        );
        self.pending.clear();
        true
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(if self.pending.is_empty() {
                    None
                } else {
                    Some(self.take_pending())
                });
            }

            match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    if !self.discarding {
                        self.pending.extend_from_slice(&buf[..pos]);
                    }
                    self.reader.consume(pos + 1);
                    if std::mem::take(&mut self.discarding) || self.overflowed() {
                        continue;
                    }
                    if !self.pending.is_empty() {
                        return Ok(Some(self.take_pending()));
                    }
                }
                None => {
                    let len = buf.len();
                    if !self.discarding {
                        self.pending.extend_from_slice(buf);
                    }
                    self.reader.consume(len);
                    if self.overflowed() {
                        self.discarding = true;
                    }
                }
            }
        }
    }
}

/// Line source over an iterator of strings
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    lines: I,
}

impl<I: Iterator> IterSource<I> {
    /// Create a source yielding each item of `lines`
    pub fn new<T: IntoIterator<IntoIter = I>>(lines: T) -> Self {
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl<I> LineSource for IterSource<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.next().map(Into::into))
    }
}

/// Cloneable handle used to stop a running loop from elsewhere
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Create a handle in the not-stopped state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Check if a stop was requested
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }
}

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Pulling and applying lines
    Running,
    /// Not running
    Stopped,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// The source has no more lines
    EndOfStream,
    /// The stop handle was triggered
    Cancelled,
    /// The configured line budget was consumed
    LineBudget,
}

/// Result of applying one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Blank line or banner
    Ignored,
    /// Line did not match the protocol
    Malformed { line: String, reason: MalformedReason },
    /// Reading recorded
    Accepted {
        id: String,
        kind: NumericKind,
        value: Reading,
        /// The sensor was created by this line
        created: bool,
    },
    /// Well-formed line whose reading could not be recorded
    Rejected { line: String, error: SensorError },
}

impl fmt::Display for LineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineOutcome::Ignored => write!(f, "ignored"),
            LineOutcome::Malformed { line, reason } => {
                write!(f, "malformed line '{}': {}", line, reason)
            }
            LineOutcome::Accepted {
                id,
                value,
                created: true,
                ..
            } => write!(f, "created sensor '{}' with {}", id, value),
            LineOutcome::Accepted { id, value, .. } => {
                write!(f, "recorded {} for sensor '{}'", value, id)
            }
            LineOutcome::Rejected { line, error } => {
                write!(f, "rejected line '{}' [{}]: {}", line, error.tag(), error)
            }
        }
    }
}

/// Outcome of a single loop step
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// One line was pulled and applied
    Line(LineOutcome),
    /// The loop stopped before a line arrived
    Stopped(StopReason),
}

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IngestStats {
    /// Lines pulled from the source
    pub lines: u64,
    /// Readings recorded
    pub accepted: u64,
    /// Blank or banner lines
    pub ignored: u64,
    /// Lines that did not match the protocol
    pub malformed: u64,
    /// Well-formed readings refused by the registry
    pub rejected: u64,
    /// Sensors created while ingesting
    pub created: u64,
}

impl IngestStats {
    fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Ignored => self.ignored += 1,
            LineOutcome::Malformed { .. } => self.malformed += 1,
            LineOutcome::Accepted { created, .. } => {
                self.accepted += 1;
                if *created {
                    self.created += 1;
                }
            }
            LineOutcome::Rejected { .. } => self.rejected += 1,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IngestReport {
    /// Counters at the end of the run
    pub stats: IngestStats,
    /// Why the run ended
    pub stop_reason: StopReason,
}

/// Applies protocol lines from a source to a registry
#[derive(Debug)]
pub struct IngestionLoop {
    classifier: Classifier,
    config: IngestConfig,
    stop: StopHandle,
    state: LoopState,
    stats: IngestStats,
}

impl IngestionLoop {
    /// Create a loop with default configuration
    pub fn new() -> Self {
        Self::with_config(IngestConfig::default())
    }

    /// Create a loop with custom configuration
    pub fn with_config(config: IngestConfig) -> Self {
        Self {
            classifier: Classifier::with_config(config.classifier.clone()),
            config,
            stop: StopHandle::new(),
            state: LoopState::Stopped,
            stats: IngestStats::default(),
        }
    }

    /// Handle that stops this loop when triggered
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Classify one line and apply it to the registry
    ///
    /// This does not touch the source and does not check the stop handle.
    pub fn apply(&mut self, registry: &mut SensorRegistry, line: &str) -> LineOutcome {
        let outcome = match self.classifier.classify(line) {
            Command::Ignore => LineOutcome::Ignored,
            Command::Malformed { line, reason } => LineOutcome::Malformed { line, reason },
            Command::Record { kind, id, value } => record(registry, line, kind, id, value),
        };
        self.stats.record(&outcome);
        self.report(&outcome);
        outcome
    }

    fn report(&self, outcome: &LineOutcome) {
        let n = self.stats.lines;
        match outcome {
            LineOutcome::Ignored => trace!("line {}: ignored", n),
            LineOutcome::Accepted { .. } => {
                debug!("line {}: {} (total {})", n, outcome, self.stats.accepted)
            }
            LineOutcome::Malformed { .. } | LineOutcome::Rejected { .. } => {
                warn!("line {}: {}", n, outcome)
            }
        }
    }

    /// Pull one line from `source` and apply it
    ///
    /// Idle polls are absorbed here: the call only returns once a line
    /// arrives, the source ends, or the stop handle is triggered.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Transport`] if the source fails.
    pub fn step<S: LineSource + ?Sized>(
        &mut self,
        source: &mut S,
        registry: &mut SensorRegistry,
    ) -> Result<Step, IngestError> {
        loop {
            if self.stop.is_stopped() {
                return Ok(Step::Stopped(StopReason::Cancelled));
            }
            match source.read_line() {
                Ok(Some(line)) => return Ok(Step::Line(self.apply(registry, &line))),
                Ok(None) => return Ok(Step::Stopped(StopReason::EndOfStream)),
                Err(e) if is_idle(&e) => trace!("line source idle: {}", e),
                Err(e) => return Err(IngestError::Transport(e)),
            }
        }
    }

    /// Run until end of stream, cancellation or transport failure
    pub fn run<S: LineSource + ?Sized>(
        &mut self,
        source: &mut S,
        registry: &mut SensorRegistry,
    ) -> Result<IngestReport, IngestError> {
        self.run_with(source, registry, |_| {})
    }

    /// Run like [`IngestionLoop::run`], passing every outcome to `observer`
    ///
    /// A stop request is consumed by the run it cancels, so the loop can be
    /// run again afterwards.
    pub fn run_with<S, F>(
        &mut self,
        source: &mut S,
        registry: &mut SensorRegistry,
        mut observer: F,
    ) -> Result<IngestReport, IngestError>
    where
        S: LineSource + ?Sized,
        F: FnMut(&LineOutcome),
    {
        self.state = LoopState::Running;
        info!("Ingestion started ({} sensors registered)", registry.len());

        let start_lines = self.stats.lines;
        let result = loop {
            if let Some(max) = self.config.max_lines {
                if self.stats.lines - start_lines >= max {
                    break Ok(StopReason::LineBudget);
                }
            }
            match self.step(source, registry) {
                Ok(Step::Line(outcome)) => observer(&outcome),
                Ok(Step::Stopped(reason)) => break Ok(reason),
                Err(e) => break Err(e),
            }
        };
        self.state = LoopState::Stopped;
        if let Ok(StopReason::Cancelled) = result {
            self.stop.reset();
        }

        match result {
            Ok(stop_reason) => {
                info!(
                    "Ingestion stopped ({:?}): {} lines, {} readings accepted",
                    stop_reason, self.stats.lines, self.stats.accepted
                );
                Ok(IngestReport {
                    stats: self.stats,
                    stop_reason,
                })
            }
            Err(e) => {
                error!("Ingestion aborted after {} lines: {}", self.stats.lines, e);
                Err(e)
            }
        }
    }
}

impl Default for IngestionLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn record(
    registry: &mut SensorRegistry,
    line: &str,
    kind: NumericKind,
    id: String,
    value: Reading,
) -> LineOutcome {
    let applied = registry
        .find_or_create(&id, kind)
        .and_then(|(sensor, created)| sensor.add_reading(value).map(|()| created));
    match applied {
        Ok(created) => LineOutcome::Accepted {
            id,
            kind,
            value,
            created,
        },
        Err(error) => LineOutcome::Rejected {
            line: line.trim_end_matches(['\r', '\n']).to_string(),
            error,
        },
    }
}

fn is_idle(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Source replaying scripted results
    struct ScriptedSource {
        script: VecDeque<io::Result<Option<String>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<io::Result<Option<String>>>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl LineSource for ScriptedSource {
        fn read_line(&mut self) -> io::Result<Option<String>> {
            self.script.pop_front().unwrap_or(Ok(None))
        }
    }

    fn line(s: &str) -> io::Result<Option<String>> {
        Ok(Some(s.to_string()))
    }

    #[test]
    fn test_reader_source_lines() {
        let mut source = ReaderSource::new(Cursor::new("T a 1.0\r\nP b 2\n\nlast"));
        assert_eq!(source.read_line().unwrap(), Some("T a 1.0".to_string()));
        assert_eq!(source.read_line().unwrap(), Some("P b 2".to_string()));
        assert_eq!(source.read_line().unwrap(), Some("last".to_string()));
        assert_eq!(source.read_line().unwrap(), None);
        assert_eq!(source.read_line().unwrap(), None);
    }

    #[test]
    fn test_reader_source_drops_overlong_line() {
        let mut bytes = b"T a 1.0\n".to_vec();
        bytes.extend(std::iter::repeat(b'x').take(64));
        bytes.extend_from_slice(b"\nT a 2.0\n");

        // Small buffer so the long line arrives in several chunks
        let reader = io::BufReader::with_capacity(8, bytes.as_slice());
        let mut source = ReaderSource::with_max_line_len(reader, 16);
        assert_eq!(source.read_line().unwrap(), Some("T a 1.0".to_string()));
        assert_eq!(source.read_line().unwrap(), Some("T a 2.0".to_string()));
        assert_eq!(source.read_line().unwrap(), None);
    }

    #[test]
    fn test_reader_source_bounded_without_terminator() {
        let bytes = vec![b'x'; 10_000];
        let reader = io::BufReader::with_capacity(100, bytes.as_slice());
        let mut source = ReaderSource::with_max_line_len(reader, 256);
        assert_eq!(source.read_line().unwrap(), None);
        assert!(source.pending().is_empty());
    }

    #[test]
    fn test_reader_source_keeps_line_at_limit() {
        let mut source = ReaderSource::with_max_line_len(&b"abcd\nabcde\nok"[..], 4);
        assert_eq!(source.read_line().unwrap(), Some("abcd".to_string()));
        assert_eq!(source.read_line().unwrap(), Some("ok".to_string()));
    }

    #[test]
    fn test_reader_source_lossy_utf8() {
        let bytes: &[u8] = b"T a\xff 1.0\n";
        let mut source = ReaderSource::new(bytes);
        let line = source.read_line().unwrap().unwrap();
        assert!(line.starts_with("T a"));
        assert!(line.ends_with(" 1.0"));
    }

    #[test]
    fn test_iter_source() {
        let mut source = IterSource::new(vec!["a", "b"]);
        assert_eq!(source.read_line().unwrap(), Some("a".to_string()));
        assert_eq!(source.read_line().unwrap(), Some("b".to_string()));
        assert_eq!(source.read_line().unwrap(), None);
    }

    #[test]
    fn test_apply_record_creates_then_appends() {
        let mut registry = SensorRegistry::new();
        let mut ingest = IngestionLoop::new();

        let first = ingest.apply(&mut registry, "P P-1 10");
        assert!(matches!(first, LineOutcome::Accepted { created: true, .. }));
        let second = ingest.apply(&mut registry, "P P-1 20");
        assert!(matches!(second, LineOutcome::Accepted { created: false, .. }));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("P-1").unwrap().len(), 2);
        assert_eq!(ingest.stats().accepted, 2);
        assert_eq!(ingest.stats().created, 1);
    }

    #[test]
    fn test_apply_kind_mismatch_rejected() {
        let mut registry = SensorRegistry::new();
        let mut ingest = IngestionLoop::new();
        ingest.apply(&mut registry, "T S-1 21.0");

        let outcome = ingest.apply(&mut registry, "P S-1 5\r\n");
        match outcome {
            LineOutcome::Rejected { line, error } => {
                assert_eq!(line, "P S-1 5");
                assert!(matches!(error, SensorError::KindMismatch { .. }));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
        let sensor = registry.find("S-1").unwrap();
        assert_eq!(sensor.kind(), NumericKind::Float);
        assert_eq!(sensor.len(), 1);
        assert_eq!(ingest.stats().rejected, 1);
        assert_eq!(ingest.stats().accepted, 1);
    }

    #[test]
    fn test_run_counts_outcomes() {
        let mut registry = SensorRegistry::new();
        let mut source = IterSource::new([
            "=== boot ===",
            "T T-001 23.5",
            "42.5",
            "",
            "X foo 1",
            "P P-010 101325",
        ]);
        let mut ingest = IngestionLoop::new();
        let report = ingest.run(&mut source, &mut registry).unwrap();

        assert_eq!(report.stop_reason, StopReason::EndOfStream);
        assert_eq!(report.stats.lines, 6);
        assert_eq!(report.stats.accepted, 2);
        assert_eq!(report.stats.ignored, 2);
        assert_eq!(report.stats.malformed, 2);
        assert_eq!(ingest.state(), LoopState::Stopped);
    }

    #[test]
    fn test_run_with_observer() {
        let mut registry = SensorRegistry::new();
        let mut source = IterSource::new(["T a 1.0", "bogus"]);
        let mut seen = Vec::new();
        IngestionLoop::new()
            .run_with(&mut source, &mut registry, |o| seen.push(o.clone()))
            .unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[1], LineOutcome::Malformed { .. }));
    }

    #[test]
    fn test_run_idle_polls_are_retried() {
        let mut registry = SensorRegistry::new();
        let mut source = ScriptedSource::new(vec![
            Err(io::Error::new(io::ErrorKind::TimedOut, "no data")),
            line("T a 1.5"),
            Err(io::Error::new(io::ErrorKind::WouldBlock, "no data")),
            line("T a 0.5"),
        ]);
        let report = IngestionLoop::new().run(&mut source, &mut registry).unwrap();
        assert_eq!(report.stats.accepted, 2);
        assert_eq!(report.stats.lines, 2);
    }

    #[test]
    fn test_run_transport_error() {
        let mut registry = SensorRegistry::new();
        let mut source = ScriptedSource::new(vec![
            line("P a 1"),
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged")),
            line("P a 2"),
        ]);
        let mut ingest = IngestionLoop::new();
        let result = ingest.run(&mut source, &mut registry);

        assert!(matches!(result, Err(IngestError::Transport(_))));
        assert_eq!(ingest.state(), LoopState::Stopped);
        assert_eq!(registry.find("a").unwrap().len(), 1);
    }

    #[test]
    fn test_run_cancelled_before_start() {
        let mut registry = SensorRegistry::new();
        let mut source = IterSource::new(["T a 1.0"]);
        let mut ingest = IngestionLoop::new();
        ingest.stop_handle().stop();

        let report = ingest.run(&mut source, &mut registry).unwrap();
        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert_eq!(report.stats.lines, 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_run_again_after_cancel() {
        let mut registry = SensorRegistry::new();
        let mut source = IterSource::new(["T a 1.0", "T a 2.0"]);
        let mut ingest = IngestionLoop::new();
        let stop = ingest.stop_handle();
        stop.stop();

        let report = ingest.run(&mut source, &mut registry).unwrap();
        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert!(!stop.is_stopped());

        let report = ingest.run(&mut source, &mut registry).unwrap();
        assert_eq!(report.stop_reason, StopReason::EndOfStream);
        assert_eq!(report.stats.accepted, 2);
        assert_eq!(registry.find("a").unwrap().len(), 2);

        // A handle cloned before the first run still reaches the loop
        stop.stop();
        let report = ingest.run(&mut source, &mut registry).unwrap();
        assert_eq!(report.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn test_run_cancelled_by_observer() {
        let mut registry = SensorRegistry::new();
        let mut source = IterSource::new(["T a 1.0", "T a 2.0", "T a 3.0"]);
        let mut ingest = IngestionLoop::new();
        let stop = ingest.stop_handle();

        let report = ingest
            .run_with(&mut source, &mut registry, |_| stop.stop())
            .unwrap();
        assert_eq!(report.stop_reason, StopReason::Cancelled);
        assert_eq!(report.stats.accepted, 1);
    }

    #[test]
    fn test_run_line_budget() {
        let mut registry = SensorRegistry::new();
        let mut source = IterSource::new(["T a 1.0", "T a 2.0", "T a 3.0"]);
        let mut ingest = IngestionLoop::with_config(IngestConfig::with_max_lines(2));

        let report = ingest.run(&mut source, &mut registry).unwrap();
        assert_eq!(report.stop_reason, StopReason::LineBudget);
        assert_eq!(report.stats.lines, 2);

        // A second run gets a fresh budget and drains the rest
        let report = ingest.run(&mut source, &mut registry).unwrap();
        assert_eq!(report.stop_reason, StopReason::EndOfStream);
        assert_eq!(report.stats.lines, 3);
    }

    #[test]
    fn test_outcome_display() {
        let outcome = LineOutcome::Malformed {
            line: "X foo 1".to_string(),
            reason: MalformedReason::UnknownSensorType('X'),
        };
        assert_eq!(
            outcome.to_string(),
            "malformed line 'X foo 1': unknown sensor type 'X'"
        );
    }
}
