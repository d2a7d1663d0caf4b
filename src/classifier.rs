// Sensor Hub - Polymorphic sensor registry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Line classification
//!
//! This module turns one raw protocol line into a [`Command`]. The accepted
//! grammar is:
//!
//! ```text
//! T <id> <float-value>      temperature reading
//! P <id> <int-value>        pressure reading
//! ```
//!
//! The tag is case-insensitive and tokens are whitespace-delimited.
//! Classification never fails: blank lines and firmware banners become
//! [`Command::Ignore`], everything else that does not match the grammar
//! becomes [`Command::Malformed`] with a [`MalformedReason`].

use std::fmt;

use crate::config::{ClassifierConfig, DEFAULT_IGNORE_PATTERNS};
use crate::reading::{NumericKind, Reading};

/// Intent derived from one input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Record `value` for sensor `id`, creating the sensor if needed
    Record {
        kind: NumericKind,
        id: String,
        value: Reading,
    },
    /// Blank line or known firmware chatter
    Ignore,
    /// Line that does not match the protocol
    Malformed { line: String, reason: MalformedReason },
}

impl Command {
    /// Check if this command records a reading
    pub fn is_record(&self) -> bool {
        matches!(self, Command::Record { .. })
    }
}

/// Why a line was classified as malformed
#[derive(Debug, Clone, PartialEq)]
pub enum MalformedReason {
    /// Type tag is not one of `T`, `t`, `P`, `p`
    UnknownSensorType(char),
    /// Value is missing or does not parse in the tag's kind
    InvalidValue { kind: NumericKind },
    /// Bare number with a decimal point, no tag or id
    UnformattedFloat(f64),
    /// Bare number without a decimal point, no tag or id
    UnformattedInteger(i64),
    /// Nothing recognizable
    Unparseable,
}

impl MalformedReason {
    /// Short reason tag used in one-line diagnostics
    pub fn tag(&self) -> &'static str {
        match self {
            MalformedReason::UnknownSensorType(_) => "unknown sensor type",
            MalformedReason::InvalidValue { .. } => "invalid value for declared kind",
            MalformedReason::UnformattedFloat(_) => "unformatted float, no id",
            MalformedReason::UnformattedInteger(_) => "unformatted integer, no id",
            MalformedReason::Unparseable => "unparseable",
        }
    }
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::UnknownSensorType(tag) => write!(f, "{} '{}'", self.tag(), tag),
            MalformedReason::InvalidValue { kind } => write!(f, "{} ({})", self.tag(), kind),
            MalformedReason::UnformattedFloat(v) => write!(f, "{} ({})", self.tag(), v),
            MalformedReason::UnformattedInteger(v) => write!(f, "{} ({})", self.tag(), v),
            MalformedReason::Unparseable => write!(f, "{}", self.tag()),
        }
    }
}

/// Line classifier with a configurable banner list
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier with the default banner list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom configuration
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifier configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a raw line
    pub fn classify(&self, line: &str) -> Command {
        classify_with(line, self.config.ignore_patterns.iter().map(String::as_str))
    }
}

/// Classify a raw line using the default banner list
pub fn classify(line: &str) -> Command {
    classify_with(line, DEFAULT_IGNORE_PATTERNS.iter().copied())
}

fn classify_with<'p>(line: &str, mut ignore_patterns: impl Iterator<Item = &'p str>) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let content = line.trim();

    if content.is_empty() || ignore_patterns.any(|p| !p.is_empty() && content.contains(p)) {
        return Command::Ignore;
    }

    match classify_tagged(content) {
        Some(Ok((kind, id, value))) => Command::Record {
            kind,
            id: id.to_string(),
            value,
        },
        Some(Err(reason)) => malformed(line, reason),
        None => malformed(line, classify_bare(content)),
    }
}

fn malformed(line: &str, reason: MalformedReason) -> Command {
    Command::Malformed {
        line: line.to_string(),
        reason,
    }
}

/// Parse `<tag> <id> <value>`
///
/// Returns `None` when the line does not even have the `<tag> <id>` shape,
/// so the caller can fall back to bare-number detection.
fn classify_tagged(content: &str) -> Option<Result<(NumericKind, &str, Reading), MalformedReason>> {
    let mut tokens = content.split_whitespace();
    let tag_token = tokens.next()?;
    let id = tokens.next()?;

    let mut tag_chars = tag_token.chars();
    let tag = tag_chars.next()?;
    if tag_chars.next().is_some() {
        return None;
    }

    let kind = match NumericKind::from_tag(tag) {
        Some(kind) => kind,
        None => return Some(Err(MalformedReason::UnknownSensorType(tag))),
    };

    let value = match (tokens.next(), tokens.next()) {
        (Some(token), None) => parse_value(token, kind),
        _ => None,
    };

    Some(
        value
            .map(|value| (kind, id, value))
            .ok_or(MalformedReason::InvalidValue { kind }),
    )
}

fn parse_value(token: &str, kind: NumericKind) -> Option<Reading> {
    match kind {
        NumericKind::Integer => token.parse::<i64>().ok().map(Reading::Integer),
        NumericKind::Float => token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Reading::Float),
    }
}

/// Diagnose a line that is not in tagged form
fn classify_bare(content: &str) -> MalformedReason {
    if let Ok(v) = content.parse::<i64>() {
        return MalformedReason::UnformattedInteger(v);
    }
    match content.parse::<f64>() {
        Ok(v) if v.is_finite() && content.contains('.') => MalformedReason::UnformattedFloat(v),
        Ok(v) if v >= i64::MIN as f64 && v < i64::MAX as f64 => {
            MalformedReason::UnformattedInteger(v as i64)
        }
        _ => MalformedReason::Unparseable,
    }
}
