// Sensor Hub - Polymorphic sensor registry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sensors
//!
//! A [`Sensor`] binds an identifier to exactly one reading history. The
//! history variant (integer or float) is chosen at creation and never
//! changes, so the sensor's kind and its aggregation policy are fixed:
//!
//! | Kind    | Quantity    | Aggregate |
//! |---------|-------------|-----------|
//! | Integer | pressure    | mean      |
//! | Float   | temperature | minimum   |

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Result, SensorError};
use crate::history::{ReadingHistory, Sample};
use crate::reading::{NumericKind, Reading};

/// Unique identifier for a sensor
pub type SensorId = String;

/// Result of processing a sensor's history
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(tag = "type", content = "value", rename_all = "lowercase")
)]
pub enum Aggregate {
    /// Arithmetic mean of integer readings
    Mean(f64),
    /// Lowest float reading
    Minimum(f64),
}

impl Aggregate {
    /// Numeric value of the aggregate
    pub fn value(&self) -> f64 {
        match *self {
            Aggregate::Mean(v) | Aggregate::Minimum(v) => v,
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Mean(v) => write!(f, "mean {:.2} Pa", v),
            Aggregate::Minimum(v) => write!(f, "minimum {:.1}°C", v),
        }
    }
}

/// Kind-specific history owned by a sensor
#[derive(Debug, Clone, PartialEq)]
enum History {
    Integer(ReadingHistory<i64>),
    Float(ReadingHistory<f64>),
}

impl History {
    fn for_kind(kind: NumericKind) -> Self {
        match kind {
            NumericKind::Integer => History::Integer(ReadingHistory::new()),
            NumericKind::Float => History::Float(ReadingHistory::new()),
        }
    }
}

/// Append `reading` to `history` if the kinds agree
fn append_checked<V: Sample>(history: &mut ReadingHistory<V>, reading: Reading) -> bool {
    match V::from_reading(reading) {
        Some(value) => {
            history.append(value);
            true
        }
        None => false,
    }
}

/// A named sensor accumulating readings of one fixed kind
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    id: SensorId,
    history: History,
}

impl Sensor {
    /// Create a new sensor with an empty history
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidId`] if `id` is empty.
    pub fn new(id: impl Into<String>, kind: NumericKind) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(SensorError::InvalidId);
        }
        Ok(Self {
            id,
            history: History::for_kind(kind),
        })
    }

    /// Create a float (temperature) sensor
    pub fn temperature(id: impl Into<String>) -> Result<Self> {
        Self::new(id, NumericKind::Float)
    }

    /// Create an integer (pressure) sensor
    pub fn pressure(id: impl Into<String>) -> Result<Self> {
        Self::new(id, NumericKind::Integer)
    }

    /// Sensor identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind established at creation
    pub fn kind(&self) -> NumericKind {
        match self.history {
            History::Integer(_) => NumericKind::Integer,
            History::Float(_) => NumericKind::Float,
        }
    }

    /// Number of recorded readings
    pub fn len(&self) -> usize {
        match &self.history {
            History::Integer(h) => h.len(),
            History::Float(h) => h.len(),
        }
    }

    /// Check if no reading has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record a reading
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::KindMismatch`] if the reading's kind differs
    /// from the sensor's kind, and [`SensorError::NonFiniteValue`] for a NaN
    /// or infinite float. The history is left untouched in both cases.
    pub fn add_reading(&mut self, reading: impl Into<Reading>) -> Result<()> {
        let reading = reading.into();
        if let (History::Float(_), Reading::Float(value)) = (&self.history, reading) {
            if !value.is_finite() {
                return Err(SensorError::NonFiniteValue {
                    id: self.id.clone(),
                    value,
                });
            }
        }
        let accepted = match &mut self.history {
            History::Integer(h) => append_checked(h, reading),
            History::Float(h) => append_checked(h, reading),
        };
        if accepted {
            Ok(())
        } else {
            Err(SensorError::KindMismatch {
                id: self.id.clone(),
                expected: self.kind(),
                actual: reading.kind(),
            })
        }
    }

    /// Compute the kind-specific aggregate
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::EmptyHistory`] if no reading has been recorded.
    pub fn process(&self) -> Result<Aggregate> {
        let aggregate = match &self.history {
            History::Integer(h) => h.aggregate().map(Aggregate::Mean),
            History::Float(h) => h.aggregate().map(Aggregate::Minimum),
        };
        aggregate.ok_or_else(|| SensorError::EmptyHistory(self.id.clone()))
    }

    /// Iterate over the readings in insertion order
    pub fn readings(&self) -> Box<dyn Iterator<Item = Reading> + '_> {
        match &self.history {
            History::Integer(h) => Box::new(h.readings()),
            History::Float(h) => Box::new(h.readings()),
        }
    }

    /// Immutable snapshot for presentation
    pub fn describe(&self) -> SensorSnapshot {
        SensorSnapshot {
            id: self.id.clone(),
            kind: self.kind(),
            reading_count: self.len(),
            values: self.readings().collect(),
            aggregate: self.process().ok(),
        }
    }
}

/// Point-in-time view of a sensor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SensorSnapshot {
    /// Sensor identifier
    pub id: SensorId,
    /// Sensor kind
    pub kind: NumericKind,
    /// Number of readings at snapshot time
    pub reading_count: usize,
    /// All readings in insertion order
    pub values: Vec<Reading>,
    /// Aggregate, or `None` when the history is empty
    pub aggregate: Option<Aggregate>,
}

impl fmt::Display for SensorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} / {}] {} reading(s)",
            self.id,
            self.kind.quantity(),
            self.kind,
            self.reading_count
        )?;
        match &self.aggregate {
            Some(aggregate) => write!(f, ", {}", aggregate),
            None => write!(f, ", no readings to process"),
        }
    }
}
