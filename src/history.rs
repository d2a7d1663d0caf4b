// Sensor Hub - Polymorphic sensor registry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Append-only reading histories
//!
//! A [`ReadingHistory`] stores the values of one numeric kind in arrival
//! order. The aggregation it supports depends on the kind, which is
//! expressed through the [`Sample`] trait:
//!
//! - `i64` histories aggregate to their arithmetic mean
//! - `f64` histories aggregate to their minimum

use std::fmt;

use crate::reading::{NumericKind, Reading};

/// Scalar types a history can hold
pub trait Sample: Copy + PartialOrd + fmt::Debug {
    /// Kind tag shared by every value of this type
    const KIND: NumericKind;

    /// Tag the raw value as a [`Reading`]
    fn into_reading(self) -> Reading;

    /// Extract a value of this type from a reading, if the kinds agree
    fn from_reading(reading: Reading) -> Option<Self>;

    /// Kind-specific aggregate over a non-empty slice
    fn aggregate(values: &[Self]) -> f64;
}

impl Sample for i64 {
    const KIND: NumericKind = NumericKind::Integer;

    fn into_reading(self) -> Reading {
        Reading::Integer(self)
    }

    fn from_reading(reading: Reading) -> Option<Self> {
        match reading {
            Reading::Integer(v) => Some(v),
            Reading::Float(_) => None,
        }
    }

    /// Arithmetic mean, summed in `i128` so large pressures cannot overflow
    fn aggregate(values: &[Self]) -> f64 {
        let sum: i128 = values.iter().map(|&v| v as i128).sum();
        sum as f64 / values.len() as f64
    }
}

impl Sample for f64 {
    const KIND: NumericKind = NumericKind::Float;

    fn into_reading(self) -> Reading {
        Reading::Float(self)
    }

    fn from_reading(reading: Reading) -> Option<Self> {
        match reading {
            Reading::Float(v) => Some(v),
            Reading::Integer(_) => None,
        }
    }

    /// Minimum value, always one of `values`
    fn aggregate(values: &[Self]) -> f64 {
        values
            .iter()
            .copied()
            .min_by(f64::total_cmp)
            .unwrap_or(f64::NAN)
    }
}

/// Ordered, append-only sequence of values of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingHistory<V: Sample> {
    values: Vec<V>,
}

impl<V: Sample> ReadingHistory<V> {
    /// Create an empty history
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Kind of every value in this history
    pub fn kind(&self) -> NumericKind {
        V::KIND
    }

    /// Append a value at the end
    pub fn append(&mut self, value: V) {
        self.values.push(value);
    }

    /// Number of recorded values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no value has been recorded
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Kind-specific aggregate, or `None` if the history is empty
    pub fn aggregate(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(V::aggregate(&self.values))
        }
    }

    /// Iterate over the values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = V> + '_ {
        self.values.iter().copied()
    }

    /// Iterate over the values tagged as readings
    pub fn readings(&self) -> impl Iterator<Item = Reading> + '_ {
        self.values.iter().map(|&v| v.into_reading())
    }

}

impl<V: Sample> Default for ReadingHistory<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Sample> FromIterator<V> for ReadingHistory<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
