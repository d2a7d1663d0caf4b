// Sensor Hub - Polymorphic sensor registry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Reading values and numeric kinds
//!
//! A [`Reading`] is a single scalar tagged with its [`NumericKind`].
//! Integer readings come from pressure sensors (Pa), float readings from
//! temperature sensors (°C).

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Numeric classification of a sensor, fixed for the sensor's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "lowercase"))]
pub enum NumericKind {
    /// Whole-number readings (pressure)
    Integer,
    /// Floating-point readings (temperature)
    Float,
}

impl NumericKind {
    /// Map a protocol type tag to a kind (case-insensitive)
    ///
    /// `T` selects [`NumericKind::Float`], `P` selects [`NumericKind::Integer`].
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag.to_ascii_uppercase() {
            'T' => Some(NumericKind::Float),
            'P' => Some(NumericKind::Integer),
            _ => None,
        }
    }

    /// Protocol type tag for this kind
    pub fn tag(self) -> char {
        match self {
            NumericKind::Integer => 'P',
            NumericKind::Float => 'T',
        }
    }

    /// Physical quantity usually measured with this kind
    pub fn quantity(self) -> &'static str {
        match self {
            NumericKind::Integer => "pressure",
            NumericKind::Float => "temperature",
        }
    }

    /// Display unit for readings of this kind
    pub fn unit(self) -> &'static str {
        match self {
            NumericKind::Integer => "Pa",
            NumericKind::Float => "°C",
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericKind::Integer => write!(f, "integer"),
            NumericKind::Float => write!(f, "float"),
        }
    }
}

/// A single recorded scalar value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum Reading {
    /// Integer (pressure) reading
    Integer(i64),
    /// Float (temperature) reading
    Float(f64),
}

impl Reading {
    /// Kind of this reading
    pub fn kind(&self) -> NumericKind {
        match self {
            Reading::Integer(_) => NumericKind::Integer,
            Reading::Float(_) => NumericKind::Float,
        }
    }
}

impl From<i64> for Reading {
    fn from(value: i64) -> Self {
        Reading::Integer(value)
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Float(value)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Integer(v) => write!(f, "{} Pa", v),
            Reading::Float(v) => write!(f, "{:.1}°C", v),
        }
    }
}
