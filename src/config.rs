// Sensor Hub - Polymorphic sensor registry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Configuration types for Sensor Hub

/// Banner substrings emitted by the reference firmware between readings
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["===", "Arduino", "Formato"];

/// Line classifier configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Lines containing any of these substrings are ignored (case-sensitive)
    pub ignore_patterns: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl ClassifierConfig {
    /// Create a configuration with a custom set of banner substrings
    pub fn with_ignore_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of sensors
    pub max_sensors: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { max_sensors: 256 }
    }
}

impl RegistryConfig {
    /// Create a configuration with a custom capacity
    pub fn with_max_sensors(max_sensors: usize) -> Self {
        Self { max_sensors }
    }
}

/// Ingestion loop configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestConfig {
    /// Classifier settings
    pub classifier: ClassifierConfig,

    /// Stop after this many lines (`None` = run until end of stream or cancel)
    pub max_lines: Option<u64>,
}

impl IngestConfig {
    /// Create a configuration with a line budget
    pub fn with_max_lines(max_lines: u64) -> Self {
        Self {
            max_lines: Some(max_lines),
            ..Default::default()
        }
    }
}
