// Sensor Hub - Polymorphic sensor registry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Sensor registry
//!
//! The [`SensorRegistry`] owns every known [`Sensor`], keeps them in
//! creation order and guarantees that identifiers are unique.
//!
//! Traversal is exposed as iterators. A mutable traversal
//! ([`SensorRegistry::iter_mut`]) may append readings to the sensors it
//! visits, but it cannot insert or remove registry entries while it is
//! alive: the registry is mutably borrowed for the whole traversal.

use std::collections::HashMap;

use log::debug;

use crate::config::RegistryConfig;
use crate::error::{Result, SensorError};
use crate::reading::NumericKind;
use crate::sensor::{Sensor, SensorSnapshot};

/// Insertion-ordered collection of sensors keyed by id
#[derive(Debug, Clone)]
pub struct SensorRegistry {
    /// Sensors in creation order
    sensors: Vec<Sensor>,
    /// Position of each sensor in `sensors`
    index: HashMap<String, usize>,
    /// Registry configuration
    config: RegistryConfig,
}

impl SensorRegistry {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            sensors: Vec::new(),
            index: HashMap::new(),
            config,
        }
    }

    /// Add a sensor at the end of the registry
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A sensor with the same id already exists ([`SensorError::DuplicateId`])
    /// - The registry is at capacity ([`SensorError::RegistryFull`])
    ///
    /// On error the registry is unchanged.
    pub fn insert(&mut self, sensor: Sensor) -> Result<&mut Sensor> {
        if self.index.contains_key(sensor.id()) {
            return Err(SensorError::DuplicateId(sensor.id().to_string()));
        }
        self.push(sensor)
    }

    /// Look up a sensor by exact id
    pub fn find(&self, id: &str) -> Option<&Sensor> {
        self.index.get(id).map(|&pos| &self.sensors[pos])
    }

    /// Look up a sensor by exact id for mutation
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Sensor> {
        match self.index.get(id) {
            Some(&pos) => Some(&mut self.sensors[pos]),
            None => None,
        }
    }

    /// Return the sensor with this id, creating it if needed
    ///
    /// An existing sensor is returned regardless of `kind`: the kind chosen
    /// at creation always wins. The boolean is `true` when the sensor was
    /// created by this call.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidId`] for an empty id and
    /// [`SensorError::RegistryFull`] when a new sensor does not fit.
    pub fn find_or_create(&mut self, id: &str, kind: NumericKind) -> Result<(&mut Sensor, bool)> {
        if let Some(&pos) = self.index.get(id) {
            return Ok((&mut self.sensors[pos], false));
        }
        let sensor = Sensor::new(id, kind)?;
        debug!("Creating {} sensor '{}'", kind.quantity(), id);
        Ok((self.push(sensor)?, true))
    }

    fn push(&mut self, sensor: Sensor) -> Result<&mut Sensor> {
        if self.sensors.len() >= self.config.max_sensors {
            return Err(SensorError::RegistryFull {
                max: self.config.max_sensors,
            });
        }
        let pos = self.sensors.len();
        self.index.insert(sensor.id().to_string(), pos);
        self.sensors.push(sensor);
        Ok(&mut self.sensors[pos])
    }

    /// Check if a sensor exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate over sensors in creation order
    pub fn iter(&self) -> std::slice::Iter<'_, Sensor> {
        self.sensors.iter()
    }

    /// Iterate mutably over sensors in creation order
    ///
    /// Visited sensors may receive new readings; the registry itself cannot
    /// change shape until the iterator is dropped.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Sensor> {
        self.sensors.iter_mut()
    }

    /// Iterate over sensor ids in creation order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sensors.iter().map(Sensor::id)
    }

    /// Snapshots of every sensor in creation order
    pub fn snapshots(&self) -> Vec<SensorSnapshot> {
        self.sensors.iter().map(Sensor::describe).collect()
    }

    /// Number of sensors
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// Check if there are no sensors
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Total readings across all sensors
    pub fn total_readings(&self) -> usize {
        self.sensors.iter().map(Sensor::len).sum()
    }

    /// Registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Release every sensor
    ///
    /// The registry is empty afterwards and can be reused. Calling this on
    /// an empty registry does nothing. Returns the number of released sensors.
    pub fn teardown(&mut self) -> usize {
        let released = self.sensors.len();
        for sensor in self.sensors.drain(..) {
            debug!("Releasing sensor '{}'", sensor.id());
        }
        self.index.clear();
        released
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a SensorRegistry {
    type Item = &'a Sensor;
    type IntoIter = std::slice::Iter<'a, Sensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut SensorRegistry {
    type Item = &'a mut Sensor;
    type IntoIter = std::slice::IterMut<'a, Sensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
