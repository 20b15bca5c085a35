//! Plugin Entry
//!
//! Immutable identity of one installed plugin: name, declared API version,
//! and the slot that lets several variants of the same plugin coexist.
//! The canonical textual form is the coordinate string `name:version:slot`,
//! used both on disk and for display.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::registry::error::{RegistryError, RegistryResult};

/// Separator between coordinate segments
const COORDINATE_SEPARATOR: char = ':';

/// One installed plugin, identified by `(name, api_version, slot)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginEntry {
    /// Plugin identifier, typically reverse-domain style
    name: String,
    /// API version the plugin was built against (Maven-like, may carry a
    /// qualifier such as `1.0.0-SNAPSHOT`)
    api_version: String,
    /// Disambiguator allowing multiple installs of the same name
    slot: String,
}

impl PluginEntry {
    /// Create an entry from its component fields.
    ///
    /// The name must be non-empty; version and slot are carried verbatim,
    /// including the empty string (compatibility checks reject an empty
    /// version later, at the point where it matters).
    pub fn new<N, V, S>(name: N, api_version: V, slot: S) -> RegistryResult<Self>
    where
        N: Into<String>,
        V: Into<String>,
        S: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::invalid_coordinates("plugin name must not be empty"));
        }
        Ok(Self {
            name,
            api_version: api_version.into(),
            slot: slot.into(),
        })
    }

    /// Parse an entry from its coordinate string `name:version:slot`.
    ///
    /// Exactly three `:`-separated segments are required. Empty version or
    /// slot segments are accepted literally; an empty name is not.
    pub fn from_coordinates(coordinates: &str) -> RegistryResult<Self> {
        let segments: Vec<&str> = coordinates.split(COORDINATE_SEPARATOR).collect();
        if segments.len() != 3 {
            return Err(RegistryError::invalid_coordinates(format!(
                "expected name:version:slot, got '{}' ({} segment(s))",
                coordinates,
                segments.len()
            )));
        }
        Self::new(segments[0], segments[1], segments[2])
    }

    /// Render the canonical coordinate string `name:version:slot`
    pub fn to_coordinates(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.name,
            self.api_version,
            self.slot,
            sep = COORDINATE_SEPARATOR
        )
    }

    /// Plugin name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared API version
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Installation slot
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Check whether another entry occupies the same `(name, slot)` pair.
    /// Installing over an occupied pair replaces the old entry.
    pub fn same_slot(&self, other: &PluginEntry) -> bool {
        self.name == other.name && self.slot == other.slot
    }
}

impl fmt::Display for PluginEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinates())
    }
}

impl FromStr for PluginEntry {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_coordinates(s)
    }
}
