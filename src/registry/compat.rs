//! API Version Compatibility
//!
//! Decides whether a plugin built against one API version may run under a
//! host runtime exposing another. Compatibility is major.minor equality;
//! patch numbers and qualifiers (`-SNAPSHOT`, `.Final`, ...) are ignored.
//!
//! All version parsing lives here: versions follow a Maven-like grammar of
//! `major.minor` decimal fields followed by an optional `.` or `-`
//! separated tail holding the patch and/or qualifier.

use std::fmt;
use thiserror::Error;
use crate::registry::entry::PluginEntry;
use crate::registry::error::{RegistryError, RegistryResult};

/// Version string parse failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct VersionParseError {
    reason: String,
}

impl VersionParseError {
    fn new<S: Into<String>>(reason: S) -> Self {
        Self { reason: reason.into() }
    }
}

/// Structured API version: `major.minor` plus whatever trailed them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion {
    major: u32,
    minor: u32,
    /// Patch and/or qualifier text after the minor field, possibly empty.
    /// Never consulted for compatibility.
    tail: String,
}

impl ApiVersion {
    /// Parse a version string of the form `major.minor[(.|-)tail]`.
    pub fn parse(raw: &str) -> Result<Self, VersionParseError> {
        let (major_text, rest) = raw
            .split_once('.')
            .ok_or_else(|| VersionParseError::new(format!("'{}' has no minor segment", raw)))?;

        let major = major_text
            .parse::<u32>()
            .map_err(|_| VersionParseError::new(format!("major segment '{}' is not numeric", major_text)))?;

        let minor_end = rest
            .find(|c: char| c == '.' || c == '-')
            .unwrap_or(rest.len());
        let minor_text = &rest[..minor_end];
        let minor = minor_text
            .parse::<u32>()
            .map_err(|_| VersionParseError::new(format!("minor segment '{}' is not numeric", minor_text)))?;

        let tail = if minor_end < rest.len() {
            rest[minor_end + 1..].to_string()
        } else {
            String::new()
        };

        Ok(Self { major, minor, tail })
    }

    /// Major version field
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor version field
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Text after the minor field, without its separator
    pub fn tail(&self) -> &str {
        &self.tail
    }

    /// Check major.minor equality with another version
    pub fn matches_minor(&self, other: &ApiVersion) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tail.is_empty() {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.tail)
        }
    }
}

/// Check whether a plugin entry may be activated under the given host
/// runtime version.
///
/// The plugin's declared version is validated first: if it cannot be
/// parsed the failure is classified as caller input
/// (`InvalidPluginVersion`), regardless of the host string's state. A host
/// version that fails to parse is a violated internal invariant
/// (`CorruptHostVersion`) when it carries no digits at all (unset or
/// corrupted host context); when it carries digits but does not conform
/// (e.g. `s1.0.0.Final`) the plugin is simply not compatible.
pub fn is_api_compatible(host_version: &str, entry: &PluginEntry) -> RegistryResult<bool> {
    let plugin = ApiVersion::parse(entry.api_version()).map_err(|e| {
        RegistryError::invalid_plugin_version(format!(
            "plugin '{}' declares API version '{}': {}",
            entry.name(),
            entry.api_version(),
            e
        ))
    })?;

    let host = match ApiVersion::parse(host_version) {
        Ok(version) => version,
        Err(e) => {
            if host_version.chars().any(|c| c.is_ascii_digit()) {
                return Ok(false);
            }
            return Err(RegistryError::corrupt_host_version(format!(
                "host API version '{}': {}",
                host_version, e
            )));
        }
    };

    Ok(host.matches_minor(&plugin))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_entry() -> PluginEntry {
        PluginEntry::from_coordinates("com.example.plugin:1.0.0-SNAPSHOT:main").unwrap()
    }

    #[test]
    fn test_version_parsing() {
        let version = ApiVersion::parse("1.0.0-SNAPSHOT").unwrap();
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 0);
        assert_eq!(version.tail(), "0-SNAPSHOT");

        let version = ApiVersion::parse("2.5.1000.Final").unwrap();
        assert_eq!(version.major(), 2);
        assert_eq!(version.minor(), 5);
        assert_eq!(version.tail(), "1000.Final");

        // Bare major.minor is acceptable
        let version = ApiVersion::parse("1.0").unwrap();
        assert_eq!(version.tail(), "");
    }

    #[test]
    fn test_version_parse_failures() {
        assert!(ApiVersion::parse("").is_err());
        assert!(ApiVersion::parse("1").is_err());
        assert!(ApiVersion::parse("s1.0.0.Final").is_err());
        assert!(ApiVersion::parse("1.x.0").is_err());
        assert!(ApiVersion::parse("SNAPSHOT").is_err());
    }

    #[test]
    fn test_minor_version_compatible() {
        let entry = snapshot_entry();
        assert!(is_api_compatible("1.0.1.Final", &entry).unwrap());
        assert!(is_api_compatible("1.0.2.Final", &entry).unwrap());
        assert!(is_api_compatible("1.0.2000.Final", &entry).unwrap());
        assert!(is_api_compatible("1.0.2-SNAPSHOT", &entry).unwrap());
        assert!(is_api_compatible("1.0.1000-SNAPSHOT", &entry).unwrap());
        assert!(is_api_compatible("1.0.1000-adsfasfsd", &entry).unwrap());
        assert!(!is_api_compatible("1.1.0.Final", &entry).unwrap());
        assert!(!is_api_compatible("2.0.0.Final", &entry).unwrap());
    }

    #[test]
    fn test_nonconforming_host_with_digits_is_incompatible() {
        let entry = snapshot_entry();
        assert!(!is_api_compatible("s1.0.0.Final", &entry).unwrap());
    }

    #[test]
    fn test_empty_host_version_is_internal_error() {
        let entry = snapshot_entry();
        let err = is_api_compatible("", &entry).unwrap_err();
        assert!(matches!(err, RegistryError::CorruptHostVersion { .. }));
        assert!(err.is_internal_error());
    }

    #[test]
    fn test_digitless_host_version_is_internal_error() {
        let entry = snapshot_entry();
        let err = is_api_compatible("unset", &entry).unwrap_err();
        assert!(matches!(err, RegistryError::CorruptHostVersion { .. }));
    }

    #[test]
    fn test_malformed_plugin_version_takes_precedence() {
        // Plugin-side malformation is a caller error even when the host
        // string is empty as well.
        let entry = PluginEntry::from_coordinates("com.example.plugin::main").unwrap();
        let err = is_api_compatible("", &entry).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPluginVersion { .. }));
        assert!(err.is_caller_error());

        let err = is_api_compatible("1.0.0.Final", &entry).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPluginVersion { .. }));
    }

    #[test]
    fn test_display() {
        let version = ApiVersion::parse("1.0.0-SNAPSHOT").unwrap();
        assert_eq!(version.to_string(), "1.0.0-SNAPSHOT");
        let bare = ApiVersion::parse("3.2").unwrap();
        assert_eq!(bare.to_string(), "3.2");
    }
}
