//! Registry Error Types
//!
//! Error handling for registry operations, split into caller-input errors
//! and internal-state errors so the CLI can report them differently.

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Error types for registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Malformed coordinate string or entry fields
    #[error("Invalid plugin coordinates: {message}")]
    InvalidCoordinates { message: String },

    /// Plugin declared an API version that cannot be parsed
    #[error("Invalid plugin API version: {message}")]
    InvalidPluginVersion { message: String },

    /// Host API version is unset or unusable
    #[error("Host API version unusable: {message}")]
    CorruptHostVersion { message: String },

    /// Registry file could not be read or written
    #[error("Registry storage error: {message}")]
    StorageFailed { message: String },
}

impl RegistryError {
    /// Create an invalid coordinates error
    pub fn invalid_coordinates<S: Into<String>>(message: S) -> Self {
        Self::InvalidCoordinates { message: message.into() }
    }

    /// Create an invalid plugin version error
    pub fn invalid_plugin_version<S: Into<String>>(message: S) -> Self {
        Self::InvalidPluginVersion { message: message.into() }
    }

    /// Create a corrupt host version error
    pub fn corrupt_host_version<S: Into<String>>(message: S) -> Self {
        Self::CorruptHostVersion { message: message.into() }
    }

    /// Create a storage error
    pub fn storage_failed<S: Into<String>>(message: S) -> Self {
        Self::StorageFailed { message: message.into() }
    }

    /// Check if the error was caused by caller input (bad coordinates or
    /// bad plugin metadata)
    pub fn is_caller_error(&self) -> bool {
        matches!(self,
            RegistryError::InvalidCoordinates { .. } |
            RegistryError::InvalidPluginVersion { .. }
        )
    }

    /// Check if the error signals a violated internal invariant rather
    /// than bad input
    pub fn is_internal_error(&self) -> bool {
        matches!(self,
            RegistryError::CorruptHostVersion { .. } |
            RegistryError::StorageFailed { .. }
        )
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::storage_failed(format!("IO error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = RegistryError::invalid_coordinates("missing slot segment");
        assert!(matches!(error, RegistryError::InvalidCoordinates { .. }));
        assert!(error.to_string().contains("missing slot segment"));
    }

    #[test]
    fn test_error_classification() {
        let coords = RegistryError::invalid_coordinates("bad");
        assert!(coords.is_caller_error());
        assert!(!coords.is_internal_error());

        let plugin = RegistryError::invalid_plugin_version("empty");
        assert!(plugin.is_caller_error());

        let host = RegistryError::corrupt_host_version("empty host version");
        assert!(host.is_internal_error());
        assert!(!host.is_caller_error());

        let storage = RegistryError::storage_failed("disk full");
        assert!(storage.is_internal_error());
    }

    #[test]
    fn test_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no registry file");
        let error: RegistryError = io_error.into();
        assert!(matches!(error, RegistryError::StorageFailed { .. }));
        assert!(error.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_display() {
        let error = RegistryError::corrupt_host_version("no digits");
        assert_eq!(error.to_string(), "Host API version unusable: no digits");
    }
}
