//! Error types and result aliases for shimlist operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the shimlist crates with actionable error messages.

use thiserror::Error;

use crate::types::VersionError;

/// Unified error type for all shimlist operations
#[derive(Error, Debug)]
pub enum ShimError {
    // Selector errors
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    // Target errors
    #[error("Invalid targets '{input}': {reason}")]
    InvalidTargets { input: String, reason: String },

    #[error("Invalid version: {input}")]
    InvalidVersion { input: String },

    // Registry errors
    #[error("Failed to load feature registry: {message}")]
    RegistryLoad { message: String },

    // Config errors
    #[error("Failed to parse JSON options: {message}")]
    JsonParse { message: String },

    #[error("Failed to parse shimlist.toml: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for shimlist operations
pub type ShimResult<T> = Result<T, ShimError>;

impl ShimError {
    /// Create a selector error
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Create a targets error
    pub fn invalid_targets(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTargets {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ShimError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ShimError::InvalidSelector { .. } => Some(
                "Use a feature name like 'es.map', a group like 'core-js/es/math', or a pattern like '/^es\\.math/'",
            ),
            ShimError::InvalidTargets { .. } => {
                Some("Targets are written as 'engine version' pairs, e.g. 'chrome 61, firefox 60'")
            },
            ShimError::RegistryLoad { .. } => {
                Some("The registry fixture is malformed; regenerate it from the compat data")
            },
            ShimError::Io { .. } => Some("Check that the file exists and is readable"),
            _ => None,
        }
    }
}

impl From<VersionError> for ShimError {
    fn from(err: VersionError) -> Self {
        match err {
            VersionError::InvalidFormat { input } | VersionError::InvalidNumber { component: input } => {
                ShimError::InvalidVersion { input }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_display() {
        let err = ShimError::invalid_selector("core-js/es/nope", "unknown aggregate group");
        assert_eq!(
            err.to_string(),
            "Invalid selector 'core-js/es/nope': unknown aggregate group"
        );
        assert!(err.suggestion().is_some());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_version_error_conversion() {
        let err: ShimError = VersionError::InvalidFormat {
            input: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, ShimError::InvalidVersion { ref input } if input == "abc"));
    }

    #[test]
    fn test_io_error_is_recoverable() {
        let err = ShimError::io(
            "Failed to read shimlist.toml".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.is_recoverable());
    }
}
