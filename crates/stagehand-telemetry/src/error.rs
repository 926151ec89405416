//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive string could not be parsed.
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidFilter {
        /// The rejected directive string.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    AlreadyInitialized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::InvalidFilter {
            filter: "=".to_string(),
            reason: "empty target".to_string(),
        };
        assert_eq!(err.to_string(), "invalid log filter `=`: empty target");

        let err = TelemetryError::AlreadyInitialized("already set".to_string());
        assert_eq!(
            err.to_string(),
            "failed to install log subscriber: already set"
        );
    }
}
