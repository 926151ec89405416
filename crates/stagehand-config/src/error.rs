//! Errors raised while loading or validating configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading, parsing, overriding or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required file does not exist.
    #[error("config file `{path}` does not exist")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read config file `{path}`")]
    ReadError {
        /// File that failed.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file extension or format name is not TOML or JSON.
    #[error("unsupported config format `{0}`")]
    UnsupportedFormat(String),

    /// Malformed TOML or a TOML document that does not fit the schema.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON or a JSON document that does not fit the schema.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is not acceptable.
    #[error("`{field}` is invalid: {reason}")]
    InvalidValue {
        /// Dotted path of the field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An override variable holds a value of the wrong shape.
    #[error("environment override `{var}` is invalid: {reason}")]
    EnvOverride {
        /// Variable name, prefix included.
        var: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `.env` file could not be loaded.
    #[error("cannot load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::FileNotFound`].
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Shorthand for [`ConfigError::ReadError`].
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for [`ConfigError::InvalidValue`].
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ConfigError::EnvOverride`].
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvOverride {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
