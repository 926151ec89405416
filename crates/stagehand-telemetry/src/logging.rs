//! Structured logging for Stagehand.
//!
//! The library crates only emit `tracing` events; nothing is printed until a
//! subscriber is installed. [`init_logging`] installs one built from a
//! [`LogConfig`]: an `EnvFilter` for level selection plus a JSON or pretty
//! `fmt` layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use stagehand_telemetry::{init_logging, LogConfig};
//!
//! let config = LogConfig::development().with_level("stagehand_middleware=trace");
//! init_logging(&config)?;
//!
//! tracing::info!(units = 3, "pipeline ready");
//! # Ok::<(), stagehand_telemetry::TelemetryError>(())
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human readable output.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directives (e.g., "info", "stagehand_middleware=trace,warn").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to emit ANSI colour codes.
    pub ansi: bool,

    /// Whether to include file/line info.
    pub include_location: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ansi: true,
            include_location: true,
            include_target: true,
            thread_ids: false,
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            ansi: false,
            include_location: false,
            include_target: true,
            thread_ids: false,
        }
    }

    /// Replaces the filter directives.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Replaces the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Initializes the global log subscriber.
///
/// Disabled configurations are accepted and install nothing.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if `config.level` does not
/// parse, and [`TelemetryError::AlreadyInitialized`] if a global subscriber
/// is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let result = match config.format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(config.ansi)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.thread_ids)
                .with_target(config.include_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(config.ansi)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.thread_ids)
                .with_target(config.include_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()
        }
    };

    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    tracing::debug!(level = %config.level, format = ?config.format, "logging initialized");
    Ok(())
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if the string does not parse.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Field names used by Stagehand's log events.
pub mod fields {
    /// Name of the middleware unit involved.
    pub const MIDDLEWARE: &str = "middleware";

    /// Queue index of the unit involved.
    pub const INDEX: &str = "index";

    /// Dispatch nesting level.
    pub const LEVEL: &str = "level";

    /// Number of queued units.
    pub const UNITS: &str = "units";

    /// Units left undispatched when a dispatch finished.
    pub const SKIPPED: &str = "skipped";
}
