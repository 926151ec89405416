//! Bridges the logging configuration section to the telemetry crate.

use crate::error::AssembleResult;
use stagehand_config::{LogFormat as ConfigLogFormat, LoggingConfig, StagehandConfig};
use stagehand_telemetry::{LogConfig, LogFormat};

/// Converts a `[logging]` section into a telemetry [`LogConfig`].
#[must_use]
pub fn log_config(logging: &LoggingConfig) -> LogConfig {
    let format = match logging.format {
        ConfigLogFormat::Json => LogFormat::Json,
        ConfigLogFormat::Pretty => LogFormat::Pretty,
    };

    LogConfig {
        enabled: logging.enabled,
        level: logging.level.clone(),
        format,
        ansi: logging.ansi_enabled,
        include_location: logging.include_location,
        ..LogConfig::production()
    }
}

/// Installs the global log subscriber described by `config.logging`.
///
/// # Errors
///
/// Returns [`AssembleError::Telemetry`](crate::AssembleError::Telemetry) if
/// the level does not parse or a subscriber is already installed.
pub fn init_logging(config: &StagehandConfig) -> AssembleResult<()> {
    stagehand_telemetry::init_logging(&log_config(&config.logging))?;
    Ok(())
}
