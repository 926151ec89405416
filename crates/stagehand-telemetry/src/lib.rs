//! Logging setup for Stagehand services.
//!
//! Stagehand's library crates log through `tracing` macros:
//!
//! | Event                          | Level   | Crate                  |
//! |--------------------------------|---------|------------------------|
//! | middleware registered/replaced | `debug` | `stagehand-middleware` |
//! | handler created                | `debug` | `stagehand-middleware` |
//! | dispatch started/complete      | `debug` | `stagehand-middleware` |
//! | unit dequeued, factory used    | `trace` | `stagehand-middleware` |
//! | pipeline step applied          | `debug` | `stagehand`            |
//! | pipeline assembled             | `info`  | `stagehand`            |
//!
//! This crate turns those events into output by installing a
//! `tracing-subscriber` registry with an `EnvFilter` and a JSON or pretty
//! formatting layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use stagehand_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! # Ok::<(), stagehand_telemetry::TelemetryError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
