//! Assembly error types.

use stagehand_config::ConfigError;
use stagehand_core::PipelineError;
use stagehand_telemetry::TelemetryError;
use thiserror::Error;

/// Errors raised while turning configuration into a running pipeline.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// A pipeline step names a unit that is not in the registry.
    #[error("pipeline step {step} refers to unknown middleware `{name}`")]
    UnknownMiddleware {
        /// The unregistered name.
        name: String,
        /// Index of the offending step.
        step: usize,
    },

    /// A name was registered twice.
    #[error("middleware name `{0}` is already registered")]
    DuplicateName(String),

    /// The builder rejected a step.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Result type alias using [`AssembleError`].
pub type AssembleResult<T> = Result<T, AssembleError>;
