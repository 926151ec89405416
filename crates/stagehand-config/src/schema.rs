//! Configuration schema types.
//!
//! This module defines the structure of every configuration section.

use serde::{Deserialize, Serialize};
use stagehand_core::TagMatch;

/// Dispatch configuration section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// How type-targeted builder operations compare tags.
    #[serde(default)]
    pub tag_match: TagMatch,
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directives (e.g., "info" or "stagehand_middleware=trace,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One placement of a named middleware unit.
///
/// Names refer to units registered with the application; anchors name the
/// unit a placement is relative to.
///
/// ```toml
/// [[pipeline.steps]]
/// op = "append"
/// middleware = "router"
///
/// [[pipeline.steps]]
/// op = "insert"
/// middleware = "auth"
/// position = "before"
/// anchor = "router"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PipelineStep {
    /// Add at the end of the queue.
    Append {
        /// Unit to add.
        middleware: String,
    },
    /// Add at the front of the queue.
    Prepend {
        /// Unit to add.
        middleware: String,
    },
    /// Add before or after an anchor unit.
    Insert {
        /// Unit to add.
        middleware: String,
        /// "before" or "after".
        position: String,
        /// Unit to place relative to.
        anchor: String,
    },
    /// Put a unit in the anchor's slot.
    Replace {
        /// Unit to add.
        middleware: String,
        /// Unit to replace.
        anchor: String,
    },
}

impl PipelineStep {
    /// Returns the name of the unit this step adds.
    pub fn middleware(&self) -> &str {
        match self {
            Self::Append { middleware }
            | Self::Prepend { middleware }
            | Self::Insert { middleware, .. }
            | Self::Replace { middleware, .. } => middleware,
        }
    }

    /// Returns the anchor name, for steps that have one.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Self::Insert { anchor, .. } | Self::Replace { anchor, .. } => Some(anchor),
            Self::Append { .. } | Self::Prepend { .. } => None,
        }
    }

    /// Returns the operation name as written in configuration files.
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Append { .. } => "append",
            Self::Prepend { .. } => "prepend",
            Self::Insert { .. } => "insert",
            Self::Replace { .. } => "replace",
        }
    }
}

/// Pipeline configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Placements, applied in order.
    #[serde(default)]
    pub steps: Vec<PipelineStep>,
}
