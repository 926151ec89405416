//! Typed configuration for Stagehand pipelines.
//!
//! This crate provides a strongly-typed configuration system with:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`StagehandConfig`] has three sections:
//!
//! - [`DispatchConfig`] - how type-targeted builder operations match tags
//! - [`LoggingConfig`] - log level, format and decoration
//! - [`PipelineConfig`] - the ordered [`PipelineStep`]s that lay out the
//!   middleware queue by name
//!
//! # Example
//!
//! ```no_run
//! use stagehand_config::ConfigLoader;
//!
//! # fn main() -> Result<(), stagehand_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("stagehand.toml")?
//!     .with_env_prefix("STAGEHAND")
//!     .load()?;
//!
//! println!("{} pipeline steps", config.pipeline.steps.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [dispatch]
//! tag_match = "exact"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [[pipeline.steps]]
//! op = "append"
//! middleware = "router"
//!
//! [[pipeline.steps]]
//! op = "insert"
//! middleware = "auth"
//! position = "before"
//! anchor = "router"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Scalar values can be overridden with `PREFIX__SECTION__KEY`:
//!
//! - `STAGEHAND__DISPATCH__TAG_MATCH=lineage`
//! - `STAGEHAND__LOGGING__LEVEL=stagehand_middleware=trace,info`
//! - `STAGEHAND__LOGGING__ENABLED=false`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
