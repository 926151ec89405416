//! # Stagehand
//!
//! **Configurable middleware pipelines with a re-entrant dispatch engine**
//!
//! Stagehand ties the workspace together:
//!
//! - **Builder and handler** from [`middleware`]: assemble an ordered queue of
//!   unit instances, then dispatch requests through a frozen copy of it
//! - **Configuration** from [`config`]: describe the queue layout in TOML or
//!   JSON, layered with `STAGEHAND_` environment overrides
//! - **Logging** from [`telemetry`]: structured `tracing` output as JSON or
//!   pretty text
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stagehand::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), BoxError> {
//!     let config = ConfigLoader::new()
//!         .with_defaults()
//!         .with_optional_file("stagehand.toml")?
//!         .with_env_prefix("STAGEHAND")
//!         .load()?;
//!     stagehand::init_logging(&config)?;
//!
//!     let mut registry = MiddlewareRegistry::<String, String>::new();
//!     registry.register(
//!         "trim",
//!         Arc::new(FnMiddleware::new(
//!             "trim",
//!             |request: String, next: &mut RequestHandler<String, String>| {
//!                 next.handle(request.trim().to_string())
//!             },
//!         )),
//!     )?;
//!
//!     let mut handler = assemble(&config, &registry)?.create(response_fn(String::new));
//!     handler.handle(String::from("  hello  "))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [dispatch]
//! tag_match = "exact"
//!
//! [logging]
//! level = "info,stagehand_middleware=debug"
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

#![doc(html_root_url = "https://docs.rs/stagehand/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export member crates
pub use stagehand_config as config;
pub use stagehand_core as core;
pub use stagehand_middleware as middleware;
pub use stagehand_telemetry as telemetry;

mod assemble;
mod error;
mod logging;
mod registry;

pub use assemble::{apply_steps, assemble};
pub use error::{AssembleError, AssembleResult};
pub use logging::{init_logging, log_config};
pub use registry::MiddlewareRegistry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use stagehand::prelude::*;
///
/// let builder = HandlerBuilder::<String, String>::new();
/// assert_eq!(builder.tag_match(), TagMatch::Exact);
/// ```
pub mod prelude {
    pub use crate::{assemble, AssembleError, AssembleResult, MiddlewareRegistry};

    pub use stagehand_core::{
        BoxError, MiddlewareId, MiddlewareTag, PipelineError, PipelineResult, Position, TagMatch,
    };

    pub use stagehand_middleware::{
        response_fn, FnMiddleware, HandlerBuilder, Middleware, RequestHandler, ResponseFactory,
        SharedMiddleware, StatusResponseFactory,
    };

    pub use stagehand_config::{ConfigLoader, PipelineStep, StagehandConfig};
}
