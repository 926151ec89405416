//! # Stagehand Core
//!
//! Core types shared by every Stagehand crate.
//!
//! This crate provides the vocabulary the builder and the dispatcher agree on:
//!
//! - [`MiddlewareId`] - Pointer identity of a shared middleware unit
//! - [`MiddlewareTag`] - Explicit, comparable type tag carried by every unit
//! - [`TagMatch`] - How tag-targeted lookups compare tags
//! - [`Position`] - Insert direction relative to a target unit
//! - [`PipelineError`] - Errors raised while assembling a pipeline

#![doc(html_root_url = "https://docs.rs/stagehand-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod identity;
mod position;

pub use error::{BoxError, PipelineError, PipelineResult};
pub use identity::{MiddlewareId, MiddlewareTag, TagMatch};
pub use position::Position;
