//! # Stagehand Middleware
//!
//! Middleware queue builder and re-entrant dispatch engine.
//!
//! A [`HandlerBuilder`] collects middleware units into an ordered queue,
//! enforcing that each unit instance is queued at most once. Calling
//! [`HandlerBuilder::create`] freezes a copy of that queue into a
//! [`RequestHandler`], which runs requests through it one unit at a time.
//!
//! ```text
//! handle(req) → A.process ──next.handle──→ B.process ──next.handle──→ factory
//!                   ↑                          │                        │
//!   response ←──────┴──────────────────────────┴────────────────────────┘
//! ```
//!
//! ## Key Features
//!
//! - **Targeted placement**: insert or replace relative to a unit located by
//!   type tag or by object identity
//! - **Atomic edits**: a failed builder operation changes nothing
//! - **Re-entrant dispatch**: units delegate by calling back into the handler;
//!   every call advances to the next undispatched unit
//! - **Short-circuiting**: a unit that does not delegate ends the pipeline
//! - **Generic**: any request and response types, defaulting to `http` types
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use http::StatusCode;
//! use http_body_util::Full;
//! use stagehand_middleware::{
//!     BoxError, FnMiddleware, HandlerBuilder, Request, RequestHandler, Response,
//!     StatusResponseFactory,
//! };
//! use std::sync::Arc;
//!
//! let mut builder = HandlerBuilder::<Request, Response>::new();
//! builder
//!     .append(Arc::new(FnMiddleware::new(
//!         "teapot",
//!         |request: Request, next: &mut RequestHandler| -> Result<Response, BoxError> {
//!             let mut response = next.handle(request)?;
//!             *response.status_mut() = StatusCode::IM_A_TEAPOT;
//!             Ok(response)
//!         },
//!     )))
//!     .unwrap();
//!
//! let mut handler = builder.create(StatusResponseFactory::default());
//! let response = handler.handle(Request::new(Full::new(Bytes::new()))).unwrap();
//! assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
//! ```

#![doc(html_root_url = "https://docs.rs/stagehand-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod factory;
pub mod handler;
pub mod middleware;
mod queue;
pub mod types;

// Re-export main types at crate root
pub use builder::HandlerBuilder;
pub use factory::{response_fn, FnResponseFactory, ResponseFactory, SharedResponseFactory};
pub use handler::RequestHandler;
pub use middleware::{FnMiddleware, Middleware, SharedMiddleware};
pub use stagehand_core::{BoxError, MiddlewareId, MiddlewareTag, PipelineError, PipelineResult, Position, TagMatch};
pub use types::{Request, Response, ResponseExt, StatusResponseFactory};
