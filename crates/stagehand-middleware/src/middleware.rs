//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait every queued unit implements.
//! A unit receives the request together with the [`RequestHandler`] that is
//! dispatching it; calling [`RequestHandler::handle`] runs the rest of the
//! pipeline and hands back its response.
//!
//! # Example
//!
//! ```
//! use stagehand_core::BoxError;
//! use stagehand_middleware::{Middleware, RequestHandler};
//!
//! struct Shout;
//!
//! impl Middleware<String, String> for Shout {
//!     fn process(
//!         &self,
//!         request: String,
//!         next: &mut RequestHandler<String, String>,
//!     ) -> Result<String, BoxError> {
//!         let response = next.handle(request.to_uppercase())?;
//!         Ok(format!("{response}!"))
//!     }
//! }
//! ```

use crate::handler::RequestHandler;
use crate::types::{Request, Response};
use stagehand_core::{BoxError, MiddlewareTag};
use std::sync::Arc;

/// A shared, type-erased middleware unit.
///
/// Units are always held behind an `Arc`: the queue stores references, and
/// the identity of the allocation is what uniqueness checks compare.
pub type SharedMiddleware<Req = Request, Res = Response> = Arc<dyn Middleware<Req, Res>>;

/// The core middleware trait.
///
/// # Invariants
///
/// - Each call to `next.handle()` consumes the next undispatched unit; calling
///   it twice does not restart the pipeline
/// - Not calling `next.handle()` short-circuits the pipeline
/// - Errors are returned, not swallowed; the handler passes them through
///   unmodified
pub trait Middleware<Req = Request, Res = Response>: Send + Sync + 'static {
    /// Processes the request, optionally delegating to `next`.
    fn process(&self, request: Req, next: &mut RequestHandler<Req, Res>) -> Result<Res, BoxError>;

    /// Returns the type tag used by type-targeted builder operations.
    ///
    /// Defaults to the tag of the implementing type.
    fn tag(&self) -> MiddlewareTag {
        MiddlewareTag::of::<Self>()
    }

    /// Returns the name used in logs and error messages.
    fn name(&self) -> &'static str {
        self.tag().name()
    }

    /// Returns additional tags this unit answers to under
    /// [`TagMatch::Lineage`](stagehand_core::TagMatch::Lineage).
    fn lineage(&self) -> Vec<MiddlewareTag> {
        Vec::new()
    }
}

/// A middleware unit backed by a closure.
///
/// Every closure has its own type, so each `FnMiddleware` carries a distinct
/// tag; the given name is used as the tag's display name.
///
/// # Example
///
/// ```
/// use stagehand_middleware::{FnMiddleware, HandlerBuilder, RequestHandler, response_fn};
/// use std::sync::Arc;
///
/// let mut builder = HandlerBuilder::<String, String>::new();
/// builder
///     .append(Arc::new(FnMiddleware::new(
///         "greet",
///         |request: String, next: &mut RequestHandler<String, String>| {
///             next.handle(format!("hello {request}"))
///         },
///     )))
///     .unwrap();
///
/// let mut handler = builder.create(response_fn(|| String::from("done")));
/// assert_eq!(handler.handle(String::from("world")).unwrap(), "done");
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Req, Res> Middleware<Req, Res> for FnMiddleware<F>
where
    F: Fn(Req, &mut RequestHandler<Req, Res>) -> Result<Res, BoxError> + Send + Sync + 'static,
    Req: 'static,
    Res: 'static,
{
    fn process(&self, request: Req, next: &mut RequestHandler<Req, Res>) -> Result<Res, BoxError> {
        (self.func)(request, next)
    }

    fn tag(&self) -> MiddlewareTag {
        MiddlewareTag::named::<Self>(self.name)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
