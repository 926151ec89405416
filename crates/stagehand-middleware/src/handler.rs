//! Re-entrant dispatch engine.
//!
//! A [`RequestHandler`] owns a private copy of a middleware queue and a
//! terminal [`ResponseFactory`]. Calling [`RequestHandler::handle`] dequeues
//! the next unit and runs it, handing the unit the handler itself so that it
//! can delegate to the rest of the pipeline.
//!
//! ## Dispatch state
//!
//! The handler is either idle or dispatching:
//!
//! - **Idle**: no working queue, nesting level 0
//! - **Dispatching**: a working queue cloned from the canonical queue,
//!   nesting level >= 1
//!
//! The first `handle()` call clones the canonical queue into the working
//! queue. Nested calls made by units share that working queue, so every call
//! advances to the next undispatched unit, at any depth. When the outermost
//! call returns, by value, by error or by unwinding, the working queue is
//! dropped and the next top-level call starts again from the full queue.

use crate::factory::{ResponseFactory, SharedResponseFactory};
use crate::middleware::SharedMiddleware;
use crate::queue::EMPTY_NAME;
use crate::types::{Request, Response};
use stagehand_core::{BoxError, MiddlewareId, PipelineError, PipelineResult};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, trace};

/// Dispatches requests through a frozen middleware queue.
///
/// Handlers are usually obtained from
/// [`HandlerBuilder::create`](crate::HandlerBuilder::create). Cloning a
/// handler yields an idle copy sharing the same units and factory, which is
/// how a configured handler is reused across concurrent requests or as an
/// isolated sub-pipeline.
pub struct RequestHandler<Req = Request, Res = Response> {
    queue: Vec<SharedMiddleware<Req, Res>>,
    factory: SharedResponseFactory<Res>,
    working: Option<VecDeque<SharedMiddleware<Req, Res>>>,
    nesting: usize,
}

impl<Req: 'static, Res: 'static> RequestHandler<Req, Res> {
    /// Creates a handler from an explicit queue.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidQueue`] if the same unit instance
    /// appears more than once or a unit reports an empty name.
    pub fn new<F>(queue: Vec<SharedMiddleware<Req, Res>>, factory: F) -> PipelineResult<Self>
    where
        F: ResponseFactory<Res>,
    {
        Self::with_shared_factory(queue, Arc::new(factory))
    }

    /// Creates a handler from an explicit queue and a shared factory.
    ///
    /// # Errors
    ///
    /// Same as [`RequestHandler::new`].
    pub fn with_shared_factory(
        queue: Vec<SharedMiddleware<Req, Res>>,
        factory: SharedResponseFactory<Res>,
    ) -> PipelineResult<Self> {
        validate(&queue)?;
        Ok(Self::from_snapshot(queue, factory))
    }

    /// Builder-side constructor; the builder already enforces the same rules.
    pub(crate) fn from_snapshot(
        queue: Vec<SharedMiddleware<Req, Res>>,
        factory: SharedResponseFactory<Res>,
    ) -> Self {
        Self {
            queue,
            factory,
            working: None,
            nesting: 0,
        }
    }

    /// Runs the next undispatched unit against `request`.
    ///
    /// On an idle handler this starts a new dispatch over the full queue.
    /// Called by a unit from inside [`Middleware::process`], it continues
    /// the current dispatch. When no unit is left the response factory
    /// produces the response.
    ///
    /// # Errors
    ///
    /// Errors returned by a unit are passed through unmodified.
    ///
    /// [`Middleware::process`]: crate::Middleware::process
    pub fn handle(&mut self, request: Req) -> Result<Res, BoxError> {
        let mut dispatch = Dispatch::enter(self);

        let Some(unit) = dispatch.next_unit() else {
            trace!(level = dispatch.level(), "middleware exhausted, creating response");
            return Ok(dispatch.handler.factory.create_response());
        };

        trace!(
            middleware = unit.name(),
            level = dispatch.level(),
            "dispatching middleware"
        );
        let result = unit.process(request, &mut *dispatch.handler);
        if let Err(error) = &result {
            if dispatch.level() == 1 {
                debug!(middleware = unit.name(), error = %error, "dispatch failed");
            }
        }
        result
    }

    /// Returns the number of units in the canonical queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if the canonical queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the current nesting level; 0 when idle.
    pub const fn nesting_level(&self) -> usize {
        self.nesting
    }

    /// Returns true while a dispatch is in progress.
    pub const fn is_dispatching(&self) -> bool {
        self.working.is_some()
    }

    /// Returns the number of units not yet dequeued in the current dispatch.
    pub fn remaining(&self) -> usize {
        self.working.as_ref().map_or(0, VecDeque::len)
    }

    /// Returns the names of the queued units in dispatch order.
    pub fn names(&self) -> Vec<&'static str> {
        self.queue.iter().map(|unit| unit.name()).collect()
    }
}

impl<Req, Res> Clone for RequestHandler<Req, Res> {
    /// Produces an idle copy, even when cloned mid-dispatch.
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            factory: Arc::clone(&self.factory),
            working: None,
            nesting: 0,
        }
    }
}

impl<Req: 'static, Res: 'static> std::fmt::Debug for RequestHandler<Req, Res> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandler")
            .field("middleware", &self.names())
            .field("nesting", &self.nesting)
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

/// Scope of one `handle()` call.
///
/// Entering bumps the nesting level (creating the working queue at level 0);
/// dropping restores it and discards the working queue once the outermost
/// call is done.
struct Dispatch<'h, Req, Res> {
    handler: &'h mut RequestHandler<Req, Res>,
}

impl<'h, Req, Res> Dispatch<'h, Req, Res> {
    fn enter(handler: &'h mut RequestHandler<Req, Res>) -> Self {
        if handler.nesting == 0 {
            debug!(units = handler.queue.len(), "dispatch started");
            handler.working = Some(handler.queue.iter().map(Arc::clone).collect());
        }
        handler.nesting += 1;
        Self { handler }
    }

    fn next_unit(&mut self) -> Option<SharedMiddleware<Req, Res>> {
        self.handler.working.as_mut().and_then(VecDeque::pop_front)
    }

    fn level(&self) -> usize {
        self.handler.nesting
    }
}

impl<Req, Res> Drop for Dispatch<'_, Req, Res> {
    fn drop(&mut self) {
        self.handler.nesting = self.handler.nesting.saturating_sub(1);
        if self.handler.nesting == 0 {
            let skipped = self.handler.working.take().map_or(0, |queue| queue.len());
            if std::thread::panicking() {
                debug!(skipped, "dispatch unwound");
            } else {
                debug!(skipped, "dispatch complete");
            }
        }
    }
}

fn validate<Req: 'static, Res: 'static>(queue: &[SharedMiddleware<Req, Res>]) -> PipelineResult<()> {
    let mut seen = HashSet::with_capacity(queue.len());
    for (index, unit) in queue.iter().enumerate() {
        if unit.name().is_empty() {
            return Err(PipelineError::invalid_queue(index, EMPTY_NAME));
        }
        let id = MiddlewareId::of(unit);
        if !seen.insert(id) {
            return Err(PipelineError::invalid_queue(
                index,
                format!("middleware object {}#{id} appears more than once", unit.name()),
            ));
        }
    }
    Ok(())
}
