//! Middleware queue builder.
//!
//! [`HandlerBuilder`] assembles the ordered middleware queue and materializes
//! [`RequestHandler`]s from it. Units are identified by pointer identity: the
//! same `Arc` can be registered once, while two separately allocated units of
//! the same type are independent entries.
//!
//! ## Targeted operations
//!
//! Units can be placed or replaced relative to an existing entry, located
//! either by type tag or by object identity. When several entries match, the
//! one with the lowest index is used.
//!
//! | Operation               | Locates by | Effect on `[A, B, C]` targeting `B` with `D` |
//! |-------------------------|------------|----------------------------------------------|
//! | `insert_before_tag`     | tag        | `[A, D, B, C]`                               |
//! | `insert_after_tag`      | tag        | `[A, B, D, C]`                               |
//! | `insert_before_object`  | identity   | `[A, D, B, C]`                               |
//! | `insert_after_object`   | identity   | `[A, B, D, C]`                               |
//! | `replace_tag`           | tag        | `[A, D, C]`                                  |
//! | `replace_object`        | identity   | `[A, D, C]`                                  |
//!
//! Every operation either fully applies or returns an error and leaves the
//! builder unchanged. Placing a unit that is already queued fails with
//! `DuplicateMiddleware`; placing a unit with an empty name fails with
//! `InvalidQueue`, the same rule [`RequestHandler::new`] applies.

use crate::factory::{ResponseFactory, SharedResponseFactory};
use crate::handler::RequestHandler;
use crate::middleware::{Middleware, SharedMiddleware};
use crate::queue::MiddlewareQueue;
use crate::types::{Request, Response};
use stagehand_core::{MiddlewareId, MiddlewareTag, PipelineError, PipelineResult, Position, TagMatch};
use std::sync::Arc;
use tracing::debug;

/// Builder for middleware queues and the handlers that dispatch them.
///
/// # Example
///
/// ```
/// use stagehand_core::{BoxError, MiddlewareTag};
/// use stagehand_middleware::{HandlerBuilder, Middleware, RequestHandler, response_fn};
/// use std::sync::Arc;
///
/// struct Tag(&'static str);
///
/// impl Middleware<String, String> for Tag {
///     fn process(
///         &self,
///         request: String,
///         next: &mut RequestHandler<String, String>,
///     ) -> Result<String, BoxError> {
///         Ok(format!("{}({})", self.0, next.handle(request)?))
///     }
///
///     fn name(&self) -> &'static str {
///         self.0
///     }
/// }
///
/// # fn main() -> Result<(), BoxError> {
/// let auth = Arc::new(Tag("auth"));
///
/// let mut builder = HandlerBuilder::<String, String>::new();
/// builder
///     .append(auth.clone())?
///     .append(Arc::new(Tag("router")))?
///     .insert_before_object(&auth, Arc::new(Tag("cors")))?;
///
/// assert_eq!(builder.names(), vec!["cors", "auth", "router"]);
///
/// let mut handler = builder.create(response_fn(|| String::from("404")));
/// assert_eq!(handler.handle(String::new())?, "cors(auth(router(404)))");
/// # Ok(())
/// # }
/// ```
pub struct HandlerBuilder<Req = Request, Res = Response> {
    queue: MiddlewareQueue<Req, Res>,
}

impl<Req: 'static, Res: 'static> HandlerBuilder<Req, Res> {
    /// Creates an empty builder using exact tag matching.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: MiddlewareQueue::new(),
        }
    }

    /// Sets how type-targeted operations compare tags.
    #[must_use]
    pub fn with_tag_match(mut self, mode: TagMatch) -> Self {
        self.queue.set_tag_match(mode);
        self
    }

    /// Sets how type-targeted operations compare tags.
    pub fn set_tag_match(&mut self, mode: TagMatch) -> &mut Self {
        self.queue.set_tag_match(mode);
        self
    }

    /// Returns the current tag matching mode.
    pub fn tag_match(&self) -> TagMatch {
        self.queue.tag_match()
    }

    /// Returns the number of queued units.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no units are queued.
    pub fn is_empty(&self) -> bool {
        self.queue.len() == 0
    }

    /// Returns the names of the queued units in dispatch order.
    pub fn names(&self) -> Vec<&'static str> {
        self.queue.names()
    }

    /// Returns true if this exact unit instance is already queued.
    pub fn is_already_registered<T>(&self, unit: &Arc<T>) -> bool
    where
        T: Middleware<Req, Res> + ?Sized,
    {
        self.queue.contains(MiddlewareId::of(unit))
    }

    /// Returns the index of the first unit matching `tag`.
    pub fn position_of_tag(&self, tag: MiddlewareTag) -> Option<usize> {
        self.queue.find_tag(tag)
    }

    /// Returns the index of `target`, if queued.
    pub fn position_of_object<T>(&self, target: &Arc<T>) -> Option<usize>
    where
        T: Middleware<Req, Res> + ?Sized,
    {
        self.queue.find_object(MiddlewareId::of(target))
    }

    /// Adds a unit at the end of the queue.
    pub fn append(&mut self, unit: SharedMiddleware<Req, Res>) -> PipelineResult<&mut Self> {
        let index = self.queue.len();
        self.insert_at(index, unit)
    }

    /// Adds a unit at the front of the queue.
    pub fn prepend(&mut self, unit: SharedMiddleware<Req, Res>) -> PipelineResult<&mut Self> {
        self.insert_at(0, unit)
    }

    /// Inserts a unit immediately before the first unit matching `tag`.
    pub fn insert_before_tag(
        &mut self,
        tag: MiddlewareTag,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<&mut Self> {
        self.insert_tag(Position::Before, tag, unit)
    }

    /// Inserts a unit immediately after the first unit matching `tag`.
    pub fn insert_after_tag(
        &mut self,
        tag: MiddlewareTag,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<&mut Self> {
        self.insert_tag(Position::After, tag, unit)
    }

    /// Inserts a unit immediately before `target`.
    pub fn insert_before_object<T>(
        &mut self,
        target: &Arc<T>,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<&mut Self>
    where
        T: Middleware<Req, Res> + ?Sized,
    {
        self.insert_object(Position::Before, target, unit)
    }

    /// Inserts a unit immediately after `target`.
    pub fn insert_after_object<T>(
        &mut self,
        target: &Arc<T>,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<&mut Self>
    where
        T: Middleware<Req, Res> + ?Sized,
    {
        self.insert_object(Position::After, target, unit)
    }

    /// Inserts a unit on the given side of the first unit matching `tag`.
    pub fn insert_tag(
        &mut self,
        position: Position,
        tag: MiddlewareTag,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<&mut Self> {
        let index = self.locate_tag(tag)?;
        self.insert_at(index + position.offset(), unit)
    }

    /// Inserts a unit on the given side of `target`.
    pub fn insert_object<T>(
        &mut self,
        position: Position,
        target: &Arc<T>,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<&mut Self>
    where
        T: Middleware<Req, Res> + ?Sized,
    {
        let index = self.locate_object(target)?;
        self.insert_at(index + position.offset(), unit)
    }

    /// Replaces the first unit matching `tag`, keeping its position.
    ///
    /// The replaced unit is unregistered and may be queued again later.
    pub fn replace_tag(
        &mut self,
        tag: MiddlewareTag,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<&mut Self> {
        let index = self.locate_tag(tag)?;
        self.replace_at(index, unit)
    }

    /// Replaces `target`, keeping its position.
    ///
    /// The replaced unit is unregistered and may be queued again later.
    pub fn replace_object<T>(
        &mut self,
        target: &Arc<T>,
        unit: SharedMiddleware<Req, Res>,
    ) -> PipelineResult<&mut Self>
    where
        T: Middleware<Req, Res> + ?Sized,
    {
        let index = self.locate_object(target)?;
        self.replace_at(index, unit)
    }

    /// Creates a handler bound to a private copy of the current queue.
    ///
    /// The builder stays usable; later mutations do not reach handlers
    /// created earlier.
    pub fn create<F>(&self, factory: F) -> RequestHandler<Req, Res>
    where
        F: ResponseFactory<Res>,
    {
        self.create_shared(Arc::new(factory))
    }

    /// Creates a handler sharing an existing response factory.
    pub fn create_shared(&self, factory: SharedResponseFactory<Res>) -> RequestHandler<Req, Res> {
        debug!(units = self.queue.len(), "creating request handler");
        RequestHandler::from_snapshot(self.queue.snapshot(), factory)
    }

    fn locate_tag(&self, tag: MiddlewareTag) -> PipelineResult<usize> {
        self.queue
            .find_tag(tag)
            .ok_or_else(|| PipelineError::tag_not_found(tag))
    }

    fn locate_object<T>(&self, target: &Arc<T>) -> PipelineResult<usize>
    where
        T: Middleware<Req, Res> + ?Sized,
    {
        let id = MiddlewareId::of(target);
        self.queue
            .find_object(id)
            .ok_or_else(|| PipelineError::object_not_found(target.name(), id))
    }

    fn insert_at(&mut self, index: usize, unit: SharedMiddleware<Req, Res>) -> PipelineResult<&mut Self> {
        let name = unit.name();
        self.queue.insert(index, unit)?;
        debug!(middleware = name, index, units = self.queue.len(), "middleware registered");
        Ok(self)
    }

    fn replace_at(&mut self, index: usize, unit: SharedMiddleware<Req, Res>) -> PipelineResult<&mut Self> {
        let name = unit.name();
        let previous = self.queue.replace(index, unit)?;
        debug!(
            middleware = name,
            replaced = previous.name(),
            index,
            "middleware replaced"
        );
        Ok(self)
    }
}

impl<Req: 'static, Res: 'static> Default for HandlerBuilder<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req: 'static, Res: 'static> std::fmt::Debug for HandlerBuilder<Req, Res> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerBuilder")
            .field("middleware", &self.queue.names())
            .field("tag_match", &self.queue.tag_match())
            .finish()
    }
}
