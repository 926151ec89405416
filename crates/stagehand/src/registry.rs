//! Named middleware registry.
//!
//! Configuration refers to middleware by name. The registry maps those names
//! to the unit instances the application constructed, in registration order.

use crate::error::{AssembleError, AssembleResult};
use indexmap::IndexMap;
use stagehand_middleware::{Request, Response, SharedMiddleware};

/// Ordered map from configuration names to middleware units.
///
/// # Example
///
/// ```
/// use stagehand::MiddlewareRegistry;
/// use stagehand_middleware::{FnMiddleware, RequestHandler};
/// use std::sync::Arc;
///
/// let mut registry = MiddlewareRegistry::<String, String>::new();
/// registry
///     .register(
///         "echo",
///         Arc::new(FnMiddleware::new(
///             "echo",
///             |request: String, next: &mut RequestHandler<String, String>| next.handle(request),
///         )),
///     )
///     .unwrap();
///
/// assert!(registry.contains("echo"));
///
/// let again = registry.get("echo").unwrap().clone();
/// assert!(registry.register("echo", again).is_err());
/// ```
pub struct MiddlewareRegistry<Req = Request, Res = Response> {
    units: IndexMap<String, SharedMiddleware<Req, Res>>,
}

impl<Req: 'static, Res: 'static> MiddlewareRegistry<Req, Res> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            units: IndexMap::new(),
        }
    }

    /// Registers `unit` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::DuplicateName`] if `name` is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        unit: SharedMiddleware<Req, Res>,
    ) -> AssembleResult<&mut Self> {
        let name = name.into();
        if self.units.contains_key(&name) {
            return Err(AssembleError::DuplicateName(name));
        }
        self.units.insert(name, unit);
        Ok(self)
    }

    /// Returns the unit registered under `name`.
    pub fn get(&self, name: &str) -> Option<&SharedMiddleware<Req, Res>> {
        self.units.get(name)
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Returns the number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Returns registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }
}

impl<Req: 'static, Res: 'static> Default for MiddlewareRegistry<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req: 'static, Res: 'static> std::fmt::Debug for MiddlewareRegistry<Req, Res> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
