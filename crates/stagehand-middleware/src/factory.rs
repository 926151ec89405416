//! Terminal response factories.
//!
//! When a dispatch runs out of middleware, the handler asks its
//! [`ResponseFactory`] for the response that stands in for "nothing else
//! handled this request".

use crate::types::Response;
use std::sync::Arc;

/// Produces the terminal response once the working queue is exhausted.
pub trait ResponseFactory<Res = Response>: Send + Sync + 'static {
    /// Creates a fresh terminal response.
    fn create_response(&self) -> Res;
}

/// A shared, type-erased response factory.
pub type SharedResponseFactory<Res = Response> = Arc<dyn ResponseFactory<Res>>;

/// A response factory backed by a closure.
///
/// # Example
///
/// ```
/// use stagehand_middleware::{response_fn, ResponseFactory};
///
/// let factory = response_fn(|| String::from("fallback"));
/// assert_eq!(factory.create_response(), "fallback");
/// ```
#[derive(Clone)]
pub struct FnResponseFactory<F> {
    func: F,
}

impl<F> FnResponseFactory<F> {
    /// Wraps `func` as a response factory.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Res> ResponseFactory<Res> for FnResponseFactory<F>
where
    F: Fn() -> Res + Send + Sync + 'static,
    Res: 'static,
{
    fn create_response(&self) -> Res {
        (self.func)()
    }
}

impl<F> std::fmt::Debug for FnResponseFactory<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnResponseFactory").finish_non_exhaustive()
    }
}

/// Creates a response factory from a closure.
pub const fn response_fn<F>(func: F) -> FnResponseFactory<F> {
    FnResponseFactory::new(func)
}
