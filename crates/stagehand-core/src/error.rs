//! Error types for pipeline assembly.
//!
//! [`PipelineError`] covers everything that can go wrong while building a
//! middleware queue or constructing a handler from one. Dispatch itself adds
//! no error kinds: whatever a unit returns is handed back to the caller as a
//! [`BoxError`], untouched.

use crate::identity::{MiddlewareId, MiddlewareTag};
use thiserror::Error;

/// Error type returned by middleware units and propagated by dispatch.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`PipelineError`].
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised while assembling a pipeline.
///
/// A failed builder operation never leaves a partial mutation behind.
///
/// # Example
///
/// ```
/// use stagehand_core::{MiddlewareTag, PipelineError};
///
/// struct Auth;
///
/// let err = PipelineError::tag_not_found(MiddlewareTag::named::<Auth>("Auth"));
/// assert_eq!(err.to_string(), "type `Auth` does not exist in the middleware queue");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The unit is already registered in the queue.
    #[error("middleware object {name}#{id} has already been registered")]
    DuplicateMiddleware {
        /// Name of the offending unit.
        name: &'static str,
        /// Identity of the offending unit.
        id: MiddlewareId,
    },

    /// No queued unit matches the requested target.
    #[error("{target} does not exist in the middleware queue")]
    TargetNotFound {
        /// Human-readable description of the target.
        target: String,
    },

    /// An insert direction was neither "before" nor "after".
    #[error("invalid insert direction `{direction}`: expected \"before\" or \"after\"")]
    InvalidDirection {
        /// The rejected direction.
        direction: String,
    },

    /// A handler was constructed from a queue with a non-conforming element.
    #[error("invalid middleware queue at index {index}: {reason}")]
    InvalidQueue {
        /// Index of the first offending element.
        index: usize,
        /// Why the element was rejected.
        reason: String,
    },
}

impl PipelineError {
    /// Creates a duplicate registration error.
    pub fn duplicate(name: &'static str, id: MiddlewareId) -> Self {
        Self::DuplicateMiddleware { name, id }
    }

    /// Creates a not-found error for a type-targeted lookup.
    pub fn tag_not_found(tag: MiddlewareTag) -> Self {
        Self::TargetNotFound {
            target: format!("type `{}`", tag.name()),
        }
    }

    /// Creates a not-found error for an object-targeted lookup.
    pub fn object_not_found(name: &str, id: MiddlewareId) -> Self {
        Self::TargetNotFound {
            target: format!("object `{name}#{id}`"),
        }
    }

    /// Creates an invalid direction error.
    pub fn invalid_direction(direction: impl Into<String>) -> Self {
        Self::InvalidDirection {
            direction: direction.into(),
        }
    }

    /// Creates an invalid queue error.
    pub fn invalid_queue(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidQueue {
            index,
            reason: reason.into(),
        }
    }
}
