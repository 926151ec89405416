//! Default HTTP request and response types.
//!
//! The engine is generic over its request and response types; these aliases
//! are the defaults used when no type parameters are given.

use crate::factory::ResponseFactory;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;

/// The default request type: an `http::Request` with a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The default response type: an `http::Response` with a `Full<Bytes>` body.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building error responses.
pub trait ResponseExt {
    /// Creates a plain-text response with the given status code and message.
    fn error(status: StatusCode, message: &str) -> Response;

    /// Creates a JSON error envelope response.
    fn json_error(status: StatusCode, code: &str, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn error(status: StatusCode, message: &str) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::from(message.to_string())));
        *response.status_mut() = status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }

    fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });

        let mut response = http::Response::new(Full::new(Bytes::from(body.to_string())));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

/// Response factory producing an empty-bodied response with a fixed status.
///
/// The default status is `404 Not Found`: a request that falls off the end of
/// the pipeline was not handled by anything.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use stagehand_middleware::{ResponseFactory, StatusResponseFactory};
///
/// let factory = StatusResponseFactory::default();
/// assert_eq!(factory.create_response().status(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResponseFactory {
    status: StatusCode,
}

impl StatusResponseFactory {
    /// Creates a factory that answers with `status`.
    #[must_use]
    pub const fn new(status: StatusCode) -> Self {
        Self { status }
    }

    /// Returns the status this factory answers with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl Default for StatusResponseFactory {
    fn default() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }
}

impl ResponseFactory<Response> for StatusResponseFactory {
    fn create_response(&self) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.status_mut() = self.status;
        response
    }
}
