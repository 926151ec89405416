//! End-to-end dispatch tests over the default HTTP types.
//!
//! The pipeline modelled here is a small service:
//!
//! 1. Request ID - stamp a request ID extension, echo it as a header
//! 2. Auth - reject requests without an `authorization` header
//! 3. Timing - record that the request reached the inner stages
//! 4. Router - answer GET `/health` directly, otherwise fall through
//!
//! Anything the router does not answer falls off the end of the queue and
//! is produced by the response factory.

use bytes::Bytes;
use http::{HeaderValue, Method, Request as HttpRequest, StatusCode};
use http_body_util::Full;
use stagehand_middleware::{
    BoxError, HandlerBuilder, Middleware, MiddlewareTag, Request, RequestHandler, Response,
    ResponseExt, StatusResponseFactory,
};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestId(u64);

struct RequestIdMiddleware {
    next_id: AtomicU64,
}

impl Middleware for RequestIdMiddleware {
    fn process(&self, mut request: Request, next: &mut RequestHandler) -> Result<Response, BoxError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        request.extensions_mut().insert(RequestId(id));

        let mut response = next.handle(request)?;
        response
            .headers_mut()
            .insert("x-request-id", HeaderValue::from(id));
        Ok(response)
    }

    fn name(&self) -> &'static str {
        "request_id"
    }
}

struct AuthMiddleware;

impl Middleware for AuthMiddleware {
    fn process(&self, request: Request, next: &mut RequestHandler) -> Result<Response, BoxError> {
        if request.headers().contains_key("authorization") {
            next.handle(request)
        } else {
            Ok(Response::json_error(
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Authentication required",
            ))
        }
    }

    fn name(&self) -> &'static str {
        "auth"
    }
}

struct TimingMiddleware {
    seen: AtomicUsize,
}

impl Middleware for TimingMiddleware {
    fn process(&self, request: Request, next: &mut RequestHandler) -> Result<Response, BoxError> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        next.handle(request)
    }

    fn name(&self) -> &'static str {
        "timing"
    }
}

struct RouterMiddleware;

impl Middleware for RouterMiddleware {
    fn process(&self, request: Request, next: &mut RequestHandler) -> Result<Response, BoxError> {
        match request.uri().path() {
            "/health" if request.method() != Method::GET => Ok(Response::error(
                StatusCode::METHOD_NOT_ALLOWED,
                "only GET is supported",
            )),
            "/health" => {
                let id = request
                    .extensions()
                    .get::<RequestId>()
                    .ok_or("request id missing")?;
                Ok(http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from(format!("ok {}", id.0))))?)
            }
            "/explode" => Err("router failure".into()),
            _ => next.handle(request),
        }
    }

    fn name(&self) -> &'static str {
        "router"
    }
}

struct Service {
    handler: RequestHandler,
    timing: Arc<TimingMiddleware>,
}

fn service() -> Service {
    let timing = Arc::new(TimingMiddleware {
        seen: AtomicUsize::new(0),
    });

    let mut builder = HandlerBuilder::<Request, Response>::new();
    builder
        .append(Arc::new(AuthMiddleware))
        .unwrap()
        .append(Arc::new(RouterMiddleware))
        .unwrap()
        .prepend(Arc::new(RequestIdMiddleware {
            next_id: AtomicU64::new(1),
        }))
        .unwrap()
        .insert_after_tag(MiddlewareTag::of::<AuthMiddleware>(), timing.clone())
        .unwrap();

    Service {
        handler: builder.create(StatusResponseFactory::default()),
        timing,
    }
}

fn request(path: &str, authorized: bool) -> Request {
    request_with(Method::GET, path, authorized)
}

fn request_with(method: Method, path: &str, authorized: bool) -> Request {
    let mut builder = HttpRequest::builder().method(method).uri(path);
    if authorized {
        builder = builder.header("authorization", "Bearer token");
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

#[test]
fn test_pipeline_order() {
    let service = service();
    assert_eq!(
        service.handler.names(),
        vec!["request_id", "auth", "timing", "router"]
    );
}

#[test]
fn test_routed_request_sees_extension() {
    let mut service = service();
    let response = service.handler.handle(request("/health", true)).unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "1");
    assert_eq!(service.timing.seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_router_rejects_wrong_method() {
    let mut service = service();
    let response = service
        .handler
        .handle(request_with(Method::POST, "/health", true))
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.headers().get("x-request-id").unwrap(), "1");
    assert_eq!(service.timing.seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unrouted_request_reaches_factory() {
    let mut service = service();
    let response = service.handler.handle(request("/missing", true)).unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
}

#[test]
fn test_auth_short_circuits() {
    let mut service = service();
    let response = service.handler.handle(request("/health", false)).unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "1");
    assert_eq!(service.timing.seen.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unit_error_propagates_unmodified() {
    let mut service = service();
    let err = service
        .handler
        .handle(request("/explode", true))
        .unwrap_err();

    assert_eq!(err.to_string(), "router failure");
    assert!(!service.handler.is_dispatching());

    let response = service.handler.handle(request("/health", true)).unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "2");
}

#[test]
fn test_cloned_handlers_share_units() {
    let service = service();
    let mut first = service.handler.clone();
    let mut second = service.handler.clone();

    first.handle(request("/health", true)).unwrap();
    let response = second.handle(request("/health", true)).unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "2");
    assert_eq!(service.timing.seen.load(Ordering::SeqCst), 2);
}

#[test]
fn test_clones_dispatch_concurrently() {
    let service = service();
    let threads: Vec<_> = (0..4)
        .map(|_| {
            let mut handler = service.handler.clone();
            std::thread::spawn(move || {
                handler
                    .handle(request("/health", true))
                    .map(|response| response.status())
                    .map_err(|err| err.to_string())
            })
        })
        .collect();

    for thread in threads {
        assert_eq!(thread.join().unwrap(), Ok(StatusCode::OK));
    }
    assert_eq!(service.timing.seen.load(Ordering::SeqCst), 4);
}
