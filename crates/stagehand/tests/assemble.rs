//! Configuration-driven pipeline tests.
//!
//! These load a layout from a file, resolve it against a registry and run
//! requests through the resulting handler.

use stagehand::prelude::*;
use stagehand::{AssembleError, AssembleResult};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tempfile::{Builder, NamedTempFile};

/// Prefixes the response with its own label.
struct Tag(&'static str);

impl Middleware<String, String> for Tag {
    fn process(
        &self,
        request: String,
        next: &mut RequestHandler<String, String>,
    ) -> Result<String, BoxError> {
        Ok(format!("{}|{}", self.0, next.handle(request)?))
    }

    fn name(&self) -> &'static str {
        self.0
    }
}

/// Rejects empty requests without delegating.
struct Guard {
    rejected: AtomicU64,
}

impl Middleware<String, String> for Guard {
    fn process(
        &self,
        request: String,
        next: &mut RequestHandler<String, String>,
    ) -> Result<String, BoxError> {
        if request.is_empty() {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Ok(String::from("rejected"));
        }
        next.handle(request)
    }

    fn name(&self) -> &'static str {
        "guard"
    }

    fn lineage(&self) -> Vec<MiddlewareTag> {
        vec![MiddlewareTag::of::<Tag>()]
    }
}

fn write_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn registry(guard: Arc<Guard>) -> MiddlewareRegistry<String, String> {
    let mut registry = MiddlewareRegistry::<String, String>::new();
    registry
        .register("cors", Arc::new(Tag("cors")))
        .unwrap()
        .register("auth", Arc::new(Tag("auth")))
        .unwrap()
        .register("router", Arc::new(Tag("router")))
        .unwrap()
        .register("guard", guard)
        .unwrap();
    registry
}

fn guard() -> Arc<Guard> {
    Arc::new(Guard {
        rejected: AtomicU64::new(0),
    })
}

fn load(content: &str) -> AssembleResult<StagehandConfig> {
    let file = write_file(".toml", content);
    let config = ConfigLoader::new().with_file(file.path())?.load()?;
    Ok(config)
}

#[test]
fn test_file_layout_dispatches_in_order() {
    let config = load(
        r#"
            [[pipeline.steps]]
            op = "append"
            middleware = "router"

            [[pipeline.steps]]
            op = "insert"
            middleware = "auth"
            position = "before"
            anchor = "router"

            [[pipeline.steps]]
            op = "prepend"
            middleware = "cors"

            [[pipeline.steps]]
            op = "insert"
            middleware = "guard"
            position = "after"
            anchor = "cors"
        "#,
    )
    .unwrap();

    let guard = guard();
    let builder = assemble(&config, &registry(guard.clone())).unwrap();
    assert_eq!(builder.names(), vec!["cors", "guard", "auth", "router"]);

    let mut handler = builder.create(response_fn(|| String::from("end")));
    assert_eq!(
        handler.handle(String::from("GET /")).unwrap(),
        "cors|auth|router|end"
    );

    assert_eq!(handler.handle(String::new()).unwrap(), "cors|rejected");
    assert_eq!(guard.rejected.load(Ordering::SeqCst), 1);

    assert_eq!(
        handler.handle(String::from("GET /again")).unwrap(),
        "cors|auth|router|end"
    );
    assert!(!handler.is_dispatching());
}

#[test]
fn test_replace_from_file() {
    let config = load(
        r#"
            [[pipeline.steps]]
            op = "append"
            middleware = "auth"

            [[pipeline.steps]]
            op = "append"
            middleware = "router"

            [[pipeline.steps]]
            op = "replace"
            middleware = "guard"
            anchor = "auth"
        "#,
    )
    .unwrap();

    let builder = assemble(&config, &registry(guard())).unwrap();
    assert_eq!(builder.names(), vec!["guard", "router"]);
}

#[test]
fn test_invalid_position_rejected_at_load() {
    let err = load(
        r#"
            [[pipeline.steps]]
            op = "insert"
            middleware = "auth"
            position = "around"
            anchor = "router"
        "#,
    )
    .unwrap_err();

    assert!(matches!(err, AssembleError::Config(_)));
    assert!(err.to_string().contains("around"));
}

#[test]
fn test_unknown_name() {
    let config = load(
        r#"
            [[pipeline.steps]]
            op = "append"
            middleware = "metrics"
        "#,
    )
    .unwrap();

    let err = assemble(&config, &registry(guard())).unwrap_err();
    assert!(matches!(
        err,
        AssembleError::UnknownMiddleware { ref name, step: 0 } if name == "metrics"
    ));
}

#[test]
fn test_missing_anchor() {
    let config = load(
        r#"
            [[pipeline.steps]]
            op = "append"
            middleware = "router"

            [[pipeline.steps]]
            op = "replace"
            middleware = "auth"
            anchor = "cors"
        "#,
    )
    .unwrap();

    let err = assemble(&config, &registry(guard())).unwrap_err();
    assert!(matches!(
        err,
        AssembleError::Pipeline(PipelineError::TargetNotFound { .. })
    ));
}

#[test]
fn test_lineage_mode_from_file() {
    let config = load(
        r#"
            [dispatch]
            tag_match = "lineage"

            [[pipeline.steps]]
            op = "append"
            middleware = "guard"
        "#,
    )
    .unwrap();

    let mut builder = assemble(&config, &registry(guard())).unwrap();
    assert_eq!(builder.tag_match(), TagMatch::Lineage);

    builder
        .insert_before_tag(MiddlewareTag::of::<Tag>(), Arc::new(Tag("outer")))
        .unwrap();
    assert_eq!(builder.names(), vec!["outer", "guard"]);
}

#[test]
fn test_programmatic_edits_after_assembly() {
    let config = StagehandConfig::builder()
        .step(PipelineStep::Append {
            middleware: "router".to_string(),
        })
        .build();

    let registry = registry(guard());
    let mut builder = assemble(&config, &registry).unwrap();

    let router = registry.get("router").unwrap().clone();
    builder
        .insert_object(Position::Before, &router, Arc::new(Tag("late")))
        .unwrap();

    let first = builder.create(response_fn(|| String::from("end")));
    builder.append(Arc::new(Tag("tail"))).unwrap();
    let second = builder.create(response_fn(|| String::from("end")));

    assert_eq!(first.names(), vec!["late", "router"]);
    assert_eq!(second.names(), vec!["late", "router", "tail"]);
}
