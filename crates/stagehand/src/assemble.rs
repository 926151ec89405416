//! Builds middleware queues from configuration.
//!
//! Each [`PipelineStep`] is replayed against a [`HandlerBuilder`], resolving
//! names through a [`MiddlewareRegistry`]. Anchors resolve to the registered
//! instance and are located by identity, so an anchor must already have been
//! placed by an earlier step.

use crate::error::{AssembleError, AssembleResult};
use crate::registry::MiddlewareRegistry;
use stagehand_config::{PipelineStep, StagehandConfig};
use stagehand_core::Position;
use stagehand_middleware::{HandlerBuilder, SharedMiddleware};
use tracing::{debug, info};

/// Creates a builder laid out as `config` describes.
///
/// The builder uses the configured tag matching mode and stays open for
/// further programmatic changes before [`HandlerBuilder::create`].
///
/// # Errors
///
/// Returns [`AssembleError::UnknownMiddleware`] when a step names an
/// unregistered unit, and [`AssembleError::Pipeline`] when the builder
/// rejects a step (duplicate unit, missing anchor, bad position).
///
/// # Example
///
/// ```
/// use stagehand::{assemble, MiddlewareRegistry};
/// use stagehand_config::{PipelineStep, StagehandConfig};
/// use stagehand_middleware::{response_fn, FnMiddleware, RequestHandler};
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), stagehand_core::BoxError> {
/// let mut registry = MiddlewareRegistry::<String, String>::new();
/// registry.register(
///     "upper",
///     Arc::new(FnMiddleware::new(
///         "upper",
///         |request: String, next: &mut RequestHandler<String, String>| {
///             next.handle(request.to_uppercase())
///         },
///     )),
/// )?;
///
/// let config = StagehandConfig::builder()
///     .step(PipelineStep::Append { middleware: "upper".to_string() })
///     .build();
///
/// let builder = assemble(&config, &registry)?;
/// let mut handler = builder.create(response_fn(|| String::from("done")));
/// assert_eq!(handler.handle(String::from("hi"))?, "done");
/// # Ok(())
/// # }
/// ```
pub fn assemble<Req: 'static, Res: 'static>(
    config: &StagehandConfig,
    registry: &MiddlewareRegistry<Req, Res>,
) -> AssembleResult<HandlerBuilder<Req, Res>> {
    let mut builder = HandlerBuilder::new().with_tag_match(config.dispatch.tag_match);
    apply_steps(&mut builder, &config.pipeline.steps, registry)?;

    info!(
        units = builder.len(),
        steps = config.pipeline.steps.len(),
        tag_match = config.dispatch.tag_match.as_str(),
        "pipeline assembled"
    );
    Ok(builder)
}

/// Replays `steps` against an existing builder.
///
/// Steps are applied in order; the first failure stops the replay and
/// leaves the builder with every earlier step applied.
///
/// # Errors
///
/// Same as [`assemble`].
pub fn apply_steps<Req: 'static, Res: 'static>(
    builder: &mut HandlerBuilder<Req, Res>,
    steps: &[PipelineStep],
    registry: &MiddlewareRegistry<Req, Res>,
) -> AssembleResult<()> {
    for (index, step) in steps.iter().enumerate() {
        let unit = lookup(registry, step.middleware(), index)?;

        match step {
            PipelineStep::Append { .. } => {
                builder.append(unit)?;
            }
            PipelineStep::Prepend { .. } => {
                builder.prepend(unit)?;
            }
            PipelineStep::Insert {
                position, anchor, ..
            } => {
                let position: Position = position.parse()?;
                let anchor = lookup(registry, anchor, index)?;
                builder.insert_object(position, &anchor, unit)?;
            }
            PipelineStep::Replace { anchor, .. } => {
                let anchor = lookup(registry, anchor, index)?;
                builder.replace_object(&anchor, unit)?;
            }
        }

        debug!(
            step = index,
            op = step.op(),
            middleware = step.middleware(),
            "pipeline step applied"
        );
    }
    Ok(())
}

fn lookup<Req: 'static, Res: 'static>(
    registry: &MiddlewareRegistry<Req, Res>,
    name: &str,
    step: usize,
) -> AssembleResult<SharedMiddleware<Req, Res>> {
    registry
        .get(name)
        .cloned()
        .ok_or_else(|| AssembleError::UnknownMiddleware {
            name: name.to_string(),
            step,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_core::{BoxError, MiddlewareTag, PipelineError, TagMatch};
    use stagehand_middleware::{response_fn, Middleware, RequestHandler};
    use std::sync::Arc;

    struct Label(&'static str);

    impl Middleware<String, String> for Label {
        fn process(
            &self,
            request: String,
            next: &mut RequestHandler<String, String>,
        ) -> Result<String, BoxError> {
            Ok(format!("{}>{}", self.0, next.handle(request)?))
        }

        fn name(&self) -> &'static str {
            self.0
        }
    }

    struct Strict;

    impl Middleware<String, String> for Strict {
        fn process(
            &self,
            request: String,
            next: &mut RequestHandler<String, String>,
        ) -> Result<String, BoxError> {
            next.handle(request)
        }

        fn name(&self) -> &'static str {
            "strict"
        }

        fn lineage(&self) -> Vec<MiddlewareTag> {
            vec![MiddlewareTag::of::<Label>()]
        }
    }

    fn registry() -> MiddlewareRegistry<String, String> {
        let mut registry = MiddlewareRegistry::<String, String>::new();
        for name in ["cors", "auth", "router", "audit"] {
            registry.register(name, Arc::new(Label(name))).unwrap();
        }
        registry.register("strict", Arc::new(Strict)).unwrap();
        registry
    }

    fn append(name: &str) -> PipelineStep {
        PipelineStep::Append {
            middleware: name.to_string(),
        }
    }

    fn insert(name: &str, position: &str, anchor: &str) -> PipelineStep {
        PipelineStep::Insert {
            middleware: name.to_string(),
            position: position.to_string(),
            anchor: anchor.to_string(),
        }
    }

    #[test]
    fn test_steps_replayed_in_order() {
        let config = StagehandConfig::builder()
            .step(append("router"))
            .step(insert("auth", "before", "router"))
            .step(PipelineStep::Prepend {
                middleware: "cors".to_string(),
            })
            .step(insert("audit", "after", "router"))
            .build();

        let builder = assemble(&config, &registry()).unwrap();
        assert_eq!(builder.names(), vec!["cors", "auth", "router", "audit"]);

        let mut handler = builder.create(response_fn(|| String::from("end")));
        assert_eq!(
            handler.handle(String::new()).unwrap(),
            "cors>auth>router>audit>end"
        );
    }

    #[test]
    fn test_replace_step() {
        let config = StagehandConfig::builder()
            .step(append("auth"))
            .step(append("router"))
            .step(PipelineStep::Replace {
                middleware: "strict".to_string(),
                anchor: "auth".to_string(),
            })
            .build();

        let builder = assemble(&config, &registry()).unwrap();
        assert_eq!(builder.names(), vec!["strict", "router"]);
    }

    #[test]
    fn test_unknown_middleware() {
        let config = StagehandConfig::builder()
            .step(append("router"))
            .step(insert("auth", "before", "gateway"))
            .build();

        let err = assemble(&config, &registry()).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::UnknownMiddleware { ref name, step: 1 } if name == "gateway"
        ));
    }

    #[test]
    fn test_anchor_not_placed_yet() {
        let config = StagehandConfig::builder()
            .step(insert("auth", "before", "router"))
            .build();

        let err = assemble(&config, &registry()).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Pipeline(PipelineError::TargetNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_step() {
        let config = StagehandConfig::builder()
            .step(append("router"))
            .step(append("router"))
            .build();

        let err = assemble(&config, &registry()).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Pipeline(PipelineError::DuplicateMiddleware { name: "router", .. })
        ));
    }

    #[test]
    fn test_invalid_direction() {
        let config = StagehandConfig::builder()
            .step(append("router"))
            .step(insert("auth", "under", "router"))
            .build();

        let err = assemble(&config, &registry()).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Pipeline(PipelineError::InvalidDirection { .. })
        ));
    }

    #[test]
    fn test_tag_match_carried_over() {
        let config = StagehandConfig::builder()
            .tag_match(TagMatch::Lineage)
            .step(append("strict"))
            .build();

        let mut builder = assemble(&config, &registry()).unwrap();
        assert_eq!(builder.tag_match(), TagMatch::Lineage);

        builder
            .insert_after_tag(MiddlewareTag::of::<Label>(), Arc::new(Label("late")))
            .unwrap();
        assert_eq!(builder.names(), vec!["strict", "late"]);
    }

    #[test]
    fn test_apply_steps_extends_builder() {
        let registry = registry();
        let mut builder = HandlerBuilder::<String, String>::new();
        builder.append(Arc::new(Label("first"))).unwrap();

        apply_steps(&mut builder, &[append("router")], &registry).unwrap();
        assert_eq!(builder.names(), vec!["first", "router"]);
    }
}
