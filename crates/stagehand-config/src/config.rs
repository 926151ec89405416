//! Main configuration types.
//!
//! This module provides the top-level [`StagehandConfig`] struct and its builder.

use serde::{Deserialize, Serialize};
use stagehand_core::{Position, TagMatch};

use crate::{ConfigError, DispatchConfig, LogFormat, LoggingConfig, PipelineConfig, PipelineStep};

/// Complete Stagehand configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use stagehand_config::StagehandConfig;
/// use stagehand_core::TagMatch;
///
/// let config = StagehandConfig::default();
/// assert_eq!(config.dispatch.tag_match, TagMatch::Exact);
/// assert!(config.pipeline.steps.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct StagehandConfig {
    /// Dispatch configuration.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pipeline layout.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl StagehandConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use stagehand_config::{PipelineConfig, PipelineStep, StagehandConfig};
    ///
    /// let config = StagehandConfig::builder()
    ///     .pipeline(PipelineConfig {
    ///         steps: vec![PipelineStep::Append { middleware: "router".to_string() }],
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.pipeline.steps.len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> StagehandConfigBuilder {
        StagehandConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The log level is empty while logging is enabled
    /// - A pipeline step names an empty middleware or anchor
    /// - An insert step's position is neither "before" nor "after"
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.enabled && self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                "must not be empty when logging is enabled",
            ));
        }

        for (index, step) in self.pipeline.steps.iter().enumerate() {
            let field = |name: &str| format!("pipeline.steps[{index}].{name}");

            if step.middleware().trim().is_empty() {
                return Err(ConfigError::invalid_value(field("middleware"), "must not be empty"));
            }
            if step.anchor().is_some_and(|anchor| anchor.trim().is_empty()) {
                return Err(ConfigError::invalid_value(field("anchor"), "must not be empty"));
            }
            if let PipelineStep::Insert { position, .. } = step {
                position
                    .parse::<Position>()
                    .map_err(|e| ConfigError::invalid_value(field("position"), e.to_string()))?;
            }
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty log formatting with ANSI colors
    /// - Debug log level with source locations
    ///
    /// # Example
    ///
    /// ```
    /// use stagehand_config::StagehandConfig;
    ///
    /// let config = StagehandConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// - JSON log formatting without colors
    /// - Info log level
    /// - Exact tag matching
    ///
    /// # Example
    ///
    /// ```
    /// use stagehand_config::{LogFormat, StagehandConfig};
    ///
    /// let config = StagehandConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;
        config.dispatch.tag_match = TagMatch::Exact;

        config
    }
}

/// Builder for [`StagehandConfig`].
#[derive(Debug, Default)]
pub struct StagehandConfigBuilder {
    dispatch: Option<DispatchConfig>,
    logging: Option<LoggingConfig>,
    pipeline: Option<PipelineConfig>,
}

impl StagehandConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatch configuration.
    #[must_use]
    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Set the tag matching mode.
    #[must_use]
    pub fn tag_match(mut self, tag_match: TagMatch) -> Self {
        self.dispatch = Some(DispatchConfig { tag_match });
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the pipeline layout.
    #[must_use]
    pub fn pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Append one step to the pipeline layout.
    #[must_use]
    pub fn step(mut self, step: PipelineStep) -> Self {
        self.pipeline.get_or_insert_with(PipelineConfig::default).steps.push(step);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> StagehandConfig {
        StagehandConfig {
            dispatch: self.dispatch.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            pipeline: self.pipeline.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<StagehandConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(position: &str) -> PipelineStep {
        PipelineStep::Insert {
            middleware: "auth".to_string(),
            position: position.to_string(),
            anchor: "router".to_string(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = StagehandConfig::default();
        assert!(config.logging.enabled);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.dispatch.tag_match, TagMatch::Exact);
    }

    #[test]
    fn test_builder_sections() {
        let config = StagehandConfig::builder()
            .tag_match(TagMatch::Lineage)
            .logging(LoggingConfig {
                level: "warn".to_string(),
                ..Default::default()
            })
            .step(PipelineStep::Append {
                middleware: "router".to_string(),
            })
            .step(insert("before"))
            .build();

        assert_eq!(config.dispatch.tag_match, TagMatch::Lineage);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.pipeline.steps.len(), 2);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(StagehandConfig::default().validate().is_ok());
        assert!(StagehandConfig::builder()
            .step(insert("AFTER"))
            .build_validated()
            .is_ok());
    }

    #[test]
    fn test_validate_invalid_position() {
        let err = StagehandConfig::builder()
            .step(PipelineStep::Append {
                middleware: "router".to_string(),
            })
            .step(insert("beside"))
            .build_validated()
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("pipeline.steps[1].position"));
        assert!(message.contains("beside"));
    }

    #[test]
    fn test_validate_empty_names() {
        let err = StagehandConfig::builder()
            .step(PipelineStep::Prepend {
                middleware: " ".to_string(),
            })
            .build_validated()
            .unwrap_err();
        assert!(err.to_string().contains("pipeline.steps[0].middleware"));

        let err = StagehandConfig::builder()
            .step(PipelineStep::Replace {
                middleware: "auth".to_string(),
                anchor: String::new(),
            })
            .build_validated()
            .unwrap_err();
        assert!(err.to_string().contains("pipeline.steps[0].anchor"));
    }

    #[test]
    fn test_validate_empty_level() {
        let config = StagehandConfig::builder()
            .logging(LoggingConfig {
                level: String::new(),
                ..Default::default()
            })
            .build();
        assert!(config.validate().is_err());

        let disabled = StagehandConfig::builder()
            .logging(LoggingConfig {
                enabled: false,
                level: String::new(),
                ..Default::default()
            })
            .build();
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let dev = StagehandConfig::development();
        assert_eq!(dev.logging.format, LogFormat::Pretty);
        assert!(dev.logging.ansi_enabled);
        assert!(dev.logging.include_location);

        let prod = StagehandConfig::production();
        assert_eq!(prod.logging.level, "info");
        assert!(!prod.logging.ansi_enabled);
    }

    #[test]
    fn test_toml_roundtrip_sections() {
        let config = StagehandConfig::builder().step(insert("before")).build();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[logging]"));

        let parsed: StagehandConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml_str = r#"
            [logging]
            level = "debug"
            colour = true
        "#;

        let result: Result<StagehandConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }
}
