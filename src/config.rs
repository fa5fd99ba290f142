//! Configuration types for the garment vision pipeline

use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};

/// Sampling parameters for the text-generation capability
///
/// Generated output is not required to be deterministic; temperature must be
/// nonzero so the capability samples rather than greedy-decodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,

    /// Sampling temperature, must be > 0
    pub temperature: f32,

    /// Nucleus sampling threshold
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 1024,
            temperature: 0.6,
            top_p: 0.95,
        }
    }
}

/// Configuration for the detection and classification pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum merged-mask area as a fraction of total pixels; smaller
    /// segments are treated as noise and discarded
    pub min_area_ratio: f32,

    /// Padding in pixels added around a component's bounding box when
    /// cropping
    pub crop_padding: u32,

    /// Number of category candidates retained per item
    pub top_categories: usize,

    /// Zero-shot prompt template; `{}` is replaced with the candidate label
    pub prompt_template: String,

    /// Sampling parameters for outfit recommendation
    pub generation: GenerationParams,
}

impl PipelineConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Render a zero-shot prompt for one candidate label
    #[must_use]
    pub fn render_prompt(&self, label: &str) -> String {
        self.prompt_template.replacen("{}", label, 1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.005,
            crop_padding: 10,
            top_categories: 3,
            prompt_template: "a photo of {}".to_string(),
            generation: GenerationParams::default(),
        }
    }
}

/// Builder for `PipelineConfig`
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    #[must_use]
    pub fn min_area_ratio(mut self, ratio: f32) -> Self {
        self.config.min_area_ratio = ratio;
        self
    }

    #[must_use]
    pub fn crop_padding(mut self, padding: u32) -> Self {
        self.config.crop_padding = padding;
        self
    }

    #[must_use]
    pub fn top_categories(mut self, count: usize) -> Self {
        self.config.top_categories = count;
        self
    }

    #[must_use]
    pub fn prompt_template<S: Into<String>>(mut self, template: S) -> Self {
        self.config.prompt_template = template.into();
        self
    }

    #[must_use]
    pub fn max_new_tokens(mut self, tokens: u32) -> Self {
        self.config.generation.max_new_tokens = tokens;
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.generation.temperature = temperature;
        self
    }

    #[must_use]
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.config.generation.top_p = top_p;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `VisionError::InvalidConfig` for:
    /// - `min_area_ratio` outside `[0, 1)`
    /// - `top_categories` of zero
    /// - a prompt template without a `{}` placeholder
    /// - non-positive temperature, `top_p` outside `(0, 1]`, or zero
    ///   `max_new_tokens`
    pub fn build(self) -> Result<PipelineConfig> {
        let config = self.config;

        if !(0.0..1.0).contains(&config.min_area_ratio) {
            return Err(VisionError::invalid_config(format!(
                "min_area_ratio must be in [0, 1), got {}",
                config.min_area_ratio
            )));
        }
        if config.top_categories == 0 {
            return Err(VisionError::invalid_config(
                "top_categories must be at least 1",
            ));
        }
        if !config.prompt_template.contains("{}") {
            return Err(VisionError::invalid_config(
                "prompt_template must contain a {} placeholder",
            ));
        }
        if config.generation.temperature <= 0.0 {
            return Err(VisionError::invalid_config(format!(
                "temperature must be positive, got {}",
                config.generation.temperature
            )));
        }
        if config.generation.top_p <= 0.0 || config.generation.top_p > 1.0 {
            return Err(VisionError::invalid_config(format!(
                "top_p must be in (0, 1], got {}",
                config.generation.top_p
            )));
        }
        if config.generation.max_new_tokens == 0 {
            return Err(VisionError::invalid_config(
                "max_new_tokens must be at least 1",
            ));
        }

        Ok(config)
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = PipelineConfig::default();
        assert!((config.min_area_ratio - 0.005).abs() < f32::EPSILON);
        assert_eq!(config.crop_padding, 10);
        assert_eq!(config.top_categories, 3);
        assert_eq!(config.generation.max_new_tokens, 1024);
        assert!((config.generation.temperature - 0.6).abs() < f32::EPSILON);
        assert!((config.generation.top_p - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_prompt_rendering() {
        let config = PipelineConfig::default();
        assert_eq!(config.render_prompt("denim"), "a photo of denim");

        let config = PipelineConfig::builder()
            .prompt_template("an item made of {}")
            .build()
            .unwrap();
        assert_eq!(config.render_prompt("wool"), "an item made of wool");
    }

    #[test]
    fn test_builder_validation() {
        assert!(PipelineConfig::builder().min_area_ratio(1.0).build().is_err());
        assert!(PipelineConfig::builder().min_area_ratio(-0.1).build().is_err());
        assert!(PipelineConfig::builder().top_categories(0).build().is_err());
        assert!(PipelineConfig::builder()
            .prompt_template("no placeholder")
            .build()
            .is_err());
        assert!(PipelineConfig::builder().temperature(0.0).build().is_err());
        assert!(PipelineConfig::builder().top_p(0.0).build().is_err());
        assert!(PipelineConfig::builder().max_new_tokens(0).build().is_err());

        let config = PipelineConfig::builder()
            .min_area_ratio(0.01)
            .crop_padding(4)
            .top_categories(5)
            .build()
            .unwrap();
        assert_eq!(config.crop_padding, 4);
        assert_eq!(config.top_categories, 5);
    }
}
