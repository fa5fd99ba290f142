//! Fake capability implementations for tests
//!
//! These fakes substitute for the real model capabilities so pipeline
//! behavior can be exercised without model files. Scripted fakes return
//! predetermined outputs; counting fakes additionally record invocations so
//! tests can assert which capabilities a flow touched.

use crate::capabilities::{
    BackgroundRemoval, EmbeddingOutput, ImageEmbedding, SemanticSegmentation, TextGeneration,
    ZeroShotClassification,
};
use crate::config::GenerationParams;
use crate::error::{Result, VisionError};
use crate::types::LabelMap;
use image::{DynamicImage, RgbaImage};
use ndarray::Array2;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Background removal that converts the input to RGBA unchanged
///
/// Tests control transparency by constructing inputs with the alpha they
/// need.
#[derive(Debug, Default)]
pub struct PassthroughBackgroundRemoval;

impl BackgroundRemoval for PassthroughBackgroundRemoval {
    fn remove_background(&self, image: &DynamicImage) -> Result<RgbaImage> {
        Ok(image.to_rgba8())
    }

    fn name(&self) -> &str {
        "passthrough-background-removal"
    }
}

/// Background removal that always fails
#[derive(Debug, Default)]
pub struct FailingBackgroundRemoval;

impl BackgroundRemoval for FailingBackgroundRemoval {
    fn remove_background(&self, _image: &DynamicImage) -> Result<RgbaImage> {
        Err(VisionError::capability("background removal unavailable"))
    }
}

/// Segmentation that returns a fixed label map and counts invocations
pub struct ScriptedSegmentation {
    labels: Array2<u32>,
    calls: AtomicUsize,
}

impl ScriptedSegmentation {
    /// Always return the given label grid (shape `(height, width)`)
    #[must_use]
    pub fn new(labels: Array2<u32>) -> Self {
        Self {
            labels,
            calls: AtomicUsize::new(0),
        }
    }

    /// An all-background label map of the given dimensions
    #[must_use]
    pub fn empty(width: usize, height: usize) -> Self {
        Self::new(Array2::zeros((height, width)))
    }

    /// Number of times `segment` was invoked
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SemanticSegmentation for ScriptedSegmentation {
    fn segment(&self, _image: &DynamicImage) -> Result<LabelMap> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LabelMap::new(self.labels.clone()))
    }

    fn name(&self) -> &str {
        "scripted-segmentation"
    }
}

/// Zero-shot classifier that favors prompts containing configured substrings
///
/// For each query the first favorite (in configuration order) found in any
/// prompt wins with `winner_probability`; the remaining mass is spread
/// uniformly over the other candidates. With no favorite present, the first
/// candidate wins. Distributions always sum to 1.
pub struct ScriptedZeroShot {
    favorites: Vec<String>,
    winner_probability: f32,
}

impl ScriptedZeroShot {
    /// Favor prompts containing any of `favorites`
    #[must_use]
    pub fn new(favorites: &[&str]) -> Self {
        Self {
            favorites: favorites.iter().map(|s| (*s).to_string()).collect(),
            winner_probability: 0.82,
        }
    }

    /// Override the probability assigned to the winning candidate
    #[must_use]
    pub fn with_winner_probability(mut self, probability: f32) -> Self {
        self.winner_probability = probability;
        self
    }

    fn winner_index(&self, prompts: &[String]) -> usize {
        for favorite in &self.favorites {
            if let Some(idx) = prompts.iter().position(|p| p.contains(favorite)) {
                return idx;
            }
        }
        0
    }
}

impl ZeroShotClassification for ScriptedZeroShot {
    fn classify(&self, _image: &DynamicImage, prompts: &[String]) -> Result<Vec<f32>> {
        if prompts.is_empty() {
            return Err(VisionError::capability("no prompts supplied"));
        }
        if prompts.len() == 1 {
            return Ok(vec![1.0]);
        }

        let winner = self.winner_index(prompts);
        let rest = (1.0 - self.winner_probability) / (prompts.len() - 1) as f32;
        Ok(prompts
            .iter()
            .enumerate()
            .map(|(i, _)| {
                if i == winner {
                    self.winner_probability
                } else {
                    rest
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "scripted-zero-shot"
    }
}

/// Zero-shot classifier that always fails
#[derive(Debug, Default)]
pub struct FailingZeroShot;

impl ZeroShotClassification for FailingZeroShot {
    fn classify(&self, _image: &DynamicImage, _prompts: &[String]) -> Result<Vec<f32>> {
        Err(VisionError::capability("classification backend unreachable"))
    }
}

/// Embedding capability returning a fixed vector
pub struct FixedEmbedding {
    output: EmbeddingOutput,
}

impl FixedEmbedding {
    /// Return the vector through the projected-output shape
    #[must_use]
    pub fn projected(vector: Vec<f32>) -> Self {
        Self {
            output: EmbeddingOutput::Projected(vector),
        }
    }

    /// Return the vector through the pooled fallback shape
    #[must_use]
    pub fn pooled(vector: Vec<f32>) -> Self {
        Self {
            output: EmbeddingOutput::Pooled(vector),
        }
    }
}

impl ImageEmbedding for FixedEmbedding {
    fn embed(&self, _image: &DynamicImage) -> Result<EmbeddingOutput> {
        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "fixed-embedding"
    }
}

/// Text generator returning a fixed response and recording prompts
pub struct ScriptedGenerator {
    response: String,
    invocations: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    /// Always generate `response`
    #[must_use]
    pub fn new<S: Into<String>>(response: S) -> Self {
        Self {
            response: response.into(),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// The `(system, user)` prompt pairs seen so far
    #[must_use]
    pub fn invocations(&self) -> Vec<(String, String)> {
        self.invocations.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl TextGeneration for ScriptedGenerator {
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String> {
        if let Ok(mut invocations) = self.invocations.lock() {
            invocations.push((system_prompt.to_string(), user_prompt.to_string()));
        }
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "scripted-generator"
    }
}

/// Text generator that always fails
#[derive(Debug, Default)]
pub struct FailingGenerator;

impl TextGeneration for FailingGenerator {
    fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String> {
        Err(VisionError::capability("generation backend unreachable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_zero_shot_distribution_sums_to_one() {
        let fake = ScriptedZeroShot::new(&["Jeans"]);
        let prompts: Vec<String> = ["a photo of Shirt", "a photo of Jeans", "a photo of Hat"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();

        let image = DynamicImage::new_rgb8(4, 4);
        let probs = fake.classify(&image, &prompts).unwrap();

        assert_eq!(probs.len(), 3);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!((probs[1] - 0.82).abs() < 1e-5);
        assert!(probs[0] < probs[1]);
    }

    #[test]
    fn test_scripted_segmentation_counts_calls() {
        let fake = ScriptedSegmentation::empty(4, 4);
        assert_eq!(fake.call_count(), 0);

        let image = DynamicImage::new_rgb8(4, 4);
        fake.segment(&image).unwrap();
        fake.segment(&image).unwrap();
        assert_eq!(fake.call_count(), 2);
    }

    #[test]
    fn test_scripted_generator_records_prompts() {
        let fake = ScriptedGenerator::new("{}");
        fake.generate("system", "user", &GenerationParams::default())
            .unwrap();

        let seen = fake.invocations();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "system");
        assert_eq!(seen[0].1, "user");
    }
}
