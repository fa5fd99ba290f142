//! External model capability contracts
//!
//! The pipeline consumes five pretrained-model capabilities through the
//! traits below. Implementations wrap whatever inference stack hosts the
//! actual models; the crate never loads models itself. All traits are
//! `Send + Sync` so one capability set can serve concurrent requests, and
//! every method is a synchronous, blocking call from the request's
//! perspective.
//!
//! Capabilities are constructed once at process start and injected into
//! [`crate::processor::OutfitProcessor`], which enables substituting the
//! fakes in [`crate::testing`] for tests.

use crate::config::GenerationParams;
use crate::error::Result;
use crate::types::LabelMap;
use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

/// Removes the background from a photograph
pub trait BackgroundRemoval: Send + Sync {
    /// Produce a copy of the image with background pixels made transparent.
    /// The output always carries an alpha channel.
    ///
    /// # Errors
    /// - Model inference failures
    fn remove_background(&self, image: &DynamicImage) -> Result<RgbaImage>;

    /// Human-readable capability name for health reporting
    fn name(&self) -> &str {
        "background-removal"
    }
}

/// Assigns a semantic label ID to every pixel
pub trait SemanticSegmentation: Send + Sync {
    /// Produce a per-pixel label-ID grid over the fixed closed vocabulary
    /// (see [`crate::vocab::SEGMENTATION_LABELS`]), resized to the input's
    /// resolution.
    ///
    /// # Errors
    /// - Model inference failures
    fn segment(&self, image: &DynamicImage) -> Result<LabelMap>;

    /// Human-readable capability name for health reporting
    fn name(&self) -> &str {
        "semantic-segmentation"
    }
}

/// Scores an image against a closed list of candidate text prompts
pub trait ZeroShotClassification: Send + Sync {
    /// Return one probability per prompt. Candidates are mutually exclusive
    /// and the probabilities sum to 1 (a softmax over candidate scores).
    ///
    /// # Errors
    /// - Model inference failures
    fn classify(&self, image: &DynamicImage, prompts: &[String]) -> Result<Vec<f32>>;

    /// Human-readable capability name for health reporting
    fn name(&self) -> &str {
        "zero-shot-classification"
    }
}

/// Embeds an image into a fixed-dimensional vector space
pub trait ImageEmbedding: Send + Sync {
    /// Produce the model's embedding output for the image. The output shape
    /// differs between model-stack versions; see [`EmbeddingOutput`].
    ///
    /// # Errors
    /// - Model inference failures
    fn embed(&self, image: &DynamicImage) -> Result<EmbeddingOutput>;

    /// Human-readable capability name for health reporting
    fn name(&self) -> &str {
        "image-embedding"
    }
}

/// Generates free-form text from a system/user prompt pair
pub trait TextGeneration: Send + Sync {
    /// Generate up to `params.max_new_tokens` tokens of text. Output is
    /// sampled (nonzero temperature) and not required to be deterministic.
    ///
    /// # Errors
    /// - Model inference failures
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &GenerationParams,
    ) -> Result<String>;

    /// Human-readable capability name for health reporting
    fn name(&self) -> &str {
        "text-generation"
    }
}

/// Embedding output across model-stack versions
///
/// Some stacks expose the projected image embedding directly; older ones
/// return the pooled visual features and leave the projection to the caller's
/// fallback path. Either way the shape is resolved here exactly once, not
/// re-inspected at call sites.
#[derive(Debug, Clone)]
pub enum EmbeddingOutput {
    /// The model's projected image embedding
    Projected(Vec<f32>),

    /// Pooled visual features already passed through the projection fallback
    Pooled(Vec<f32>),
}

impl EmbeddingOutput {
    /// Resolve to the raw (unnormalized) vector
    #[must_use]
    pub fn into_vector(self) -> Vec<f32> {
        match self {
            Self::Projected(v) | Self::Pooled(v) => v,
        }
    }

    /// Vector dimensionality
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Projected(v) | Self::Pooled(v) => v.len(),
        }
    }

    /// Whether the vector is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The full set of injected capabilities held by the processor
///
/// The text generator is optional: deployments without it still serve the
/// image-processing flows, and recommendation requests fail fast.
#[derive(Clone)]
pub struct CapabilitySet {
    /// Background removal capability
    pub background_removal: Arc<dyn BackgroundRemoval>,

    /// Clothing segmentation capability
    pub segmentation: Arc<dyn SemanticSegmentation>,

    /// Zero-shot attribute classification capability
    pub zero_shot: Arc<dyn ZeroShotClassification>,

    /// Image embedding capability
    pub embedding: Arc<dyn ImageEmbedding>,

    /// Optional outfit-recommendation text generator
    pub text_generation: Option<Arc<dyn TextGeneration>>,
}
