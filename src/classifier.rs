//! Attribute classification and aggregation for one garment image
//!
//! Runs six independent closed-vocabulary zero-shot queries plus one
//! embedding query against a single preprocessed image and assembles the
//! results into one typed attribute record.

use crate::capabilities::{ImageEmbedding, ZeroShotClassification};
use crate::config::PipelineConfig;
use crate::error::{Result, VisionError};
use crate::types::{AttributeScore, ClassifiedAttributes};
use crate::vocab::AttributeBanks;
use image::{DynamicImage, RgbImage};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

/// Composite a transparent image onto an opaque white canvas
///
/// The zero-shot capability is tuned on photographs without transparency; an
/// un-composited transparent crop measurably skews its output. Opaque images
/// pass through unchanged.
#[must_use]
pub fn composite_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u32::from(pixel[3]);
        let blend = |channel: u8| -> u8 {
            ((u32::from(channel) * alpha + (255 - alpha) * 255 + 127) / 255) as u8
        };
        out.put_pixel(x, y, image::Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    out
}

/// Round a probability to 4 decimal digits
#[must_use]
pub(crate) fn round_confidence(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

/// Classifies one garment image across the six attribute axes
///
/// Holds the zero-shot and embedding capabilities plus the candidate banks.
/// Stateless across calls; safe to share between requests.
pub struct AttributeClassifier {
    zero_shot: Arc<dyn ZeroShotClassification>,
    embedding: Arc<dyn ImageEmbedding>,
    banks: AttributeBanks,
    config: PipelineConfig,
}

impl AttributeClassifier {
    /// Create a classifier over the given capabilities and banks
    ///
    /// # Errors
    ///
    /// Returns `VisionError::InvalidConfig` when any attribute bank is empty.
    pub fn new(
        zero_shot: Arc<dyn ZeroShotClassification>,
        embedding: Arc<dyn ImageEmbedding>,
        banks: AttributeBanks,
        config: PipelineConfig,
    ) -> Result<Self> {
        let axes = [
            ("categories", banks.categories.len()),
            ("styles", banks.styles.len()),
            ("colors", banks.colors.len()),
            ("patterns", banks.patterns.len()),
            ("materials", banks.materials.len()),
            ("seasons", banks.seasons.len()),
        ];
        for (name, len) in axes {
            if len == 0 {
                return Err(VisionError::invalid_config(format!(
                    "attribute bank '{name}' must not be empty"
                )));
            }
        }

        Ok(Self {
            zero_shot,
            embedding,
            banks,
            config,
        })
    }

    /// Classify one garment image into a full attribute record
    ///
    /// Transparent inputs are composited onto white first. Capability
    /// failures propagate; a failed axis aborts the whole classification.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Capability` when a capability fails or returns
    /// a malformed distribution or embedding.
    pub fn classify(&self, image: &DynamicImage) -> Result<ClassifiedAttributes> {
        let normalized = DynamicImage::ImageRgb8(composite_onto_white(image));

        let ranked_categories = self.rank_axis(&normalized, &self.banks.categories)?;
        let top_categories: Vec<AttributeScore> = ranked_categories
            .into_iter()
            .take(self.config.top_categories)
            .collect();
        let category = top_categories
            .first()
            .cloned()
            .ok_or_else(|| VisionError::capability("category ranking came back empty"))?;

        let style = self.best_label(&normalized, &self.banks.styles)?;
        let color = self.best_label(&normalized, &self.banks.colors)?;
        let pattern = self.best_label(&normalized, &self.banks.patterns)?;
        let material = self.best_label(&normalized, &self.banks.materials)?;
        let season = self.best_label(&normalized, &self.banks.seasons)?;

        let embedding = self.embed(&normalized)?;

        let tags = assemble_tags(&[
            &category.label,
            &style.label,
            &color.label,
            &pattern.label,
            &material.label,
            &season.label,
        ]);

        debug!(
            category = %category.label,
            color = %color.label,
            tags = tags.len(),
            "classified item"
        );

        Ok(ClassifiedAttributes {
            category,
            top_categories,
            style,
            color,
            pattern,
            material,
            season,
            tags,
            embedding,
        })
    }

    /// Rank every candidate of one axis by descending probability
    ///
    /// Ties resolve to the candidate earlier in the vocabulary. Confidences
    /// are rounded to 4 decimal digits.
    fn rank_axis(&self, image: &DynamicImage, bank: &[String]) -> Result<Vec<AttributeScore>> {
        let prompts: Vec<String> = bank
            .iter()
            .map(|label| self.config.render_prompt(label))
            .collect();

        let probabilities = self.zero_shot.classify(image, &prompts)?;
        if probabilities.len() != bank.len() {
            return Err(VisionError::capability(format!(
                "zero-shot returned {} probabilities for {} candidates",
                probabilities.len(),
                bank.len()
            )));
        }

        let sum: f32 = probabilities.iter().sum();
        if (sum - 1.0).abs() > 1e-3 {
            warn!(sum, "zero-shot probabilities do not sum to 1");
        }

        let mut indexed: Vec<(usize, f32)> = probabilities.into_iter().enumerate().collect();
        indexed.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        Ok(indexed
            .into_iter()
            .map(|(idx, prob)| AttributeScore::new(bank[idx].clone(), round_confidence(prob)))
            .collect())
    }

    /// Top-1 candidate of one axis
    fn best_label(&self, image: &DynamicImage, bank: &[String]) -> Result<AttributeScore> {
        self.rank_axis(image, bank)?
            .into_iter()
            .next()
            .ok_or_else(|| VisionError::capability("axis ranking came back empty"))
    }

    /// Resolve and L2-normalize the embedding
    fn embed(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let mut vector = self.embedding.embed(image)?.into_vector();

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if !norm.is_finite() || norm <= f32::EPSILON {
            return Err(VisionError::capability(
                "embedding has zero or non-finite norm",
            ));
        }
        for value in &mut vector {
            *value /= norm;
        }
        Ok(vector)
    }
}

/// Lower-case and deduplicate axis labels, keeping first-occurrence order
fn assemble_tags(labels: &[&String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let tag = label.to_lowercase();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
