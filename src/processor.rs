//! Pipeline orchestration for garment detection and classification
//!
//! This module provides the `OutfitProcessor` that sequences the injected
//! capabilities into the two image-processing flows and the recommendation
//! flow. The processor is constructed once at startup with its capability
//! set and shared read-only across concurrent requests.

use crate::capabilities::CapabilitySet;
use crate::classifier::{round_confidence, AttributeClassifier};
use crate::config::PipelineConfig;
use crate::error::{Result, VisionError};
use crate::recommend;
use crate::segmentation::merge_segments;
use crate::services::TransportCodec;
use crate::types::{
    DetectedItem, HealthReport, ProcessOutcome, RecommendationOutcome, WardrobeItem,
};
use image::{DynamicImage, RgbaImage};
use instant::Instant;
use log::info;
use tracing::{debug, instrument};

/// Segment label used when classifying a whole photo as one item
pub const SINGLE_ITEM_LABEL: &str = "single_item";

/// Orchestrates background removal, segmentation, classification and
/// recommendation over an injected capability set
///
/// Both processing flows are pure functions of their input image: stateless,
/// side-effect-free beyond invoking the capabilities, and never mutating
/// caller-supplied data.
pub struct OutfitProcessor {
    capabilities: CapabilitySet,
    classifier: AttributeClassifier,
    config: PipelineConfig,
}

impl OutfitProcessor {
    /// Create a processor with the default attribute banks
    ///
    /// # Errors
    ///
    /// Returns `VisionError::InvalidConfig` when the classifier rejects the
    /// banks (an empty axis vocabulary).
    pub fn new(capabilities: CapabilitySet, config: PipelineConfig) -> Result<Self> {
        Self::with_banks(capabilities, config, crate::vocab::AttributeBanks::default())
    }

    /// Create a processor with custom attribute banks
    ///
    /// # Errors
    ///
    /// Returns `VisionError::InvalidConfig` when the classifier rejects the
    /// banks (an empty axis vocabulary).
    pub fn with_banks(
        capabilities: CapabilitySet,
        config: PipelineConfig,
        banks: crate::vocab::AttributeBanks,
    ) -> Result<Self> {
        let classifier = AttributeClassifier::new(
            capabilities.zero_shot.clone(),
            capabilities.embedding.clone(),
            banks,
            config.clone(),
        )?;
        Ok(Self {
            capabilities,
            classifier,
            config,
        })
    }

    /// Process a full outfit photo: every detected garment becomes one item
    ///
    /// Zero detected garments is a normal outcome, returned as an empty
    /// success response. Any capability failure aborts the whole request;
    /// no partial item list is returned.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Capability` when background removal,
    /// segmentation, classification or embedding fails.
    #[instrument(skip(self, image), fields(dimensions = %format!("{}x{}", image.width(), image.height())))]
    pub fn process_multi_item(&self, image: &DynamicImage) -> Result<ProcessOutcome> {
        let total_start = Instant::now();

        let clean = self.remove_background(image)?;
        let clean_dyn = DynamicImage::ImageRgba8(clean);

        let segment_start = Instant::now();
        let label_map = self
            .capabilities
            .segmentation
            .segment(&clean_dyn)
            .map_err(|e| VisionError::capability_failed(self.capabilities.segmentation.name(), &e))?;
        let clean = clean_dyn.into_rgba8();
        let segments = merge_segments(&label_map, &clean, &self.config)?;
        debug!(
            elapsed_ms = segment_start.elapsed().as_millis() as u64,
            count = segments.len(),
            "segmentation finished"
        );

        if segments.is_empty() {
            info!("no garments detected");
            return Ok(ProcessOutcome::empty());
        }

        let mut items = Vec::with_capacity(segments.len());
        for segment in segments {
            debug!(label = %segment.label, "classifying segment");
            let item = self.assemble_item(
                segment.label,
                round_confidence(segment.confidence),
                segment.crop,
            )?;
            items.push(item);
        }

        info!(
            "classified {} items in {}ms",
            items.len(),
            total_start.elapsed().as_millis() as u64
        );
        Ok(ProcessOutcome::from_items(items))
    }

    /// Process a photo of a single garment, skipping segmentation entirely
    ///
    /// The whole background-removed image is classified as one item with the
    /// fixed sentinel label and confidence 1.0.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Capability` when background removal,
    /// classification or embedding fails.
    #[instrument(skip(self, image), fields(dimensions = %format!("{}x{}", image.width(), image.height())))]
    pub fn process_single_item(&self, image: &DynamicImage) -> Result<ProcessOutcome> {
        let total_start = Instant::now();

        let clean = self.remove_background(image)?;
        let item = self.assemble_item(SINGLE_ITEM_LABEL.to_string(), 1.0, clean)?;

        info!(
            "classified single item as '{}' in {}ms",
            item.category.label,
            total_start.elapsed().as_millis() as u64
        );
        Ok(ProcessOutcome::from_items(vec![item]))
    }

    /// Generate outfit recommendations for a caller-supplied wardrobe
    ///
    /// Stateless: the full wardrobe arrives with every call. Fails fast when
    /// no text-generation capability is configured.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::RecommendationUnavailable` when no generator is
    /// configured, and `VisionError::Capability` when generation fails.
    /// Malformed generated output is not an error; it degrades to the
    /// soft-failure outcome carrying `raw_response`.
    pub fn recommend(
        &self,
        wardrobe: &[WardrobeItem],
        occasion: Option<&str>,
        season: Option<&str>,
    ) -> Result<RecommendationOutcome> {
        let generator = self.capabilities.text_generation.as_deref().ok_or_else(|| {
            VisionError::recommendation_unavailable("no text-generation capability configured")
        })?;

        recommend::generate_recommendations(
            generator,
            wardrobe,
            occasion,
            season,
            &self.config.generation,
        )
    }

    /// Report configured capabilities
    #[must_use]
    pub fn health(&self) -> HealthReport {
        let mut capabilities = vec![
            self.capabilities.background_removal.name().to_string(),
            self.capabilities.segmentation.name().to_string(),
            self.capabilities.zero_shot.name().to_string(),
            self.capabilities.embedding.name().to_string(),
        ];
        if let Some(generator) = &self.capabilities.text_generation {
            capabilities.push(generator.name().to_string());
        }

        HealthReport {
            status: "ok".to_string(),
            generator_available: self.capabilities.text_generation.is_some(),
            capabilities,
        }
    }

    /// Remove the background, logging the step duration
    fn remove_background(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let start = Instant::now();
        let clean = self
            .capabilities
            .background_removal
            .remove_background(image)
            .map_err(|e| {
                VisionError::capability_failed(self.capabilities.background_removal.name(), &e)
            })?;
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "background removal finished"
        );
        Ok(clean)
    }

    /// Classify a crop and assemble the transport-ready item
    fn assemble_item(
        &self,
        segment_label: String,
        segment_confidence: f32,
        crop: RgbaImage,
    ) -> Result<DetectedItem> {
        let encoded = TransportCodec::encode_png_base64(&crop)?;
        let crop_dyn = DynamicImage::ImageRgba8(crop);
        let attributes = self.classifier.classify(&crop_dyn)?;

        Ok(DetectedItem::from_parts(
            segment_label,
            segment_confidence,
            attributes,
            encoded,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FixedEmbedding, PassthroughBackgroundRemoval, ScriptedSegmentation, ScriptedZeroShot,
    };
    use std::sync::Arc;

    fn capability_set() -> CapabilitySet {
        CapabilitySet {
            background_removal: Arc::new(PassthroughBackgroundRemoval),
            segmentation: Arc::new(ScriptedSegmentation::empty(8, 8)),
            zero_shot: Arc::new(ScriptedZeroShot::new(&["Jeans"])),
            embedding: Arc::new(FixedEmbedding::projected(vec![1.0, 0.0])),
            text_generation: None,
        }
    }

    #[test]
    fn test_health_without_generator() {
        let processor =
            OutfitProcessor::new(capability_set(), PipelineConfig::default()).unwrap();
        let report = processor.health();

        assert_eq!(report.status, "ok");
        assert!(!report.generator_available);
        assert_eq!(report.capabilities.len(), 4);
        assert!(report
            .capabilities
            .contains(&"scripted-segmentation".to_string()));
    }

    #[test]
    fn test_recommend_fails_fast_without_generator() {
        let processor =
            OutfitProcessor::new(capability_set(), PipelineConfig::default()).unwrap();
        let err = processor.recommend(&[], None, None).unwrap_err();
        assert!(matches!(err, VisionError::RecommendationUnavailable(_)));
    }
}
