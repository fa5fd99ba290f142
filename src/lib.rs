#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # Wardrobe Vision
//!
//! A Rust library for extracting structured, queryable attributes from
//! clothing photographs and turning wardrobes of such records into outfit
//! suggestions.
//!
//! The pipeline sequences five injected pretrained-model capabilities
//! (background removal, clothing segmentation, zero-shot classification,
//! image embedding, text generation) around a deterministic core: mask
//! geometry and symmetric-label merging, per-item multi-attribute
//! classification and aggregation, single- vs multi-item orchestration, and
//! structured extraction from free-form generated text.
//!
//! ## Features
//!
//! - **Multi-item flow**: background removal → segmentation → left/right
//!   label merging → one classified item per garment
//! - **Single-item flow**: background removal → whole-image classification,
//!   no segmentation
//! - **Six attribute axes**: category, style, color, pattern, material,
//!   season, each a closed-vocabulary zero-shot query, plus a unit-norm
//!   image embedding per item
//! - **Outfit recommendations**: stylist prompt over a caller-supplied
//!   wardrobe with robust JSON extraction from generated text
//! - **Dependency injection**: capabilities are trait objects constructed at
//!   startup; [`testing`] ships fakes for substituting them in tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wardrobe_vision::{
//!     CapabilitySet, OutfitProcessor, PipelineConfig,
//!     process_multi_item_from_bytes,
//! };
//! # use wardrobe_vision::testing::*;
//!
//! # async fn example(photo_bytes: Vec<u8>) -> anyhow::Result<()> {
//! # let (bg, seg, zs, emb) = (
//! #     Arc::new(PassthroughBackgroundRemoval),
//! #     Arc::new(ScriptedSegmentation::empty(1, 1)),
//! #     Arc::new(ScriptedZeroShot::new(&[])),
//! #     Arc::new(FixedEmbedding::projected(vec![1.0])),
//! # );
//! let capabilities = CapabilitySet {
//!     background_removal: bg,
//!     segmentation: seg,
//!     zero_shot: zs,
//!     embedding: emb,
//!     text_generation: None,
//! };
//! let processor = OutfitProcessor::new(capabilities, PipelineConfig::default())?;
//!
//! let outcome = process_multi_item_from_bytes(&photo_bytes, &processor).await?;
//! println!("found {} items", outcome.items_found);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! The processor is immutable after construction: share one instance across
//! request tasks. Capability invocations are synchronous, blocking calls
//! from the request's perspective; wrap the flows in `spawn_blocking` (or
//! equivalent) under an async transport.

pub mod capabilities;
pub mod classifier;
pub mod config;
pub mod error;
pub mod geometry;
pub mod processor;
pub mod recommend;
pub mod segmentation;
pub mod services;
pub mod testing;
pub mod types;
pub mod vocab;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use capabilities::{
    BackgroundRemoval, CapabilitySet, EmbeddingOutput, ImageEmbedding, SemanticSegmentation,
    TextGeneration, ZeroShotClassification,
};
pub use classifier::{composite_onto_white, AttributeClassifier};
pub use config::{GenerationParams, PipelineConfig, PipelineConfigBuilder};
pub use error::{Result, VisionError};
pub use geometry::crop_to_mask;
pub use processor::{OutfitProcessor, SINGLE_ITEM_LABEL};
pub use recommend::{build_user_prompt, extract_json_span, parse_outcome, SYSTEM_PROMPT};
pub use segmentation::merge_segments;
pub use services::TransportCodec;
pub use types::{
    AttributeScore, BinaryMask, ClassifiedAttributes, DetectedItem, HealthReport, LabelMap,
    ProcessOutcome, Recommendation, RecommendationOutcome, Segment, WardrobeItem,
};
pub use vocab::{
    canonical_label, segmentation_label_name, AttributeBanks, CANONICAL_RELABELING,
    GARMENT_LABELS, SEGMENTATION_LABELS,
};

/// Process a full outfit photo provided as encoded image bytes
///
/// Decodes the bytes (JPEG, PNG, ...) and runs the multi-item flow. Suitable
/// for web servers and memory-based processing where files aren't available.
///
/// # Errors
///
/// Returns `VisionError::Image` when the bytes don't decode, otherwise the
/// multi-item flow's errors.
pub async fn process_multi_item_from_bytes(
    image_bytes: &[u8],
    processor: &OutfitProcessor,
) -> Result<types::ProcessOutcome> {
    let image = image::load_from_memory(image_bytes)?;
    processor.process_multi_item(&image)
}

/// Process a single-garment photo provided as encoded image bytes
///
/// # Errors
///
/// Returns `VisionError::Image` when the bytes don't decode, otherwise the
/// single-item flow's errors.
pub async fn process_single_item_from_bytes(
    image_bytes: &[u8],
    processor: &OutfitProcessor,
) -> Result<types::ProcessOutcome> {
    let image = image::load_from_memory(image_bytes)?;
    processor.process_single_item(&image)
}

/// Process a full outfit photo from an async reader stream
///
/// Reads the stream to its end, then runs the multi-item flow. Suitable for
/// network streams and large files.
///
/// # Errors
///
/// Returns `VisionError::Io` on stream errors, otherwise as
/// [`process_multi_item_from_bytes`].
pub async fn process_multi_item_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    processor: &OutfitProcessor,
) -> Result<types::ProcessOutcome> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer).await?;
    process_multi_item_from_bytes(&buffer, processor).await
}

/// Process a single-garment photo from an async reader stream
///
/// # Errors
///
/// Returns `VisionError::Io` on stream errors, otherwise as
/// [`process_single_item_from_bytes`].
pub async fn process_single_item_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    processor: &OutfitProcessor,
) -> Result<types::ProcessOutcome> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer).await?;
    process_single_item_from_bytes(&buffer, processor).await
}
