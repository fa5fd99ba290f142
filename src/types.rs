//! Core types for garment detection, classification and recommendation

use crate::error::{Result, VisionError};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Per-pixel semantic label IDs at the source image's resolution
///
/// Produced by the semantic segmentation capability. Rows are image rows, so
/// the underlying array is indexed `[y, x]`.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Array2<u32>,
}

impl LabelMap {
    /// Wrap a label-ID grid. The array shape is `(height, width)`.
    #[must_use]
    pub fn new(labels: Array2<u32>) -> Self {
        Self { labels }
    }

    /// Map width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.labels.ncols() as u32
    }

    /// Map height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.labels.nrows() as u32
    }

    /// Label ID at pixel `(x, y)`
    #[must_use]
    pub fn label_at(&self, x: u32, y: u32) -> u32 {
        self.labels[[y as usize, x as usize]]
    }

    /// Borrow the underlying grid
    #[must_use]
    pub fn as_array(&self) -> &Array2<u32> {
        &self.labels
    }
}

/// Binary membership mask over an image
///
/// `data` holds one byte per pixel in row-major order, `1` for member pixels
/// and `0` elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryMask {
    /// Membership data (0 or 1 per pixel)
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl BinaryMask {
    /// Create a new mask from raw membership data
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Create an all-zero mask of the given dimensions
    #[must_use]
    pub fn zeros(dimensions: (u32, u32)) -> Self {
        let (width, height) = dimensions;
        Self {
            data: vec![0; (width as usize) * (height as usize)],
            dimensions,
        }
    }

    /// Extract the membership mask of one label ID from a label map
    #[must_use]
    pub fn from_label_map(map: &LabelMap, label_id: u32) -> Self {
        let (width, height) = (map.width(), map.height());
        let data = map
            .as_array()
            .iter()
            .map(|&id| u8::from(id == label_id))
            .collect();
        Self::new(data, (width, height))
    }

    /// Mask width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Mask height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }

    /// Whether the pixel at `(x, y)` is a member
    #[must_use]
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        let idx = (y as usize) * (self.width() as usize) + (x as usize);
        self.data.get(idx).is_some_and(|&v| v != 0)
    }

    /// Number of member pixels
    #[must_use]
    pub fn foreground_pixels(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Member pixels as a fraction of total pixels
    #[must_use]
    pub fn area_ratio(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.foreground_pixels() as f32 / self.data.len() as f32
    }

    /// Union this mask with another of identical dimensions (logical OR)
    pub fn union_with(&mut self, other: &BinaryMask) -> Result<()> {
        if self.dimensions != other.dimensions {
            return Err(VisionError::processing(format!(
                "Cannot union masks of differing dimensions: {:?} vs {:?}",
                self.dimensions, other.dimensions
            )));
        }
        for (dst, src) in self.data.iter_mut().zip(&other.data) {
            *dst = u8::from(*dst != 0 || *src != 0);
        }
        Ok(())
    }
}

/// A single detected garment region before classification
///
/// Created by the segment merger, consumed immediately by the attribute
/// classifier.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Canonical garment label (post left/right merging)
    pub label: String,

    /// Merged membership mask over the full source image
    pub mask: BinaryMask,

    /// Alpha-masked crop of the dominant connected component
    pub crop: image::RgbaImage,

    /// Segmentation confidence; the segmentation capability is deterministic
    /// and exposes no per-pixel probability, so this is fixed at 1.0
    pub confidence: f32,

    /// Member pixels of the merged mask as a fraction of total pixels
    pub area_ratio: f32,
}

/// One label with its classification confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeScore {
    /// Vocabulary label
    pub label: String,

    /// Probability in `[0, 1]`, rounded to 4 decimal digits
    pub confidence: f32,
}

impl AttributeScore {
    /// Create a new score
    #[must_use]
    pub fn new<S: Into<String>>(label: S, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Full attribute record produced by classifying one garment image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedAttributes {
    /// Best category label
    pub category: AttributeScore,

    /// Up to three category candidates, descending confidence
    pub top_categories: Vec<AttributeScore>,

    /// Best style label
    pub style: AttributeScore,

    /// Best color label
    pub color: AttributeScore,

    /// Best pattern label
    pub pattern: AttributeScore,

    /// Best material label
    pub material: AttributeScore,

    /// Best season label
    pub season: AttributeScore,

    /// Lower-cased, deduplicated union of the per-axis best labels,
    /// first-occurrence order
    pub tags: Vec<String>,

    /// L2-normalized embedding vector
    pub embedding: Vec<f32>,
}

/// The unit of pipeline output: one classified garment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedItem {
    /// Canonical segment label, or the single-item sentinel
    pub segment_label: String,

    /// Segmentation confidence
    pub segment_confidence: f32,

    /// Best category label
    pub category: AttributeScore,

    /// Up to three category candidates, descending confidence
    pub top_categories: Vec<AttributeScore>,

    /// Best style label
    pub style: AttributeScore,

    /// Best color label
    pub color: AttributeScore,

    /// Best pattern label
    pub pattern: AttributeScore,

    /// Best material label
    pub material: AttributeScore,

    /// Best season label
    pub season: AttributeScore,

    /// Lower-cased, deduplicated attribute tags
    pub tags: Vec<String>,

    /// L2-normalized embedding vector
    pub embedding: Vec<f32>,

    /// PNG crop encoded as base64 for transport
    pub cropped_image_base64: String,
}

impl DetectedItem {
    /// Assemble an item from its segment fields, classification record and
    /// transport-encoded crop
    #[must_use]
    pub fn from_parts(
        segment_label: String,
        segment_confidence: f32,
        attributes: ClassifiedAttributes,
        cropped_image_base64: String,
    ) -> Self {
        Self {
            segment_label,
            segment_confidence,
            category: attributes.category,
            top_categories: attributes.top_categories,
            style: attributes.style,
            color: attributes.color,
            pattern: attributes.pattern,
            material: attributes.material,
            season: attributes.season,
            tags: attributes.tags,
            embedding: attributes.embedding,
            cropped_image_base64,
        }
    }
}

/// Response of the image-processing flows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// Number of classified items
    pub items_found: usize,

    /// The classified items, in detection order
    pub items: Vec<DetectedItem>,
}

impl ProcessOutcome {
    /// The normal "nothing detected" outcome
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items_found: 0,
            items: Vec::new(),
        }
    }

    /// Wrap a list of items
    #[must_use]
    pub fn from_items(items: Vec<DetectedItem>) -> Self {
        Self {
            items_found: items.len(),
            items,
        }
    }
}

/// One wardrobe entry supplied by the caller of the recommendation flow
///
/// Identity is scoped to a single request; nothing persists across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardrobeItem {
    /// Caller-assigned id, unique within one request
    pub id: String,

    /// Garment category
    pub category: String,

    /// Dominant color
    pub color: String,

    /// Style, empty when unknown
    #[serde(default)]
    pub style: String,

    /// Material, empty when unknown
    #[serde(default)]
    pub material: String,

    /// Season, empty when unknown
    #[serde(default)]
    pub season: String,
}

/// One suggested outfit extracted from generated text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Wardrobe item ids composing the outfit
    pub outfit_items: Vec<String>,

    /// Occasion the outfit suits
    pub occasion: String,

    /// Why the items work together
    pub description: String,

    /// Style tags for the outfit
    pub style_tags: Vec<String>,
}

/// Response of the recommendation flow
///
/// A populated `raw_response` signals a soft failure: the generated text had
/// no parseable JSON span, and callers should inspect the raw text instead of
/// treating the empty recommendation list as "no outfits".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    /// Extracted recommendations, empty on soft failure
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,

    /// The unparsed generated text, present only on soft failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl RecommendationOutcome {
    /// The soft-failure shape carrying the full generated text
    #[must_use]
    pub fn from_raw_text<S: Into<String>>(text: S) -> Self {
        Self {
            recommendations: Vec::new(),
            raw_response: Some(text.into()),
        }
    }

    /// Whether this outcome is the soft-failure shape
    #[must_use]
    pub fn is_soft_failure(&self) -> bool {
        self.raw_response.is_some()
    }
}

/// Capability status report for the health operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status, `"ok"` when the processor is constructed
    pub status: String,

    /// Whether the optional text-generation capability is configured
    pub generator_available: bool,

    /// Names of the configured capabilities
    pub capabilities: Vec<String>,
}
