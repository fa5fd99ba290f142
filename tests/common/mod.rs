//! Shared fixtures for integration tests
#![allow(dead_code)]

use ndarray::Array2;
use std::sync::Arc;
use wardrobe_vision::testing::{
    FixedEmbedding, PassthroughBackgroundRemoval, ScriptedSegmentation, ScriptedZeroShot,
};
use wardrobe_vision::{
    CapabilitySet, OutfitProcessor, PipelineConfig, TextGeneration, WardrobeItem,
};

/// An opaque outfit photo of uniform color
pub fn outfit_photo(width: u32, height: u32) -> image::DynamicImage {
    image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([90, 90, 120]),
    ))
}

/// Build a label grid by painting inclusive rectangles of label IDs
pub fn label_grid(
    width: usize,
    height: usize,
    regions: &[(u32, (usize, usize, usize, usize))],
) -> Array2<u32> {
    let mut grid = Array2::zeros((height, width));
    for &(id, (x0, y0, x1, y1)) in regions {
        for y in y0..=y1 {
            for x in x0..=x1 {
                grid[[y, x]] = id;
            }
        }
    }
    grid
}

/// A capability set with the standard scripted classifier and embedder
pub fn capability_set(
    segmentation: Arc<ScriptedSegmentation>,
    text_generation: Option<Arc<dyn TextGeneration>>,
) -> CapabilitySet {
    CapabilitySet {
        background_removal: Arc::new(PassthroughBackgroundRemoval),
        segmentation,
        zero_shot: Arc::new(ScriptedZeroShot::new(&["Jeans"])),
        embedding: Arc::new(FixedEmbedding::projected(vec![3.0, 4.0])),
        text_generation,
    }
}

/// A processor over the given segmentation fake with default config
pub fn processor_with(segmentation: Arc<ScriptedSegmentation>) -> OutfitProcessor {
    OutfitProcessor::new(
        capability_set(segmentation, None),
        PipelineConfig::default(),
    )
    .unwrap()
}

/// A small two-piece wardrobe
pub fn sample_wardrobe() -> Vec<WardrobeItem> {
    vec![
        WardrobeItem {
            id: "tee-1".to_string(),
            category: "T-Shirt".to_string(),
            color: "white".to_string(),
            style: "casual".to_string(),
            material: "cotton".to_string(),
            season: "summer".to_string(),
        },
        WardrobeItem {
            id: "jeans-1".to_string(),
            category: "Jeans".to_string(),
            color: "navy".to_string(),
            style: String::new(),
            material: "denim".to_string(),
            season: String::new(),
        },
    ]
}
