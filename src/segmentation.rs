//! Segment merging: raw pixel labels to logical garment segments
//!
//! Maps the raw per-pixel segmentation labels onto the canonical garment
//! vocabulary, unioning masks of symmetric labels (left/right shoes) before
//! any cropping so both halves compete in one component-selection pass.

use crate::config::PipelineConfig;
use crate::error::{Result, VisionError};
use crate::geometry::crop_to_mask;
use crate::types::{BinaryMask, LabelMap, Segment};
use crate::vocab::{canonical_label, GARMENT_LABELS};
use image::RgbaImage;
use tracing::debug;

/// Extract merged garment segments from a label map
///
/// Iterates the garment vocabulary in declaration order, folds raw labels
/// into canonical names, unions masks destined for the same canonical name,
/// then filters by `min_area_ratio` and crops each survivor to its dominant
/// connected component. Output order is the first appearance of each
/// canonical label during raw-label iteration. Segment confidence is fixed
/// at 1.0: the segmentation capability is deterministic and exposes no
/// per-pixel probability.
///
/// # Errors
///
/// Returns `VisionError::Capability` when the label map's resolution does
/// not match the image, which violates the segmentation contract.
pub fn merge_segments(
    label_map: &LabelMap,
    image: &RgbaImage,
    config: &PipelineConfig,
) -> Result<Vec<Segment>> {
    if (label_map.width(), label_map.height()) != image.dimensions() {
        return Err(VisionError::capability(format!(
            "segmentation returned a {}x{} label map for a {}x{} image",
            label_map.width(),
            label_map.height(),
            image.width(),
            image.height()
        )));
    }

    // Union raw masks into canonical ones, keeping first-appearance order.
    let mut merged: Vec<(String, BinaryMask)> = Vec::new();
    for &(label_id, raw_name) in GARMENT_LABELS {
        let mask = BinaryMask::from_label_map(label_map, label_id);
        if mask.foreground_pixels() == 0 {
            continue;
        }

        let canonical = canonical_label(raw_name);
        match merged.iter_mut().find(|(name, _)| name == canonical) {
            Some((_, existing)) => existing.union_with(&mask)?,
            None => merged.push((canonical.to_string(), mask)),
        }
    }

    let mut segments = Vec::new();
    for (label, mask) in merged {
        let area_ratio = mask.area_ratio();
        if area_ratio < config.min_area_ratio {
            debug!(
                label = %label,
                area_ratio,
                min = config.min_area_ratio,
                "discarding segment below minimum area"
            );
            continue;
        }

        let Some(crop) = crop_to_mask(image, &mask, config.crop_padding) else {
            continue;
        };

        segments.push(Segment {
            label,
            mask,
            crop,
            confidence: 1.0,
            area_ratio,
        });
    }

    debug!(count = segments.len(), "segments after merging");
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use ndarray::Array2;

    fn test_config(min_area_ratio: f32) -> PipelineConfig {
        PipelineConfig::builder()
            .min_area_ratio(min_area_ratio)
            .crop_padding(0)
            .build()
            .unwrap()
    }

    fn opaque_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([50, 60, 70, 255]))
    }

    /// Build a label map by painting rectangles of label IDs onto background
    fn label_map_with(
        width: usize,
        height: usize,
        regions: &[(u32, (usize, usize, usize, usize))],
    ) -> LabelMap {
        let mut grid = Array2::zeros((height, width));
        for &(id, (x0, y0, x1, y1)) in regions {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    grid[[y, x]] = id;
                }
            }
        }
        LabelMap::new(grid)
    }

    #[test]
    fn test_symmetric_labels_merge_into_one_segment() {
        // Left shoe (label 9) and right shoe (label 10), disjoint in frame.
        let map = label_map_with(40, 20, &[(9, (2, 10, 9, 17)), (10, (30, 10, 37, 17))]);
        let image = opaque_image(40, 20);

        let segments = merge_segments(&map, &image, &test_config(0.005)).unwrap();
        assert_eq!(segments.len(), 1);

        let shoes = &segments[0];
        assert_eq!(shoes.label, "Shoes");
        assert!((shoes.confidence - 1.0).abs() < f32::EPSILON);
        // area ratio covers the union of both shoes: 2 * 8x8 / 40x20
        let expected = (2.0 * 64.0) / 800.0;
        assert!((shoes.area_ratio - expected).abs() < 1e-6);
        // the crop covers one shoe only (dominant component of the union)
        assert_eq!(shoes.crop.dimensions(), (8, 8));
    }

    #[test]
    fn test_union_happens_before_cropping() {
        // One shoe is bigger; the crop must come from a single component
        // pass over the unioned mask, so the bigger shoe wins regardless of
        // which raw label it carried.
        let map = label_map_with(40, 20, &[(9, (2, 10, 5, 13)), (10, (20, 5, 31, 16))]);
        let image = opaque_image(40, 20);

        let segments = merge_segments(&map, &image, &test_config(0.005)).unwrap();
        assert_eq!(segments.len(), 1);
        // right shoe region is 12x12, left is 4x4
        assert_eq!(segments[0].crop.dimensions(), (12, 12));
    }

    #[test]
    fn test_small_segment_discarded() {
        // 30 pixels on a 100x100 image: area_ratio 0.003 < default 0.005
        let map = label_map_with(100, 100, &[(6, (10, 10, 39, 10))]);
        let image = opaque_image(100, 100);

        let segments = merge_segments(&map, &image, &test_config(0.005)).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_segment_at_threshold_kept() {
        // 50 pixels on 100x100: exactly the default threshold 0.005
        let map = label_map_with(100, 100, &[(6, (10, 10, 59, 10))]);
        let image = opaque_image(100, 100);

        let segments = merge_segments(&map, &image, &test_config(0.005)).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].label, "Pants");
    }

    #[test]
    fn test_output_order_follows_vocabulary_iteration() {
        let map = label_map_with(
            60,
            60,
            &[
                (17, (0, 50, 59, 54)),  // Scarf
                (4, (0, 0, 59, 19)),    // Upper-clothes
                (6, (0, 25, 59, 44)),   // Pants
            ],
        );
        let image = opaque_image(60, 60);

        let segments = merge_segments(&map, &image, &test_config(0.005)).unwrap();
        let labels: Vec<&str> = segments.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Upper-clothes", "Pants", "Scarf"]);
    }

    #[test]
    fn test_body_part_labels_ignored() {
        // Hair (2) and face (11) cover plenty of area but are not garments.
        let map = label_map_with(50, 50, &[(2, (0, 0, 49, 20)), (11, (0, 25, 49, 45))]);
        let image = opaque_image(50, 50);

        let segments = merge_segments(&map, &image, &test_config(0.005)).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_no_garments_yields_empty() {
        let map = label_map_with(30, 30, &[]);
        let image = opaque_image(30, 30);

        let segments = merge_segments(&map, &image, &test_config(0.005)).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_resolution_mismatch_is_capability_error() {
        let map = label_map_with(10, 10, &[(6, (0, 0, 9, 9))]);
        let image = opaque_image(20, 20);

        let err = merge_segments(&map, &image, &test_config(0.005)).unwrap_err();
        assert!(matches!(err, VisionError::Capability(_)));
    }
}
