//! Mask geometry: connected components and alpha-masked cropping
//!
//! Turns a binary garment mask into a tight single-garment crop. Merged
//! masks can hold disjoint regions (two shoes far apart in frame); cropping
//! the union's bounding box would yield a wide, mostly empty image, so only
//! the dominant connected component is kept for both the crop bounds and the
//! alpha channel.

use crate::types::BinaryMask;
use image::{Rgba, RgbaImage};
use std::collections::VecDeque;

/// Crop an image to the largest connected component of a mask
///
/// Components are 4-connected. When the mask has several components the one
/// with the most pixels wins, ties broken by first encounter in row-major
/// scan order; the smaller components are discarded entirely. The component's
/// bounding box is expanded by `pad` pixels per side, clamped to the image
/// bounds. In the returned crop, alpha is the minimum of the source alpha and
/// component membership, so pixels outside the retained component are fully
/// transparent even inside the padded box.
///
/// Returns `None` when the mask has no foreground pixels. Same mask and same
/// pad always produce the same crop.
#[must_use]
pub fn crop_to_mask(image: &RgbaImage, mask: &BinaryMask, pad: u32) -> Option<RgbaImage> {
    if mask.dimensions != image.dimensions() {
        tracing::warn!(
            mask = ?mask.dimensions,
            image = ?image.dimensions(),
            "mask and image dimensions differ, skipping crop"
        );
        return None;
    }

    let components = label_components(mask);
    let dominant = components.dominant_component()?;

    let (width, height) = mask.dimensions;
    let (min_x, min_y, max_x, max_y) = components.bounding_box(dominant)?;

    let x0 = min_x.saturating_sub(pad);
    let y0 = min_y.saturating_sub(pad);
    let x1 = (max_x + pad).min(width - 1);
    let y1 = (max_y + pad).min(height - 1);

    let mut crop = RgbaImage::new(x1 - x0 + 1, y1 - y0 + 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let src = image.get_pixel(x, y);
            let member = components.component_at(x, y) == Some(dominant);
            let alpha = if member { src[3] } else { 0 };
            crop.put_pixel(x - x0, y - y0, Rgba([src[0], src[1], src[2], alpha]));
        }
    }

    Some(crop)
}

/// Connected-component labelling of a binary mask
struct ComponentLabels {
    /// Component id per pixel, 0 for background
    labels: Vec<u32>,

    /// Pixel count per component, indexed by `component_id - 1`
    sizes: Vec<usize>,

    width: u32,
    height: u32,
}

impl ComponentLabels {
    /// Component id at `(x, y)`, `None` for background pixels
    fn component_at(&self, x: u32, y: u32) -> Option<u32> {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        match self.labels[idx] {
            0 => None,
            id => Some(id),
        }
    }

    /// The component with the most pixels; ties resolve to the component
    /// first encountered in scan order (lowest id)
    fn dominant_component(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (i, &size) in self.sizes.iter().enumerate() {
            let id = i as u32 + 1;
            if best.map_or(true, |(_, best_size)| size > best_size) {
                best = Some((id, size));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Axis-aligned bounding box of one component: `(min_x, min_y, max_x, max_y)`
    fn bounding_box(&self, component: u32) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.component_at(x, y) == Some(component) {
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((min_x, min_y, max_x, max_y)) => {
                            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
                        },
                    });
                }
            }
        }
        bounds
    }
}

/// Label the 4-connected components of a mask in row-major scan order
fn label_components(mask: &BinaryMask) -> ComponentLabels {
    let (width, height) = mask.dimensions;
    let mut labels = vec![0_u32; (width as usize) * (height as usize)];
    let mut sizes = Vec::new();
    let mut queue = VecDeque::new();

    let index = |x: u32, y: u32| (y as usize) * (width as usize) + (x as usize);

    for start_y in 0..height {
        for start_x in 0..width {
            if !mask.is_set(start_x, start_y) || labels[index(start_x, start_y)] != 0 {
                continue;
            }

            let id = sizes.len() as u32 + 1;
            let mut size = 0_usize;
            labels[index(start_x, start_y)] = id;
            queue.push_back((start_x, start_y));

            while let Some((x, y)) = queue.pop_front() {
                size += 1;

                let mut visit = |nx: u32, ny: u32| {
                    if mask.is_set(nx, ny) && labels[index(nx, ny)] == 0 {
                        labels[index(nx, ny)] = id;
                        queue.push_back((nx, ny));
                    }
                };

                if x > 0 {
                    visit(x - 1, y);
                }
                if x + 1 < width {
                    visit(x + 1, y);
                }
                if y > 0 {
                    visit(x, y - 1);
                }
                if y + 1 < height {
                    visit(x, y + 1);
                }
            }

            sizes.push(size);
        }
    }

    ComponentLabels {
        labels,
        sizes,
        width,
        height,
    }
}
