// Mask rasterization: rebuild the whole mask from the registry every frame.
// Visual: 255 = pixel stays in the ROI, 0 = pixel is cut out.

use crate::registry::ShapeRegistry;
use crate::shape::{ClipMode, Shape};
use crate::types::{GrayBuffer, MASK_EXCLUDED, MASK_INCLUDED, Vec2};

/// Set every mask pixel to `value`.
pub fn fill_mask(mask: &mut GrayBuffer, value: u8) {
    mask.pixels.fill(value);
}

/// Recompute `mask` from scratch.
///
/// Starts fully included, then applies every mask shape in registry order:
/// `Out` writes `MASK_EXCLUDED` inside the shape, `In` writes `MASK_INCLUDED`.
/// A later shape therefore overrides an earlier one on the pixels they share.
/// Boundary lines are skipped (they only constrain dragging).
pub fn rasterize_mask(registry: &ShapeRegistry, mask: &mut GrayBuffer) {
    fill_mask(mask, MASK_INCLUDED);
    for shape in registry.mask_shapes() {
        if shape.is_line() {
            continue;
        }
        if !shape.center().is_finite() {
            log::warn!("skipping {}: non-finite center {:?}", shape.label(), shape.center());
            continue;
        }
        apply_shape(shape, mask);
    }
}

fn apply_shape(shape: &Shape, mask: &mut GrayBuffer) {
    let value = match shape.clip() {
        ClipMode::Out => MASK_EXCLUDED,
        ClipMode::In => MASK_INCLUDED,
    };
    let half = shape.half_extent();
    // Only the shape's bounding box can contain pixels.
    let Some((x0, x1)) = pixel_span(shape.center().x, half.x, mask.width) else { return };
    let Some((y0, y1)) = pixel_span(shape.center().y, half.y, mask.height) else { return };

    for y in y0..=y1 {
        let row = y * mask.width;
        for x in x0..=x1 {
            if shape.contains(Vec2::new(x as f32, y as f32)) {
                mask.pixels[row + x] = value;
            }
        }
    }
}

/// Inclusive pixel range covering `[center - half, center + half]`, clipped
/// to `0..len`. `None` when the span misses the buffer entirely.
fn pixel_span(center: f32, half: f32, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let lo = (center - half).floor().max(0.0);
    let hi = (center + half).ceil().min((len - 1) as f32);
    if lo > hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}
