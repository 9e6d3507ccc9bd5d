// Composite step: the boundary between the canvas core and whatever turns
// {image, mask} into pixels on screen.
//
// The core hands its buffers over as shared borrows, so nothing can mutate
// them while a renderer reads them. `SoftwareCompositor` is the renderer the
// binary ships: it scales the image to the view, tints excluded pixels in
// linear light and draws shape outlines on top.

use crate::draw::{draw_crosshair, draw_ellipse_outline, draw_line, draw_rect_outline};
use crate::error::Error;
use crate::interaction::ViewTransform;
use crate::registry::BOUNDARY_SLOTS;
use crate::shape::{ClipMode, Geometry, Shape};
use crate::tint::TintTable;
use crate::types::{Extent, FrameBuffer, GrayBuffer, MASK_INCLUDED, Vec2};

pub const BOUNDARY_COLOR: u32 = 0x00_FF_CC_33;
pub const OUT_COLOR: u32 = 0x00_FF_50_50;
pub const IN_COLOR: u32 = 0x00_50_FF_80;
pub const ACTIVE_COLOR: u32 = 0x00_FF_FF_FF;

/// Color excluded pixels are pulled toward, and how far.
const EXCLUDED_TINT: [u8; 3] = [0xC0, 0x10, 0x10];
const EXCLUDED_TINT_STRENGTH: f32 = 0.6;

const HANDLE_SIZE: i32 = 6;

/// Everything a renderer needs for one frame.
pub struct FrameBuffers<'a> {
    pub image: &'a GrayBuffer,
    pub mask: &'a GrayBuffer,
    pub image_size: Extent,
    pub view_size: Extent,
    pub mask_enabled: bool,
}

pub trait Renderer {
    /// Take this frame's image and mask and produce the composite.
    fn upload(&mut self, frame: &FrameBuffers<'_>) -> Result<(), Error>;

    /// Draw outlines/handles for every shape; `active` is the dragged one.
    fn submit_shapes(&mut self, shapes: &[Shape], active: Option<usize>, transform: &ViewTransform);
}

pub struct SoftwareCompositor {
    target: FrameBuffer,
    tint: TintTable,
}

impl SoftwareCompositor {
    pub fn new(view: Extent) -> Self {
        Self { target: FrameBuffer::new(view), tint: TintTable::new(EXCLUDED_TINT, EXCLUDED_TINT_STRENGTH) }
    }

    /// The finished frame, ready for `Drawer::present`.
    pub fn frame(&self) -> &FrameBuffer {
        &self.target
    }

    /// Mutable access for overlays drawn after compositing (HUD).
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.target
    }
}

/// Nearest-neighbour source index for each destination index.
fn sample_indices(dst: usize, src: usize) -> Vec<usize> {
    (0..dst).map(|i| (i * src / dst).min(src - 1)).collect()
}

impl Renderer for SoftwareCompositor {
    fn upload(&mut self, frame: &FrameBuffers<'_>) -> Result<(), Error> {
        let image = frame.image;
        let mask = frame.mask;
        if image.extent() != mask.extent() || image.extent() != frame.image_size {
            return Err(Error::BufferMismatch);
        }
        if self.target.extent() != frame.view_size {
            self.target = FrameBuffer::new(frame.view_size);
        }
        if frame.view_size.is_empty() || frame.image_size.is_empty() {
            return Ok(());
        }

        let xs = sample_indices(frame.view_size.width, image.width);
        let ys = sample_indices(frame.view_size.height, image.height);
        for (vy, &iy) in ys.iter().enumerate() {
            let row = iy * image.width;
            let out_row = vy * self.target.width;
            for (vx, &ix) in xs.iter().enumerate() {
                let m = if frame.mask_enabled { mask.pixels[row + ix] } else { MASK_INCLUDED };
                self.target.pixels[out_row + vx] = self.tint.shade(image.pixels[row + ix], m);
            }
        }
        Ok(())
    }

    fn submit_shapes(&mut self, shapes: &[Shape], active: Option<usize>, transform: &ViewTransform) {
        let fb = &mut self.target;
        let (vw, vh) = (fb.width as i32, fb.height as i32);
        for (i, shape) in shapes.iter().enumerate() {
            let color = if Some(i) == active {
                ACTIVE_COLOR
            } else if i < BOUNDARY_SLOTS && shape.is_line() {
                BOUNDARY_COLOR
            } else {
                match shape.clip() {
                    ClipMode::Out => OUT_COLOR,
                    ClipMode::In => IN_COLOR,
                }
            };

            let c = transform.to_view(shape.center());
            let h = transform.to_view(shape.center() + shape.half_extent()) - c;
            let (cx, cy) = (c.x.round() as i32, c.y.round() as i32);
            match shape.geometry() {
                Geometry::VLine => draw_line(fb, cx, 0, cx, vh - 1, color),
                Geometry::HLine => draw_line(fb, 0, cy, vw - 1, cy, color),
                Geometry::Square { .. } | Geometry::Rectangle { .. } => {
                    let (x0, y0) = ((c.x - h.x).round() as i32, (c.y - h.y).round() as i32);
                    let (x1, y1) = ((c.x + h.x).round() as i32, (c.y + h.y).round() as i32);
                    draw_rect_outline(fb, x0, y0, x1, y1, color);
                }
                Geometry::Circle { .. } | Geometry::Ellipse { .. } => {
                    draw_ellipse_outline(fb, Vec2::new(c.x, c.y), h.x, h.y, color);
                }
            }
            if !shape.is_line() {
                draw_crosshair(fb, cx, cy, HANDLE_SIZE, color);
            }
        }
    }
}
