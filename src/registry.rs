// Ordered shape storage. Slots 0..4 are the boundary lines (two vertical,
// then two horizontal); everything after them is a mask shape.

use crate::error::Error;
use crate::shape::{AxisRange, ClipMode, Shape, ShapeKind};
use crate::types::{Bounds, Extent, Vec2};

/// Number of leading slots reserved for boundary lines.
pub const BOUNDARY_SLOTS: usize = 4;

/// Default distance of the boundary lines from the image edges.
pub const DEFAULT_BOUNDARY_INSET: f32 = 10.0;

const BOUNDARY_KINDS: [ShapeKind; BOUNDARY_SLOTS] =
    [ShapeKind::VLine, ShapeKind::VLine, ShapeKind::HLine, ShapeKind::HLine];

#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the four boundary lines, `inset` pixels in from
    /// each image edge.
    pub fn with_boundary(image: Extent, inset: f32) -> Self {
        let (w, h) = (image.width as f32, image.height as f32);
        let x_range = AxisRange::new(0.0, w);
        let y_range = AxisRange::new(0.0, h);
        let shapes = vec![
            Shape::vline("boundary-left", Vec2::new(inset, h / 2.0), x_range, ClipMode::Out),
            Shape::vline("boundary-right", Vec2::new(w - inset, h / 2.0), x_range, ClipMode::In),
            Shape::hline("boundary-top", Vec2::new(w / 2.0, inset), y_range, ClipMode::Out),
            Shape::hline("boundary-bottom", Vec2::new(w / 2.0, h - inset), y_range, ClipMode::In),
        ];
        Self { shapes }
    }

    /// Append a shape; it gets the highest overlap priority. Returns its index.
    pub fn add(&mut self, shape: Shape) -> Result<usize, Error> {
        if self.position(shape.label()).is_some() {
            return Err(Error::DuplicateLabel(shape.label().to_owned()));
        }
        self.shapes.push(shape);
        Ok(self.shapes.len() - 1)
    }

    pub fn get(&self, index: usize) -> Result<&Shape, Error> {
        let len = self.shapes.len();
        self.shapes.get(index).ok_or(Error::IndexOutOfBounds { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Shape, Error> {
        let len = self.shapes.len();
        self.shapes.get_mut(index).ok_or(Error::IndexOutOfBounds { index, len })
    }

    pub fn remove(&mut self, index: usize) -> Result<Shape, Error> {
        if index >= self.shapes.len() {
            return Err(Error::IndexOutOfBounds { index, len: self.shapes.len() });
        }
        Ok(self.shapes.remove(index))
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.shapes.iter().position(|s| s.label() == label)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> + ExactSizeIterator {
        self.shapes.iter()
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shapes after the boundary slots, in registry order.
    pub fn mask_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().skip(BOUNDARY_SLOTS)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The rectangle spanned by the four boundary lines.
    pub fn boundary(&self) -> Result<Bounds, Error> {
        for (slot, kind) in BOUNDARY_KINDS.iter().enumerate() {
            if self.get(slot)?.kind() != *kind {
                return Err(Error::MalformedBoundary { slot });
            }
        }
        let (v0, v1) = (self.shapes[0].center().x, self.shapes[1].center().x);
        let (h0, h1) = (self.shapes[2].center().y, self.shapes[3].center().y);
        Ok(Bounds { left: v0.min(v1), right: v0.max(v1), top: h0.min(h1), bottom: h0.max(h1) })
    }
}
