// Core value types shared by the canvas, the rasterizer and the compositor.

use std::ops::{Add, Sub};

/// Mask value for a pixel that belongs to the ROI.
pub const MASK_INCLUDED: u8 = 255;
/// Mask value for a pixel cut out of the ROI.
pub const MASK_EXCLUDED: u8 = 0;

/// 2D point or offset. Image space unless a function says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: usize,
    pub height: usize,
}

impl Extent {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Closed axis-aligned rectangle `[left,right] x [top,bottom]` in image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Presentation buffer: one `0x00RRGGBB` entry per pixel, the layout minifb wants.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(size: Extent) -> Self {
        Self { width: size.width, height: size.height, pixels: vec![0; size.area()] }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }
}

/// Single-channel 8-bit buffer, contiguous, row-major, top-to-bottom.
/// Used for both the source image and the mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl GrayBuffer {
    pub fn new(size: Extent, fill: u8) -> Self {
        Self { width: size.width, height: size.height, pixels: vec![fill; size.area()] }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }
}
