// Shape model: a fixed geometric kind, a movable center and a clip role.
// Everything the rasterizer and the hit-tester need is dispatched from one
// `match` on `Geometry`.

use crate::error::Error;
use crate::types::{Bounds, Vec2};

/// Smallest half-extent a shape may have; smaller values are clamped up to it
/// so membership tests never divide by zero.
pub const MIN_EXTENT: f32 = 1e-3;

/// How close (image pixels) the pointer must be to a line to grab it.
pub const LINE_HIT_TOLERANCE: f32 = 4.0;

/// The closed set of shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    VLine,
    HLine,
    Square,
    Rectangle,
    Circle,
    Ellipse,
}

impl ShapeKind {
    /// How many params `Shape::new` expects for this kind.
    pub const fn param_count(self) -> usize {
        match self {
            ShapeKind::VLine | ShapeKind::HLine => 0,
            ShapeKind::Square | ShapeKind::Circle => 1,
            ShapeKind::Rectangle | ShapeKind::Ellipse => 2,
        }
    }

    pub const fn is_line(self) -> bool {
        matches!(self, ShapeKind::VLine | ShapeKind::HLine)
    }

    /// Lowercase name, used as the label prefix for new shapes.
    pub const fn name(self) -> &'static str {
        match self {
            ShapeKind::VLine => "vline",
            ShapeKind::HLine => "hline",
            ShapeKind::Square => "square",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
        }
    }
}

/// Whether a shape's interior cuts pixels out of the mask or puts them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    In,
    Out,
}

impl ClipMode {
    pub fn toggled(self) -> Self {
        match self {
            ClipMode::In => ClipMode::Out,
            ClipMode::Out => ClipMode::In,
        }
    }
}

/// Per-kind parameters. Half-extents are always >= `MIN_EXTENT`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    VLine,
    HLine,
    Square { half: f32 },
    Rectangle { half_w: f32, half_h: f32 },
    Circle { radius: f32 },
    Ellipse { rx: f32, ry: f32 },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::VLine => ShapeKind::VLine,
            Geometry::HLine => ShapeKind::HLine,
            Geometry::Square { .. } => ShapeKind::Square,
            Geometry::Rectangle { .. } => ShapeKind::Rectangle,
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Ellipse { .. } => ShapeKind::Ellipse,
        }
    }
}

/// Interval a line's position is kept inside (x for a VLine, y for an HLine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    pub const UNBOUNDED: AxisRange = AxisRange { min: f32::NEG_INFINITY, max: f32::INFINITY };

    /// Reversed bounds are swapped.
    pub fn new(a: f32, b: f32) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    pub fn clamp(&self, v: f32) -> f32 {
        v.clamp(self.min, self.max)
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    label: String,
    geometry: Geometry,
    center: Vec2,
    axis_range: AxisRange,
    clip: ClipMode,
    draggable: bool,
}

fn sanitize_extent(kind: ShapeKind, v: f32) -> f32 {
    if v >= MIN_EXTENT {
        v
    } else {
        log::warn!("{kind:?} extent {v} is degenerate, clamping to {MIN_EXTENT}");
        MIN_EXTENT
    }
}

impl Shape {
    /// Build a shape, validating the param count against `kind`.
    /// Zero, negative or NaN extents are clamped to `MIN_EXTENT`.
    pub fn new(
        label: impl Into<String>,
        kind: ShapeKind,
        center: Vec2,
        params: &[f32],
        clip: ClipMode,
    ) -> Result<Self, Error> {
        let expected = kind.param_count();
        if params.len() != expected {
            return Err(Error::InvalidShapeParams { kind, expected, got: params.len() });
        }
        let p = |i: usize| sanitize_extent(kind, params[i]);
        let geometry = match kind {
            ShapeKind::VLine => Geometry::VLine,
            ShapeKind::HLine => Geometry::HLine,
            ShapeKind::Square => Geometry::Square { half: p(0) },
            ShapeKind::Rectangle => Geometry::Rectangle { half_w: p(0), half_h: p(1) },
            ShapeKind::Circle => Geometry::Circle { radius: p(0) },
            ShapeKind::Ellipse => Geometry::Ellipse { rx: p(0), ry: p(1) },
        };
        Ok(Self {
            label: label.into(),
            geometry,
            center,
            axis_range: AxisRange::UNBOUNDED,
            clip,
            draggable: true,
        })
    }

    /// Vertical line at `center.x`, kept inside `range` horizontally.
    pub fn vline(label: impl Into<String>, center: Vec2, range: AxisRange, clip: ClipMode) -> Self {
        Self::line(label.into(), Geometry::VLine, center, range, clip)
    }

    /// Horizontal line at `center.y`, kept inside `range` vertically.
    pub fn hline(label: impl Into<String>, center: Vec2, range: AxisRange, clip: ClipMode) -> Self {
        Self::line(label.into(), Geometry::HLine, center, range, clip)
    }

    fn line(label: String, geometry: Geometry, center: Vec2, range: AxisRange, clip: ClipMode) -> Self {
        let shape = Self { label, geometry, center, axis_range: AxisRange::UNBOUNDED, clip, draggable: true };
        shape.with_axis_range(range)
    }

    /// Set the axis range; a line's position is pulled into it right away.
    pub fn with_axis_range(mut self, range: AxisRange) -> Self {
        self.axis_range = range;
        self.clamp_to_axis();
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Image-space position.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Place the shape at `center`. A line keeps the coordinate it moves along
    /// inside its axis range.
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
        self.clamp_to_axis();
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn clip(&self) -> ClipMode {
        self.clip
    }

    pub fn axis_range(&self) -> AxisRange {
        self.axis_range
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn is_line(&self) -> bool {
        self.kind().is_line()
    }

    /// Half-width and half-height of the shape's extent. Zero for lines.
    pub fn half_extent(&self) -> Vec2 {
        match self.geometry {
            Geometry::VLine | Geometry::HLine => Vec2::new(0.0, 0.0),
            Geometry::Square { half } => Vec2::new(half, half),
            Geometry::Rectangle { half_w, half_h } => Vec2::new(half_w, half_h),
            Geometry::Circle { radius } => Vec2::new(radius, radius),
            Geometry::Ellipse { rx, ry } => Vec2::new(rx, ry),
        }
    }

    /// Mask membership. Lines never contain pixels.
    pub fn contains(&self, p: Vec2) -> bool {
        let d = p - self.center;
        match self.geometry {
            Geometry::VLine | Geometry::HLine => false,
            Geometry::Square { half } => d.x.abs() <= half && d.y.abs() <= half,
            Geometry::Rectangle { half_w, half_h } => d.x.abs() <= half_w && d.y.abs() <= half_h,
            Geometry::Circle { radius } => ellipse_norm(d, radius, radius) <= 1.0,
            Geometry::Ellipse { rx, ry } => ellipse_norm(d, rx, ry) <= 1.0,
        }
    }

    /// Pointer hit-test: interior for area shapes, perpendicular distance for lines.
    pub fn hit_test(&self, p: Vec2) -> bool {
        match self.geometry {
            Geometry::VLine => (p.x - self.center.x).abs() <= LINE_HIT_TOLERANCE,
            Geometry::HLine => (p.y - self.center.y).abs() <= LINE_HIT_TOLERANCE,
            _ => self.contains(p),
        }
    }

    /// Move toward `target`. Lines only move along their own axis and stay in range.
    pub fn move_to(&mut self, target: Vec2) {
        match self.geometry {
            Geometry::VLine => self.center.x = self.axis_range.clamp(target.x),
            Geometry::HLine => self.center.y = self.axis_range.clamp(target.y),
            _ => self.center = target,
        }
    }

    /// Pull a line's position back into its axis range. No-op for area shapes.
    pub fn clamp_to_axis(&mut self) {
        match self.geometry {
            Geometry::VLine => self.center.x = self.axis_range.clamp(self.center.x),
            Geometry::HLine => self.center.y = self.axis_range.clamp(self.center.y),
            _ => {}
        }
    }

    /// Move an area shape so `center ± half_extent` lies inside `bounds`.
    /// On an axis where the shape is wider than `bounds` it gets centered.
    pub fn clamp_within(&mut self, bounds: &Bounds) {
        if self.is_line() {
            return;
        }
        let half = self.half_extent();
        self.center.x = clamp_axis(self.center.x, half.x, bounds.left, bounds.right);
        self.center.y = clamp_axis(self.center.y, half.y, bounds.top, bounds.bottom);
    }
}

#[inline]
fn ellipse_norm(d: Vec2, rx: f32, ry: f32) -> f32 {
    let nx = d.x / rx;
    let ny = d.y / ry;
    nx * nx + ny * ny
}

fn clamp_axis(c: f32, half: f32, lo: f32, hi: f32) -> f32 {
    let (min, max) = (lo + half, hi - half);
    if min > max { (lo + hi) * 0.5 } else { c.clamp(min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(cx: f32, cy: f32, r: f32) -> Shape {
        Shape::new("c", ShapeKind::Circle, Vec2::new(cx, cy), &[r], ClipMode::Out).unwrap()
    }

    #[test]
    fn rejects_wrong_param_count() {
        let err = Shape::new("c", ShapeKind::Circle, Vec2::default(), &[1.0, 2.0], ClipMode::Out).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidShapeParams { kind: ShapeKind::Circle, expected: 1, got: 2 }
        ));
        assert!(Shape::new("r", ShapeKind::Rectangle, Vec2::default(), &[1.0], ClipMode::In).is_err());
        assert!(Shape::new("v", ShapeKind::VLine, Vec2::default(), &[0.0, 10.0], ClipMode::In).is_err());
    }

    #[test]
    fn degenerate_extents_clamp_to_epsilon() {
        let s = Shape::new("e", ShapeKind::Ellipse, Vec2::default(), &[0.0, -3.0], ClipMode::Out).unwrap();
        assert_eq!(*s.geometry(), Geometry::Ellipse { rx: MIN_EXTENT, ry: MIN_EXTENT });
        assert!(s.contains(Vec2::default()));
        assert!(!s.contains(Vec2::new(0.1, 0.0)));

        let nan = Shape::new("n", ShapeKind::Square, Vec2::default(), &[f32::NAN], ClipMode::Out).unwrap();
        assert_eq!(nan.half_extent(), Vec2::new(MIN_EXTENT, MIN_EXTENT));
    }

    #[test]
    fn membership_by_kind() {
        let rect = Shape::new("r", ShapeKind::Rectangle, Vec2::new(10.0, 10.0), &[4.0, 2.0], ClipMode::Out).unwrap();
        assert!(rect.contains(Vec2::new(14.0, 12.0)));
        assert!(!rect.contains(Vec2::new(14.0, 12.5)));

        let c = circle(0.0, 0.0, 5.0);
        assert!(c.contains(Vec2::new(3.0, 4.0)));
        assert!(!c.contains(Vec2::new(4.0, 4.0)));

        let e = Shape::new("e", ShapeKind::Ellipse, Vec2::default(), &[10.0, 2.0], ClipMode::Out).unwrap();
        assert!(e.contains(Vec2::new(9.0, 0.0)));
        assert!(!e.contains(Vec2::new(0.0, 3.0)));

        let line = Shape::vline("v", Vec2::new(5.0, 5.0), AxisRange::new(0.0, 10.0), ClipMode::Out);
        assert!(!line.contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn line_hit_uses_perpendicular_distance() {
        let v = Shape::vline("v", Vec2::new(50.0, 0.0), AxisRange::new(0.0, 100.0), ClipMode::Out);
        assert!(v.hit_test(Vec2::new(53.0, 900.0)));
        assert!(!v.hit_test(Vec2::new(55.0, 0.0)));

        let h = Shape::hline("h", Vec2::new(0.0, 20.0), AxisRange::new(0.0, 100.0), ClipMode::In);
        assert!(h.hit_test(Vec2::new(-40.0, 17.0)));
        assert!(!h.hit_test(Vec2::new(0.0, 30.0)));
    }

    #[test]
    fn lines_move_on_their_axis_and_stay_in_range() {
        let mut v = Shape::vline("v", Vec2::new(10.0, 120.0), AxisRange::new(320.0, 0.0), ClipMode::Out);
        v.move_to(Vec2::new(400.0, 5.0));
        assert_eq!(v.center, Vec2::new(320.0, 120.0));
        v.move_to(Vec2::new(-3.0, 5.0));
        assert_eq!(v.center.x, 0.0);

        let h = Shape::hline("h", Vec2::new(0.0, 999.0), AxisRange::new(0.0, 240.0), ClipMode::In);
        assert_eq!(h.center.y, 240.0);
    }

    #[test]
    fn set_center_keeps_lines_in_range() {
        let mut v = Shape::vline("v", Vec2::new(10.0, 120.0), AxisRange::new(0.0, 320.0), ClipMode::Out);
        v.set_center(Vec2::new(-40.0, 7.0));
        assert_eq!(v.center(), Vec2::new(0.0, 7.0));
        v.set_center(Vec2::new(500.0, 7.0));
        assert_eq!(v.center().x, 320.0);

        let mut c = circle(0.0, 0.0, 5.0);
        c.set_center(Vec2::new(-40.0, 900.0));
        assert_eq!(c.center(), Vec2::new(-40.0, 900.0));
    }

    #[test]
    fn clamp_within_keeps_full_extent_inside() {
        let bounds = Bounds { left: 10.0, top: 10.0, right: 310.0, bottom: 230.0 };
        let mut c = circle(305.0, 0.0, 40.0);
        c.clamp_within(&bounds);
        assert_eq!(c.center, Vec2::new(270.0, 50.0));

        let mut wide = Shape::new("w", ShapeKind::Rectangle, Vec2::new(0.0, 100.0), &[200.0, 5.0], ClipMode::Out).unwrap();
        wide.clamp_within(&bounds);
        assert_eq!(wide.center, Vec2::new(160.0, 100.0));
    }
}
