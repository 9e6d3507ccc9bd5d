// The canvas aggregate: shapes, drag state and the two pixel buffers, owned
// by the frame loop. `Canvas::frame` is one pass of the core pipeline:
// interaction -> mask rasterization -> renderer handoff.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::composite::{FrameBuffers, Renderer};
use crate::error::Error;
use crate::interaction::{CanvasInteraction, PointerInput, ViewTransform};
use crate::raster::{fill_mask, rasterize_mask};
use crate::registry::ShapeRegistry;
use crate::shape::{AxisRange, ClipMode, Shape, ShapeKind};
use crate::types::{Extent, GrayBuffer, MASK_INCLUDED, Vec2};

/// Input for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub pointer: PointerInput,
    /// Current size of the on-screen canvas.
    pub view_size: Extent,
}

pub struct Canvas {
    registry: ShapeRegistry,
    interaction: CanvasInteraction,
    image: GrayBuffer,
    mask: GrayBuffer,
    mask_enabled: bool,
    new_shape_clip: ClipMode,
    next_id: usize,
    rng: StdRng,
}

impl Canvas {
    /// Canvas over `image` with boundary lines `inset` pixels from each edge.
    pub fn new(image: GrayBuffer, inset: f32) -> Result<Self, Error> {
        Self::with_rng(image, inset, StdRng::from_entropy())
    }

    /// Same as `new`, but shape placement is reproducible.
    pub fn with_seed(image: GrayBuffer, inset: f32, seed: u64) -> Result<Self, Error> {
        Self::with_rng(image, inset, StdRng::seed_from_u64(seed))
    }

    fn with_rng(image: GrayBuffer, inset: f32, rng: StdRng) -> Result<Self, Error> {
        let size = image.extent();
        if size.is_empty() {
            return Err(Error::InvalidConfig(format!("image is {}x{}", size.width, size.height)));
        }
        let registry = ShapeRegistry::with_boundary(size, inset);
        // nothing below works without the boundary lines
        registry.boundary()?;
        Ok(Self {
            registry,
            interaction: CanvasInteraction::new(),
            mask: GrayBuffer::new(size, MASK_INCLUDED),
            image,
            mask_enabled: true,
            new_shape_clip: ClipMode::Out,
            next_id: 0,
            rng,
        })
    }

    pub fn image_size(&self) -> Extent {
        self.image.extent()
    }

    pub fn image(&self) -> &GrayBuffer {
        &self.image
    }

    pub fn mask(&self) -> &GrayBuffer {
        &self.mask
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.registry
    }

    /// Index of the shape being dragged, if any.
    pub fn active(&self) -> Option<usize> {
        self.interaction.active()
    }

    pub fn mask_enabled(&self) -> bool {
        self.mask_enabled
    }

    pub fn toggle_mask(&mut self) {
        self.mask_enabled = !self.mask_enabled;
        log::info!("mask {}", if self.mask_enabled { "enabled" } else { "disabled" });
    }

    /// Clip mode given to shapes created by `add_shape`.
    pub fn new_shape_clip(&self) -> ClipMode {
        self.new_shape_clip
    }

    pub fn toggle_new_shape_clip(&mut self) {
        self.new_shape_clip = self.new_shape_clip.toggled();
        log::info!("new shapes clip {:?}", self.new_shape_clip);
    }

    /// Add a shape of `kind` with default size, centered at a random point
    /// inside the boundary rectangle. Returns its registry index.
    pub fn add_shape(&mut self, kind: ShapeKind) -> Result<usize, Error> {
        let bounds = self.registry.boundary()?;
        // Whole pixels where possible; lines left on fractional positions by a
        // drag can leave no whole pixel between them.
        let center = Vec2::new(
            self.rng.gen_range(bounds.left..=bounds.right).round().clamp(bounds.left, bounds.right),
            self.rng.gen_range(bounds.top..=bounds.bottom).round().clamp(bounds.top, bounds.bottom),
        );
        let size = self.image_size();
        let (w, h) = (size.width as f32, size.height as f32);
        let params = match kind {
            ShapeKind::VLine | ShapeKind::HLine => vec![],
            ShapeKind::Square | ShapeKind::Circle => vec![w / 8.0],
            ShapeKind::Rectangle | ShapeKind::Ellipse => vec![w / 8.0, h / 8.0],
        };

        let label = format!("{}-{}", kind.name(), self.next_id);
        self.next_id += 1;
        let mut shape = Shape::new(label, kind, center, &params, self.new_shape_clip)?;
        match kind {
            ShapeKind::VLine => shape = shape.with_axis_range(AxisRange::new(0.0, w)),
            ShapeKind::HLine => shape = shape.with_axis_range(AxisRange::new(0.0, h)),
            _ => {}
        }
        log::info!("added {} at ({}, {}) clip {:?}", shape.label(), center.x, center.y, shape.clip());
        self.registry.add(shape)
    }

    /// Run one frame: apply pointer input, rebuild the mask, then hand the
    /// finished buffers to `renderer`. The mask is never touched after the
    /// handoff starts.
    pub fn frame<R: Renderer>(&mut self, input: &FrameInput, renderer: &mut R) -> Result<(), Error> {
        let transform = ViewTransform::new(self.image_size(), input.view_size);
        match &transform {
            Some(t) => self.interaction.update(&mut self.registry, input.pointer, t)?,
            None => log::debug!("view {:?} has no area, skipping interaction", input.view_size),
        }

        if self.mask_enabled {
            rasterize_mask(&self.registry, &mut self.mask);
        } else {
            fill_mask(&mut self.mask, MASK_INCLUDED);
        }

        renderer.upload(&FrameBuffers {
            image: &self.image,
            mask: &self.mask,
            image_size: self.image.extent(),
            view_size: input.view_size,
            mask_enabled: self.mask_enabled,
        })?;
        if let Some(t) = &transform {
            renderer.submit_shapes(self.registry.as_slice(), self.interaction.active(), t);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BOUNDARY_SLOTS, DEFAULT_BOUNDARY_INSET};
    use crate::source::gradient;
    use crate::types::MASK_EXCLUDED;

    const IMAGE: Extent = Extent::new(320, 240);
    const VIEW: Extent = Extent::new(640, 480);

    #[derive(Debug, PartialEq)]
    enum Event {
        Upload { mask: Vec<u8>, view: Extent, mask_enabled: bool },
        Shapes { count: usize, active: Option<usize> },
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Renderer for Recorder {
        fn upload(&mut self, frame: &FrameBuffers<'_>) -> Result<(), Error> {
            self.events.push(Event::Upload {
                mask: frame.mask.pixels.clone(),
                view: frame.view_size,
                mask_enabled: frame.mask_enabled,
            });
            Ok(())
        }

        fn submit_shapes(&mut self, shapes: &[Shape], active: Option<usize>, _: &ViewTransform) {
            self.events.push(Event::Shapes { count: shapes.len(), active });
        }
    }

    fn canvas() -> Canvas {
        Canvas::with_seed(gradient(IMAGE), DEFAULT_BOUNDARY_INSET, 7).unwrap()
    }

    fn input(x: f32, y: f32, pressed: bool) -> FrameInput {
        FrameInput { pointer: PointerInput { position: Some(Vec2::new(x, y)), pressed }, view_size: VIEW }
    }

    #[test]
    fn empty_image_is_rejected() {
        let image = GrayBuffer::new(Extent::new(0, 10), 0);
        assert!(matches!(Canvas::new(image, 10.0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn buffers_match_image_resolution() {
        let c = canvas();
        assert_eq!(c.mask().extent(), IMAGE);
        assert_eq!(c.image().extent(), IMAGE);
        assert_eq!(c.registry().len(), BOUNDARY_SLOTS);
    }

    #[test]
    fn added_shapes_start_inside_the_boundary() {
        let mut c = canvas();
        let bounds = c.registry().boundary().unwrap();
        for kind in [ShapeKind::Square, ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Ellipse] {
            for _ in 0..25 {
                let i = c.add_shape(kind).unwrap();
                let shape = c.registry().get(i).unwrap();
                assert!(bounds.contains(shape.center()), "{:?}", shape.center());
                assert_eq!(shape.kind(), kind);
            }
        }
        let rect = c.registry().get(BOUNDARY_SLOTS + 25).unwrap();
        assert_eq!(rect.half_extent(), Vec2::new(40.0, 30.0));
    }

    #[test]
    fn added_shapes_stay_inside_fractional_boundary() {
        let mut c = canvas();
        c.registry_mut().get_mut(0).unwrap().move_to(Vec2::new(10.2, 0.0));
        c.registry_mut().get_mut(1).unwrap().move_to(Vec2::new(10.4, 0.0));
        c.registry_mut().get_mut(2).unwrap().move_to(Vec2::new(0.0, 33.3));
        c.registry_mut().get_mut(3).unwrap().move_to(Vec2::new(0.0, 200.7));
        let bounds = c.registry().boundary().unwrap();
        assert_eq!((bounds.left, bounds.right), (10.2, 10.4));

        for _ in 0..50 {
            let i = c.add_shape(ShapeKind::Circle).unwrap();
            let center = c.registry().get(i).unwrap().center();
            assert!(bounds.contains(center), "{center:?} outside {bounds:?}");
        }
    }

    #[test]
    fn labels_are_unique_and_clip_follows_toggle() {
        let mut c = canvas();
        let a = c.add_shape(ShapeKind::Circle).unwrap();
        c.toggle_new_shape_clip();
        let b = c.add_shape(ShapeKind::Circle).unwrap();
        let (sa, sb) = (c.registry().get(a).unwrap(), c.registry().get(b).unwrap());
        assert_ne!(sa.label(), sb.label());
        assert_eq!(sa.clip(), ClipMode::Out);
        assert_eq!(sb.clip(), ClipMode::In);
    }

    #[test]
    fn mask_is_rasterized_before_upload() {
        let mut c = canvas();
        let i = c.add_shape(ShapeKind::Circle).unwrap();
        let center = c.registry().get(i).unwrap().center();
        let mut r = Recorder::default();
        c.frame(&input(0.0, 0.0, false), &mut r).unwrap();

        assert_eq!(r.events.len(), 2);
        let Event::Upload { mask, view, mask_enabled } = &r.events[0] else { panic!("upload must come first") };
        let idx = center.y as usize * IMAGE.width + center.x as usize;
        assert_eq!(mask[idx], MASK_EXCLUDED);
        assert_eq!(*view, VIEW);
        assert!(*mask_enabled);
        assert_eq!(r.events[1], Event::Shapes { count: BOUNDARY_SLOTS + 1, active: None });
        assert_eq!(c.mask().pixels, *mask);
    }

    #[test]
    fn disabled_mask_uploads_fully_included() {
        let mut c = canvas();
        c.add_shape(ShapeKind::Square).unwrap();
        c.toggle_mask();
        let mut r = Recorder::default();
        c.frame(&input(0.0, 0.0, false), &mut r).unwrap();
        let Event::Upload { mask, mask_enabled, .. } = &r.events[0] else { panic!() };
        assert!(!mask_enabled);
        assert!(mask.iter().all(|&v| v == MASK_INCLUDED));
    }

    #[test]
    fn zero_view_still_uploads_but_skips_shapes() {
        let mut c = canvas();
        let mut r = Recorder::default();
        let frame = FrameInput { pointer: PointerInput::default(), view_size: Extent::new(0, 0) };
        c.frame(&frame, &mut r).unwrap();
        assert_eq!(r.events.len(), 1);
        assert!(matches!(r.events[0], Event::Upload { .. }));
    }

    #[test]
    fn dragging_moves_the_mask_with_the_shape() {
        let mut c = canvas();
        let i = c.add_shape(ShapeKind::Square).unwrap();
        c.registry_mut().get_mut(i).unwrap().set_center(Vec2::new(100.0, 100.0));
        let mut r = Recorder::default();

        c.frame(&input(200.0, 200.0, true), &mut r).unwrap();
        assert_eq!(c.active(), Some(i));
        c.frame(&input(400.0, 240.0, true), &mut r).unwrap();
        assert_eq!(c.mask().get(200, 120), MASK_EXCLUDED);
        assert_eq!(c.mask().get(100, 100), MASK_INCLUDED);

        c.frame(&input(400.0, 240.0, false), &mut r).unwrap();
        assert_eq!(c.active(), None);
        assert_eq!(c.registry().get(i).unwrap().center(), Vec2::new(200.0, 120.0));
    }
}
