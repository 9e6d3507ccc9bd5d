// Pointer -> shape manipulation, one call per frame.
// The canvas is shown scaled, so every pointer position goes through
// `ViewTransform` before it touches a shape.

use crate::error::Error;
use crate::registry::ShapeRegistry;
use crate::types::{Extent, Vec2};

/// Maps between view space (window pixels) and image space (source pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    image: Extent,
    view: Extent,
}

impl ViewTransform {
    /// `None` when either extent has zero area (e.g. a minimized window).
    pub fn new(image: Extent, view: Extent) -> Option<Self> {
        if image.is_empty() || view.is_empty() {
            return None;
        }
        Some(Self { image, view })
    }

    pub fn image_size(&self) -> Extent {
        self.image
    }

    pub fn view_size(&self) -> Extent {
        self.view
    }

    /// Scale by `imageSize / viewSize`.
    pub fn to_image(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.image.width as f32 / self.view.width as f32,
            p.y * self.image.height as f32 / self.view.height as f32,
        )
    }

    /// Scale by `viewSize / imageSize`.
    pub fn to_view(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.view.width as f32 / self.image.width as f32,
            p.y * self.view.height as f32 / self.image.height as f32,
        )
    }
}

/// Pointer state for one frame, in view space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// `None` when the pointer is outside the window.
    pub position: Option<Vec2>,
    pub pressed: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    /// `index` is re-resolved from `label` every frame; registry edits
    /// between frames may shift it.
    Dragging { label: String, index: usize, grab_offset: Vec2 },
}

/// Tracks which shape (at most one) is being dragged across frames.
#[derive(Debug, Clone)]
pub struct CanvasInteraction {
    state: DragState,
    was_pressed: bool,
}

impl Default for CanvasInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasInteraction {
    pub fn new() -> Self {
        Self { state: DragState::Idle, was_pressed: false }
    }

    /// Index of the shape being dragged, if any.
    pub fn active(&self) -> Option<usize> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { index, .. } => Some(*index),
        }
    }

    /// Topmost draggable shape under `p` (image space). Searched last to
    /// first so the most recently added shape wins.
    pub fn hit_test(registry: &ShapeRegistry, p: Vec2) -> Option<usize> {
        registry
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| s.is_draggable() && s.hit_test(p))
            .map(|(i, _)| i)
    }

    /// Advance the drag state machine by one frame.
    ///
    /// A press edge over a shape starts a drag; while the button is held the
    /// shape follows the pointer (lines stay inside their axis range); on
    /// release, area shapes are clamped inside the boundary rectangle.
    /// Fails only when the boundary lines are missing or malformed.
    pub fn update(
        &mut self,
        registry: &mut ShapeRegistry,
        pointer: PointerInput,
        transform: &ViewTransform,
    ) -> Result<(), Error> {
        let press_edge = pointer.pressed && !self.was_pressed;
        self.was_pressed = pointer.pressed;
        let at = pointer.position.map(|p| transform.to_image(p));

        let dragging = match &self.state {
            DragState::Idle => None,
            DragState::Dragging { label, grab_offset, .. } => Some((label.clone(), *grab_offset)),
        };
        let Some((label, grab_offset)) = dragging else {
            if let (true, Some(p)) = (press_edge, at) {
                if let Some(index) = Self::hit_test(registry, p) {
                    let shape = registry.get(index)?;
                    log::debug!("drag start: {} at ({:.1}, {:.1})", shape.label(), p.x, p.y);
                    self.state = DragState::Dragging {
                        label: shape.label().to_owned(),
                        index,
                        grab_offset: shape.center() - p,
                    };
                }
            }
            return Ok(());
        };

        let Some(index) = registry.position(&label) else {
            log::warn!("dragged shape {label} no longer exists, dropping drag");
            self.state = DragState::Idle;
            return Ok(());
        };
        self.state = DragState::Dragging { label, index, grab_offset };

        if pointer.pressed {
            if let Some(p) = at {
                registry.get_mut(index)?.move_to(p + grab_offset);
            }
        } else {
            let bounds = registry.boundary()?;
            let shape = registry.get_mut(index)?;
            shape.clamp_to_axis();
            shape.clamp_within(&bounds);
            log::debug!(
                "drag end: {} at ({:.1}, {:.1})",
                shape.label(),
                shape.center().x,
                shape.center().y
            );
            self.state = DragState::Idle;
        }
        Ok(())
    }
}
