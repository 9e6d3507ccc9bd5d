// One error type for the whole program.
// Every variant states *where* things went wrong.
use thiserror::Error;

use crate::shape::ShapeKind;

#[derive(Debug, Error)]
pub enum Error {
    /// A shape was built with a param count that does not fit its kind.
    #[error("invalid params for {kind:?}: expected {expected}, got {got}")]
    InvalidShapeParams { kind: ShapeKind, expected: usize, got: usize },

    /// Registry access past the end (also: boundary slots not registered yet).
    #[error("shape index {index} out of bounds (registry holds {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A boundary slot holds a shape of the wrong kind.
    #[error("boundary slot {slot} does not hold the expected line")]
    MalformedBoundary { slot: usize },

    #[error("a shape labelled {0:?} already exists")]
    DuplicateLabel(String),

    /// Image and mask handed to the renderer differ in size.
    #[error("image and mask buffers differ in size")]
    BufferMismatch,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("image load error: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),
}
