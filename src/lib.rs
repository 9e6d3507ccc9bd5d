//! Interactive ROI mask editing: shapes placed over a grayscale image are
//! rasterized into a per-pixel mask every frame and composited for display.
//!
//! Frame order is fixed: pointer input moves shapes ([`interaction`]), the
//! mask is rebuilt from the registry ([`raster`]), and only then are the image
//! and mask handed to a [`composite::Renderer`]. [`canvas::Canvas`] owns all
//! of that state and runs the sequence.

pub mod canvas;
pub mod composite;
pub mod config;
pub mod draw;
pub mod error;
pub mod tint;
pub mod interaction;
pub mod raster;
pub mod registry;
pub mod shape;
pub mod source;
pub mod types;
