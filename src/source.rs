// Where the canvas image comes from: a file on disk (any format the `image`
// crate decodes, reduced to 8-bit luma) or a generated gradient.

use std::path::Path;

use crate::error::Error;
use crate::types::{Extent, GrayBuffer};

/// Horizontal ramp, black on the left edge to white on the right.
pub fn gradient(size: Extent) -> GrayBuffer {
    let mut out = GrayBuffer::new(size, 0);
    let span = size.width.saturating_sub(1).max(1) as f32;
    for row in out.pixels.chunks_exact_mut(size.width.max(1)) {
        for (x, px) in row.iter_mut().enumerate() {
            *px = (255.0 * x as f32 / span).round() as u8;
        }
    }
    out
}

/// Decode `path` and convert it to a single-channel buffer.
pub fn load_gray(path: &Path) -> Result<GrayBuffer, Error> {
    let img = image::open(path)?.into_luma8();
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::InvalidConfig(format!("{} has no pixels", path.display())));
    }
    log::info!("loaded {} ({width}x{height})", path.display());
    Ok(GrayBuffer { width: width as usize, height: height as usize, pixels: img.into_raw() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_spans_full_range() {
        let g = gradient(Extent::new(320, 240));
        assert_eq!(g.extent(), Extent::new(320, 240));
        assert_eq!(g.get(0, 0), 0);
        assert_eq!(g.get(319, 239), 255);
        assert!(g.get(100, 5) < g.get(101, 5));
        assert_eq!(g.get(160, 0), g.get(160, 200));
    }

    #[test]
    fn degenerate_gradients_do_not_panic() {
        assert_eq!(gradient(Extent::new(1, 3)).pixels, vec![0, 0, 0]);
        assert!(gradient(Extent::new(0, 0)).pixels.is_empty());
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let err = load_gray(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::ImageLoad(_)));
    }
}
