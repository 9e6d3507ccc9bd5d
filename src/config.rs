// Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::registry::DEFAULT_BOUNDARY_INSET;
use crate::types::Extent;

#[derive(Parser, Debug, Clone)]
#[command(name = "roi-mask-canvas")]
#[command(version, about = "Interactive ROI mask editor", long_about = None)]
pub struct Cli {
    /// Source image (converted to 8-bit grayscale); a gradient is generated when omitted
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Width of the generated gradient
    #[arg(long, value_name = "PX", default_value_t = 320)]
    pub width: usize,

    /// Height of the generated gradient
    #[arg(long, value_name = "PX", default_value_t = 240)]
    pub height: usize,

    /// On-screen scale of the canvas (view size = image size * scale)
    #[arg(short, long, value_name = "FLOAT", default_value_t = 2.0)]
    pub scale: f32,

    /// Distance of the boundary lines from the image edges
    #[arg(long, value_name = "PX", default_value_t = DEFAULT_BOUNDARY_INSET)]
    pub inset: f32,

    /// Fixed seed for shape placement
    #[arg(long, value_name = "U64")]
    pub seed: Option<u64>,

    /// Default log level to debug (RUST_LOG still wins)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidConfig(format!("scale must be positive, got {}", self.scale)));
        }
        if !(self.inset.is_finite() && self.inset >= 0.0) {
            return Err(Error::InvalidConfig(format!("inset must be >= 0, got {}", self.inset)));
        }
        if self.image.is_none() && (self.width == 0 || self.height == 0) {
            return Err(Error::InvalidConfig(format!("gradient size {}x{} is empty", self.width, self.height)));
        }
        Ok(())
    }

    pub fn gradient_size(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Window size for an image of `image` pixels.
    pub fn view_size(&self, image: Extent) -> Extent {
        let scaled = |v: usize| ((v as f32 * self.scale).round() as usize).max(1);
        Extent::new(scaled(image.width), scaled(image.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("roi-mask-canvas").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_the_demo_canvas() {
        let cli = parse(&[]);
        cli.validate().unwrap();
        assert_eq!(cli.gradient_size(), Extent::new(320, 240));
        assert_eq!(cli.view_size(cli.gradient_size()), Extent::new(640, 480));
        assert_eq!(cli.inset, DEFAULT_BOUNDARY_INSET);
        assert!(cli.image.is_none() && cli.seed.is_none() && !cli.debug);
    }

    #[test]
    fn parses_all_options() {
        let cli = parse(&["-i", "photo.png", "-s", "1.5", "--inset", "4", "--seed", "9", "--debug"]);
        assert_eq!(cli.image.as_deref(), Some(std::path::Path::new("photo.png")));
        assert_eq!(cli.view_size(Extent::new(100, 10)), Extent::new(150, 15));
        assert_eq!(cli.seed, Some(9));
        assert!(cli.debug);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&["--scale", "0"]).validate().is_err());
        assert!(parse(&["--scale", "NaN"]).validate().is_err());
        assert!(parse(&["--inset=-1"]).validate().is_err());
        assert!(parse(&["--width", "0"]).validate().is_err());
        assert!(parse(&["--width", "0", "--image", "a.png"]).validate().is_ok());
    }
}
