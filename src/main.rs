// What you SEE:
// • The source image, scaled to the window, with cut-out regions tinted red.
// • Four yellow boundary lines; drag them to move the ROI rectangle.
// • S / R / C / E add a square / rectangle / circle / ellipse inside it.
// • Drag shapes with the left mouse; on release they snap back inside the lines.
// • I flips whether new shapes cut out (OUT) or restore (IN). M toggles the mask. ESC quits.

use clap::Parser;
use roi_mask_canvas::canvas::{Canvas, FrameInput};
use roi_mask_canvas::composite::SoftwareCompositor;
use roi_mask_canvas::config::Cli;
use roi_mask_canvas::draw::{Drawer, draw_text_5x7};
use roi_mask_canvas::error::Error;
use roi_mask_canvas::shape::ClipMode;
use roi_mask_canvas::source;
use std::time::{Duration, Instant};

const HUD_COLOR: u32 = 0x00_FF_FF_FF;
const HELP: &str = "S R C E ADD | I MODE | M MASK";

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    run(&cli).inspect_err(|e| log::error!("{e}"))
}

fn run(cli: &Cli) -> Result<(), Error> {
    cli.validate()?;

    let image = match &cli.image {
        Some(path) => source::load_gray(path)?,
        None => source::gradient(cli.gradient_size()),
    };
    let image_size = image.extent();
    let view = cli.view_size(image_size);

    let mut canvas = match cli.seed {
        Some(seed) => Canvas::with_seed(image, cli.inset, seed)?,
        None => Canvas::new(image, cli.inset)?,
    };
    let mut drawer = Drawer::new("ROI Mask Canvas", view.width, view.height)?;
    let mut compositor = SoftwareCompositor::new(view);
    log::info!(
        "canvas {}x{} shown at {}x{}",
        image_size.width,
        image_size.height,
        view.width,
        view.height
    );

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut fps = 0.0f32;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Discrete triggers. Shape buttons only work while the mask is on. */
        if drawer.m_pressed_once() {
            canvas.toggle_mask();
        }
        if drawer.i_pressed_once() {
            canvas.toggle_new_shape_clip();
        }
        if canvas.mask_enabled() {
            if let Some(kind) = drawer.add_shape_trigger() {
                canvas.add_shape(kind)?;
            }
        }

        /* 2) Interaction, mask rasterization, composite. */
        let input = FrameInput { pointer: drawer.pointer(), view_size: drawer.view_size() };
        canvas.frame(&input, &mut compositor)?;

        /* 3) HUD on top, then present. */
        let status = format!(
            "MASK {} | ADD {} | SHAPES {} | FPS {:.1}",
            if canvas.mask_enabled() { "ON" } else { "OFF" },
            match canvas.new_shape_clip() {
                ClipMode::In => "IN",
                ClipMode::Out => "OUT",
            },
            canvas.registry().len(),
            fps
        );
        draw_text_5x7(compositor.frame_mut(), 8, 8, &status, HUD_COLOR);
        draw_text_5x7(compositor.frame_mut(), 8, 18, HELP, HUD_COLOR);
        drawer.present(compositor.frame())?;

        /* 4) FPS, refreshed once per second. */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            log::debug!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
