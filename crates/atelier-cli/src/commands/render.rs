//! Headless frame-to-PNG render command

use anyhow::{bail, Context, Result};
use atelier_render::{probe_capability, Canvas};
use std::path::Path;

use super::{load_config, run_script, ClickSpec};

pub struct RenderArgs {
    pub config: Option<String>,
    pub frames: u64,
    pub every: u64,
    pub output: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub seed: Option<u32>,
    pub clicks: Vec<ClickSpec>,
    pub wander: bool,
}

pub fn run(args: RenderArgs) -> Result<()> {
    if args.every == 0 {
        bail!("--every must be at least 1");
    }
    let mut config = load_config(args.config.as_deref(), args.seed)?;
    if let Some(w) = args.width {
        config.render.width = w;
    }
    if let Some(h) = args.height {
        config.render.height = h;
    }
    config.validate().context("Invalid render settings")?;

    let out_dir = Path::new(&args.output);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory '{}'", args.output))?;

    let capability = probe_capability();
    let mut canvas = Canvas::new(
        config.render.viewport().pixel_width(),
        config.render.viewport().pixel_height(),
    );
    let mut written = 0usize;

    run_script(
        config,
        &capability,
        args.frames,
        &args.clicks,
        args.wander,
        |stage, frame| {
            if frame % args.every != 0 {
                return Ok(());
            }
            stage.paint(&mut canvas);
            let path = out_dir.join(format!("frame_{:05}.png", frame));
            canvas
                .save_png(&path)
                .with_context(|| format!("Failed to save frame {}", frame))?;
            written += 1;
            Ok(())
        },
    )?;

    println!("Rendered {} frames to {}", written, out_dir.display());
    if !capability.is_available() {
        println!("No GPU available; frames show the fallback panel.");
    }
    Ok(())
}
