//! CLI command implementations and the shared scripted run loop

pub mod probe;
pub mod render;
pub mod simulate;

use anyhow::{Context, Result};
use atelier_render::Capability;
use atelier_runtime::{HeadlessHost, InputEvent};
use atelier_stage::{Stage, StageConfig};
use std::path::Path;

/// A scripted click on crystal `crystal` at `time_ms` of simulation time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickSpec {
    pub crystal: usize,
    pub time_ms: f64,
}

/// Load the config file if given, otherwise defaults, then apply the seed
pub fn load_config(path: Option<&str>, seed: Option<u32>) -> Result<StageConfig> {
    let mut config = match path {
        Some(path) => StageConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config '{}'", path))?,
        None => StageConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

/// Pointer position on a slow figure-eight across the viewport
fn wander_position(stage: &Stage, time_ms: f64) -> (f32, f32) {
    let viewport = stage.viewport();
    let t = (time_ms * 0.0008) as f32;
    let x = viewport.css_width * (0.5 + t.sin() * 0.35);
    let y = viewport.css_height * (0.5 + (t * 2.0).sin() * 0.25);
    (x, y)
}

/// Mount a stage on a headless host and run `frames` frames, replaying
/// `clicks` and calling `on_frame` after each one.
pub fn run_script<F>(
    config: StageConfig,
    capability: &Capability,
    frames: u64,
    clicks: &[ClickSpec],
    wander: bool,
    mut on_frame: F,
) -> Result<Stage>
where
    F: FnMut(&mut Stage, u64) -> Result<()>,
{
    let mut host = HeadlessHost::new();
    let mut stage = Stage::new(config);
    stage.mount(&mut host, capability);

    let mut pending: Vec<ClickSpec> = clicks.to_vec();
    pending.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
    let mut pending = pending.into_iter().peekable();
    let mut last_pointer: Option<(f32, f32)> = None;

    for frame in 1..=frames {
        let now = stage.clock().elapsed_ms();

        if wander {
            let (x, y) = wander_position(&stage, now);
            let (mx, my) = last_pointer.map_or((0.0, 0.0), |(lx, ly)| (x - lx, y - ly));
            host.emit(InputEvent::PointerMove {
                x,
                y,
                movement_x: mx,
                movement_y: my,
                time_ms: now,
            });
            last_pointer = Some((x, y));
        }

        while let Some(click) = pending.next_if(|c| c.time_ms <= now) {
            match stage.crystal_screen_position(click.crystal) {
                Some(p) => {
                    host.emit(InputEvent::click(p.x, p.y, click.time_ms));
                }
                None => log::warn!(
                    "Crystal {} is not on screen; click at {} ms skipped",
                    click.crystal,
                    click.time_ms
                ),
            }
        }

        // a stage that is not running never requests frames
        if host.take_frame().is_none() {
            on_frame(&mut stage, frame)?;
            continue;
        }
        let events = host.drain_events();
        stage.frame(&mut host, &events);
        on_frame(&mut stage, frame)?;
    }

    stage.unmount(&mut host);
    Ok(stage)
}
