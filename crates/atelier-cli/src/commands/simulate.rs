//! Headless simulation command

use anyhow::Result;
use atelier_render::Capability;
use atelier_stage::StageSummary;

use super::{load_config, run_script, ClickSpec};

pub struct SimulateArgs {
    pub config: Option<String>,
    pub frames: u64,
    pub seed: Option<u32>,
    pub clicks: Vec<ClickSpec>,
    pub wander: bool,
    pub json: bool,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.seed)?;
    let seed = config.seed;

    // Simulation paints nothing, so the GPU probe is skipped
    let mut summary: Option<StageSummary> = None;
    run_script(
        config,
        &Capability::software(),
        args.frames,
        &args.clicks,
        args.wander,
        |stage, frame| {
            if frame == args.frames {
                summary = Some(stage.summary());
            }
            Ok(())
        },
    )?;

    let Some(summary) = summary else {
        println!("No frames simulated.");
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Seed: {}", seed);
    println!("Frames: {} ({:.2} s)", summary.frames, summary.elapsed);
    println!("State: {}", summary.state);
    println!(
        "Crystals: {} forming, {} active, {} transforming, {} dormant",
        summary.crystals.forming,
        summary.crystals.active,
        summary.crystals.transforming,
        summary.crystals.dormant
    );
    println!("Bubbles: {}", summary.bubbles);
    println!("Meshes: {}", summary.meshes);
    println!("Ambient shapes: {}", summary.ambient);
    println!("Trail points: {}", summary.trail_points);
    println!("Ink strokes: {}", summary.ink_strokes);
    if !summary.tripped.is_empty() {
        println!("Failed systems: {}", summary.tripped.join(", "));
    }
    Ok(())
}
