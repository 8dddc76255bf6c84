//! Atelier CLI - run the decorative layer headless

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{probe, render, simulate, ClickSpec};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Headless driver for the crystal and cursor effects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe for a GPU adapter
    Probe {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the stage for a number of frames and print a summary
    Simulate {
        /// Path to a stage config file (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Number of 16 ms frames to run
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Override the config seed
        #[arg(long)]
        seed: Option<u32>,

        /// Scripted click on a crystal, as INDEX@MS (repeatable)
        #[arg(long = "click", value_parser = parse_click)]
        clicks: Vec<ClickSpec>,

        /// Sweep the pointer along a figure-eight
        #[arg(long)]
        wander: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the stage and paint frames to PNG files
    Render {
        /// Path to a stage config file (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Number of 16 ms frames to run
        #[arg(long, default_value = "120")]
        frames: u64,

        /// Paint every K-th frame
        #[arg(long, default_value = "30")]
        every: u64,

        /// Output directory
        #[arg(short, long, default_value = "frames")]
        output: String,

        /// CSS width of the drawable area
        #[arg(long)]
        width: Option<f32>,

        /// CSS height of the drawable area
        #[arg(long)]
        height: Option<f32>,

        /// Override the config seed
        #[arg(long)]
        seed: Option<u32>,

        /// Scripted click on a crystal, as INDEX@MS (repeatable)
        #[arg(long = "click", value_parser = parse_click)]
        clicks: Vec<ClickSpec>,

        /// Sweep the pointer along a figure-eight
        #[arg(long)]
        wander: bool,
    },
}

fn parse_click(s: &str) -> Result<ClickSpec, String> {
    let (index, time) = s
        .split_once('@')
        .ok_or_else(|| format!("expected INDEX@MS, got '{}'", s))?;
    let crystal: usize = index
        .trim()
        .parse()
        .map_err(|e| format!("invalid crystal index: {}", e))?;
    let time_ms: f64 = time
        .trim()
        .parse()
        .map_err(|e| format!("invalid time: {}", e))?;
    if !time_ms.is_finite() || time_ms < 0.0 {
        return Err(format!("time must be a non-negative number of ms, got {}", time_ms));
    }
    Ok(ClickSpec { crystal, time_ms })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Probe { json } => probe::run(json),
        Commands::Simulate {
            config,
            frames,
            seed,
            clicks,
            wander,
            json,
        } => simulate::run(simulate::SimulateArgs {
            config,
            frames,
            seed,
            clicks,
            wander,
            json,
        }),
        Commands::Render {
            config,
            frames,
            every,
            output,
            width,
            height,
            seed,
            clicks,
            wander,
        } => render::run(render::RenderArgs {
            config,
            frames,
            every,
            output,
            width,
            height,
            seed,
            clicks,
            wander,
        }),
    }
}
