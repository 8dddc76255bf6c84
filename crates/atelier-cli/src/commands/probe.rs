//! GPU capability probe command

use anyhow::Result;
use atelier_render::{probe_capability, Capability};

pub fn run(json: bool) -> Result<()> {
    let capability = probe_capability();
    if json {
        println!("{}", serde_json::to_string_pretty(&capability)?);
        return Ok(());
    }
    match capability {
        Capability::Gpu { name, backend } => {
            println!("GPU available: {}", name);
            println!("Backend: {}", backend);
        }
        Capability::Unavailable { reason } => {
            println!("No GPU available: {}", reason);
            println!("The stage would show the fallback panel.");
        }
    }
    Ok(())
}
