//! completor - multi-segment well construction
//!
//! Turns a completion case (TOML) and the schedule tables of its wells
//! (JSON) into tubing segments and cell-to-segment connections.
//!
//! # Usage
//!
//! ```bash
//! # All active wells, result on stdout
//! completor --case case.toml --schedule schedule.json
//!
//! # One well, result to file
//! completor --case case.toml --schedule schedule.json --well A1 --output a1.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use completor::config::CaseConfig;
use completor::engine::{CaseCompletion, CompletionEngine, WellContext};
use completor::schedule::WellSchedule;
use std::path::PathBuf;
use tracing::{info, warn};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "completor")]
#[command(about = "Multi-segment well construction from a completion case")]
#[command(version)]
struct CliArgs {
    /// Case file (TOML) with segment length and completion table
    #[arg(long, env = "COMPLETOR_CASE")]
    case: PathBuf,

    /// Schedule tables (JSON): COMPDAT, COMPSEGS and WELSEGS per well
    #[arg(long, env = "COMPLETOR_SCHEDULE")]
    schedule: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only complete this well (must be active)
    #[arg(long)]
    well: Option<String>,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let case = CaseConfig::load_from_file(&args.case)
        .with_context(|| format!("Failed to load case {}", args.case.display()))?;
    let schedule = WellSchedule::load_from_file(&args.schedule)
        .with_context(|| format!("Failed to load schedule {}", args.schedule.display()))?;
    info!(
        case = %args.case.display(),
        schedule = %args.schedule.display(),
        completion_rows = case.completion.len(),
        "Loaded inputs"
    );

    let engine = CompletionEngine::new(&case).context("Invalid case configuration")?;

    let result = match &args.well {
        Some(name) => {
            if !engine.active_wells().iter().any(|w| w == name) {
                bail!("Well {name} is not an active well of this case");
            }
            let well = engine.complete_well(&WellContext::new(name.as_str()), &case, &schedule)?;
            let mut result = CaseCompletion::default();
            result.push(well);
            result
        }
        None => engine.run(&case, &schedule)?,
    };

    for diagnostic in &result.diagnostics {
        warn!("{diagnostic}");
    }

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                output = %path.display(),
                wells = result.wells.len(),
                segments = result.segments.len(),
                connections = result.connections.len(),
                "Result written"
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
