//! Loaded-State Cleaner - Main Entry Point

use clap::Parser;
use cleaner_cli::{init_logging, run, Args};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.json_logs)?;

    info!("=== Loaded-State Cleaner v{} ===", env!("CARGO_PKG_VERSION"));

    let report = run(&args)?;
    info!(
        "Done: {} observations, {} vehicles, {} segments, {} samples corrected",
        report.observations, report.vehicles, report.segments, report.flipped_samples
    );

    Ok(())
}
