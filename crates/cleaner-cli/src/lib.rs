//! Loaded-State Cleaner
//!
//! Command-line front end: load a telemetry table, clean it, export the result.

pub mod settings;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use settings::Settings;
use state_filter::{clean, CleaningReport};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use telemetry_io::{load_csv, sort_observations, write_csv, write_json};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Output encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Clean flickering loaded/unloaded flags in a per-vehicle telemetry table
#[derive(Debug, Parser)]
#[command(name = "loaded-clean", version, about)]
pub struct Args {
    /// Input CSV table
    pub input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Largest in-session gap between samples, in milliseconds
    #[arg(long)]
    pub gap_threshold_ms: Option<u64>,

    /// Minimum run length, in samples, for a state change to be trusted
    #[arg(long)]
    pub min_run_length: Option<usize>,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Initialize logging. Logs go to stderr so stdout stays usable for results.
pub fn init_logging(verbosity: u8, json: bool) -> anyhow::Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
    .context("Failed to set tracing subscriber")
}

/// Run one cleaning pass end to end
pub fn run(args: &Args) -> anyhow::Result<CleaningReport> {
    let settings = Settings::load(args.config.as_deref())?
        .with_overrides(args.gap_threshold_ms, args.min_run_length);
    settings.validate()?;
    info!("Using {:?}", settings.filter);

    let mut observations = load_csv(&args.input, &settings.table)
        .with_context(|| format!("loading {}", args.input.display()))?;
    if observations.is_empty() {
        warn!("{} contains no observations", args.input.display());
    }
    sort_observations(&mut observations);

    let series = clean(&observations, &settings.filter)?;

    let export = |sink: &mut dyn Write| -> anyhow::Result<()> {
        match args.format {
            OutputFormat::Csv => write_csv(sink, &settings.table, &observations, &series)?,
            OutputFormat::Json => write_json(sink, &settings.table, &observations, &series)?,
        }
        Ok(())
    };
    match &args.output {
        Some(path) => {
            write_atomically(path, export)?;
            info!("Wrote {} cleaned rows to {}", series.len(), path.display());
        }
        None => {
            let mut sink = BufWriter::new(io::stdout().lock());
            export(&mut sink)?;
            sink.flush()?;
        }
    }
    Ok(series.report)
}

/// Write `path` through a sibling temporary file that replaces it only once
/// `write` has succeeded. On error the previous contents are left untouched.
pub fn write_atomically<F>(path: &Path, write: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut dyn Write) -> anyhow::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;

    let mut sink = BufWriter::new(staging);
    write(&mut sink)?;
    let staging = sink.into_inner().map_err(io::IntoInnerError::into_error)?;
    staging
        .persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
