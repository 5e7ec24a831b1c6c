//! Loaded-State Flicker Filter
//!
//! Cleans per-vehicle loaded/unloaded telemetry:
//! - Partitions observations by vehicle, in first-seen order
//! - Splits each vehicle's timeline into sessions at time gaps
//! - Debounces short-lived state flips within each session

mod config;
mod debounce;
mod error;
mod observation;
mod partition;
mod pipeline;
mod segment;

pub use config::FilterConfig;
pub use debounce::{alternating_runs, run_lengths, Debounced, Debouncer, Run};
pub use error::FilterError;
pub use observation::{Indexed, Observation};
pub use partition::{partition, VehicleGroup};
pub use pipeline::{clean, CleanedSeries, CleanedValue, CleaningReport};
pub use segment::split_by_gap;
