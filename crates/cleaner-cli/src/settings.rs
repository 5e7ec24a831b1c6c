//! Layered runtime settings

use serde::{Deserialize, Serialize};
use state_filter::{FilterConfig, FilterError};
use std::path::Path;
use telemetry_io::TableFormat;
use thiserror::Error;
use tracing::debug;

/// Prefix for environment overrides, e.g. `LOADED_CLEAN_FILTER__MIN_RUN_LENGTH=3`
pub const ENV_PREFIX: &str = "LOADED_CLEAN";

/// Settings loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Everything a cleaning run needs besides its input and output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub filter: FilterConfig,
    pub table: TableFormat,
}

impl Settings {
    /// Build settings from defaults, an optional config file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Settings::default())?);
        if let Some(path) = path {
            debug!("Reading settings from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }
        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Apply command-line overrides on top of the loaded settings
    pub fn with_overrides(
        mut self,
        gap_threshold_ms: Option<u64>,
        min_run_length: Option<usize>,
    ) -> Self {
        if let Some(gap) = gap_threshold_ms {
            self.filter.gap_threshold_ms = gap;
        }
        if let Some(min_run) = min_run_length {
            self.filter.min_run_length = min_run;
        }
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.filter.validate()?;
        Ok(())
    }
}
