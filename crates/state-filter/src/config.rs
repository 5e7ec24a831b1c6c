//! Filter configuration

use crate::error::FilterError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Segmentation and debounce tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Largest gap between adjacent samples that stays in one segment (milliseconds)
    pub gap_threshold_ms: u64,

    /// Minimum run length (samples) for a state change to be trusted
    pub min_run_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            gap_threshold_ms: 4000,
            min_run_length: 5,
        }
    }
}

impl FilterConfig {
    /// Create strict config (shorter sessions, longer persistence)
    pub fn strict() -> Self {
        Self {
            gap_threshold_ms: 2000,
            min_run_length: 8,
        }
    }

    /// Create lenient config (longer sessions, shorter persistence)
    pub fn lenient() -> Self {
        Self {
            gap_threshold_ms: 10_000,
            min_run_length: 3,
        }
    }

    /// Gap threshold as an elapsed duration
    pub fn gap_threshold(&self) -> Result<Duration, FilterError> {
        i64::try_from(self.gap_threshold_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .ok_or_else(|| FilterError::InvalidConfig {
                field: "gap_threshold_ms",
                reason: format!("{} is not a representable duration", self.gap_threshold_ms),
            })
    }

    /// Check every tunable is usable
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.min_run_length == 0 {
            return Err(FilterError::InvalidConfig {
                field: "min_run_length",
                reason: "must be at least 1".to_string(),
            });
        }
        self.gap_threshold()?;
        Ok(())
    }
}
