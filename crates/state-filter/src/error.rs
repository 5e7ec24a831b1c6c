//! Filter Error Types

use thiserror::Error;

/// Errors raised while cleaning a telemetry series
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Configuration value outside its usable domain
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}
