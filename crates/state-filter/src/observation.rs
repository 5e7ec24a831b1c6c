//! Telemetry observation model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One sample of a vehicle's loaded/unloaded flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Vehicle identity
    pub vehicle_id: String,
    /// Sample time
    pub timestamp: NaiveDateTime,
    /// Raw loaded flag
    pub loaded: bool,
}

impl Observation {
    /// Create a new observation
    pub fn new(vehicle_id: impl Into<String>, timestamp: NaiveDateTime, loaded: bool) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            timestamp,
            loaded,
        }
    }
}

/// An observation tagged with its position in the caller's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indexed<'a> {
    pub position: usize,
    pub observation: &'a Observation,
}

impl<'a> Indexed<'a> {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.observation.timestamp
    }

    pub fn loaded(&self) -> bool {
        self.observation.loaded
    }
}
