//! Per-vehicle partitioning

use crate::observation::{Indexed, Observation};
use std::collections::HashMap;
use tracing::debug;

/// One vehicle's observations, in input order
#[derive(Debug, Clone)]
pub struct VehicleGroup<'a> {
    pub vehicle_id: &'a str,
    pub observations: Vec<Indexed<'a>>,
}

impl<'a> VehicleGroup<'a> {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Group observations by vehicle.
///
/// Groups come back in order of each vehicle's first appearance, and each
/// group keeps the relative order its observations had in `observations`.
pub fn partition(observations: &[Observation]) -> Vec<VehicleGroup<'_>> {
    let mut groups: Vec<VehicleGroup<'_>> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for (position, observation) in observations.iter().enumerate() {
        let slot = *slots
            .entry(observation.vehicle_id.as_str())
            .or_insert_with(|| {
                groups.push(VehicleGroup {
                    vehicle_id: observation.vehicle_id.as_str(),
                    observations: Vec::new(),
                });
                groups.len() - 1
            });
        groups[slot].observations.push(Indexed {
            position,
            observation,
        });
    }

    debug!(
        "Partitioned {} observations into {} vehicle groups",
        observations.len(),
        groups.len()
    );
    groups
}
