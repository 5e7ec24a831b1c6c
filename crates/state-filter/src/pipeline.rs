//! Partition → segment → debounce pipeline

use crate::config::FilterConfig;
use crate::debounce::{Debounced, Debouncer};
use crate::error::FilterError;
use crate::observation::Observation;
use crate::partition::{partition, VehicleGroup};
use crate::segment::split_by_gap;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A cleaned flag tagged with the input position it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedValue {
    pub position: usize,
    pub loaded: bool,
}

/// Counters gathered over one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub observations: usize,
    pub vehicles: usize,
    pub segments: usize,
    pub runs: usize,
    pub overwritten_runs: usize,
    pub flipped_samples: usize,
}

impl CleaningReport {
    fn absorb(&mut self, other: &CleaningReport) {
        self.observations += other.observations;
        self.vehicles += other.vehicles;
        self.segments += other.segments;
        self.runs += other.runs;
        self.overwritten_runs += other.overwritten_runs;
        self.flipped_samples += other.flipped_samples;
    }

    fn record_segment(&mut self, debounced: &Debounced) {
        self.observations += debounced.values.len();
        self.segments += 1;
        self.runs += debounced.runs;
        self.overwritten_runs += debounced.overwritten_runs;
        self.flipped_samples += debounced.flipped_samples;
    }
}

/// Cleaned output of a pipeline run.
///
/// `values` is ordered by vehicle first appearance, then segment, then time
/// within the segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedSeries {
    pub values: Vec<CleanedValue>,
    pub report: CleaningReport,
}

impl CleanedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cleaned flags in pipeline order
    pub fn loaded(&self) -> Vec<bool> {
        self.values.iter().map(|v| v.loaded).collect()
    }

    /// Cleaned flags realigned to the caller's input order
    pub fn into_input_order(self) -> Vec<bool> {
        let mut values = self.values;
        values.sort_unstable_by_key(|v| v.position);
        values.into_iter().map(|v| v.loaded).collect()
    }
}

/// Clean one vehicle's observations
fn clean_group(
    group: &VehicleGroup<'_>,
    gap_threshold: Duration,
    debouncer: Debouncer,
) -> (Vec<CleanedValue>, CleaningReport) {
    let mut values = Vec::with_capacity(group.len());
    let mut report = CleaningReport {
        vehicles: 1,
        ..Default::default()
    };

    for segment in split_by_gap(&group.observations, gap_threshold) {
        let raw: Vec<bool> = segment.iter().map(|o| o.loaded()).collect();
        let debounced = debouncer.debounce(&raw);
        values.extend(
            segment
                .iter()
                .zip(&debounced.values)
                .map(|(o, &loaded)| CleanedValue {
                    position: o.position,
                    loaded,
                }),
        );
        report.record_segment(&debounced);
    }

    debug!(
        "Vehicle {}: {} observations, {} segments, {} runs overwritten",
        group.vehicle_id, report.observations, report.segments, report.overwritten_runs
    );
    (values, report)
}

/// Clean a full telemetry table.
///
/// `observations` must already be sorted by vehicle then timestamp; the
/// pipeline does not re-sort. Returns one cleaned value per observation.
pub fn clean(
    observations: &[Observation],
    config: &FilterConfig,
) -> Result<CleanedSeries, FilterError> {
    config.validate()?;
    let gap_threshold = config.gap_threshold()?;
    let debouncer = Debouncer::new(config.min_run_length);

    let groups = partition(observations);

    #[cfg(feature = "parallel")]
    let cleaned: Vec<(Vec<CleanedValue>, CleaningReport)> = groups
        .par_iter()
        .map(|group| clean_group(group, gap_threshold, debouncer))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let cleaned: Vec<(Vec<CleanedValue>, CleaningReport)> = groups
        .iter()
        .map(|group| clean_group(group, gap_threshold, debouncer))
        .collect();

    let mut series = CleanedSeries {
        values: Vec::with_capacity(observations.len()),
        report: CleaningReport::default(),
    };
    for (values, report) in cleaned {
        series.values.extend(values);
        series.report.absorb(&report);
    }

    debug_assert_eq!(series.values.len(), observations.len());

    info!(
        "Cleaned {} observations across {} vehicles ({} segments, {} of {} runs overwritten)",
        series.report.observations,
        series.report.vehicles,
        series.report.segments,
        series.report.overwritten_runs,
        series.report.runs
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(second: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
            + Duration::seconds(second)
    }

    fn vehicle(id: &str, pattern: &str, start: i64) -> Vec<Observation> {
        pattern
            .chars()
            .enumerate()
            .map(|(i, c)| Observation::new(id, at(start + i as i64), c == '1'))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let series = clean(&[], &FilterConfig::default()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.report, CleaningReport::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FilterConfig {
            min_run_length: 0,
            ..Default::default()
        };
        let input = vehicle("a", "0101", 0);
        assert!(matches!(
            clean(&input, &config),
            Err(FilterError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_single_vehicle_flicker() {
        let input = vehicle("a", "0000011000000", 0);
        let series = clean(&input, &FilterConfig::default()).unwrap();
        assert_eq!(series.loaded(), vec![false; 13]);
        assert_eq!(series.report.segments, 1);
        assert_eq!(series.report.flipped_samples, 2);
    }

    #[test]
    fn test_segments_debounced_independently() {
        // Second segment starts with a short run, which is kept as its first run
        let mut input = vehicle("a", "0000000", 0);
        input.extend(vehicle("a", "11000000", 100));
        let series = clean(&input, &FilterConfig::default()).unwrap();
        assert_eq!(series.report.segments, 2);
        let expected: Vec<bool> = "000000011000000".chars().map(|c| c == '1').collect();
        assert_eq!(series.loaded(), expected);
    }

    #[test]
    fn test_interleaved_vehicles_grouped() {
        let a = vehicle("a", "111111", 0);
        let b = vehicle("b", "000000", 0);
        let input: Vec<Observation> = a
            .iter()
            .zip(&b)
            .flat_map(|(x, y)| [x.clone(), y.clone()])
            .collect();
        let series = clean(&input, &FilterConfig::default()).unwrap();

        let mut expected = vec![true; 6];
        expected.extend(vec![false; 6]);
        assert_eq!(series.loaded(), expected);

        let positions: Vec<usize> = series.values.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![0, 2, 4, 6, 8, 10, 1, 3, 5, 7, 9, 11]);
        assert_eq!(series.report.vehicles, 2);
    }

    #[test]
    fn test_input_order_realignment() {
        let a = vehicle("a", "111111", 0);
        let b = vehicle("b", "000000", 0);
        let input: Vec<Observation> = a
            .iter()
            .zip(&b)
            .flat_map(|(x, y)| [x.clone(), y.clone()])
            .collect();
        let series = clean(&input, &FilterConfig::default()).unwrap();
        let aligned = series.into_input_order();
        let expected: Vec<bool> = (0..12).map(|i| i % 2 == 0).collect();
        assert_eq!(aligned, expected);
    }

    #[test]
    fn test_report_counts_conserved() {
        let mut input = vehicle("a", "0011100000111", 0);
        input.extend(vehicle("b", "1", 0));
        input.extend(vehicle("c", "10101010", 0));
        let series = clean(&input, &FilterConfig::default()).unwrap();
        assert_eq!(series.len(), input.len());
        assert_eq!(series.report.observations, input.len());
        assert_eq!(series.report.vehicles, 3);
    }
}
