//! Property tests for segmentation and debouncing

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use state_filter::{
    alternating_runs, clean, partition, run_lengths, split_by_gap, Debouncer, FilterConfig,
    Observation,
};

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Samples as (vehicle, gap to previous sample of that vehicle in ms, loaded)
fn sample_rows() -> impl Strategy<Value = Vec<(u8, i64, bool)>> {
    prop::collection::vec((0u8..4, 0i64..12_000, any::<bool>()), 0..200)
}

/// Build a table sorted by vehicle then time
fn sorted_table(samples: &[(u8, i64, bool)]) -> Vec<Observation> {
    let mut clocks = [epoch(); 4];
    let mut table: Vec<Observation> = samples
        .iter()
        .map(|&(vehicle, gap_ms, loaded)| {
            let clock = &mut clocks[vehicle as usize];
            *clock += Duration::milliseconds(gap_ms);
            Observation::new(format!("vehicle-{vehicle}"), *clock, loaded)
        })
        .collect();
    table.sort_by(|a, b| (&a.vehicle_id, a.timestamp).cmp(&(&b.vehicle_id, b.timestamp)));
    table
}

proptest! {
    #[test]
    fn prop_output_length_matches_input(samples in sample_rows(), min_run in 1usize..8) {
        let table = sorted_table(&samples);
        let config = FilterConfig { min_run_length: min_run, ..Default::default() };
        let series = clean(&table, &config).unwrap();
        prop_assert_eq!(series.len(), table.len());
        prop_assert_eq!(series.report.observations, table.len());

        let mut positions: Vec<usize> = series.values.iter().map(|v| v.position).collect();
        positions.sort_unstable();
        prop_assert_eq!(positions, (0..table.len()).collect::<Vec<_>>());
    }

    #[test]
    fn prop_stage_sizes_conserved(samples in sample_rows(), gap_ms in 0u64..10_000) {
        let table = sorted_table(&samples);
        let groups = partition(&table);
        prop_assert_eq!(groups.iter().map(|g| g.len()).sum::<usize>(), table.len());

        for group in &groups {
            let segments = split_by_gap(&group.observations, Duration::milliseconds(gap_ms as i64));
            prop_assert_eq!(segments.iter().map(|s| s.len()).sum::<usize>(), group.len());
            for segment in segments {
                prop_assert!(!segment.is_empty());
                let values: Vec<bool> = segment.iter().map(|o| o.loaded()).collect();
                prop_assert_eq!(run_lengths(&values).iter().sum::<usize>(), segment.len());
            }
        }
    }

    #[test]
    fn prop_segment_gap_invariant(samples in sample_rows(), gap_ms in 0i64..10_000) {
        let table = sorted_table(&samples);
        let threshold = Duration::milliseconds(gap_ms);
        for group in partition(&table) {
            let segments = split_by_gap(&group.observations, threshold);
            for segment in &segments {
                for pair in segment.windows(2) {
                    prop_assert!(pair[1].timestamp() - pair[0].timestamp() <= threshold);
                }
            }
            for pair in segments.windows(2) {
                let last = pair[0][pair[0].len() - 1];
                let next = pair[1][0];
                prop_assert!(next.timestamp() - last.timestamp() > threshold);
            }
        }
    }

    #[test]
    fn prop_debounce_acceptance(values in prop::collection::vec(any::<bool>(), 1..120), min_run in 1usize..8) {
        let output = Debouncer::new(min_run).debounce(&values).values;
        prop_assert_eq!(output.len(), values.len());

        let runs = alternating_runs(values[0], &run_lengths(&values));
        let mut start = 0;
        for (i, run) in runs.iter().enumerate() {
            let span = &output[start..start + run.length];
            let expected = if i == 0 || run.length >= min_run {
                run.level
            } else {
                output[start - 1]
            };
            prop_assert!(span.iter().all(|&v| v == expected));
            start += run.length;
        }
    }

    #[test]
    fn prop_debounce_idempotent(values in prop::collection::vec(any::<bool>(), 0..120), min_run in 1usize..8) {
        let debouncer = Debouncer::new(min_run);
        let once = debouncer.debounce(&values);
        let twice = debouncer.debounce(&once.values);
        prop_assert_eq!(&twice.values, &once.values);
        prop_assert_eq!(twice.overwritten_runs, 0);
    }

    #[test]
    fn prop_no_short_runs_after_first(values in prop::collection::vec(any::<bool>(), 1..120), min_run in 1usize..8) {
        let output = Debouncer::new(min_run).debounce(&values).values;
        let lengths = run_lengths(&output);
        prop_assert!(lengths.iter().skip(1).all(|&len| len >= min_run));
    }
}

#[test]
fn test_scenario_regular_cadence_one_segment() {
    let table: Vec<Observation> = (0..60)
        .map(|s| Observation::new("truck-1", epoch() + Duration::seconds(s), s % 7 == 0))
        .collect();
    let series = clean(&table, &FilterConfig::default()).unwrap();
    assert_eq!(series.report.segments, 1);
}

#[test]
fn test_scenario_ten_second_gap_two_segments() {
    let mut offsets: Vec<i64> = (0..30).collect();
    offsets.extend((0..30).map(|s| 39 + s));
    let table: Vec<Observation> = offsets
        .iter()
        .map(|&s| Observation::new("truck-1", epoch() + Duration::seconds(s), false))
        .collect();
    let groups = partition(&table);
    let segments = split_by_gap(&groups[0].observations, Duration::seconds(4));
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].len(), 30);
    assert_eq!(segments[1][0].position, 30);
}
