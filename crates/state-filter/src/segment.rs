//! Gap-based session segmentation

use crate::observation::Indexed;
use chrono::Duration;
use tracing::{debug, warn};

/// Split one vehicle's chronologically ordered observations into segments.
///
/// A new segment starts wherever the elapsed time between two adjacent
/// observations is strictly greater than `gap_threshold`. The returned slices
/// are contiguous, non-overlapping and cover `observations` exactly.
pub fn split_by_gap<'s, 'a>(
    observations: &'s [Indexed<'a>],
    gap_threshold: Duration,
) -> Vec<&'s [Indexed<'a>]> {
    if observations.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut start = 0;
    let mut backwards = 0usize;
    let mut first_backwards = None;

    for (idx, pair) in observations.windows(2).enumerate() {
        let diff = pair[1].timestamp() - pair[0].timestamp();
        if diff < Duration::zero() {
            backwards += 1;
            first_backwards.get_or_insert(pair[1].position);
        }
        if diff > gap_threshold {
            let boundary = idx + 1;
            segments.push(&observations[start..boundary]);
            start = boundary;
        }
    }
    segments.push(&observations[start..]);

    // Not corrected: the caller owns the sort
    if let Some(position) = first_backwards {
        warn!(
            "{} timestamps go backwards (first at position {}); input is not sorted by time",
            backwards, position
        );
    }

    debug!(
        "Split {} observations into {} segments",
        observations.len(),
        segments.len()
    );
    segments
}
