//! Run-length debouncing of a binary state signal

use std::iter;

/// A run of samples sharing one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub level: bool,
    pub length: usize,
}

/// Lengths of the maximal runs of equal consecutive values
pub fn run_lengths(values: &[bool]) -> Vec<usize> {
    values.chunk_by(|a, b| a == b).map(<[bool]>::len).collect()
}

/// Assign levels to runs, starting from `first` and strictly alternating.
///
/// Only the lengths of the encoded runs are kept; levels are forced to
/// toggle from one run to the next.
pub fn alternating_runs(first: bool, lengths: &[usize]) -> Vec<Run> {
    lengths
        .iter()
        .enumerate()
        .map(|(i, &length)| Run {
            level: first ^ (i % 2 == 1),
            length,
        })
        .collect()
}

/// Output of one debounce pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Debounced {
    /// Cleaned values, same length as the input
    pub values: Vec<bool>,
    /// Runs seen in the input
    pub runs: usize,
    /// Runs shorter than the threshold that were overwritten
    pub overwritten_runs: usize,
    /// Samples whose level changed
    pub flipped_samples: usize,
}

impl Debounced {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    fn push_run(mut self, run: Run, min_run_length: usize) -> Self {
        let level = match self.values.last() {
            Some(&accepted) if run.length < min_run_length => {
                self.overwritten_runs += 1;
                if accepted != run.level {
                    self.flipped_samples += run.length;
                }
                accepted
            }
            _ => run.level,
        };
        self.values.extend(iter::repeat(level).take(run.length));
        self.runs += 1;
        self
    }
}

/// Minimum-persistence debouncer for one segment
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    min_run_length: usize,
}

impl Debouncer {
    /// Create a debouncer that trusts runs of at least `min_run_length` samples
    pub fn new(min_run_length: usize) -> Self {
        Self { min_run_length }
    }

    /// Debounce one segment's loaded values.
    ///
    /// The first run is always kept. Every later run shorter than the
    /// threshold repeats the previously accepted level.
    pub fn debounce(&self, values: &[bool]) -> Debounced {
        let Some(&first) = values.first() else {
            return Debounced::default();
        };

        alternating_runs(first, &run_lengths(values))
            .into_iter()
            .fold(Debounced::with_capacity(values.len()), |acc, run| {
                acc.push_run(run, self.min_run_length)
            })
    }
}
