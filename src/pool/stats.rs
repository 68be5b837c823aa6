//! Thread-safe accumulation of run-wide statistics.

use serde::Serialize;
use std::sync::Mutex;

use crate::executor::TaskResult;

/// The global tally fed by completed tasks.
///
/// `files_completed` increments exactly once per completed unit regardless of
/// outcome. `max_prime` is monotonically non-decreasing and `min_prime`
/// monotonically non-increasing once initialized from the first prime seen.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateStats {
    pub files_completed: usize,
    pub files_failed: usize,
    pub lines_read: usize,
    pub primes_found: usize,
    pub min_prime: Option<i64>,
    pub max_prime: Option<i64>,
}

impl AggregateStats {
    fn apply(&mut self, result: &TaskResult) {
        self.files_completed += 1;
        if result.error.is_some() {
            self.files_failed += 1;
        }
        self.lines_read += result.lines_read;

        for prime in result.primes() {
            self.primes_found += 1;
            if self.max_prime.is_none_or(|max| prime > max) {
                self.max_prime = Some(prime);
            }
            if self.min_prime.is_none_or(|min| prime < min) {
                self.min_prime = Some(prime);
            }
        }
    }
}

/// Owns the [`AggregateStats`] and serializes every update.
///
/// A single mutex (rather than per-field atomics) because the extrema merge
/// must be linearizable with the completion count: no increment may be lost
/// and no field may ever be read mid-write.
#[derive(Default)]
pub struct ResultAggregator {
    stats: Mutex<AggregateStats>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one completed task into the tally.
    pub fn record(&self, result: &TaskResult) {
        self.stats
            .lock()
            .expect("aggregate stats mutex poisoned")
            .apply(result);
    }

    /// Snapshot of the current tally. Safe to call concurrently with writers;
    /// the snapshot is internally consistent as of some recent update.
    pub fn stats(&self) -> AggregateStats {
        self.stats
            .lock()
            .expect("aggregate stats mutex poisoned")
            .clone()
    }
}
