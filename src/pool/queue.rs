//! Shared work queue feeding the worker pool.
//!
//! The queue is populated once at startup and only shrinks. Units are handed
//! out exactly once across all callers; `try_pop` never blocks. Pop order is
//! from the end of the backing vector, an artifact of the storage rather than
//! a domain guarantee, and nothing may rely on it.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One unit of work: a single input file to scan.
///
/// Immutable once enqueued. Ownership moves from the queue to the worker that
/// pops it; a unit is consumed by execution and never returned.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    path: PathBuf,
}

impl WorkUnit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lossy display form of the path, for logs and results.
    pub fn display_name(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Mutex-guarded collection of remaining work units.
pub struct TaskQueue {
    units: Mutex<Vec<WorkUnit>>,
}

impl TaskQueue {
    pub fn new(units: Vec<WorkUnit>) -> Self {
        Self {
            units: Mutex::new(units),
        }
    }

    /// Pop one unit, or `None` when no work remains.
    ///
    /// Non-blocking; safe to call from any number of launch sites
    /// concurrently. `None` is the normal "do not launch" signal, not an
    /// error.
    pub fn try_pop(&self) -> Option<WorkUnit> {
        self.units.lock().expect("task queue mutex poisoned").pop()
    }

    pub fn len(&self) -> usize {
        self.units.lock().expect("task queue mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
