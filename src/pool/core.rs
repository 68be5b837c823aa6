//! The pool state machine.
//!
//! A pool owns the task queue, the aggregate statistics, and a pair of
//! counters: the desired worker level (set by the controller) and the active
//! worker count. Each launched worker executes exactly one unit on its own
//! thread and reports over a completion channel consumed by a single
//! supervisor thread, which folds the result into the statistics, frees the
//! slot, and replenishes while work and capacity remain.
//!
//! Lowering the desired level never cancels in-flight work: workers finish
//! their current unit and are simply not replaced.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, Sender, unbounded};
use tracing::{debug, trace, warn};

use crate::executor::TaskResult;

use super::queue::{TaskQueue, WorkUnit};
use super::stats::{AggregateStats, ResultAggregator};
use super::types::PoolConfig;

const COUNTS_POISONED: &str = "pool counts mutex poisoned";
const CHANNEL_POISONED: &str = "completion channel mutex poisoned";

/// The work a single worker performs: one unit in, one result out.
///
/// Receives a snapshot of the aggregate statistics taken just before
/// execution (the extrema gate). Failures are expressed in the returned
/// result; nothing may escape the worker boundary.
pub type Processor = dyn Fn(&WorkUnit, &AggregateStats) -> TaskResult + Send + Sync;

#[derive(Debug, Default)]
struct WorkerCounts {
    desired: usize,
    active: usize,
}

struct PoolState {
    queue: TaskQueue,
    aggregator: ResultAggregator,
    counts: Mutex<WorkerCounts>,
    idle: Condvar,
    max_capacity: usize,
    launch_seq: AtomicUsize,
    processor: Arc<Processor>,
    /// Taken on shutdown; workers hold clones while in flight, so the channel
    /// disconnects only once the last of them has reported.
    completion_tx: Mutex<Option<Sender<TaskResult>>>,
}

impl PoolState {
    /// Launch workers until the desired level is reached or the queue runs
    /// dry.
    fn launch_to_target(state: &Arc<Self>) {
        while Self::launch_one(state) {}
    }

    /// Try to start one worker. Returns true while the launch loop should
    /// keep going; false when nothing further can be done: target reached,
    /// capacity exhausted, queue empty, or shutting down.
    fn launch_one(state: &Arc<Self>) -> bool {
        let mut counts = state.counts.lock().expect(COUNTS_POISONED);

        // The hard cap is guarded by the same lock as the increment below;
        // the soft desired target alone does not bound concurrency.
        if counts.active >= counts.desired || counts.active >= state.max_capacity {
            return false;
        }
        let Some(unit) = state.queue.try_pop() else {
            return false;
        };
        let tx = match state.completion_tx.lock().expect(CHANNEL_POISONED).as_ref() {
            Some(tx) => tx.clone(),
            None => return false, // shutting down
        };
        counts.active += 1;
        drop(counts);

        let seq = state.launch_seq.fetch_add(1, Ordering::Relaxed);
        let name = unit.display_name();
        let worker_state = state.clone();
        let spawned = thread::Builder::new()
            .name(format!("primesift-worker-{seq}"))
            .spawn(move || {
                trace!("worker {} starting on {}", seq, unit.display_name());
                let gate = worker_state.aggregator.stats();
                let result = (worker_state.processor)(&unit, &gate);
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => true,
            Err(e) => {
                warn!("failed to spawn worker thread: {e}");
                state.counts.lock().expect(COUNTS_POISONED).active -= 1;
                // The unit was already popped and cannot be re-queued;
                // account for it so the completed count stays exact, and
                // keep the launch loop moving so the pool still drains.
                state
                    .aggregator
                    .record(&TaskResult::failure(name, format!("worker spawn failed: {e}")));
                state.idle.notify_all();
                true
            }
        }
    }

    fn is_idle_locked(&self, counts: &WorkerCounts) -> bool {
        counts.active == 0 && (counts.desired == 0 || self.queue.is_empty())
    }

    /// Supervisor loop: single consumer of the completion channel. Exits when
    /// the pool is dropped and the last in-flight worker has reported.
    fn supervise(state: Arc<Self>, rx: Receiver<TaskResult>) {
        while let Ok(result) = rx.recv() {
            if let Some(error) = &result.error {
                warn!("unit {} failed: {error}", result.file);
            }
            for issue in &result.parse_errors {
                warn!(
                    "{}:{}: not a valid integer: {:?}",
                    result.file, issue.line_number, issue.content
                );
            }
            debug!("worker complete: {} ({})", result.file, result.summary);

            state.aggregator.record(&result);
            state.counts.lock().expect(COUNTS_POISONED).active -= 1;

            // Replenish the freed slot while work and capacity remain
            Self::launch_to_target(&state);
            state.idle.notify_all();
        }
        trace!("completion channel closed; supervisor exiting");
    }
}

/// Dynamically resizable worker pool over a fixed, shrinking queue of units.
pub struct Pool {
    state: Arc<PoolState>,
    supervisor: Option<thread::JoinHandle<()>>,
}

impl Pool {
    /// Build a pool over `units`. No workers run until the controller raises
    /// the desired level with [`set_desired`](Self::set_desired).
    pub fn new<F>(units: Vec<WorkUnit>, config: &PoolConfig, processor: F) -> Result<Self>
    where
        F: Fn(&WorkUnit, &AggregateStats) -> TaskResult + Send + Sync + 'static,
    {
        let max_capacity = config.max_capacity();
        let (tx, rx) = unbounded();

        let state = Arc::new(PoolState {
            queue: TaskQueue::new(units),
            aggregator: ResultAggregator::new(),
            counts: Mutex::new(WorkerCounts::default()),
            idle: Condvar::new(),
            max_capacity,
            launch_seq: AtomicUsize::new(0),
            processor: Arc::new(processor),
            completion_tx: Mutex::new(Some(tx)),
        });
        debug!(
            "pool ready: {} units queued, capacity {}",
            state.queue.len(),
            max_capacity
        );

        let supervisor = {
            let state = state.clone();
            thread::Builder::new()
                .name("primesift-supervisor".to_string())
                .spawn(move || PoolState::supervise(state, rx))
                .context("failed to spawn pool supervisor")?
        };

        Ok(Self {
            state,
            supervisor: Some(supervisor),
        })
    }

    /// Set the desired worker level.
    ///
    /// Requests above [`max_capacity`](Self::max_capacity) are clamped (and
    /// logged at debug level), never silently accepted. Raising the level
    /// immediately fills capacity while the queue yields units; lowering it
    /// withholds replenishment and lets active workers drain naturally.
    pub fn set_desired(&self, n: usize) {
        let clamped = n.min(self.state.max_capacity);
        if clamped < n {
            debug!("desired worker count {n} clamped to capacity {clamped}");
        }
        self.state.counts.lock().expect(COUNTS_POISONED).desired = clamped;
        PoolState::launch_to_target(&self.state);
        self.state.idle.notify_all();
    }

    /// Snapshot of the aggregate statistics, safe to poll while workers run.
    pub fn stats(&self) -> AggregateStats {
        self.state.aggregator.stats()
    }

    /// The hard concurrency cap, fixed at construction.
    pub fn max_capacity(&self) -> usize {
        self.state.max_capacity
    }

    pub fn desired_workers(&self) -> usize {
        self.state.counts.lock().expect(COUNTS_POISONED).desired
    }

    pub fn active_workers(&self) -> usize {
        self.state.counts.lock().expect(COUNTS_POISONED).active
    }

    pub fn queue_len(&self) -> usize {
        self.state.queue.len()
    }

    /// True when no worker is active and no further launch is possible
    /// (queue empty or desired level zero). A later `set_desired` raise can
    /// resume work if units remain.
    pub fn is_idle(&self) -> bool {
        let counts = self.state.counts.lock().expect(COUNTS_POISONED);
        self.state.is_idle_locked(&counts)
    }

    /// Block until the pool goes idle.
    pub fn wait_idle(&self) {
        let mut counts = self.state.counts.lock().expect(COUNTS_POISONED);
        while !self.state.is_idle_locked(&counts) {
            counts = self.state.idle.wait(counts).expect(COUNTS_POISONED);
        }
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        // Closing the channel stops future launches; in-flight workers finish
        // their unit, the supervisor drains their results, then exits.
        self.state.completion_tx.lock().expect(CHANNEL_POISONED).take();
        if let Some(supervisor) = self.supervisor.take() {
            let _ = supervisor.join();
        }
    }
}
