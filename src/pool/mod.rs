//! Dynamically resizable worker pool over a fixed queue of work units.
//!
//! The controller sets a desired worker level; the pool launches workers up
//! to that level (bounded by the host's hard concurrency cap), each worker
//! pops one unit, executes it, and reports over the completion channel; the
//! supervisor folds results into the shared statistics and replenishes freed
//! slots while work remains.

pub mod core;
pub mod queue;
pub mod stats;
pub mod types;

// Re-export main types for easier access
pub use self::core::{Pool, Processor};
pub use queue::{TaskQueue, WorkUnit};
pub use stats::{AggregateStats, ResultAggregator};
pub use types::PoolConfig;
