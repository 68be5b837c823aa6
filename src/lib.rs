//! # Primesift - Parallel Prime-Extrema Scanning
//!
//! A dynamically resizable worker pool that drains a directory of number
//! files, testing values for primality on background threads and tracking
//! the running minimum and maximum prime across the whole run.
//!
//! ## Features
//!
//! - **Resizable at runtime**: raise or lower the desired worker level while
//!   a scan is in flight; shrinking is cooperative and never cancels a unit
//! - **Bounded concurrency**: a hard cap derived from the host's cores, never
//!   exceeded regardless of the requested level
//! - **Race-free accounting**: completions fan in over a channel to a single
//!   supervisor, so no file count or extremum update is ever lost
//!
//! ## Quick Start
//!
//! ```bash
//! # Scan a directory with four workers
//! primesift scan ./rand_files --workers 4 --stats
//! ```

pub mod cli;
pub mod executor;
pub mod pool;

pub use cli::{Cli, Output};
pub use pool::{AggregateStats, Pool, PoolConfig, WorkUnit};

/// Result type alias for primesift operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
