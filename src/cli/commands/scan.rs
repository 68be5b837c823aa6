//! The `scan` command: the controller side of the worker pool.
//!
//! Enumerates the input directory once, builds the pool, sets the desired
//! worker level, then polls aggregate statistics on a timer and renders the
//! running tally until the pool drains.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::cli::Output;
use crate::executor::{self, ExtremaGate};
use crate::pool::{AggregateStats, Pool, PoolConfig, WorkUnit};

#[derive(Args, Serialize)]
pub struct ScanArgs {
    /// Directory of input files (one base-10 integer per line)
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Desired worker count (default: the pool's full capacity)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Hard limit on worker threads (0 = derive from --thread-percentage)
    #[arg(long, default_value = "0")]
    pub max_threads: usize,

    /// Percentage of CPU cores the pool may occupy
    #[arg(long, default_value = "100")]
    pub thread_percentage: u8,

    /// Statistics poll interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub poll_interval: u64,

    /// Show detailed statistics after scanning
    #[arg(long)]
    pub stats: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum, Serialize)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON format
    Json,
}

pub fn execute(args: ScanArgs, output: &Output) -> Result<()> {
    let units = enumerate_units(&args.directory)?;
    let total = units.len();
    output.info(&format!("Files: {total}"));

    let config = PoolConfig {
        max_threads: args.max_threads,
        thread_percentage: args.thread_percentage,
    };

    let pool = Pool::new(units, &config, |unit, gate: &AggregateStats| {
        let name = unit.display_name();
        executor::scan_unit(
            unit.path(),
            ExtremaGate::new(gate.min_prime, gate.max_prime),
            |pct| trace!("{name}: {pct}% done"),
        )
    })?;

    let desired = args.workers.unwrap_or_else(|| pool.max_capacity());
    output.verbose(&format!(
        "capacity {}, desired workers {}",
        pool.max_capacity(),
        desired
    ));

    let start = Instant::now();
    pool.set_desired(desired);

    let bar = output.progress_bar(total as u64);
    while !pool.is_idle() {
        thread::sleep(Duration::from_millis(args.poll_interval));
        update_progress(&bar, &pool);
    }
    update_progress(&bar, &pool);
    bar.finish();

    let elapsed = start.elapsed();
    let stats = pool.stats();

    match args.format {
        OutputFormat::Json => print_json_results(&stats, elapsed)?,
        OutputFormat::Text => print_text_results(&stats, elapsed, &args, output),
    }

    Ok(())
}

/// One flat pass over the directory, files only, sorted by name. The queue is
/// populated exactly once; the directory is never re-read.
fn enumerate_units(dir: &Path) -> Result<Vec<WorkUnit>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths.into_iter().map(WorkUnit::new).collect())
}

fn update_progress(bar: &ProgressBar, pool: &Pool) {
    let stats = pool.stats();
    bar.set_position(stats.files_completed as u64);
    bar.set_message(format!(
        "workers {} | min {} | max {}",
        pool.active_workers(),
        fmt_extremum(stats.min_prime),
        fmt_extremum(stats.max_prime),
    ));
}

fn fmt_extremum(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn print_text_results(
    stats: &AggregateStats,
    elapsed: Duration,
    args: &ScanArgs,
    output: &Output,
) {
    output.success(&format!(
        "Scan complete: {} files in {:.2}s",
        stats.files_completed,
        elapsed.as_secs_f64()
    ));
    println!(
        "  Max prime: {}",
        console::style(fmt_extremum(stats.max_prime)).cyan().bold()
    );
    println!(
        "  Min prime: {}",
        console::style(fmt_extremum(stats.min_prime)).cyan().bold()
    );

    if stats.files_failed > 0 {
        output.warning(&format!("{} file(s) failed to scan", stats.files_failed));
    }

    if args.stats {
        output.header("Scan Statistics");
        output.summary_stats("Files completed:", &stats.files_completed.to_string());
        output.summary_stats("Files failed:", &stats.files_failed.to_string());
        output.summary_stats("Lines read:", &stats.lines_read.to_string());
        output.summary_stats("Primes found:", &stats.primes_found.to_string());
        output.summary_stats("Scan time:", &format!("{}ms", elapsed.as_millis()));
    }
}

fn print_json_results(stats: &AggregateStats, elapsed: Duration) -> Result<()> {
    let results = serde_json::json!({
        "statistics": stats,
        "scan_duration_ms": elapsed.as_millis() as u64,
    });

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
