//! Work execution: scan one file of integers for prime extrema.
//!
//! Invoked on a background worker thread. Nothing here is allowed to escape
//! the worker boundary: any failure becomes the error variant of
//! [`TaskResult`], never a panic that would leak pool capacity.

pub mod primes;
pub mod types;

pub use primes::is_prime;
pub use types::{Candidate, ParseIssue, TaskResult};

use std::fs;
use std::path::Path;

/// Snapshot of the run-wide prime extrema at the moment a worker starts a
/// unit. Values strictly inside the window cannot extend either extremum and
/// skip the primality test entirely. A stale snapshot only widens the set of
/// tested values; it never changes the final extrema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtremaGate {
    pub min_prime: Option<i64>,
    pub max_prime: Option<i64>,
}

impl ExtremaGate {
    pub fn new(min_prime: Option<i64>, max_prime: Option<i64>) -> Self {
        Self {
            min_prime,
            max_prime,
        }
    }

    /// Could `value` extend either extremum?
    fn could_extend(&self, value: i64) -> bool {
        self.max_prime.is_none_or(|max| value > max) || self.min_prime.is_none_or(|min| value < min)
    }

    fn admit(&mut self, prime: i64) {
        if self.max_prime.is_none_or(|max| prime > max) {
            self.max_prime = Some(prime);
        }
        if self.min_prime.is_none_or(|min| prime < min) {
            self.min_prime = Some(prime);
        }
    }
}

/// Execute one unit: read the file, parse one base-10 integer per line, and
/// classify every value that could extend the extrema.
///
/// `emit_progress` receives a 0-100 percentage as the scan advances; callers
/// must not assume it is ever called. Parse failures are recorded per line and
/// the scan continues; only an unreadable file fails the whole unit.
pub fn scan_unit(
    path: &Path,
    gate: ExtremaGate,
    mut emit_progress: impl FnMut(u8),
) -> TaskResult {
    let file = path.to_string_lossy().into_owned();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return TaskResult::failure(file, format!("failed to read {}: {e}", path.display()));
        }
    };

    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len();

    let mut gate = gate;
    let mut candidates = Vec::new();
    let mut parse_errors = Vec::new();
    let mut last_pct = 0u8;

    for (index, line) in lines.iter().enumerate() {
        match line.trim().parse::<i64>() {
            Ok(value) => {
                // Primes are greater than 1, and testing is only worthwhile
                // when the value could beat the current extrema.
                if value > 1 && gate.could_extend(value) {
                    let prime = is_prime(value);
                    candidates.push(Candidate { value, prime });
                    if prime {
                        gate.admit(value);
                    }
                }
            }
            Err(_) => {
                parse_errors.push(ParseIssue {
                    line_number: index + 1,
                    content: line.to_string(),
                });
            }
        }

        let pct = (((index + 1) * 100) / total) as u8;
        if pct != last_pct {
            last_pct = pct;
            emit_progress(pct);
        }
    }

    TaskResult::completed(file, candidates, parse_errors, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_unit(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_scan_finds_prime_extrema() {
        let dir = TempDir::new().unwrap();
        let path = write_unit(&dir, "numbers.txt", "7\n10\n13\n");

        let result = scan_unit(&path, ExtremaGate::default(), |_| {});

        assert!(result.error.is_none());
        assert_eq!(result.lines_read, 3);
        let primes: Vec<i64> = result.primes().collect();
        assert_eq!(primes, vec![7, 13]);
        // 10 was tested (it beat the max at the time) but classified composite
        assert!(result.candidates.iter().any(|c| c.value == 10 && !c.prime));
    }

    #[test]
    fn test_gate_skips_values_inside_window() {
        let dir = TempDir::new().unwrap();
        let path = write_unit(&dir, "numbers.txt", "9\n12\n");

        // Extrema already span [5, 17]: nothing in this file can extend them
        let gate = ExtremaGate::new(Some(5), Some(17));
        let result = scan_unit(&path, gate, |_| {});

        assert!(result.candidates.is_empty());
        assert_eq!(result.lines_read, 2);
    }

    #[test]
    fn test_values_at_most_one_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write_unit(&dir, "numbers.txt", "-3\n0\n1\n");

        let result = scan_unit(&path, ExtremaGate::default(), |_| {});

        assert!(result.candidates.is_empty());
        assert_eq!(result.lines_read, 3);
    }

    #[test]
    fn test_parse_failure_is_line_scoped() {
        let dir = TempDir::new().unwrap();
        let path = write_unit(&dir, "numbers.txt", "7\nnot-a-number\n13\n");

        let result = scan_unit(&path, ExtremaGate::default(), |_| {});

        assert!(result.error.is_none());
        assert_eq!(result.parse_errors.len(), 1);
        assert_eq!(result.parse_errors[0].line_number, 2);
        let primes: Vec<i64> = result.primes().collect();
        assert_eq!(primes, vec![7, 13]);
    }

    #[test]
    fn test_unreadable_file_is_unit_fatal() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.txt");

        let result = scan_unit(&missing, ExtremaGate::default(), |_| {});

        assert!(result.error.is_some());
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_progress_reaches_one_hundred() {
        let dir = TempDir::new().unwrap();
        let path = write_unit(&dir, "numbers.txt", "2\n3\n5\n7\n");

        let mut ticks = Vec::new();
        scan_unit(&path, ExtremaGate::default(), |pct| ticks.push(pct));

        assert_eq!(ticks.last(), Some(&100));
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
    }
}
