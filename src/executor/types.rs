/// A value the executor actually put through the primality test, with its
/// classification. Only `prime == true` candidates feed the global extrema.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub value: i64,
    pub prime: bool,
}

/// A line that failed to parse as a base-10 integer.
///
/// Scoped to one unit: the line is excluded from extrema computation and the
/// unit keeps scanning. Surfaced for logging, never raised across the worker
/// boundary.
#[derive(Debug, Clone)]
pub struct ParseIssue {
    pub line_number: usize,
    pub content: String,
}

/// Result of executing one work unit.
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// Path of the scanned file
    pub file: String,

    /// Human-readable status message
    pub summary: String,

    /// Values tested for primality, with their classification
    pub candidates: Vec<Candidate>,

    /// Lines that were not valid integers
    pub parse_errors: Vec<ParseIssue>,

    /// Unit-fatal error (e.g. unreadable file), if any
    pub error: Option<String>,

    /// Number of lines processed
    pub lines_read: usize,
}

impl TaskResult {
    /// A unit that ran to completion (possibly with per-line parse issues).
    pub fn completed(
        file: String,
        candidates: Vec<Candidate>,
        parse_errors: Vec<ParseIssue>,
        lines_read: usize,
    ) -> Self {
        let primes = candidates.iter().filter(|c| c.prime).count();
        Self {
            summary: format!("{lines_read} lines, {primes} primes"),
            file,
            candidates,
            parse_errors,
            error: None,
            lines_read,
        }
    }

    /// A unit that could not be executed at all. Still counts as completed in
    /// the aggregate tally.
    pub fn failure(file: String, error: String) -> Self {
        Self {
            file,
            summary: "failed".to_string(),
            candidates: Vec::new(),
            parse_errors: Vec::new(),
            error: Some(error),
            lines_read: 0,
        }
    }

    /// Prime values found in this unit.
    pub fn primes(&self) -> impl Iterator<Item = i64> + '_ {
        self.candidates
            .iter()
            .filter(|c| c.prime)
            .map(|c| c.value)
    }
}
