use serde::Serialize;

/// Sizing configuration for the worker pool.
#[derive(Debug, Clone, Serialize)]
pub struct PoolConfig {
    /// Hard upper limit on workers (0 = derive purely from the percentage)
    pub max_threads: usize,

    /// Percentage of CPU cores the pool may occupy
    pub thread_percentage: u8,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            thread_percentage: 100,
        }
    }
}

impl PoolConfig {
    /// The hard concurrency cap for this host: a percentage of the available
    /// cores, optionally limited by `max_threads`, never below 1.
    pub fn max_capacity(&self) -> usize {
        let available_cores = num_cpus::get();
        let by_percentage =
            std::cmp::max(1, (available_cores * self.thread_percentage as usize) / 100);

        if self.max_threads > 0 {
            std::cmp::min(self.max_threads, by_percentage)
        } else {
            by_percentage
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_is_at_least_one() {
        let config = PoolConfig {
            max_threads: 0,
            thread_percentage: 1,
        };
        assert!(config.max_capacity() >= 1);
    }

    #[test]
    fn test_max_threads_caps_capacity() {
        let config = PoolConfig {
            max_threads: 2,
            thread_percentage: 100,
        };
        assert!(config.max_capacity() <= 2);
    }

    #[test]
    fn test_zero_max_threads_means_percentage_only() {
        let config = PoolConfig::default();
        assert_eq!(config.max_capacity(), std::cmp::max(1, num_cpus::get()));
    }
}
