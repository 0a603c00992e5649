//! Rayon thread pool configuration for IV searches.
//!
//! Use [WorkerPool::install] to run a solve with a fixed number of threads, or
//! rely on Rayon's default (all CPU cores).

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::warn;

/// Worker threads used by the per-level fan-out of a full-range search.
#[derive(Debug, Default)]
pub struct WorkerPool {
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    /// Use exactly `n` worker threads. 0 means the global Rayon pool.
    /// Falls back to the global pool if a dedicated one cannot be built.
    pub fn with_workers(n: usize) -> Self {
        if n == 0 {
            return Self::default();
        }
        match ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => Self { pool: Some(pool) },
            Err(err) => {
                warn!(workers = n, error = %err, "falling back to global rayon pool");
                Self::default()
            }
        }
    }

    /// Run a closure on this pool.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_pool_runs_closure() {
        let pool = WorkerPool::with_workers(2);
        assert_eq!(pool.install(rayon::current_num_threads), 2);
    }

    #[test]
    fn zero_workers_uses_global_pool() {
        let pool = WorkerPool::with_workers(0);
        assert!(pool.pool.is_none());
        assert_eq!(pool.install(|| 40 + 2), 42);
    }
}
