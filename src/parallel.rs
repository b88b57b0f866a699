//! Explicit parallelism degree for the data-parallel stages.
//!
//! Embedding, feature extraction and forest training each own a
//! [`WorkerPool`] sized from a [`Parallelism`] value. The rayon pool is
//! built on the stage's first parallel call and reused afterwards, so no
//! stage depends on (or mutates) the global rayon pool.

use std::sync::{Arc, OnceLock};

use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::error::{RegimeError, Result};

/// Number of worker threads a stage may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parallelism {
    /// All cores reported by the host.
    #[default]
    Available,
    /// A fixed number of threads (0 is treated as 1).
    Threads(usize),
}

impl Parallelism {
    /// Interpret a scikit-style `n_jobs` value: any non-positive value
    /// means "all cores".
    pub fn from_jobs(n_jobs: i64) -> Self {
        if n_jobs <= 0 {
            Self::Available
        } else {
            Self::Threads(n_jobs as usize)
        }
    }

    /// Resolved thread count.
    pub fn threads(&self) -> usize {
        match *self {
            Self::Available => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            Self::Threads(n) => n.max(1),
        }
    }

    fn build_pool(&self) -> Result<ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads())
            .build()
            .map_err(|e| RegimeError::ThreadPool(e.to_string()))
    }
}

/// Lazily built rayon pool owned by one stage. Clones share the pool.
#[derive(Debug, Clone, Default)]
pub(crate) struct WorkerPool {
    parallelism: Parallelism,
    pool: Arc<OnceLock<ThreadPool>>,
}

impl WorkerPool {
    pub(crate) fn new(parallelism: Parallelism) -> Self {
        Self {
            parallelism,
            pool: Arc::new(OnceLock::new()),
        }
    }

    pub(crate) fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Run `op` inside the stage's pool, building it on first use.
    pub(crate) fn install<OP, R>(&self, op: OP) -> Result<R>
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        let pool = match self.pool.get() {
            Some(pool) => pool,
            None => {
                let built = self.parallelism.build_pool()?;
                // A concurrent caller may have won; its pool is kept
                self.pool.get_or_init(|| built)
            }
        };
        Ok(pool.install(op))
    }

    #[cfg(test)]
    pub(crate) fn is_built(&self) -> bool {
        self.pool.get().is_some()
    }
}
