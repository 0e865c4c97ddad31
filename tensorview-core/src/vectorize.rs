//! Parallel-for over an output buffer.
//!
//! Small workloads run on the calling thread. Larger ones are split into
//! chunks of at least `grain` elements and handed to rayon, either on the
//! global pool or on a dedicated pool of a fixed size.

use std::sync::{Arc, OnceLock};

use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::{Error, Result};

const MIN_PARALLEL_ENV: &str = "TENSORVIEW_MIN_PARALLEL";
const GRAIN_ENV: &str = "TENSORVIEW_GRAIN";
const THREADS_ENV: &str = "TENSORVIEW_THREADS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorizeConfig {
    /// Element count below which work stays on the calling thread.
    pub min_parallel: usize,
    /// Smallest number of elements handed to one worker at a time.
    pub grain: usize,
    /// `None` uses the rayon global pool, `Some(n)` a dedicated pool of `n`
    /// threads. `Some(1)` is always sequential.
    pub threads: Option<usize>,
}

impl Default for VectorizeConfig {
    fn default() -> Self {
        Self {
            min_parallel: 4096,
            grain: 1024,
            threads: None,
        }
    }
}

impl VectorizeConfig {
    /// Everything on the calling thread.
    pub fn sequential() -> Self {
        Self {
            threads: Some(1),
            ..Default::default()
        }
    }

    /// Defaults overridden by `TENSORVIEW_MIN_PARALLEL`, `TENSORVIEW_GRAIN`
    /// and `TENSORVIEW_THREADS`. A thread count of 0 selects the global pool.
    pub fn from_env() -> Self {
        let default = Self::default();
        let threads = match env_usize(THREADS_ENV) {
            Some(0) | None => default.threads,
            Some(n) => Some(n),
        };
        Self {
            min_parallel: env_usize(MIN_PARALLEL_ENV).unwrap_or(default.min_parallel),
            grain: env_usize(GRAIN_ENV).unwrap_or(default.grain),
            threads,
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    let val = std::env::var(key).ok()?;
    match val.trim().parse() {
        Ok(n) => Some(n),
        Err(err) => {
            log::warn!("ignoring {key}={val:?}: {err}");
            None
        }
    }
}

/// The parallel-for harness used by every dispatch function.
#[derive(Clone, Debug)]
pub struct Vectorize {
    config: VectorizeConfig,
    pool: Option<Arc<ThreadPool>>,
    workers: usize,
}

impl Vectorize {
    pub fn new(config: VectorizeConfig) -> Result<Self> {
        let (pool, workers) = match config.threads {
            None => (None, num_cpus::get()),
            Some(n) if n <= 1 => (None, 1),
            Some(n) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("tensorview-{i}"))
                    .build()
                    .map_err(|source| Error::ThreadPool { threads: n, source }.bt())?;
                (Some(Arc::new(pool)), n)
            }
        };
        log::debug!("vectorize: {config:?}, {workers} workers");
        Ok(Self {
            config,
            pool,
            workers,
        })
    }

    /// Process-wide harness configured from the environment on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<Vectorize> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let config = VectorizeConfig::from_env();
            Self::new(config.clone()).unwrap_or_else(|err| {
                log::warn!("vectorize: falling back to the global rayon pool: {err}");
                Self {
                    config: VectorizeConfig {
                        threads: None,
                        ..config
                    },
                    pool: None,
                    workers: num_cpus::get(),
                }
            })
        })
    }

    pub fn config(&self) -> &VectorizeConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Whether `n` elements would be spread across workers.
    pub fn is_parallel(&self, n: usize) -> bool {
        self.workers > 1 && n >= self.config.min_parallel
    }

    /// Call `f(i, &mut out[i])` for every element of `out`.
    pub fn run<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync + Send,
    {
        self.run_init(out, || (), |_, i, x| f(i, x));
    }

    /// Like [`Vectorize::run`], with per-worker scratch state built by `init`.
    /// `init` runs at least once per chunk, so `f` must not rely on state
    /// carried between elements.
    pub fn run_init<T, S, I, F>(&self, out: &mut [T], init: I, f: F)
    where
        T: Send,
        I: Fn() -> S + Sync + Send,
        F: Fn(&mut S, usize, &mut T) + Sync + Send,
    {
        let n = out.len();
        if !self.is_parallel(n) {
            log::trace!("vectorize: {n} elements on the calling thread");
            let mut scratch = init();
            for (i, x) in out.iter_mut().enumerate() {
                f(&mut scratch, i, x);
            }
            return;
        }
        log::trace!("vectorize: {n} elements across {} workers", self.workers);
        let grain = self.config.grain.max(1);
        let mut job = || {
            out.par_iter_mut()
                .with_min_len(grain)
                .enumerate()
                .for_each_init(&init, |scratch, (i, x)| f(scratch, i, x));
        };
        match &self.pool {
            Some(pool) => pool.install(job),
            None => job(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_config_never_splits() {
        let vz = Vectorize::new(VectorizeConfig::sequential()).unwrap();
        assert_eq!(vz.workers(), 1);
        assert!(!vz.is_parallel(1 << 20));
    }

    #[test]
    fn small_work_stays_on_caller() {
        let vz = Vectorize::new(VectorizeConfig {
            threads: Some(2),
            ..Default::default()
        })
        .unwrap();
        assert!(!vz.is_parallel(10));
        assert!(vz.is_parallel(10_000));
    }

    #[test]
    fn dedicated_pool_fills_every_element() {
        let vz = Vectorize::new(VectorizeConfig {
            min_parallel: 0,
            grain: 7,
            threads: Some(3),
        })
        .unwrap();
        let mut out = vec![0usize; 1000];
        vz.run(&mut out, |i, x| *x = i * 2);
        assert!(out.iter().enumerate().all(|(i, &x)| x == i * 2));
    }

    #[test]
    fn unparsable_env_keeps_default() {
        std::env::set_var(GRAIN_ENV, "lots");
        let config = VectorizeConfig::from_env();
        std::env::remove_var(GRAIN_ENV);
        assert_eq!(config.grain, VectorizeConfig::default().grain);
    }

    #[test]
    fn global_pool_fills_every_element() {
        let vz = Vectorize::new(VectorizeConfig {
            min_parallel: 0,
            grain: 5,
            threads: None,
        })
        .unwrap();
        let mut out = vec![0usize; 1000];
        vz.run(&mut out, |i, x| *x = i + 1);
        assert!(out.iter().enumerate().all(|(i, &x)| x == i + 1));
    }

    #[test]
    fn scratch_is_per_worker() {
        let vz = Vectorize::new(VectorizeConfig {
            min_parallel: 0,
            grain: 16,
            threads: Some(2),
        })
        .unwrap();
        let mut out = vec![0usize; 500];
        vz.run_init(
            &mut out,
            || vec![0usize; 2],
            |scratch, i, x| {
                scratch[0] = i;
                *x = scratch[0] + 1;
            },
        );
        assert_eq!(out[499], 500);
        assert_eq!(out.iter().sum::<usize>(), (1..=500).sum());
    }
}
