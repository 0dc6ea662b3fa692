//! Search configuration and progress reporting.

use crate::sn::PROJECT_MIN_SN_DB;
use crate::{Error, Result};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Batch sizes visited by [`RunMode::Auto`].
pub const AUTO_SWEEP: [usize; 5] = [100, 1_000, 10_000, 100_000, 1_000_000];

/// How many batches to run and how large they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunMode {
    /// One batch of the given number of trials.
    Single(usize),
    /// One batch per entry of [`AUTO_SWEEP`].
    Auto,
}

impl RunMode {
    /// Batch sizes in execution order.
    pub fn batches(&self) -> Vec<usize> {
        match self {
            RunMode::Single(trials) => vec![*trials],
            RunMode::Auto => AUTO_SWEEP.to_vec(),
        }
    }
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Single(1)
    }
}

/// Configuration for one search batch.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Number of trials.
    pub trials: usize,

    /// Base seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,

    /// Run trials on the rayon pool.
    pub parallel: bool,

    /// Minimum `min_sn` for the project-qualifying candidate, dB.
    pub min_sn_threshold: f64,

    /// Trials between progress callbacks (0 = 1% of the batch).
    pub progress_stride: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trials: 1,
            seed: None,
            parallel: true,
            min_sn_threshold: PROJECT_MIN_SN_DB,
            progress_stride: 0,
        }
    }
}

impl SearchConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of trials.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the minimum SN threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.min_sn_threshold = threshold;
        self
    }

    /// Sets the progress stride.
    pub fn with_progress_stride(mut self, stride: usize) -> Self {
        self.progress_stride = stride;
        self
    }

    /// Progress stride actually used for this batch.
    pub fn effective_stride(&self) -> usize {
        if self.progress_stride > 0 {
            self.progress_stride
        } else {
            (self.trials / 100).max(1)
        }
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::ConfigError("trial count must be positive".into()));
        }
        if !self.min_sn_threshold.is_finite() {
            return Err(Error::ConfigError(format!(
                "SN threshold must be finite, got {}",
                self.min_sn_threshold
            )));
        }
        Ok(())
    }
}

/// Progress callback for long-running searches.
pub type ProgressCallback = Box<dyn Fn(SearchProgress) + Send + Sync>;

/// Progress information during a search.
#[derive(Debug, Clone, Copy)]
pub struct SearchProgress {
    /// Trials finished so far.
    pub completed: usize,
    /// Trials in the batch.
    pub total: usize,
    /// Time since the batch started.
    pub elapsed: Duration,
}
