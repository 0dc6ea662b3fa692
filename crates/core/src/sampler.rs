//! Randomized search over aperture size and separation distance.

use crate::board::Board;
use crate::config::{ProgressCallback, SearchConfig, SearchProgress};
use crate::result::{ResultRecord, SearchOutcome};
use crate::selector::Selection;
use crate::sn::WAVELENGTH;
use crate::Result;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Smallest aperture size that can be drawn, m.
pub const MIN_OBJECT_SIZE: f64 = 1e-6;

/// Decimal places kept on drawn parameters.
pub const PARAMETER_DECIMALS: i32 = 8;

fn round_parameter(value: f64) -> f64 {
    let scale = 10f64.powi(PARAMETER_DECIMALS);
    (value * scale).round() / scale
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Independent RNG for one trial, keyed by the batch seed and trial index.
pub fn trial_rng(seed: u64, trial: usize) -> StdRng {
    StdRng::seed_from_u64(splitmix64(seed.wrapping_add(splitmix64(trial as u64))))
}

/// Draws `(object_size, separation_distance)`.
///
/// Size is uniform on `[MIN_OBJECT_SIZE, λ/2]`, separation on `[λ/10, λ]`;
/// both are rounded to [`PARAMETER_DECIMALS`] places.
pub fn draw_parameters<R: Rng>(rng: &mut R) -> (f64, f64) {
    let object_size = round_parameter(rng.gen_range(MIN_OBJECT_SIZE..=WAVELENGTH / 2.0));
    let separation_distance = round_parameter(rng.gen_range(WAVELENGTH / 10.0..=WAVELENGTH));
    (object_size, separation_distance)
}

/// Runs one trial: draw, build, package.
pub fn run_trial(seed: u64, trial: usize) -> Result<ResultRecord> {
    let mut rng = trial_rng(seed, trial);
    let (object_size, separation_distance) = draw_parameters(&mut rng);
    let board = Board::new(object_size, separation_distance)?;
    ResultRecord::new(trial, board)
}

/// Batch runner.
///
/// Every trial draws from its own RNG substream, and the selection breaks
/// ties on trial index, so the sequential and parallel paths return the same
/// outcome for the same seed.
pub struct Sampler {
    config: SearchConfig,
}

impl Sampler {
    /// Creates a sampler.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Configured seed, or a fresh one from the thread RNG.
    pub fn resolve_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(|| thread_rng().gen())
    }

    /// Runs the batch and reduces it to its two candidates.
    pub fn run(&self) -> Result<SearchOutcome> {
        self.run_inner(None)
    }

    /// Runs the batch, invoking `callback` every progress stride.
    pub fn run_with_progress(&self, callback: ProgressCallback) -> Result<SearchOutcome> {
        self.run_inner(Some(&callback))
    }

    /// Runs the batch and keeps every record, in trial order.
    ///
    /// Returns the seed used alongside the records.
    pub fn collect(&self) -> Result<(u64, Vec<ResultRecord>)> {
        self.config.validate()?;
        let seed = self.resolve_seed();
        let trials = 0..self.config.trials;

        let records = if self.config.parallel {
            trials
                .into_par_iter()
                .map(|trial| run_trial(seed, trial))
                .collect::<Result<Vec<_>>>()?
        } else {
            trials
                .map(|trial| run_trial(seed, trial))
                .collect::<Result<Vec<_>>>()?
        };

        Ok((seed, records))
    }

    fn run_inner(&self, callback: Option<&ProgressCallback>) -> Result<SearchOutcome> {
        self.config.validate()?;

        let start = Instant::now();
        let seed = self.resolve_seed();
        let total = self.config.trials;
        let threshold = self.config.min_sn_threshold;
        let stride = self.config.effective_stride();
        let completed = AtomicUsize::new(0);

        log::debug!(
            "Starting batch: trials={} seed={} parallel={}",
            total,
            seed,
            self.config.parallel
        );

        let report = || {
            if let Some(cb) = callback {
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % stride == 0 || done == total {
                    cb(SearchProgress {
                        completed: done,
                        total,
                        elapsed: start.elapsed(),
                    });
                }
            }
        };

        let selection = if self.config.parallel {
            (0..total)
                .into_par_iter()
                .try_fold(
                    || Selection::new(threshold),
                    |mut selection, trial| {
                        let record = run_trial(seed, trial)?;
                        report();
                        selection.observe(record);
                        Ok(selection)
                    },
                )
                .try_reduce(|| Selection::new(threshold), |a, b| Ok(a.merge(b)))?
        } else {
            let mut selection = Selection::new(threshold);
            for trial in 0..total {
                let record = run_trial(seed, trial)?;
                report();
                selection.observe(record);
            }
            selection
        };

        let outcome = selection.finish(seed, start.elapsed())?;

        match outcome.project_candidate() {
            Ok(candidate) => log::info!(
                "Batch of {} trials done in {:?}: best min_sn={:.3} dB, project candidate trial {} (quality {:.6})",
                total,
                outcome.elapsed,
                outcome.best_by_sn.min_sn,
                candidate.trial,
                candidate.quality
            ),
            Err(_) => log::warn!(
                "Batch of {} trials done in {:?}: no trial reached {} dB",
                total,
                outcome.elapsed,
                threshold
            ),
        }

        Ok(outcome)
    }
}
