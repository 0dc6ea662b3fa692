//! # Aperture Pack Core
//!
//! Grid placement, signal-to-noise model and randomized search for square
//! apertures on a fixed square board.
//!
//! ## Core Components
//!
//! - **Board**: deterministic raster placement followed by a two-pass SN computation
//! - **SN model**: aperture-size term plus a local-density correction
//! - **Sampler**: randomized trials over (size, separation), sequential or on rayon
//! - **Selector**: best-by-SN and project-qualifying reductions with stable tie-breaks
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for records and summaries

pub mod aperture;
pub mod board;
pub mod config;
pub mod error;
pub mod result;
pub mod sampler;
pub mod selector;
pub mod sn;

// Re-exports
pub use aperture::Aperture;
pub use board::{Board, BoardView, BOARD_SIDE};
pub use config::{ProgressCallback, RunMode, SearchConfig, SearchProgress, AUTO_SWEEP};
pub use error::{Error, Result};
pub use result::{CandidateSummary, ResultRecord, SearchOutcome, SearchSummary, SnHistogram};
pub use sampler::{draw_parameters, run_trial, trial_rng, Sampler};
pub use selector::{best_by_sn, project_candidate, Selection};
pub use sn::{PROJECT_MIN_SN_DB, WAVELENGTH};
