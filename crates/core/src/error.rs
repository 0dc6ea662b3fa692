//! Error types for aperture-pack.

use thiserror::Error;

/// Result type alias for aperture-pack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building boards or searching for candidates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// SN reduction requested on a board that holds no apertures.
    #[error("Board holds no apertures; SN is undefined")]
    EmptyBoard,

    /// No trial in the batch met the minimum SN requirement.
    #[error("No candidate out of {trials} trials meets the project requirement of {threshold} dB")]
    NoQualifyingCandidate {
        /// Minimum SN the candidate had to reach.
        threshold: f64,
        /// Number of trials that were examined.
        trials: usize,
    },

    /// Board parameters that cannot be laid out.
    #[error("Invalid board parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
