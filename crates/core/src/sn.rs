//! Signal-to-noise model.
//!
//! Each aperture gets a decibel figure made of two terms:
//!
//! ```text
//! base       = 20 * log10(λ / (2 * size))
//! correction = -20 * log10(sqrt(neighbors))
//! ```
//!
//! where `neighbors` counts every aperture on the board (itself included)
//! whose center is within `λ / 2` of the aperture's center.

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Carrier frequency, Hz.
pub const CARRIER_FREQUENCY_HZ: f64 = 1.3e9;

/// Carrier wavelength, m.
pub const WAVELENGTH: f64 = SPEED_OF_LIGHT / CARRIER_FREQUENCY_HZ;

/// Radius within which two apertures count as neighbors, m.
pub const NEIGHBOR_RADIUS: f64 = WAVELENGTH / 2.0;

/// Minimum SN a board must reach to satisfy the project requirement, dB.
pub const PROJECT_MIN_SN_DB: f64 = 14.0;

/// Aperture-size term of the SN figure.
pub fn base_sn(size: f64) -> f64 {
    20.0 * (WAVELENGTH / (2.0 * size)).log10()
}

/// Local-density term of the SN figure.
///
/// `neighbors` includes the aperture itself, so it is at least 1 for any
/// aperture that exists and the logarithm stays finite.
pub fn density_correction(neighbors: usize) -> f64 {
    -20.0 * (neighbors as f64).sqrt().log10()
}

/// SN of an aperture of `size` with `neighbors` apertures in range.
pub fn sn_db(size: f64, neighbors: usize) -> f64 {
    base_sn(size) + density_correction(neighbors)
}

/// Returns true if two centers are within the neighbor radius (inclusive).
#[inline]
pub fn within_neighbor_radius(a: (f64, f64), b: (f64, f64)) -> bool {
    let dr = a.0 - b.0;
    let dc = a.1 - b.1;
    (dr * dr + dc * dc).sqrt() <= NEIGHBOR_RADIUS
}
