//! # Aperture Pack Render
//!
//! PNG rendering of a finished board: the board outline, every aperture's
//! bounding box, a parameter caption and, optionally, a circle of radius λ/2
//! showing the neighborhood used by the SN model.

pub mod error;
pub mod render;

// Re-exports
pub use error::{RenderError, Result};
pub use render::{render_board, save_board, RenderOptions};
