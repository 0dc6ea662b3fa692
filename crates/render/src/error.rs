//! Error types for board rendering.

use thiserror::Error;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while rendering or saving a board image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The board has nothing to draw.
    #[error("Cannot render board: {0}")]
    Board(#[from] aperture_pack_core::Error),

    /// Invalid render options.
    #[error("Invalid render options: {0}")]
    InvalidOptions(String),

    /// The bundled caption font could not be parsed.
    #[error("Font error: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// Encoding or writing the image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Creating the output directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
