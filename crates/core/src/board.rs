//! Square board with a raster of apertures.

use crate::aperture::Aperture;
use crate::sn::{self, WAVELENGTH};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Side length of the board, m.
pub const BOARD_SIDE: f64 = 0.5;

/// Outcome of one cursor step along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// Room for an aperture plus a trailing gap; cursor moves to the next pitch.
    Pitch(f64),
    /// Room for one last aperture flush against the edge.
    Flush,
    /// No room left.
    Stop,
}

fn step(pos: f64, side: f64, size: f64, separation: f64) -> Step {
    if pos + size + separation <= side {
        Step::Pitch(pos + size + separation)
    } else if pos + size <= side {
        Step::Flush
    } else {
        Step::Stop
    }
}

/// Column offsets of one row.
fn column_positions(side: f64, size: f64, separation: f64) -> Vec<f64> {
    let mut positions = Vec::new();
    let mut next = 0.0;

    loop {
        match step(next, side, size, separation) {
            Step::Pitch(advanced) => {
                positions.push(next);
                next = advanced;
            }
            Step::Flush => {
                positions.push(next);
                break;
            }
            Step::Stop => break,
        }
    }

    positions
}

/// Lays out apertures in row-major order.
///
/// Each row is emitted before the row cursor is tested, so the last emitted
/// row may overhang the bottom edge; the boundary filter removes it.
fn place(side: f64, size: f64, separation: f64) -> Vec<Aperture> {
    let columns = column_positions(side, size, separation);
    let mut buffer = Vec::new();
    let mut row = 0.0;

    loop {
        buffer.extend(columns.iter().map(|&col| Aperture::new(row, col, size)));

        match step(row, side, size, separation) {
            Step::Pitch(advanced) => row = advanced,
            Step::Flush | Step::Stop => break,
        }
    }

    buffer.retain(|a| a.bbox_row + size <= side);
    buffer
}

/// Second pass: SN of every aperture against the finished layout.
fn compute_sn(apertures: &[Aperture]) -> Vec<Aperture> {
    apertures
        .iter()
        .map(|a| {
            let center = a.center();
            let neighbors = apertures
                .iter()
                .filter(|b| sn::within_neighbor_radius(center, b.center()))
                .count();
            a.with_sn(sn::sn_db(a.size, neighbors))
        })
        .collect()
}

/// A square board populated with a regular raster of equal apertures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Board {
    side: f64,
    object_size: f64,
    separation_distance: f64,
    apertures: Vec<Aperture>,
}

impl Board {
    /// Builds a board of side [`BOARD_SIDE`].
    pub fn new(object_size: f64, separation_distance: f64) -> Result<Self> {
        Self::with_side(BOARD_SIDE, object_size, separation_distance)
    }

    /// Builds a board of an arbitrary side length.
    ///
    /// Placement runs first; SN is computed once the full layout is known.
    pub fn with_side(side: f64, object_size: f64, separation_distance: f64) -> Result<Self> {
        if !side.is_finite() || side <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "board side must be positive, got {side}"
            )));
        }
        if !object_size.is_finite() || object_size <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "object size must be positive, got {object_size}"
            )));
        }
        if !separation_distance.is_finite() || separation_distance < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "separation distance must be non-negative, got {separation_distance}"
            )));
        }

        let placed = place(side, object_size, separation_distance);
        let apertures = compute_sn(&placed);

        Ok(Self {
            side,
            object_size,
            separation_distance,
            apertures,
        })
    }

    /// Board side length.
    pub fn side(&self) -> f64 {
        self.side
    }

    /// Aperture size the board was built with.
    pub fn object_size(&self) -> f64 {
        self.object_size
    }

    /// Separation distance the board was built with.
    pub fn separation_distance(&self) -> f64 {
        self.separation_distance
    }

    /// Apertures in placement order.
    pub fn apertures(&self) -> &[Aperture] {
        &self.apertures
    }

    /// Number of apertures.
    pub fn len(&self) -> usize {
        self.apertures.len()
    }

    /// Returns true if nothing could be placed.
    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty()
    }

    /// Lowest per-aperture SN.
    pub fn min_sn(&self) -> Result<f64> {
        self.apertures
            .iter()
            .map(|a| a.sn)
            .reduce(f64::min)
            .ok_or(Error::EmptyBoard)
    }

    /// Highest per-aperture SN.
    pub fn max_sn(&self) -> Result<f64> {
        self.apertures
            .iter()
            .map(|a| a.sn)
            .reduce(f64::max)
            .ok_or(Error::EmptyBoard)
    }

    /// Read-only geometry for renderers.
    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            side: self.side,
            object_size: self.object_size,
            separation_distance: self.separation_distance,
            wavelength: WAVELENGTH,
            apertures: &self.apertures,
        }
    }
}

/// Borrowed geometric view of a board.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    /// Board side length, m.
    pub side: f64,
    /// Aperture size, m.
    pub object_size: f64,
    /// Separation distance, m.
    pub separation_distance: f64,
    /// Carrier wavelength, m.
    pub wavelength: f64,
    /// Apertures in placement order.
    pub apertures: &'a [Aperture],
}

impl BoardView<'_> {
    /// Aperture whose center is closest to the board center.
    ///
    /// Ties resolve to the earliest aperture in placement order.
    pub fn central_aperture(&self) -> Option<&Aperture> {
        let mid = self.side / 2.0;
        self.apertures.iter().min_by(|a, b| {
            let da = (a.pos_row() - mid).powi(2) + (a.pos_col() - mid).powi(2);
            let db = (b.pos_row() - mid).powi(2) + (b.pos_col() - mid).powi(2);
            da.total_cmp(&db)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_column_positions_flush_last() {
        // pitch 0.11: 0, .11, .22, .33 with gaps, then .44 flush (0.49 <= 0.5)
        let cols = column_positions(0.5, 0.05, 0.06);
        assert_eq!(cols.len(), 5);
        assert_relative_eq!(cols[4], 0.44, epsilon = 1e-12);
    }

    #[test]
    fn test_column_positions_too_large() {
        assert!(column_positions(0.5, 0.6, 0.0).is_empty());
    }

    #[test]
    fn test_overhanging_row_is_dropped() {
        // Pitch 0.1 walks the row cursor to the bottom edge; that row must not survive.
        let placed = place(0.5, 0.05, 0.05);
        assert_eq!(placed.len(), 25);
        assert!(placed.iter().all(|a| a.max_row() <= 0.5));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            Board::new(0.0, 0.1),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            Board::new(0.1, -0.1),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            Board::new(f64::NAN, 0.1),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            Board::with_side(0.0, 0.1, 0.1),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_board_rejects_sn_reduction() {
        let board = Board::new(0.6, 0.1).unwrap();
        assert!(board.is_empty());
        assert_eq!(board.min_sn(), Err(Error::EmptyBoard));
        assert_eq!(board.max_sn(), Err(Error::EmptyBoard));
    }

    #[test]
    fn test_single_aperture_sn() {
        // 0.3 + 0.3 > 0.5 in both axes: exactly one aperture.
        let board = Board::new(0.3, 0.3).unwrap();
        assert_eq!(board.len(), 1);
        let expected = 20.0 * (WAVELENGTH / (2.0 * 0.3)).log10();
        assert_relative_eq!(board.min_sn().unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(board.max_sn().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_separation_tiles_board() {
        let board = Board::new(0.1, 0.0).unwrap();
        assert_eq!(board.len(), 25);
    }

    #[test]
    fn test_central_aperture() {
        let board = Board::new(0.05, 0.05).unwrap();
        let view = board.view();
        let center = view.central_aperture().unwrap();
        // 5x5 grid: middle aperture sits at (0.2, 0.2)
        assert_relative_eq!(center.bbox_row, 0.2, epsilon = 1e-9);
        assert_relative_eq!(center.bbox_col, 0.2, epsilon = 1e-9);
        assert_relative_eq!(view.wavelength, WAVELENGTH);
    }
}
