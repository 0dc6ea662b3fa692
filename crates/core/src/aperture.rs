//! Square apertures placed on a board.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A square aperture positioned on a board.
///
/// Coordinates are in meters, measured from the board's top-left corner
/// as (row, column). The center is derived from the bounding box and never
/// stored independently.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aperture {
    /// Row of the bounding box origin.
    pub bbox_row: f64,
    /// Column of the bounding box origin.
    pub bbox_col: f64,
    /// Linear dimension (side length).
    pub size: f64,
    /// Signal-to-noise figure in dB; 0.0 until the board computes it.
    pub sn: f64,
}

impl Aperture {
    /// Creates an aperture with an uncomputed SN.
    pub fn new(bbox_row: f64, bbox_col: f64, size: f64) -> Self {
        Self {
            bbox_row,
            bbox_col,
            size,
            sn: 0.0,
        }
    }

    /// Row of the center.
    pub fn pos_row(&self) -> f64 {
        self.bbox_row + self.size / 2.0
    }

    /// Column of the center.
    pub fn pos_col(&self) -> f64 {
        self.bbox_col + self.size / 2.0
    }

    /// Center as (row, column).
    pub fn center(&self) -> (f64, f64) {
        (self.pos_row(), self.pos_col())
    }

    /// Bottom edge row.
    pub fn max_row(&self) -> f64 {
        self.bbox_row + self.size
    }

    /// Right edge column.
    pub fn max_col(&self) -> f64 {
        self.bbox_col + self.size
    }

    /// Returns true if the open interiors of the two bounding boxes intersect.
    ///
    /// Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.bbox_row < other.max_row()
            && other.bbox_row < self.max_row()
            && self.bbox_col < other.max_col()
            && other.bbox_col < self.max_col()
    }

    pub(crate) fn with_sn(mut self, sn: f64) -> Self {
        self.sn = sn;
        self
    }
}
