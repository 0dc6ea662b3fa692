//! Trial records and search outcomes.

use crate::board::Board;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a single trial.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResultRecord {
    /// Canonical 0-based index of the trial inside its batch.
    pub trial: usize,
    /// The board built for this trial.
    pub board: Board,
    /// Lowest aperture SN on the board, dB.
    pub min_sn: f64,
    /// Drawn aperture size, m.
    pub object_size: f64,
    /// Drawn separation distance, m.
    pub separation_distance: f64,
    /// `object_size * object_count`.
    pub quality: f64,
}

impl ResultRecord {
    /// Packages a finished board.
    ///
    /// Fails with [`Error::EmptyBoard`] if the board holds no apertures.
    pub fn new(trial: usize, board: Board) -> Result<Self> {
        let min_sn = board.min_sn()?;
        let object_size = board.object_size();
        let separation_distance = board.separation_distance();
        let quality = object_size * board.len() as f64;

        Ok(Self {
            trial,
            board,
            min_sn,
            object_size,
            separation_distance,
            quality,
        })
    }

    /// Number of apertures on the board.
    pub fn object_count(&self) -> usize {
        self.board.len()
    }

    /// Returns true if the record meets `threshold`.
    pub fn qualifies(&self, threshold: f64) -> bool {
        self.min_sn >= threshold
    }
}

/// Flat view of a record for reports.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CandidateSummary {
    /// Trial index.
    pub trial: usize,
    /// Board minimum SN, dB.
    pub sn: f64,
    /// Number of apertures.
    pub object_count: usize,
    /// Aperture size, m.
    pub object_size: f64,
    /// Separation distance, m.
    pub separation_distance: f64,
    /// Quality score.
    pub quality: f64,
}

impl From<&ResultRecord> for CandidateSummary {
    fn from(record: &ResultRecord) -> Self {
        Self {
            trial: record.trial,
            sn: record.min_sn,
            object_count: record.object_count(),
            object_size: record.object_size,
            separation_distance: record.separation_distance,
            quality: record.quality,
        }
    }
}

/// Distribution of board `min_sn` values in 1 dB bins.
///
/// Bin `k` holds values in `[k, k + 1)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnHistogram {
    bins: BTreeMap<i64, usize>,
}

impl SnHistogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one value.
    pub fn add(&mut self, sn: f64) {
        *self.bins.entry(sn.floor() as i64).or_insert(0) += 1;
    }

    /// Adds all counts of `other`.
    pub fn merge(&mut self, other: SnHistogram) {
        for (bin, count) in other.bins {
            *self.bins.entry(bin).or_insert(0) += count;
        }
    }

    /// Non-empty bins in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.bins.iter().map(|(bin, count)| (*bin, *count))
    }

    /// Total number of values counted.
    pub fn total(&self) -> usize {
        self.bins.values().sum()
    }

    /// Returns true if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Outcome of one search batch.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Trials run.
    pub trials: usize,
    /// Base seed the batch was drawn from.
    pub seed: u64,
    /// Threshold used for the project candidate, dB.
    pub threshold: f64,
    /// Record with the highest `min_sn`.
    pub best_by_sn: ResultRecord,
    /// Distribution of `min_sn` over the batch.
    pub histogram: SnHistogram,
    /// Wall time of the batch.
    pub elapsed: Duration,
    pub(crate) qualifying: Option<ResultRecord>,
}

impl SearchOutcome {
    /// Highest-quality record meeting the threshold.
    pub fn project_candidate(&self) -> Result<&ResultRecord> {
        self.qualifying
            .as_ref()
            .ok_or(Error::NoQualifyingCandidate {
                threshold: self.threshold,
                trials: self.trials,
            })
    }

    /// Flat summary for reports.
    pub fn summary(&self) -> SearchSummary {
        SearchSummary {
            trials: self.trials,
            seed: self.seed,
            threshold: self.threshold,
            elapsed_ms: self.elapsed.as_millis() as u64,
            best_by_sn: CandidateSummary::from(&self.best_by_sn),
            project_candidate: self.qualifying.as_ref().map(CandidateSummary::from),
            histogram: self.histogram.iter().collect(),
        }
    }
}

/// Summary statistics for a search batch.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchSummary {
    /// Trials run.
    pub trials: usize,
    /// Base seed.
    pub seed: u64,
    /// Threshold, dB.
    pub threshold: f64,
    /// Wall time in milliseconds.
    pub elapsed_ms: u64,
    /// Best-by-SN candidate.
    pub best_by_sn: CandidateSummary,
    /// Project candidate, if any trial qualified.
    pub project_candidate: Option<CandidateSummary>,
    /// `(bin, count)` pairs of the SN histogram.
    pub histogram: Vec<(i64, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_record_quality() {
        let board = Board::new(0.05, 0.05).unwrap();
        let record = ResultRecord::new(3, board).unwrap();

        assert_eq!(record.trial, 3);
        assert_eq!(record.object_count(), 25);
        assert_relative_eq!(record.quality, 0.05 * 25.0, epsilon = 1e-12);
        assert_eq!(record.min_sn, record.board.min_sn().unwrap());
    }

    #[test]
    fn test_record_rejects_empty_board() {
        let board = Board::new(0.7, 0.1).unwrap();
        assert_eq!(ResultRecord::new(0, board), Err(Error::EmptyBoard));
    }

    #[test]
    fn test_histogram_bins() {
        let mut hist = SnHistogram::new();
        hist.add(14.2);
        hist.add(14.9);
        hist.add(-0.5);

        let mut other = SnHistogram::new();
        other.add(14.0);

        hist.merge(other);

        let bins: Vec<_> = hist.iter().collect();
        assert_eq!(bins, vec![(-1, 1), (14, 3)]);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_summary_from_record() {
        let board = Board::new(0.3, 0.3).unwrap();
        let record = ResultRecord::new(0, board).unwrap();
        let summary = CandidateSummary::from(&record);

        assert_eq!(summary.object_count, 1);
        assert_eq!(summary.sn, record.min_sn);
        assert_eq!(summary.quality, 0.3);
    }
}
