//! Candidate selection over a batch of trial records.
//!
//! Two reductions are provided:
//!
//! - **best by SN**: the record with the highest `min_sn`;
//! - **project candidate**: among records with `min_sn >= threshold`, the one
//!   with the highest `quality`.
//!
//! Both break ties in favour of the smallest trial index, so the winner does
//! not depend on iteration or arrival order. [`Selection`] is the streaming
//! form used by the sampler; its `merge` is associative and commutative.

use crate::result::{ResultRecord, SearchOutcome, SnHistogram};
use crate::{Error, Result};
use std::cmp::Ordering;
use std::time::Duration;

fn by_sn(record: &ResultRecord) -> f64 {
    record.min_sn
}

fn by_quality(record: &ResultRecord) -> f64 {
    record.quality
}

/// Returns true if `a` is preferred over `b` under `key`.
fn prefers(a: &ResultRecord, b: &ResultRecord, key: fn(&ResultRecord) -> f64) -> bool {
    match key(a).total_cmp(&key(b)) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => a.trial < b.trial,
    }
}

fn keep(
    a: Option<ResultRecord>,
    b: Option<ResultRecord>,
    key: fn(&ResultRecord) -> f64,
) -> Option<ResultRecord> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if prefers(&b, &a, key) { b } else { a }),
        (a, b) => a.or(b),
    }
}

/// Record with the highest `min_sn`; `None` for an empty batch.
pub fn best_by_sn(records: &[ResultRecord]) -> Option<&ResultRecord> {
    records
        .iter()
        .reduce(|a, b| if prefers(b, a, by_sn) { b } else { a })
}

/// Highest-quality record with `min_sn >= threshold`.
pub fn project_candidate(records: &[ResultRecord], threshold: f64) -> Result<&ResultRecord> {
    records
        .iter()
        .filter(|r| r.qualifies(threshold))
        .reduce(|a, b| if prefers(b, a, by_quality) { b } else { a })
        .ok_or(Error::NoQualifyingCandidate {
            threshold,
            trials: records.len(),
        })
}

/// Running reduction over trial records.
///
/// Keeps only the current winners and an SN histogram, so a batch of any
/// size runs in constant memory.
#[derive(Debug, Clone)]
pub struct Selection {
    threshold: f64,
    observed: usize,
    best_by_sn: Option<ResultRecord>,
    qualifying: Option<ResultRecord>,
    histogram: SnHistogram,
}

impl Selection {
    /// Creates an empty selection for `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            observed: 0,
            best_by_sn: None,
            qualifying: None,
            histogram: SnHistogram::new(),
        }
    }

    /// Folds one record in.
    pub fn observe(&mut self, record: ResultRecord) {
        self.observed += 1;
        self.histogram.add(record.min_sn);

        let take_sn = self
            .best_by_sn
            .as_ref()
            .map_or(true, |best| prefers(&record, best, by_sn));
        let take_quality = record.qualifies(self.threshold)
            && self
                .qualifying
                .as_ref()
                .map_or(true, |best| prefers(&record, best, by_quality));

        match (take_sn, take_quality) {
            (true, true) => {
                self.qualifying = Some(record.clone());
                self.best_by_sn = Some(record);
            }
            (true, false) => self.best_by_sn = Some(record),
            (false, true) => self.qualifying = Some(record),
            (false, false) => {}
        }
    }

    /// Combines two partial selections over disjoint trials.
    pub fn merge(mut self, other: Selection) -> Selection {
        debug_assert_eq!(self.threshold.to_bits(), other.threshold.to_bits());

        self.observed += other.observed;
        self.best_by_sn = keep(self.best_by_sn, other.best_by_sn, by_sn);
        self.qualifying = keep(self.qualifying, other.qualifying, by_quality);
        self.histogram.merge(other.histogram);
        self
    }

    /// Number of records folded in.
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Current best-by-SN record.
    pub fn best_by_sn(&self) -> Option<&ResultRecord> {
        self.best_by_sn.as_ref()
    }

    /// Current project candidate.
    pub fn project_candidate(&self) -> Result<&ResultRecord> {
        self.qualifying
            .as_ref()
            .ok_or(Error::NoQualifyingCandidate {
                threshold: self.threshold,
                trials: self.observed,
            })
    }

    /// Freezes the selection into a batch outcome.
    pub fn finish(self, seed: u64, elapsed: Duration) -> Result<SearchOutcome> {
        let best_by_sn = self
            .best_by_sn
            .ok_or_else(|| Error::ConfigError("no trials were run".into()))?;

        Ok(SearchOutcome {
            trials: self.observed,
            seed,
            threshold: self.threshold,
            best_by_sn,
            histogram: self.histogram,
            elapsed,
            qualifying: self.qualifying,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn record(trial: usize, min_sn: f64, quality: f64) -> ResultRecord {
        let board = Board::new(0.3, 0.3).unwrap();
        let mut r = ResultRecord::new(trial, board).unwrap();
        r.min_sn = min_sn;
        r.quality = quality;
        r
    }

    #[test]
    fn test_best_by_sn() {
        let records = vec![
            record(0, 10.0, 1.0),
            record(1, 18.0, 0.5),
            record(2, 15.0, 2.0),
        ];
        assert_eq!(best_by_sn(&records).unwrap().trial, 1);
        assert!(best_by_sn(&[]).is_none());
    }

    #[test]
    fn test_best_by_sn_tie_prefers_earliest() {
        let records = vec![
            record(4, 12.0, 1.0),
            record(2, 12.0, 1.0),
            record(7, 12.0, 1.0),
        ];
        assert_eq!(best_by_sn(&records).unwrap().trial, 2);
    }

    #[test]
    fn test_project_candidate_filters_then_maximizes() {
        let records = vec![
            record(0, 13.9, 9.0),
            record(1, 14.0, 1.0),
            record(2, 20.0, 0.5),
        ];
        let candidate = project_candidate(&records, 14.0).unwrap();
        assert_eq!(candidate.trial, 1);
    }

    #[test]
    fn test_project_candidate_tie_prefers_earliest() {
        let records = vec![record(3, 15.0, 2.0), record(1, 16.0, 2.0)];
        assert_eq!(project_candidate(&records, 14.0).unwrap().trial, 1);
    }

    #[test]
    fn test_project_candidate_none_qualify() {
        let records = vec![record(0, 5.0, 1.0), record(1, 13.99, 1.0)];
        assert_eq!(
            project_candidate(&records, 14.0),
            Err(Error::NoQualifyingCandidate {
                threshold: 14.0,
                trials: 2
            })
        );
    }

    #[test]
    fn test_streaming_matches_slice() {
        let records = vec![
            record(0, 14.5, 3.0),
            record(1, 19.0, 1.0),
            record(2, 19.0, 0.2),
            record(3, 16.0, 3.0),
            record(4, 2.0, 8.0),
        ];

        let mut selection = Selection::new(14.0);
        for r in records.iter().cloned() {
            selection.observe(r);
        }

        assert_eq!(selection.observed(), 5);
        assert_eq!(
            selection.best_by_sn().unwrap().trial,
            best_by_sn(&records).unwrap().trial
        );
        assert_eq!(
            selection.project_candidate().unwrap().trial,
            project_candidate(&records, 14.0).unwrap().trial
        );
    }

    #[test]
    fn test_merge_is_order_independent() {
        let records = vec![
            record(0, 14.5, 3.0),
            record(1, 19.0, 1.0),
            record(2, 19.0, 0.2),
            record(3, 16.0, 3.0),
        ];

        let mut left = Selection::new(14.0);
        let mut right = Selection::new(14.0);
        for r in records.iter().cloned() {
            if r.trial % 2 == 0 {
                left.observe(r);
            } else {
                right.observe(r);
            }
        }

        let ab = left.clone().merge(right.clone());
        let ba = right.merge(left);

        assert_eq!(ab.best_by_sn().unwrap().trial, 1);
        assert_eq!(ba.best_by_sn().unwrap().trial, 1);
        assert_eq!(ab.project_candidate().unwrap().trial, 0);
        assert_eq!(ba.project_candidate().unwrap().trial, 0);
        assert_eq!(ab.observed(), 4);
    }

    #[test]
    fn test_finish_empty_selection() {
        let selection = Selection::new(14.0);
        assert!(matches!(
            selection.finish(0, Duration::ZERO),
            Err(Error::ConfigError(_))
        ));
    }
}
