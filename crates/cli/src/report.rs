//! Console tables for search results.

use aperture_pack_core::{Board, CandidateSummary, SnHistogram};
use std::fmt::Write;

const COLUMN: usize = 35;
const CELL: usize = 18;

/// Section header underlined with dashes.
pub fn header(title: &str) -> String {
    format!("\n{}\n{}", title, "-".repeat(title.chars().count()))
}

/// Key/value block for one candidate.
pub fn candidate_block(candidate: &CandidateSummary) -> String {
    candidate_lines(candidate).join("\n")
}

fn candidate_lines(candidate: &CandidateSummary) -> Vec<String> {
    vec![
        format!("sn = {}", candidate.sn),
        format!("number of objects = {}", candidate.object_count),
        format!("object size = {}", candidate.object_size),
        format!("separation distance = {}", candidate.separation_distance),
        format!("quality = {}", candidate.quality),
    ]
}

/// Two candidates side by side.
pub fn comparison(left: &CandidateSummary, right: &CandidateSummary) -> String {
    let mut out = format!("{:<COLUMN$} {:<COLUMN$}", "Candidate1", "Candidate2");
    for (l, r) in candidate_lines(left).iter().zip(candidate_lines(right).iter()) {
        // Writing into a String cannot fail.
        let _ = write!(out, "\n{:<COLUMN$} {:<COLUMN$}", l, r);
    }
    out
}

/// One row per aperture: bounding box, center, size and SN.
pub fn aperture_table(board: &Board) -> String {
    let mut out = format!(
        "{:<CELL$} {:<CELL$} {:<CELL$} {:<CELL$} {:<CELL$} {:<CELL$}",
        "bbox_pos_row [m]", "bbox_pos_col [m]", "pos_row [m]", "pos_col [m]", "lin_dim [m]", "sn [dB]"
    );
    for a in board.apertures() {
        let _ = write!(
            out,
            "\n{:<CELL$.4} {:<CELL$.4} {:<CELL$.4} {:<CELL$.4} {:<CELL$.4} {:<CELL$.3}",
            a.bbox_row,
            a.bbox_col,
            a.pos_row(),
            a.pos_col(),
            a.size,
            a.sn
        );
    }
    out
}

/// Histogram under its header. Bins are floored, so values inside one bin are
/// counted together.
pub fn histogram_section(hist: &SnHistogram) -> String {
    format!(
        "{}\n{}",
        header("Distribution of min SN values (floored to 1 dB bins, not exact values)"),
        histogram(hist)
    )
}

/// `min_sn` distribution, one line per 1 dB bin.
pub fn histogram(hist: &SnHistogram) -> String {
    hist.iter()
        .map(|(bin, count)| format!("[{:>4}, {:>4}) dB  {}", bin, bin + 1, count))
        .collect::<Vec<_>>()
        .join("\n")
}
