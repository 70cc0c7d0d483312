//! Row-by-row candidate evaluation.

use crate::histogram::{Binning, Histogram};
use crate::image::Image;
use crate::trace::trace_event;

/// Everything a row sweep needs; placements are pre-validated so that
/// `max_x + width <= source.width()` and `max_y + height <= source.height()`.
pub(crate) struct ScanPlan<'a> {
    pub(crate) source: &'a Image,
    pub(crate) query: &'a Histogram,
    pub(crate) binning: &'a Binning,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) max_x: usize,
    pub(crate) max_y: usize,
    pub(crate) stride_x: usize,
    pub(crate) stride_y: usize,
    pub(crate) incremental: bool,
}

/// Best placement within a scan, or within one row of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Best {
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) distance: u64,
}

impl ScanPlan<'_> {
    /// Candidate row origins in scan order.
    pub(crate) fn rows(&self) -> impl Iterator<Item = usize> {
        (0..=self.max_y).step_by(self.stride_y)
    }

    /// Returns the first lowest-distance placement of row `y`, stopping at
    /// the first exact match.
    pub(crate) fn best_in_row(&self, y: usize) -> Best {
        let mut best = Best {
            x: 0,
            y,
            distance: u64::MAX,
        };
        let mut window: Option<Histogram> = None;
        let mut prev_x = 0;
        for x in (0..=self.max_x).step_by(self.stride_x) {
            let hist = match window.take() {
                Some(mut hist) if self.incremental && x - prev_x < self.width => {
                    for col in prev_x..x {
                        hist.remove_column(self.source, col, y, self.height, self.binning);
                        hist.add_column(self.source, col + self.width, y, self.height, self.binning);
                    }
                    hist
                }
                _ => Histogram::of_window(self.source, x, y, self.width, self.height, self.binning),
            };
            let distance = self.query.distance_unchecked(&hist);
            if distance < best.distance {
                best = Best { x, y, distance };
                if distance == 0 {
                    break;
                }
            }
            if self.incremental {
                window = Some(hist);
            }
            prev_x = x;
        }
        best
    }
}

/// Folds row results in scan order: strict less-than keeps the earliest of
/// equal distances, and an exact match ends the fold.
pub(crate) fn fold_rows(rows: impl IntoIterator<Item = Best>) -> Option<Best> {
    let mut best: Option<Best> = None;
    for row in rows {
        if best.map_or(true, |b| row.distance < b.distance) {
            trace_event!(debug, "new_best", distance = row.distance, x = row.x, y = row.y);
            best = Some(row);
            if row.distance == 0 {
                break;
            }
        }
    }
    best
}

/// Single-threaded scan.
pub(crate) fn scan_seq(plan: &ScanPlan<'_>) -> Option<Best> {
    fold_rows(plan.rows().map(|y| plan.best_in_row(y)))
}
