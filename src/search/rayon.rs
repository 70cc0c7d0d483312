//! Row-parallel scan (feature-gated).
//!
//! Every candidate row is evaluated on the rayon pool; the per-row winners
//! are then folded in row order, so the result is the same placement and
//! distance the sequential scan returns.

use crate::search::scan::{fold_rows, Best, ScanPlan};
use rayon::prelude::*;

pub(crate) fn scan_par(plan: &ScanPlan<'_>) -> Option<Best> {
    let rows: Vec<usize> = plan.rows().collect();
    let row_results: Vec<Best> = rows
        .into_par_iter()
        .map(|y| plan.best_in_row(y))
        .collect();
    fold_rows(row_results)
}
