//! Sliding-window search for the region whose histogram best matches a
//! target image.
//!
//! Candidates are visited in raster order (rows outer, columns inner) on the
//! grid given by the strides. The first candidate with the lowest distance
//! wins, and the scan stops at the first exact bucket match.

use crate::geometry::Rect;
use crate::histogram::{Binning, Histogram};
use crate::image::Image;
use crate::trace::{trace_event, trace_span};
use crate::util::{HistMatchError, HistMatchResult};

#[cfg(feature = "rayon")]
pub(crate) mod rayon;
pub(crate) mod scan;

/// Scanner configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Column step between candidate positions.
    pub horizontal_stride: usize,
    /// Row step between candidate rows.
    pub vertical_stride: usize,
    /// Histogram bin edges for both the query and the candidates.
    pub binning: Binning,
    /// Update the window histogram column by column along each row instead
    /// of recounting every candidate.
    pub incremental: bool,
    /// Evaluate candidate rows on the rayon pool (requires the `rayon`
    /// feature; ignored otherwise).
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            horizontal_stride: 1,
            vertical_stride: 1,
            binning: Binning::default(),
            incremental: false,
            parallel: false,
        }
    }
}

/// Best placement found by a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchResult {
    /// Candidate rectangle in source coordinates, sized like the target.
    pub rect: Rect,
    /// Histogram distance to the target; 0 is an exact bucket match.
    pub distance: u64,
}

/// Locates one target image in any number of source images.
///
/// The target histogram is computed once when the scanner is built.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    target: &'a Image,
    query: Histogram,
    cfg: ScanConfig,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner with the default configuration.
    pub fn new(target: &'a Image) -> Self {
        let cfg = ScanConfig::default();
        let query = Histogram::of_image(target, &cfg.binning);
        Self { target, query, cfg }
    }

    /// Replaces the configuration, recomputing the query histogram.
    pub fn with_config(mut self, cfg: ScanConfig) -> Self {
        if cfg.binning != self.cfg.binning {
            self.query = Histogram::of_image(self.target, &cfg.binning);
        }
        self.cfg = cfg;
        self
    }

    /// Returns the active scan configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.cfg
    }

    /// Histogram of the whole target.
    pub fn query(&self) -> &Histogram {
        &self.query
    }

    /// Scans `source` and returns the best placement.
    ///
    /// Returns `Ok(None)` when the target is wider or taller than the source.
    pub fn locate(&self, source: &Image) -> HistMatchResult<Option<MatchResult>> {
        let cfg = &self.cfg;
        if cfg.horizontal_stride == 0 || cfg.vertical_stride == 0 {
            return Err(HistMatchError::InvalidInput("strides must be at least 1"));
        }

        let tpl_width = self.target.width();
        let tpl_height = self.target.height();
        if source.width() < tpl_width || source.height() < tpl_height {
            trace_event!("no_candidates", src_width = source.width(), tpl_width = tpl_width);
            return Ok(None);
        }

        let _span = trace_span!(
            "locate",
            src_width = source.width(),
            src_height = source.height(),
            tpl_width = tpl_width,
            tpl_height = tpl_height,
            parallel = cfg.parallel
        )
        .entered();

        let plan = scan::ScanPlan {
            source,
            query: &self.query,
            binning: &cfg.binning,
            width: tpl_width,
            height: tpl_height,
            max_x: source.width() - tpl_width,
            max_y: source.height() - tpl_height,
            stride_x: cfg.horizontal_stride,
            stride_y: cfg.vertical_stride,
            incremental: cfg.incremental,
        };

        #[cfg(feature = "rayon")]
        let best = if cfg.parallel {
            rayon::scan_par(&plan)
        } else {
            scan::scan_seq(&plan)
        };
        #[cfg(not(feature = "rayon"))]
        let best = scan::scan_seq(&plan);

        let Some(best) = best else {
            return Ok(None);
        };
        let rect = Rect::from_placement(best.x, best.y, tpl_width, tpl_height)?;
        trace_event!("best_match", distance = best.distance, x = best.x, y = best.y);
        Ok(Some(MatchResult {
            rect,
            distance: best.distance,
        }))
    }
}

/// Locates `target` in `source` with default binning.
///
/// Returns `Ok(None)` when the target does not fit inside the source.
pub fn locate(
    source: &Image,
    target: &Image,
    horizontal_stride: usize,
    vertical_stride: usize,
) -> HistMatchResult<Option<MatchResult>> {
    Scanner::new(target)
        .with_config(ScanConfig {
            horizontal_stride,
            vertical_stride,
            ..ScanConfig::default()
        })
        .locate(source)
}
