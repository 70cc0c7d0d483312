//! histmatch locates a reference bitmap inside a larger image (typically a
//! screen capture) by comparing coarse per-channel color histograms.
//!
//! The crate bundles an uncompressed 24-bit BMP codec, an owned RGB image
//! model, histogram computation over rectangles, and a strided sliding-window
//! scanner, with optional parallelism via the `rayon` feature.

pub mod bmp;
pub mod geometry;
pub mod histogram;
pub mod image;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use crate::geometry::{Point, Rect};
pub use crate::histogram::{Binning, Histogram};
pub use crate::image::{Image, Rgb};
pub use crate::search::{locate, MatchResult, ScanConfig, Scanner};
pub use crate::util::{HistMatchError, HistMatchResult};
