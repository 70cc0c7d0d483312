//! Per-channel color histograms over rectangular regions.
//!
//! Each channel value is bucketed independently by a [`Binning`]; the default
//! binning splits `0..=255` into four bins at 64, 128 and 192. Histograms are
//! compared with the L1 distance over all bins of all three channels.

use crate::geometry::Rect;
use crate::image::{Image, Rgb};
use crate::util::{HistMatchError, HistMatchResult};
use std::fmt;

/// Default bin edges: `[0, 64)`, `[64, 128)`, `[128, 192)`, `[192, 255]`.
pub const DEFAULT_THRESHOLDS: [u8; 3] = [64, 128, 192];

/// Bin edges shared by every histogram that is compared against another.
///
/// A value `v` falls in bin `i` where `i` is the number of thresholds `<= v`,
/// so `n` thresholds produce `n + 1` bins and the last bin is open-ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binning {
    thresholds: Vec<u8>,
    lut: [u8; 256],
}

impl Binning {
    /// Creates a binning from strictly ascending thresholds.
    pub fn new(thresholds: Vec<u8>) -> HistMatchResult<Self> {
        if thresholds.is_empty() {
            return Err(HistMatchError::InvalidInput(
                "binning needs at least one threshold",
            ));
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(HistMatchError::InvalidInput(
                "bin thresholds must be strictly ascending",
            ));
        }
        if thresholds.len() > usize::from(u8::MAX) {
            return Err(HistMatchError::InvalidInput("at most 255 bin thresholds"));
        }
        let mut lut = [0u8; 256];
        for (value, bin) in lut.iter_mut().enumerate() {
            *bin = thresholds.iter().filter(|&&t| usize::from(t) <= value).count() as u8;
        }
        Ok(Self { thresholds, lut })
    }

    /// Returns the bin edges in ascending order.
    pub fn thresholds(&self) -> &[u8] {
        &self.thresholds
    }

    /// Returns the number of bins per channel.
    pub fn bin_count(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Bin index of a channel value.
    #[inline]
    pub fn bin_of(&self, value: u8) -> usize {
        usize::from(self.lut[usize::from(value)])
    }
}

impl Default for Binning {
    fn default() -> Self {
        let thresholds = DEFAULT_THRESHOLDS.to_vec();
        let mut lut = [0u8; 256];
        for (value, bin) in lut.iter_mut().enumerate() {
            *bin = (value / 64) as u8;
        }
        Self { thresholds, lut }
    }
}

/// Pixel counts per bin for the red, green and blue channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    red: Vec<u64>,
    green: Vec<u64>,
    blue: Vec<u64>,
}

impl Histogram {
    /// Creates a histogram with every bin at zero.
    pub fn empty(bin_count: usize) -> Self {
        Self {
            red: vec![0; bin_count],
            green: vec![0; bin_count],
            blue: vec![0; bin_count],
        }
    }

    /// Counts the pixels of `image` covered by `rect`.
    ///
    /// The rect covers columns `x..x + width` and rows `y..y + height` of the
    /// image; any part outside the image is an error.
    pub fn compute(image: &Image, rect: &Rect, binning: &Binning) -> HistMatchResult<Self> {
        let (x, y, width, height) = image.region(rect)?;
        Ok(Self::of_window(image, x, y, width, height, binning))
    }

    /// Counts every pixel of `image`.
    pub fn of_image(image: &Image, binning: &Binning) -> Self {
        Self::of_window(image, 0, 0, image.width(), image.height(), binning)
    }

    /// Window variant of [`Histogram::compute`] for placements already checked
    /// against the image bounds.
    pub(crate) fn of_window(
        image: &Image,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        binning: &Binning,
    ) -> Self {
        let mut hist = Self::empty(binning.bin_count());
        let stride = image.width();
        let pixels = image.pixels();
        for r in y..y + height {
            let start = r * stride + x;
            for px in &pixels[start..start + width] {
                hist.add_pixel(*px, binning);
            }
        }
        hist
    }

    #[inline]
    fn add_pixel(&mut self, px: Rgb, binning: &Binning) {
        self.red[binning.bin_of(px.r)] += 1;
        self.green[binning.bin_of(px.g)] += 1;
        self.blue[binning.bin_of(px.b)] += 1;
    }

    #[inline]
    fn remove_pixel(&mut self, px: Rgb, binning: &Binning) {
        self.red[binning.bin_of(px.r)] -= 1;
        self.green[binning.bin_of(px.g)] -= 1;
        self.blue[binning.bin_of(px.b)] -= 1;
    }

    /// Adds column `x`, rows `y..y + height`, to the counts.
    pub(crate) fn add_column(
        &mut self,
        image: &Image,
        x: usize,
        y: usize,
        height: usize,
        binning: &Binning,
    ) {
        let stride = image.width();
        for px in image.pixels()[y * stride + x..].iter().step_by(stride).take(height) {
            self.add_pixel(*px, binning);
        }
    }

    /// Removes column `x`, rows `y..y + height`, from the counts. The column
    /// must have been added before.
    pub(crate) fn remove_column(
        &mut self,
        image: &Image,
        x: usize,
        y: usize,
        height: usize,
        binning: &Binning,
    ) {
        let stride = image.width();
        for px in image.pixels()[y * stride + x..].iter().step_by(stride).take(height) {
            self.remove_pixel(*px, binning);
        }
    }

    /// Returns the number of bins per channel.
    pub fn bin_count(&self) -> usize {
        self.red.len()
    }

    /// Returns the red channel counts.
    pub fn red(&self) -> &[u64] {
        &self.red
    }

    /// Returns the green channel counts.
    pub fn green(&self) -> &[u64] {
        &self.green
    }

    /// Returns the blue channel counts.
    pub fn blue(&self) -> &[u64] {
        &self.blue
    }

    /// Number of pixels counted.
    pub fn total(&self) -> u64 {
        self.red.iter().sum()
    }

    /// Adds `other` bin by bin.
    pub fn merge(&mut self, other: &Histogram) -> HistMatchResult<()> {
        self.check_bins(other)?;
        for (dst, src) in [
            (&mut self.red, &other.red),
            (&mut self.green, &other.green),
            (&mut self.blue, &other.blue),
        ] {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += s;
            }
        }
        Ok(())
    }

    /// L1 distance over all bins of all channels.
    ///
    /// Zero exactly when every bin count matches; symmetric and satisfies the
    /// triangle inequality.
    pub fn distance(&self, other: &Histogram) -> HistMatchResult<u64> {
        self.check_bins(other)?;
        Ok(self.distance_unchecked(other))
    }

    pub(crate) fn distance_unchecked(&self, other: &Histogram) -> u64 {
        fn l1(a: &[u64], b: &[u64]) -> u64 {
            a.iter().zip(b).map(|(x, y)| x.abs_diff(*y)).sum()
        }
        l1(&self.red, &other.red) + l1(&self.green, &other.green) + l1(&self.blue, &other.blue)
    }

    fn check_bins(&self, other: &Histogram) -> HistMatchResult<()> {
        if self.bin_count() != other.bin_count() {
            return Err(HistMatchError::BinCountMismatch {
                left: self.bin_count(),
                right: other.bin_count(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Histogram {
    /// Per bin: red, green, blue counts, comma separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.bin_count() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{},{},{}", self.red[i], self.green[i], self.blue[i])?;
        }
        Ok(())
    }
}
