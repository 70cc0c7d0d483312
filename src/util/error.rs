//! Error types for histmatch.

use thiserror::Error;

/// Result alias for histmatch operations.
pub type HistMatchResult<T> = std::result::Result<T, HistMatchError>;

/// Errors that can occur when decoding images or running the scanner.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HistMatchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Image dimensions are zero or overflow the addressable size.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel buffer does not match the declared dimensions.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLength { expected: usize, got: usize },
    /// The four corners handed to a rectangle do not form an axis-aligned box.
    #[error("inconsistent rectangle corners: {reason}")]
    InconsistentRect { reason: &'static str },
    /// A rectangle reaches outside the image it is evaluated against.
    #[error(
        "rect at ({x}, {y}) size {width}x{height} exceeds image bounds {img_width}x{img_height}"
    )]
    RectOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        img_width: usize,
        img_height: usize,
    },
    /// Two histograms built with different binnings were compared.
    #[error("histogram bin count mismatch: {left} vs {right}")]
    BinCountMismatch { left: usize, right: usize },
    /// The BMP byte stream is malformed or truncated.
    #[error("malformed bitmap: {reason}")]
    MalformedBitmap { reason: &'static str },
    /// The BMP declares more bytes than the stream holds.
    #[error("truncated bitmap: needed {needed} bytes, got {got}")]
    TruncatedBitmap { needed: usize, got: usize },
    /// The BMP is well formed but uses a variant this codec does not handle.
    #[error("unsupported bitmap: {reason}")]
    UnsupportedBitmap { reason: String },
    /// Reading or writing a file failed.
    #[error("i/o error on {path}: {reason}")]
    Io { path: String, reason: String },
    /// Conversion through the `image` crate failed.
    #[error("image i/o error: {reason}")]
    ImageIo { reason: String },
}

impl HistMatchError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
