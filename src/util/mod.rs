//! Shared utility helpers.

pub(crate) mod bytes;
pub mod error;

pub use error::{HistMatchError, HistMatchResult};
