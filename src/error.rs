//! Error type for the few operations that can reject their input.
//!
//! The numerical core never errors: malformed samples become missing values and
//! degenerate geometry falls back to a default visual. Only input loading, color
//! parsing and surface output surface a `UsageError`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
    /// Color string is not `rgb(r, g, b)`, `rgba(r, g, b, a)` or `#rrggbb`.
    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// Month outside `0..=11` (months are zero-indexed).
    #[error("invalid month {0}, expected 0..=11")]
    InvalidMonth(u32),

    /// A pixel buffer does not match its declared dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Nothing to draw on (zero-sized surface).
    #[error("rendering surface has zero size ({width}x{height})")]
    NoSurface { width: u32, height: u32 },
}
