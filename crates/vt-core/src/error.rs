//! Error types for programmer-error conditions.
//!
//! Stream errors (malformed escape sequences, out-of-range SGR/mode
//! parameters) are never surfaced here — they are silently clamped or
//! ignored, matching physical hardware (see the parser's and screen's own
//! error-recovery policies). `ScreenError` exists for the narrower class of
//! misuse that is a defect in the embedder, not in the byte stream: building
//! or resizing a screen to a degenerate size.

use std::fmt;

/// A programmer error: a construction or resize request the screen cannot
/// satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenError {
    /// `columns` or `lines` was zero.
    ZeroDimension,
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenError::ZeroDimension => {
                write!(f, "screen dimensions must be nonzero")
            }
        }
    }
}

impl std::error::Error for ScreenError {}
