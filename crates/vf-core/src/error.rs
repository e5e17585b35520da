//! Error types for frame composition

use thiserror::Error;

use crate::frame::Margin;

/// Errors surfaced while composing a frame.
///
/// Optional configuration never errors; absent pieces are simply omitted
/// from the output. Only malformed mandatory geometry and collaborator
/// failures are reported.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Frame size must be exactly two positive, finite numbers
    #[error("frame size must be two positive values, got {width} x {height}")]
    InvalidSize { width: f64, height: f64 },

    /// Margin fields must all be non-negative and finite
    #[error("margin fields must be non-negative: {0:?}")]
    InvalidMargin(Margin),

    /// An external collaborator failed while rendering its layer
    #[error("collaborator error: {0}")]
    Collaborator(#[from] anyhow::Error),
}
