//! Error taxonomy shared by every filter and I/O entry point.

use thiserror::Error;

/// Errors raised by the equalization filters and the image I/O boundary.
///
/// All variants are input or programming errors. Nothing here is transient,
/// so callers should surface them rather than retry.
#[derive(Debug, Error)]
pub enum EqualizeError {
    /// Input is not a 3-channel 8-bit image (wrong dimensionality, channel
    /// count, buffer length, or undecodable bytes).
    #[error("invalid image format: {0}")]
    InvalidImageFormat(String),

    /// Image has zero area.
    #[error("empty image ({height}x{width})")]
    EmptyImage { height: usize, width: usize },

    /// Out-of-range filter or encoder parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EqualizeError>;
