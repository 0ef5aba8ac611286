//! Error types for frame adaptation.
//!
//! Every error is raised at the point of detection and returned unmodified.
//! Nothing in the crate retries or substitutes a default value.

use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Frame channel count the reader cannot adapt (only 3 is accepted).
    #[error("unsupported frame format: {channels} channels, only 3 (BGR) is supported")]
    UnsupportedFormat { channels: u32 },

    /// Destination buffer kind other than a byte cursor.
    #[error("unsupported destination: {kind}, only byte buffers are supported")]
    UnsupportedDestination { kind: &'static str },

    /// Pixel reader query that is not implemented.
    #[error("{operation} is not supported")]
    NotSupported { operation: &'static str },

    /// Conversion direction that is not implemented.
    #[error("operation not supported: {operation}")]
    OperationNotSupported { operation: &'static str },

    #[error("failed to allocate {requested} bytes for frame snapshot")]
    ResourceExhausted {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("pixel reader has been closed")]
    ReaderClosed,

    #[error("row stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        stride: usize,
        min_stride: usize,
        width: u32,
    },

    #[error("frame buffer holds {len} bytes, {required} required")]
    BufferTooSmall { len: usize, required: usize },

    #[error("region ({x}, {y}, {width}x{height}) exceeds frame bounds {frame_width}x{frame_height}")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("destination has room for {remaining} bytes, {required} required")]
    DestinationTooSmall { remaining: usize, required: usize },

    #[error("position {position} is past buffer limit {limit}")]
    PositionOutOfBounds { position: usize, limit: usize },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Returns `true` for the "this request is not supported" family of errors.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. }
                | Self::UnsupportedDestination { .. }
                | Self::NotSupported { .. }
                | Self::OperationNotSupported { .. }
        )
    }

    pub(crate) fn not_supported(operation: &'static str) -> Self {
        Self::NotSupported { operation }
    }
}
