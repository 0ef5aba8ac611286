//! Native video frames: packed pixel bytes plus layout metadata

pub mod buffer;
pub mod snapshot;

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use buffer::{ByteOrder, FrameBuffer};
pub use snapshot::Snapshot;

/// Frame produced by an external video source
#[derive(Debug, Clone)]
pub struct Frame {
    /// Packed, row-major pixel data
    pub buffer: FrameBuffer,

    /// Frame metadata
    pub meta: Arc<FrameMetadata>,

    /// Capture timestamp, not consulted when reading pixels
    pub timestamp: Instant,
}

/// Frame metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMetadata {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    /// Interleaved channels per pixel
    pub channels: u32,
    /// Bytes between the starts of consecutive rows
    pub stride: usize,
    pub order: ChannelOrder,
}

/// Component order of a 3-channel frame.
///
/// Readers never reorder components; this only tells the host side how to
/// interpret what they emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Bgr,
    Rgb,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        stride: usize,
        buffer: FrameBuffer,
    ) -> Self {
        Self {
            buffer,
            meta: Arc::new(FrameMetadata {
                sequence: 0,
                width,
                height,
                channels,
                stride,
                order: ChannelOrder::default(),
            }),
            timestamp: Instant::now(),
        }
    }

    /// Frame whose rows carry no padding.
    pub fn packed(width: u32, height: u32, channels: u32, buffer: FrameBuffer) -> Self {
        let stride = width as usize * channels as usize;
        Self::new(width, height, channels, stride, buffer)
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        Arc::make_mut(&mut self.meta).sequence = sequence;
        self
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        Arc::make_mut(&mut self.meta).order = order;
        self
    }

    pub fn width(&self) -> u32 {
        self.meta.width
    }

    pub fn height(&self) -> u32 {
        self.meta.height
    }
}

impl FrameMetadata {
    /// Smallest stride that fits one row of pixels.
    pub fn min_stride(&self) -> usize {
        (self.width as usize).saturating_mul(self.channels as usize)
    }

    /// Bytes a buffer must hold to cover every pixel; the last row may be unpadded.
    pub fn required_len(&self) -> usize {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        self.stride
            .saturating_mul(self.height as usize - 1)
            .saturating_add(self.min_stride())
    }
}
