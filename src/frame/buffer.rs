//! Byte view over a frame's pixel data with a read cursor and byte order

use bytes::BytesMut;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Byte order tag carried alongside the raw bytes.
///
/// Pixel data is addressed byte by byte, so the order never changes how a
/// frame is read. It is preserved so a snapshot reports the same order as
/// the buffer it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

/// Mutable frame storage owned by the frame producer.
///
/// The limit is the length of the underlying bytes; `position` is the
/// producer's read cursor and always lies in `0..=limit`.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    pub(crate) bytes: BytesMut,
    pub(crate) position: usize,
    pub(crate) order: ByteOrder,
}

impl FrameBuffer {
    pub fn new(bytes: BytesMut) -> Self {
        Self {
            bytes,
            position: 0,
            order: ByteOrder::native(),
        }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(BytesMut::from(data))
    }

    pub fn with_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(&self) -> usize {
        self.bytes.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit() {
            return Err(Error::PositionOutOfBounds {
                position,
                limit: self.limit(),
            });
        }
        self.position = position;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.limit() - self.position
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Drops the pixel data, as a producer does when it recycles a frame.
    pub fn release(&mut self) {
        self.bytes = BytesMut::new();
        self.position = 0;
    }
}
