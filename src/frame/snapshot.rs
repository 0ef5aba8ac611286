//! Independent copies of frame buffers

use bytes::Bytes;
use tracing::trace;

use super::buffer::{ByteOrder, FrameBuffer};
use crate::{Error, Result};

/// Immutable, exclusively owned copy of a [`FrameBuffer`].
///
/// Holds the whole buffer up to its limit, not just the unread remainder,
/// along with the source's position and byte order at copy time.
#[derive(Debug, Default)]
pub struct Snapshot {
    bytes: Bytes,
    position: usize,
    order: ByteOrder,
}

impl FrameBuffer {
    /// Copy the entire buffer into freshly allocated storage.
    ///
    /// Takes `&self`, so the source cursor is unchanged afterwards. Fails with
    /// [`Error::ResourceExhausted`] if the copy cannot be allocated.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let limit = self.limit();

        let mut copy = Vec::new();
        copy.try_reserve_exact(limit)
            .map_err(|source| Error::ResourceExhausted {
                requested: limit,
                source,
            })?;
        copy.extend_from_slice(&self.bytes);

        trace!(limit, position = self.position, "buffer snapshot taken");

        Ok(Snapshot {
            bytes: Bytes::from(copy),
            position: self.position,
            order: self.order,
        })
    }
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Empty the snapshot and free its storage.
    pub fn clear(&mut self) {
        self.bytes = Bytes::new();
        self.position = 0;
    }
}
