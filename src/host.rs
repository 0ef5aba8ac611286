//! Host-side images materialized from a pixel reader

use std::path::Path;

use bytes::Bytes;
use image::RgbaImage;
use tracing::debug;

use crate::reader::PixelFormat;
use crate::{Error, Result};

/// Image built by pulling every pixel through a reader.
///
/// `data` holds the bytes exactly as the reader emitted them, 4 per pixel,
/// rows packed back to back. `layout` says how to interpret them.
#[derive(Debug, Clone)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub layout: PixelFormat,
    pub data: Bytes,
}

impl FrameImage {
    /// Copy into an [`RgbaImage`], moving red and blue for BGRA layouts.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let mut rgba = self.data.to_vec();
        match self.layout {
            PixelFormat::Rgba8 => {}
            PixelFormat::Bgra8 => {
                for px in rgba.chunks_exact_mut(4) {
                    px.swap(0, 2);
                }
            }
        }

        let len = rgba.len();
        RgbaImage::from_raw(self.width, self.height, rgba).ok_or_else(|| Error::BufferTooSmall {
            len,
            required: (self.width as usize)
                .saturating_mul(self.height as usize)
                .saturating_mul(4),
        })
    }

    /// Encode to `path`, format chosen from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_rgba_image()?.save(path)?;
        debug!(width = self.width, height = self.height, path = %path.display(), "image saved");
        Ok(())
    }
}
