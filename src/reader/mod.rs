//! On-demand pixel access for host imaging code.
//!
//! A [`PixelReader`] answers region reads without converting the whole frame
//! up front. The host asks for a rectangle and supplies the destination; the
//! reader computes source offsets from row stride and coordinates as it goes.
//!
//! # Current region contract
//!
//! - Source columns are addressed with their absolute frame coordinate, so a
//!   region at `x = k` reads bytes starting at `3 * k` within each row.
//! - The destination scanline stride is accepted but not applied: rows are
//!   appended back to back with no padding skipped between them.
//!
//! Both points are kept for compatibility with existing hosts.
// TODO: add a region read that honours the destination scanline stride and
// offers origin-relative addressing, then migrate the converter onto it.

pub mod frame_reader;

use bytes::BufMut;

pub use frame_reader::FramePixelReader;

use crate::Result;

/// Host-side pixel layouts a reader could describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel, blue first, alpha last
    Bgra8,
    /// 4 bytes per pixel, red first, alpha last
    Rgba8,
}

/// Rectangle in frame coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole `width x height` frame.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `true` if the region lies inside a `width x height` frame.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

/// Destination a region read writes into.
///
/// Only [`PixelDestination::Bytes`] is accepted by readers in this crate; the
/// other kinds are rejected with `UnsupportedDestination`.
pub enum PixelDestination<'a> {
    /// Append-style byte cursor, 4 bytes written per pixel
    Bytes(&'a mut dyn BufMut),
    /// One packed word per pixel
    Words(&'a mut [u32]),
    /// Palette indices
    Indexed {
        indices: &'a mut [u8],
        palette: &'a [u32],
    },
}

impl PixelDestination<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            PixelDestination::Bytes(_) => "byte buffer",
            PixelDestination::Words(_) => "word buffer",
            PixelDestination::Indexed { .. } => "indexed buffer",
        }
    }
}

/// Pixel source consumed by host imaging code.
///
/// Reads take `&self` and releasing a reader takes `&mut self`, so a release
/// can never overlap an in-flight read.
pub trait PixelReader {
    /// Describe the layout of pixels this reader produces.
    fn pixel_format(&self) -> Result<PixelFormat>;

    /// Fetch one pixel packed as ARGB.
    fn argb(&self, x: u32, y: u32) -> Result<u32>;

    /// Fetch one pixel as a color value.
    fn color(&self, x: u32, y: u32) -> Result<image::Rgba<u8>>;

    /// Read `region` row by row into `dst`.
    ///
    /// See the module docs for how `region` and `scanline_stride` are applied.
    fn read_pixels(
        &self,
        region: Region,
        dst: PixelDestination<'_>,
        scanline_stride: usize,
    ) -> Result<()>;

    /// Read `region` into a byte slice starting at `offset`.
    fn read_pixels_into_slice(
        &self,
        region: Region,
        dst: &mut [u8],
        offset: usize,
        scanline_stride: usize,
    ) -> Result<()>;

    /// Read `region` into a word slice starting at `offset`.
    fn read_pixels_into_words(
        &self,
        region: Region,
        dst: &mut [u32],
        offset: usize,
        scanline_stride: usize,
    ) -> Result<()>;
}
