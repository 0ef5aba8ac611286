//! Stride-aware pixel reader over a snapshot of a 3-channel frame

use std::time::Instant;

use tracing::{debug, instrument, trace};

use super::{PixelDestination, PixelFormat, PixelReader, Region};
use crate::frame::{Frame, Snapshot};
use crate::{Error, Result};

/// Channels per source pixel
const SOURCE_CHANNELS: usize = 3;

/// Bytes emitted per destination pixel
const OUTPUT_BYTES: usize = 4;

/// Alpha byte appended to every pixel
const OPAQUE: u8 = 255;

/// Pixel reader backed by its own copy of a frame.
///
/// Each pixel is emitted as its three source bytes, in source order,
/// followed by a fully opaque alpha byte. The frame can be mutated or
/// released as soon as the reader is constructed.
#[derive(Debug)]
pub struct FramePixelReader {
    snapshot: Snapshot,
    width: u32,
    height: u32,
    stride: usize,
    closed: bool,
}

impl FramePixelReader {
    /// Validate `frame` and take a snapshot of its buffer.
    #[instrument(skip(frame), fields(sequence = frame.meta.sequence))]
    pub fn new(frame: &Frame) -> Result<Self> {
        let meta = &frame.meta;

        if meta.channels as usize != SOURCE_CHANNELS {
            return Err(Error::UnsupportedFormat {
                channels: meta.channels,
            });
        }

        let min_stride = meta.min_stride();
        if meta.stride < min_stride {
            return Err(Error::InvalidStride {
                stride: meta.stride,
                min_stride,
                width: meta.width,
            });
        }

        let required = meta.required_len();
        if frame.buffer.limit() < required {
            return Err(Error::BufferTooSmall {
                len: frame.buffer.limit(),
                required,
            });
        }

        let snapshot = frame.buffer.snapshot()?;
        debug!(
            width = meta.width,
            height = meta.height,
            stride = meta.stride,
            bytes = snapshot.len(),
            "frame pixel reader created"
        );

        Ok(Self {
            snapshot,
            width: meta.width,
            height: meta.height,
            stride: meta.stride,
            closed: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the snapshot. Reads afterwards fail with [`Error::ReaderClosed`].
    pub fn close(&mut self) {
        if !self.closed {
            self.snapshot.clear();
            self.closed = true;
            trace!("frame pixel reader closed");
        }
    }

    fn source(&self) -> Result<&[u8]> {
        if self.closed {
            return Err(Error::ReaderClosed);
        }
        Ok(self.snapshot.as_slice())
    }
}

impl Drop for FramePixelReader {
    fn drop(&mut self) {
        self.close();
    }
}

impl PixelReader for FramePixelReader {
    fn pixel_format(&self) -> Result<PixelFormat> {
        Err(Error::not_supported("pixel_format"))
    }

    fn argb(&self, _x: u32, _y: u32) -> Result<u32> {
        Err(Error::not_supported("argb"))
    }

    fn color(&self, _x: u32, _y: u32) -> Result<image::Rgba<u8>> {
        Err(Error::not_supported("color"))
    }

    fn read_pixels(
        &self,
        region: Region,
        dst: PixelDestination<'_>,
        scanline_stride: usize,
    ) -> Result<()> {
        let dst = match dst {
            PixelDestination::Bytes(dst) => dst,
            other => {
                return Err(Error::UnsupportedDestination { kind: other.kind() });
            }
        };

        let src = self.source()?;

        if !region.fits_within(self.width, self.height) {
            return Err(Error::RegionOutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                frame_width: self.width,
                frame_height: self.height,
            });
        }

        let required = region.pixel_count() * OUTPUT_BYTES;
        if dst.remaining_mut() < required {
            return Err(Error::DestinationTooSmall {
                remaining: dst.remaining_mut(),
                required,
            });
        }

        trace!(?region, scanline_stride, "reading region, rows packed back to back");
        let read_start = Instant::now();

        for y in region.y..region.y + region.height {
            let row = self.stride * y as usize;
            for x in region.x..region.x + region.width {
                let base = row + SOURCE_CHANNELS * x as usize;
                dst.put_slice(&src[base..base + SOURCE_CHANNELS]);
                dst.put_u8(OPAQUE);
            }
        }

        metrics::histogram!("region_read_us").record(read_start.elapsed().as_micros() as f64);
        metrics::counter!("pixels_emitted").increment(region.pixel_count() as u64);

        Ok(())
    }

    fn read_pixels_into_slice(
        &self,
        _region: Region,
        _dst: &mut [u8],
        _offset: usize,
        _scanline_stride: usize,
    ) -> Result<()> {
        Err(Error::not_supported("read_pixels_into_slice"))
    }

    fn read_pixels_into_words(
        &self,
        _region: Region,
        _dst: &mut [u32],
        _offset: usize,
        _scanline_stride: usize,
    ) -> Result<()> {
        Err(Error::not_supported("read_pixels_into_words"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameBuffer;

    fn frame(width: u32, height: u32, stride: usize, data: &[u8]) -> Frame {
        Frame::new(width, height, 3, stride, FrameBuffer::from_slice(data))
    }

    fn read(reader: &FramePixelReader, region: Region) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        reader.read_pixels(region, PixelDestination::Bytes(&mut out), region.width as usize * 4)?;
        Ok(out)
    }

    #[test]
    fn appends_opaque_alpha_without_swapping() {
        let reader = FramePixelReader::new(&frame(2, 1, 6, &[1, 2, 3, 4, 5, 6])).unwrap();
        let out = read(&reader, Region::full(2, 1)).unwrap();
        assert_eq!(out, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn skips_row_padding() {
        // 2x2 frame, 2 padding bytes per row
        let data = [1, 2, 3, 4, 5, 6, 0xee, 0xee, 7, 8, 9, 10, 11, 12];
        let reader = FramePixelReader::new(&frame(2, 2, 8, &data)).unwrap();
        let out = read(&reader, Region::full(2, 2)).unwrap();
        assert_eq!(
            out,
            vec![1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255]
        );
    }

    #[test]
    fn offset_region_uses_absolute_columns() {
        let data: Vec<u8> = (0..12).collect();
        let reader = FramePixelReader::new(&frame(4, 1, 12, &data)).unwrap();
        let out = read(&reader, Region::new(1, 0, 2, 1)).unwrap();
        assert_eq!(out, vec![3, 4, 5, 255, 6, 7, 8, 255]);
    }

    #[test]
    fn scanline_stride_does_not_pad_rows() {
        let data: Vec<u8> = (0..12).collect();
        let reader = FramePixelReader::new(&frame(2, 2, 6, &data)).unwrap();

        let mut out = Vec::new();
        reader
            .read_pixels(Region::full(2, 2), PixelDestination::Bytes(&mut out), 64)
            .unwrap();
        assert_eq!(out.len(), 16);
        assert_eq!(&out[8..12], &[6, 7, 8, 255]);
    }

    #[test]
    fn rejects_non_bgr_frames() {
        for channels in [0, 1, 2, 4] {
            let frame = Frame::packed(2, 2, channels, FrameBuffer::from_slice(&[0; 32]));
            let err = FramePixelReader::new(&frame).unwrap_err();
            assert!(matches!(err, Error::UnsupportedFormat { channels: c } if c == channels));
        }
    }

    #[test]
    fn rejects_short_stride_and_short_buffer() {
        let err = FramePixelReader::new(&frame(4, 1, 8, &[0; 12])).unwrap_err();
        assert!(matches!(err, Error::InvalidStride { min_stride: 12, .. }));

        let err = FramePixelReader::new(&frame(2, 2, 6, &[0; 11])).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooSmall {
                len: 11,
                required: 12
            }
        ));
    }

    #[test]
    fn out_of_bounds_region_writes_nothing() {
        let reader = FramePixelReader::new(&frame(2, 2, 6, &[0; 12])).unwrap();
        let mut out = Vec::new();
        let err = reader
            .read_pixels(Region::new(1, 1, 2, 1), PixelDestination::Bytes(&mut out), 8)
            .unwrap_err();
        assert!(matches!(err, Error::RegionOutOfBounds { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn short_destination_writes_nothing() {
        let reader = FramePixelReader::new(&frame(2, 1, 6, &[0; 6])).unwrap();
        let mut storage = [0xaa; 7];
        let mut dst: &mut [u8] = &mut storage;
        let err = reader
            .read_pixels(Region::full(2, 1), PixelDestination::Bytes(&mut dst), 8)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DestinationTooSmall {
                remaining: 7,
                required: 8
            }
        ));
        assert_eq!(storage, [0xaa; 7]);
    }

    #[test]
    fn empty_region_is_a_no_op() {
        let reader = FramePixelReader::new(&frame(2, 1, 6, &[0; 6])).unwrap();
        assert!(read(&reader, Region::new(2, 1, 0, 0)).unwrap().is_empty());
    }

    #[test]
    fn other_destinations_are_rejected() {
        let reader = FramePixelReader::new(&frame(1, 1, 3, &[1, 2, 3])).unwrap();

        let mut words = [0u32; 1];
        let err = reader
            .read_pixels(Region::full(1, 1), PixelDestination::Words(&mut words), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedDestination { kind: "word buffer" }
        ));
        assert_eq!(words, [0]);

        let mut indices = [0u8; 1];
        let err = reader
            .read_pixels(
                Region::full(1, 1),
                PixelDestination::Indexed {
                    indices: &mut indices,
                    palette: &[],
                },
                1,
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedDestination { .. }));
    }

    #[test]
    fn queries_are_not_supported() {
        let reader = FramePixelReader::new(&frame(1, 1, 3, &[1, 2, 3])).unwrap();
        assert!(matches!(
            reader.pixel_format(),
            Err(Error::NotSupported { .. })
        ));
        assert!(matches!(reader.argb(0, 0), Err(Error::NotSupported { .. })));
        assert!(matches!(reader.color(0, 0), Err(Error::NotSupported { .. })));

        let mut bytes = [0u8; 4];
        assert!(matches!(
            reader.read_pixels_into_slice(Region::full(1, 1), &mut bytes, 0, 4),
            Err(Error::NotSupported { .. })
        ));
        assert_eq!(bytes, [0; 4]);

        let mut words = [0u32; 1];
        assert!(matches!(
            reader.read_pixels_into_words(Region::full(1, 1), &mut words, 0, 1),
            Err(Error::NotSupported { .. })
        ));
    }

    #[test]
    fn reads_fail_after_close() {
        let mut reader = FramePixelReader::new(&frame(1, 1, 3, &[1, 2, 3])).unwrap();
        reader.close();
        reader.close();
        assert!(reader.is_closed());

        let mut out = Vec::new();
        let err = reader
            .read_pixels(Region::full(1, 1), PixelDestination::Bytes(&mut out), 4)
            .unwrap_err();
        assert!(matches!(err, Error::ReaderClosed));
        assert!(out.is_empty());
    }
}
