//! Frame to image conversion through a lazy pixel reader

use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, instrument};

use crate::frame::{ChannelOrder, Frame};
use crate::host::FrameImage;
use crate::reader::{FramePixelReader, PixelDestination, PixelFormat, PixelReader, Region};
use crate::{ConvertConfig, Error, Result};

/// Converts between native frames and host images.
pub trait FrameConverter {
    fn convert_frame(&self, frame: &Frame) -> Result<FrameImage>;

    fn convert_image(&self, image: &FrameImage) -> Result<Frame>;
}

/// Converter for 3-channel frames.
///
/// Emits each pixel's source bytes plus an opaque alpha; the resulting
/// image is tagged BGRA or RGBA according to the frame's channel order.
#[derive(Debug, Clone, Default)]
pub struct BgrFrameConverter {
    config: ConvertConfig,
}

impl BgrFrameConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    fn layout_for(&self, frame: &Frame) -> PixelFormat {
        match self.config.channel_order.unwrap_or(frame.meta.order) {
            ChannelOrder::Bgr => PixelFormat::Bgra8,
            ChannelOrder::Rgb => PixelFormat::Rgba8,
        }
    }
}

impl FrameConverter for BgrFrameConverter {
    #[instrument(skip(self, frame), fields(sequence = frame.meta.sequence))]
    fn convert_frame(&self, frame: &Frame) -> Result<FrameImage> {
        let start = Instant::now();
        let (width, height) = (frame.width(), frame.height());

        // Dropping the reader releases its snapshot.
        let reader = FramePixelReader::new(frame)?;

        let region = Region::full(width, height);
        let scanline_stride = width as usize * 4;
        let len = region.pixel_count() * 4;
        let mut data: Vec<u8> = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|source| Error::ResourceExhausted {
                requested: len,
                source,
            })?;
        reader.read_pixels(region, PixelDestination::Bytes(&mut data), scanline_stride)?;

        let layout = self.layout_for(frame);
        debug!(width, height, ?layout, elapsed = ?start.elapsed(), "frame converted");

        Ok(FrameImage {
            width,
            height,
            layout,
            data: Bytes::from(data),
        })
    }

    fn convert_image(&self, _image: &FrameImage) -> Result<Frame> {
        Err(Error::OperationNotSupported {
            operation: "conversion from image to frame",
        })
    }
}
