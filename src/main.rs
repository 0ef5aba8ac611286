//! Framebridge demo: converts a synthetic BGR test pattern and writes it as PNG

use std::path::PathBuf;

use color_eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use framebridge::{BgrFrameConverter, Config, DemoConfig, Frame, FrameBuffer, FrameConverter};

fn main() -> Result<()> {
    // Initialize error handling and logging
    color_eyre::install()?;

    // Load configuration
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .init();

    info!("Framebridge demo starting");

    let frame = test_pattern(&config.demo);
    let converter = BgrFrameConverter::new(config.convert.clone());
    let image = converter.convert_frame(&frame)?;

    image.save(&config.demo.output)?;
    info!(
        "Wrote {}x{} image to {}",
        image.width,
        image.height,
        config.demo.output.display()
    );

    Ok(())
}

/// Horizontal blue ramp, vertical red ramp, padded rows
fn test_pattern(demo: &DemoConfig) -> Frame {
    let (width, height) = (demo.width, demo.height);
    let stride = width as usize * 3 + demo.row_padding;
    let mut data = vec![0u8; stride * height as usize];

    for (y, row) in data.chunks_exact_mut(stride.max(1)).enumerate() {
        for x in 0..width as usize {
            let px = &mut row[x * 3..x * 3 + 3];
            px[0] = (x * 255 / width.max(1) as usize) as u8;
            px[1] = 128;
            px[2] = (y * 255 / height.max(1) as usize) as u8;
        }
    }

    Frame::new(width, height, 3, stride, FrameBuffer::from_slice(&data))
}
