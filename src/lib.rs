pub mod convert;
pub mod error;
pub mod frame;
pub mod host;
pub mod reader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use convert::{BgrFrameConverter, FrameConverter};
pub use error::{Error, Result};
pub use frame::{ChannelOrder, Frame, FrameBuffer, FrameMetadata};
pub use host::FrameImage;
pub use reader::{FramePixelReader, PixelDestination, PixelFormat, PixelReader, Region};

/// Environment variable prefix for configuration overrides,
/// e.g. `FRAMEBRIDGE__DEMO__WIDTH=1280`
pub const ENV_PREFIX: &str = "FRAMEBRIDGE";

/// System configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub convert: ConvertConfig,
    pub demo: DemoConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Overrides the channel order recorded on each frame
    pub channel_order: Option<ChannelOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    /// Padding bytes at the end of every row
    pub row_padding: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            row_padding: 64, // typical alignment slack from capture drivers
            output: PathBuf::from("frame.png"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "framebridge=debug".into(),
        }
    }
}

impl Config {
    /// Layer defaults, an optional TOML file and `FRAMEBRIDGE__*` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
