//! Texture Decoding
//!
//! Turns a [`TextureSource`] into tightly packed 8-bit pixels ready for
//! [`RenderBackend::upload_texture`](crate::RenderBackend::upload_texture).
//!
//! | Decoded channels | Uploaded as | Notes                          |
//! |------------------|-------------|--------------------------------|
//! | 1                | `R8`        | 16-bit grey reduced to 8 bits  |
//! | 3                | `Rgb8`      | 16-bit and float reduced       |
//! | 4                | `Rgba8`     | 16-bit and float reduced       |
//! | other            | error       | e.g. grey + alpha              |

use std::path::{Path, PathBuf};

use image::DynamicImage;
use log::debug;

use crate::assets::source::TextureSource;
use crate::errors::{Result, TendonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    R8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    #[must_use]
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::R8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Row-major pixels, first row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

/// Decodes `source`, resolving relative file paths against `base_dir`.
///
/// With `flip_vertically` the last image row comes first, matching a
/// bottom-left texture origin.
pub fn decode(
    source: &TextureSource,
    base_dir: Option<&Path>,
    flip_vertically: bool,
) -> Result<DecodedImage> {
    let (location, decoded) = match source {
        TextureSource::File(path) => {
            let resolved = match base_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path.clone(),
            };
            let decoded = image::open(&resolved);
            (resolved, decoded)
        }
        TextureSource::Memory { label, bytes } => (
            PathBuf::from(format!("<memory:{label}>")),
            image::load_from_memory(bytes),
        ),
    };

    let image = decoded.map_err(|err| TendonError::TextureDecode {
        path: location.clone(),
        reason: err.to_string(),
    })?;
    let image = if flip_vertically { image.flipv() } else { image };

    let decoded = pack(image, &location)?;
    debug!(
        "Decoded texture {}: {}x{} {:?}",
        location.display(),
        decoded.width,
        decoded.height,
        decoded.format
    );
    Ok(decoded)
}

fn pack(image: DynamicImage, location: &Path) -> Result<DecodedImage> {
    let (width, height) = (image.width(), image.height());
    let (format, pixels) = match image.color().channel_count() {
        1 => (PixelFormat::R8, image.into_luma8().into_raw()),
        3 => (PixelFormat::Rgb8, image.into_rgb8().into_raw()),
        4 => (PixelFormat::Rgba8, image.into_rgba8().into_raw()),
        channels => {
            return Err(TendonError::UnsupportedChannelCount {
                path: location.to_path_buf(),
                channels,
            });
        }
    };

    Ok(DecodedImage {
        width,
        height,
        format,
        pixels,
    })
}
