//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::with_guessed_format` + `into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Resize | `image::DynamicImage::resize_exact`, Lanczos3 by default |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at a pinned quality |
//! | Encode → everything else | `image::DynamicImage::write_to` with the source format |

use super::backend::{BackendError, Dimensions, ImageBackend, ImageInfo};
use super::decoded::DecodedImage;
use super::params::{CropParams, ResizeParams};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::sync::LazyLock;

const CANDIDATE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

static SUPPORTED_FORMATS: LazyLock<Vec<ImageFormat>> = LazyLock::new(|| {
    CANDIDATE_FORMATS
        .iter()
        .copied()
        .filter(|fmt| fmt.reading_enabled() && fmt.writing_enabled())
        .collect()
});

/// Formats a board may be uploaded in: both decoder and encoder are compiled in.
pub fn supported_formats() -> &'static [ImageFormat] {
    &SUPPORTED_FORMATS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, data: &[u8]) -> Result<ImageInfo, BackendError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| BackendError::UndecodableImage(e.to_string()))?;
        let format = reader.format().ok_or_else(|| {
            BackendError::UndecodableImage("unrecognized image format".to_string())
        })?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| BackendError::UndecodableImage(format!("{format:?}: {e}")))?;
        Ok(ImageInfo {
            dimensions: Dimensions { width, height },
            format,
        })
    }

    fn crop(&self, data: &[u8], params: &CropParams) -> Result<Vec<Vec<u8>>, BackendError> {
        let img = DecodedImage::decode(data)?;
        params
            .cells
            .iter()
            .map(|&cell| img.crop(cell)?.encode(params.quality))
            .collect()
    }

    fn resize(&self, data: &[u8], params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
        let img = DecodedImage::decode(data)?;
        img.resize_exact(params.width, params.height, params.filter)
            .encode(params.quality)
    }
}
