//! Decoded image that remembers the format it was decoded from.
//!
//! [`DecodedImage`] is the only place pixels and encodings meet. It records
//! the source [`ImageFormat`] at decode time, and [`DecodedImage::encode`]
//! always writes that same format back out. There is no way to encode to a
//! different format through this type, and a format whose encoder is not
//! compiled in is an error rather than a fallback.

use super::backend::{BackendError, Dimensions};
use super::calculations::CellRect;
use super::params::{Quality, Resampling};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: DynamicImage,
    format: ImageFormat,
}

impl DecodedImage {
    /// Sniff the format from the leading bytes and decode.
    pub fn decode(data: &[u8]) -> Result<Self, BackendError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| BackendError::UndecodableImage(e.to_string()))?;
        let format = reader.format().ok_or_else(|| {
            BackendError::UndecodableImage("unrecognized image format".to_string())
        })?;
        let pixels = reader
            .decode()
            .map_err(|e| BackendError::UndecodableImage(format!("{format:?}: {e}")))?;
        Ok(Self { pixels, format })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = self.pixels.dimensions();
        Dimensions { width, height }
    }

    /// Copy out the pixels under `cell`. The source is left untouched.
    pub fn crop(&self, cell: CellRect) -> Result<Self, BackendError> {
        let fits_x = cell.x.checked_add(cell.width).is_some_and(|r| r <= self.width());
        let fits_y = cell.y.checked_add(cell.height).is_some_and(|b| b <= self.height());
        if !(fits_x && fits_y) || cell.width == 0 || cell.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "cell {}x{}+{}+{} does not fit a {}x{} image",
                cell.width,
                cell.height,
                cell.x,
                cell.y,
                self.width(),
                self.height()
            )));
        }
        Ok(Self {
            pixels: self.pixels.crop_imm(cell.x, cell.y, cell.width, cell.height),
            format: self.format,
        })
    }

    /// Resample to exactly `width x height`.
    pub fn resize_exact(&self, width: u32, height: u32, filter: Resampling) -> Self {
        Self {
            pixels: self
                .pixels
                .resize_exact(width, height, filter.filter_type()),
            format: self.format,
        }
    }

    /// Encode in the format this image was decoded from.
    pub fn encode(&self, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let mut buffer = Vec::new();
        match self.format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel and no 16-bit baseline mode
                let pixels = match self.pixels.color() {
                    ColorType::L8 | ColorType::Rgb8 => self.pixels.clone(),
                    ColorType::La8 | ColorType::L16 | ColorType::La16 => {
                        DynamicImage::ImageLuma8(self.pixels.to_luma8())
                    }
                    _ => DynamicImage::ImageRgb8(self.pixels.to_rgb8()),
                };
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.value() as u8);
                pixels
                    .write_with_encoder(encoder)
                    .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
            }
            format if format.writing_enabled() => {
                self.pixels
                    .write_to(&mut Cursor::new(&mut buffer), format)
                    .map_err(|e| {
                        BackendError::ProcessingFailed(format!("{format:?} encode failed: {e}"))
                    })?;
            }
            other => return Err(BackendError::UnsupportedFormat(other)),
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_jpeg, gradient_png};

    #[test]
    fn decode_records_jpeg_format() {
        let img = DecodedImage::decode(&gradient_jpeg(64, 48)).unwrap();
        assert_eq!(img.format(), ImageFormat::Jpeg);
        assert_eq!(img.dimensions().as_tuple(), (64, 48));
    }

    #[test]
    fn decode_records_png_format() {
        let img = DecodedImage::decode(&gradient_png(30, 20)).unwrap();
        assert_eq!(img.format(), ImageFormat::Png);
        assert_eq!((img.width(), img.height()), (30, 20));
    }

    #[test]
    fn decode_rejects_garbage() {
        let result = DecodedImage::decode(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::UndecodableImage(_))));
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert!(matches!(
            DecodedImage::decode(&[]),
            Err(BackendError::UndecodableImage(_))
        ));
    }

    #[test]
    fn decode_rejects_truncated_png() {
        let png = gradient_png(30, 20);
        let truncated = &png[..png.len() / 2];
        assert!(matches!(
            DecodedImage::decode(truncated),
            Err(BackendError::UndecodableImage(_))
        ));
    }

    #[test]
    fn encode_without_transform_keeps_dimensions_and_format() {
        for source in [gradient_jpeg(40, 24), gradient_png(40, 24)] {
            let img = DecodedImage::decode(&source).unwrap();
            let encoded = img.encode(Quality::default()).unwrap();
            let again = DecodedImage::decode(&encoded).unwrap();
            assert_eq!(again.format(), img.format());
            assert_eq!(again.dimensions(), img.dimensions());
        }
    }

    #[test]
    fn encode_is_deterministic() {
        let img = DecodedImage::decode(&gradient_jpeg(32, 32)).unwrap();
        let a = img.encode(Quality::new(85)).unwrap();
        let b = img.encode(Quality::new(85)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oversized_quality_encodes_at_maximum() {
        let img = DecodedImage::decode(&gradient_jpeg(32, 32)).unwrap();
        let capped = img.encode(Quality::new(300)).unwrap();
        let max = img.encode(Quality::new(100)).unwrap();
        assert_eq!(capped, max);
    }

    #[test]
    fn crop_keeps_format_and_takes_cell_size() {
        let img = DecodedImage::decode(&gradient_png(40, 30)).unwrap();
        let cell = img
            .crop(CellRect {
                x: 10,
                y: 5,
                width: 20,
                height: 15,
            })
            .unwrap();
        assert_eq!(cell.format(), ImageFormat::Png);
        assert_eq!(cell.dimensions().as_tuple(), (20, 15));
        // Source untouched
        assert_eq!(img.dimensions().as_tuple(), (40, 30));
    }

    #[test]
    fn crop_out_of_bounds_errors() {
        let img = DecodedImage::decode(&gradient_png(40, 30)).unwrap();
        let result = img.crop(CellRect {
            x: 30,
            y: 0,
            width: 20,
            height: 10,
        });
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn resize_exact_hits_target() {
        let img = DecodedImage::decode(&gradient_jpeg(100, 140)).unwrap();
        let small = img.resize_exact(25, 35, Resampling::Lanczos3);
        assert_eq!(small.dimensions().as_tuple(), (25, 35));
        assert_eq!(small.format(), ImageFormat::Jpeg);
    }

    #[test]
    fn rgba_source_still_encodes_as_jpeg() {
        let img = DecodedImage {
            pixels: DynamicImage::new_rgba8(8, 8),
            format: ImageFormat::Jpeg,
        };
        let encoded = img.encode(Quality::default()).unwrap();
        assert_eq!(image::guess_format(&encoded).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn format_without_encoder_is_rejected() {
        let img = DecodedImage {
            pixels: DynamicImage::new_rgb8(4, 4),
            format: ImageFormat::Dds,
        };
        assert!(matches!(
            img.encode(Quality::default()),
            Err(BackendError::UnsupportedFormat(ImageFormat::Dds))
        ));
    }
}
