//! Image processing — pure Rust, in memory.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Crop cells** | `crop_imm` per cell, re-encoded in the source format |
//! | **Reduce** | `resize_exact` (Lanczos3), re-encoded in the source format |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for grid geometry and reduced dimensions (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Decoded**: [`DecodedImage`], which pins the output format to the input format
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod decoded;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ImageInfo};
pub use calculations::{
    CellRect, RemainderPolicy, RoundingPolicy, calculate_cell_dimensions, calculate_cell_rects,
    calculate_reduced_dimensions, reduce_dimension,
};
pub use decoded::DecodedImage;
pub use params::{CropParams, Quality, Resampling, ResizeParams};
pub use rust_backend::{RustBackend, supported_formats};

/// Preferred file extension for an encoded format, e.g. `"jpg"` for JPEG.
pub fn format_extension(format: image::ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}

/// Display name for an encoded format, e.g. `"JPEG"`.
pub fn format_name(format: image::ImageFormat) -> String {
    format!("{format:?}").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    #[test]
    fn extension_for_common_formats() {
        assert_eq!(format_extension(ImageFormat::Jpeg), "jpg");
        assert_eq!(format_extension(ImageFormat::Png), "png");
    }

    #[test]
    fn names_for_common_formats() {
        assert_eq!(format_name(ImageFormat::Jpeg), "JPEG");
        assert_eq!(format_name(ImageFormat::Png), "PNG");
    }
}
