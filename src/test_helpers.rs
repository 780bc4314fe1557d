//! Shared test utilities for the board-slicer test suite.
//!
//! Builds synthetic boards in memory, so no fixture files are needed, and
//! reads results back for assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let grid = Sizing::new(3, 2).unwrap();
//! let cells = crop(&grid_png(90, 40, grid), grid).unwrap();
//! assert_eq!(decoded_info(&cells[0]), (ImageFormat::Png, 30, 20));
//! assert_eq!(pixel_at(&cells[4], 15, 10), cell_colour(1, 1));
//! ```

use crate::board::Sizing;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

// =========================================================================
// Synthetic images
// =========================================================================

/// Flat colour painted on grid cell `(col, row)`; distinct for small grids.
pub fn cell_colour(col: u32, row: u32) -> [u8; 3] {
    [
        (col * 60 % 256) as u8,
        (row * 60 % 256) as u8,
        ((col + row) * 30 % 256) as u8,
    ]
}

/// A board whose cells under `grid` (truncating layout) are flat colours.
/// Remainder pixels are white.
fn grid_image(width: u32, height: u32, grid: Sizing) -> RgbImage {
    let cell_w = (width / grid.columns()).max(1);
    let cell_h = (height / grid.rows()).max(1);
    RgbImage::from_fn(width, height, |x, y| {
        let (col, row) = (x / cell_w, y / cell_h);
        if col < grid.columns() && row < grid.rows() {
            Rgb(cell_colour(col, row))
        } else {
            Rgb([255, 255, 255])
        }
    })
}

fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn encode(img: RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), format)
        .unwrap();
    buffer
}

pub fn grid_png(width: u32, height: u32, grid: Sizing) -> Vec<u8> {
    encode(grid_image(width, height, grid), ImageFormat::Png)
}

pub fn grid_jpeg(width: u32, height: u32, grid: Sizing) -> Vec<u8> {
    encode(grid_image(width, height, grid), ImageFormat::Jpeg)
}

pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    encode(gradient_image(width, height), ImageFormat::Png)
}

pub fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(gradient_image(width, height), ImageFormat::Jpeg)
}

// =========================================================================
// Readback
// =========================================================================

/// Format sniffed from the bytes, and decoded dimensions.
pub fn decoded_info(data: &[u8]) -> (ImageFormat, u32, u32) {
    let format = image::guess_format(data).unwrap();
    let img = image::load_from_memory_with_format(data, format).unwrap();
    (format, img.width(), img.height())
}

/// RGB value of one pixel of an encoded image.
pub fn pixel_at(data: &[u8], x: u32, y: u32) -> [u8; 3] {
    let img = image::load_from_memory(data).unwrap();
    let p = img.get_pixel(x, y);
    [p[0], p[1], p[2]]
}
