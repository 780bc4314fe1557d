//! Pure calculation functions for grid geometry and reduced dimensions.
//!
//! All functions here are pure and testable without any I/O or images. The
//! two policies that decide pixel-exact output, [`RemainderPolicy`] for
//! cropping and [`RoundingPolicy`] for scaling, live here and nowhere else.

use serde::{Deserialize, Serialize};

/// What happens to the pixels left over when the image width (height) is not
/// a multiple of the column (row) count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemainderPolicy {
    /// Every cell is exactly `floor(W / columns) x floor(H / rows)`; the
    /// trailing strips on the right and bottom edges are discarded.
    #[default]
    Truncate,
    /// The last column and the last row absorb the leftover pixels.
    ExtendLast,
}

/// How a dimension divided by the reduction factor becomes a whole pixel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    #[default]
    Floor,
    /// Round to nearest, halves away from zero.
    Nearest,
}

/// A cell's position and size inside the source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Size of a regular grid cell: `(floor(W / columns), floor(H / rows))`.
///
/// # Examples
/// ```
/// # use board_slicer::imaging::calculate_cell_dimensions;
/// assert_eq!(calculate_cell_dimensions((1000, 1400), (5, 7)), (200, 200));
/// assert_eq!(calculate_cell_dimensions((1003, 1406), (5, 7)), (200, 200));
/// ```
pub fn calculate_cell_dimensions(image: (u32, u32), grid: (u32, u32)) -> (u32, u32) {
    let (width, height) = image;
    let (columns, rows) = grid;
    (width / columns, height / rows)
}

/// Compute every cell rectangle of the grid, row-major.
///
/// Row 0 comes first, left to right, then row 1, and so on. The caller is
/// expected to have rejected grids whose cells would be zero-sized.
pub fn calculate_cell_rects(
    image: (u32, u32),
    grid: (u32, u32),
    policy: RemainderPolicy,
) -> Vec<CellRect> {
    let (width, height) = image;
    let (columns, rows) = grid;
    let (cell_w, cell_h) = calculate_cell_dimensions(image, grid);

    let (extra_w, extra_h) = match policy {
        RemainderPolicy::Truncate => (0, 0),
        RemainderPolicy::ExtendLast => (width % columns, height % rows),
    };

    let mut cells = Vec::with_capacity(columns as usize * rows as usize);
    for row in 0..rows {
        let h = if row + 1 == rows { cell_h + extra_h } else { cell_h };
        for col in 0..columns {
            let w = if col + 1 == columns {
                cell_w + extra_w
            } else {
                cell_w
            };
            cells.push(CellRect {
                x: col * cell_w,
                y: row * cell_h,
                width: w,
                height: h,
            });
        }
    }
    cells
}

/// Reduce one dimension by `factor` under `rounding`. Never returns 0.
pub fn reduce_dimension(length: u32, factor: u32, rounding: RoundingPolicy) -> u32 {
    let (length, factor) = (u64::from(length), u64::from(factor));
    let reduced = match rounding {
        RoundingPolicy::Floor => length / factor,
        RoundingPolicy::Nearest => (length + factor / 2) / factor,
    };
    // Bounded by `length`, so the conversion back cannot fail.
    (reduced as u32).max(1)
}

/// Target dimensions for reducing `source` by `factor`.
///
/// # Examples
/// ```
/// # use board_slicer::imaging::{calculate_reduced_dimensions, RoundingPolicy};
/// assert_eq!(
///     calculate_reduced_dimensions((1000, 1400), 4, RoundingPolicy::Floor),
///     (250, 350)
/// );
/// ```
pub fn calculate_reduced_dimensions(
    source: (u32, u32),
    factor: u32,
    rounding: RoundingPolicy,
) -> (u32, u32) {
    (
        reduce_dimension(source.0, factor, rounding),
        reduce_dimension(source.1, factor, rounding),
    )
}
