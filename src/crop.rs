//! Grid cropping: cut a board image into one image per card.
//!
//! ```text
//! bytes ──identify──▶ W×H ──plan_crop──▶ cells (row-major) ──backend.crop──▶ Vec<bytes>
//! ```
//!
//! Cells are `floor(W / columns) x floor(H / rows)`, laid out row-major from
//! the top-left corner. What happens to leftover pixels is decided by
//! [`RemainderPolicy`] alone. Every output is encoded in the format of the
//! input.

use crate::board::{Board, Card, Sizing};
use crate::config::EngineConfig;
use crate::imaging::{
    BackendError, CropParams, ImageBackend, ImageInfo, Quality, RemainderPolicy, RustBackend,
    calculate_cell_dimensions, calculate_cell_rects,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("Undecodable image: {0}")]
    UndecodableImage(String),
    #[error("{width}x{height} image is too small for a {sizing} grid")]
    GridExceedsImage {
        width: u32,
        height: u32,
        sizing: Sizing,
    },
    #[error("Image processing failed: {0}")]
    Imaging(BackendError),
}

impl From<BackendError> for CropError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::UndecodableImage(msg) => CropError::UndecodableImage(msg),
            other => CropError::Imaging(other),
        }
    }
}

/// Settings for cropping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropConfig {
    pub remainder: RemainderPolicy,
    pub quality: Quality,
}

impl CropConfig {
    pub fn from_engine_config(config: &EngineConfig) -> Self {
        Self {
            remainder: config.grid.remainder,
            quality: Quality::new(config.encoding.jpeg_quality),
        }
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        Self::from_engine_config(&EngineConfig::default())
    }
}

/// Plan a crop without executing it.
pub fn plan_crop(
    info: &ImageInfo,
    sizing: Sizing,
    config: &CropConfig,
) -> Result<CropParams, CropError> {
    let image = info.dimensions.as_tuple();
    let grid = (sizing.columns(), sizing.rows());

    let (cell_w, cell_h) = calculate_cell_dimensions(image, grid);
    if cell_w == 0 || cell_h == 0 {
        return Err(CropError::GridExceedsImage {
            width: image.0,
            height: image.1,
            sizing,
        });
    }

    Ok(CropParams {
        cells: calculate_cell_rects(image, grid, config.remainder),
        quality: config.quality,
    })
}

/// Cut `image` into `sizing.cell_count()` encoded images, row-major.
pub fn crop(image: &[u8], sizing: Sizing) -> Result<Vec<Vec<u8>>, CropError> {
    crop_with_backend(&RustBackend::new(), image, sizing, &CropConfig::default())
}

/// Crop using a specific backend (allows testing with mock).
pub fn crop_with_backend(
    backend: &impl ImageBackend,
    image: &[u8],
    sizing: Sizing,
    config: &CropConfig,
) -> Result<Vec<Vec<u8>>, CropError> {
    let info = backend.identify(image)?;
    let params = plan_crop(&info, sizing, config)?;

    tracing::debug!(
        format = ?info.format,
        width = info.dimensions.width,
        height = info.dimensions.height,
        grid = %sizing,
        cells = params.cells.len(),
        "cropping board image"
    );

    let cells = backend.crop(image, &params)?;
    if cells.len() != sizing.cell_count() {
        return Err(CropError::Imaging(BackendError::ProcessingFailed(format!(
            "backend returned {} cells for a {} grid",
            cells.len(),
            sizing
        ))));
    }
    Ok(cells)
}

/// Cut a board's own image along its own grid into fresh, untyped cards.
///
/// The board is not modified; append the result with
/// [`Board::extend_cards`] to keep it.
pub fn crop_board(board: &Board) -> Result<Vec<Card>, CropError> {
    crop_board_with_backend(&RustBackend::new(), board, &CropConfig::default())
}

pub fn crop_board_with_backend(
    backend: &impl ImageBackend,
    board: &Board,
    config: &CropConfig,
) -> Result<Vec<Card>, CropError> {
    let cells = crop_with_backend(backend, board.image(), board.sizing(), config)?;
    Ok(cells.into_iter().map(Card::new).collect())
}
