//! Reduced copies of board images.
//!
//! A [`Reduction`] divides both dimensions by the same positive integer.
//! The rounding of the division is decided by [`RoundingPolicy`] alone; the
//! output is always encoded in the input's format.
//!
//! ## Batches
//!
//! [`resize_boards`] reduces many boards at once on the rayon pool. Each board
//! is independent, and results are matched back to their input by index, so
//! the output order is the input order no matter how work was scheduled.
//!
//! A batch is all-or-nothing. If any board fails, the whole call fails with
//! [`ResizeError::BatchEntry`] naming the lowest failing index, and no
//! resized boards are returned. Once a board has failed, boards after it are
//! no longer started; boards before it still run so the lowest failure is
//! found. Work already in flight on other threads is not interrupted.

use crate::board::{Board, BoardId};
use crate::config::EngineConfig;
use crate::imaging::{
    BackendError, ImageBackend, ImageInfo, Quality, Resampling, ResizeParams, RoundingPolicy,
    RustBackend, calculate_reduced_dimensions,
};
use rayon::prelude::*;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Invalid reduction factor {0}: must be a positive integer")]
    InvalidReduction(i64),
    #[error("Undecodable image: {0}")]
    UndecodableImage(String),
    #[error("Image processing failed: {0}")]
    Imaging(BackendError),
    #[error("Board at index {index} could not be resized: {source}")]
    BatchEntry {
        index: usize,
        board_id: Option<BoardId>,
        #[source]
        source: Box<ResizeError>,
    },
}

impl From<BackendError> for ResizeError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::UndecodableImage(msg) => ResizeError::UndecodableImage(msg),
            other => ResizeError::Imaging(other),
        }
    }
}

/// Positive integer divisor applied to both width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction(NonZeroU32);

impl Reduction {
    pub fn new(factor: i64) -> Result<Self, ResizeError> {
        u32::try_from(factor)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(ResizeError::InvalidReduction(factor))
    }

    pub fn factor(self) -> u32 {
        self.0.get()
    }
}

/// Settings for resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeConfig {
    pub rounding: RoundingPolicy,
    pub filter: Resampling,
    pub quality: Quality,
}

impl ResizeConfig {
    pub fn from_engine_config(config: &EngineConfig) -> Self {
        Self {
            rounding: config.scaling.rounding,
            filter: config.scaling.filter,
            quality: Quality::new(config.encoding.jpeg_quality),
        }
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self::from_engine_config(&EngineConfig::default())
    }
}

/// Plan a resize without executing it.
pub fn plan_resize(info: &ImageInfo, reduction: Reduction, config: &ResizeConfig) -> ResizeParams {
    let (width, height) =
        calculate_reduced_dimensions(info.dimensions.as_tuple(), reduction.factor(), config.rounding);
    ResizeParams {
        width,
        height,
        filter: config.filter,
        quality: config.quality,
    }
}

/// Reduce one encoded image by `reduction`, keeping its format.
pub fn resize(image: &[u8], reduction: Reduction) -> Result<Vec<u8>, ResizeError> {
    resize_with_backend(&RustBackend::new(), image, reduction, &ResizeConfig::default())
}

/// Resize using a specific backend (allows testing with mock).
pub fn resize_with_backend(
    backend: &impl ImageBackend,
    image: &[u8],
    reduction: Reduction,
    config: &ResizeConfig,
) -> Result<Vec<u8>, ResizeError> {
    let info = backend.identify(image)?;
    let params = plan_resize(&info, reduction, config);

    tracing::debug!(
        format = ?info.format,
        from_width = info.dimensions.width,
        from_height = info.dimensions.height,
        to_width = params.width,
        to_height = params.height,
        factor = reduction.factor(),
        "resizing image"
    );

    Ok(backend.resize(image, &params)?)
}

/// Reduce every board's image, returning new boards in the same order.
///
/// Ids, sizings and cards are carried over unchanged; only the image differs.
pub fn resize_boards(boards: &[Board], reduction: Reduction) -> Result<Vec<Board>, ResizeError> {
    resize_boards_with_backend(&RustBackend::new(), boards, reduction, &ResizeConfig::default())
}

pub fn resize_boards_with_backend(
    backend: &impl ImageBackend,
    boards: &[Board],
    reduction: Reduction,
    config: &ResizeConfig,
) -> Result<Vec<Board>, ResizeError> {
    // Lowest index seen failing so far. Boards above it are skipped; boards
    // below it still run, so the reported index is the true minimum.
    let first_failure = AtomicUsize::new(usize::MAX);
    let images: Vec<Option<Result<Vec<u8>, ResizeError>>> = boards
        .par_iter()
        .enumerate()
        .map(|(index, board)| {
            if index > first_failure.load(Ordering::Relaxed) {
                return None;
            }
            let result = resize_with_backend(backend, board.image(), reduction, config);
            if result.is_err() {
                first_failure.fetch_min(index, Ordering::Relaxed);
            }
            Some(result)
        })
        .collect();

    let mut resized = Vec::with_capacity(boards.len());
    for (index, (board, image)) in boards.iter().zip(images).enumerate() {
        match image {
            Some(Ok(image)) => resized.push(board.with_image(image)),
            Some(Err(source)) => {
                tracing::warn!(index, board = ?board.id(), error = %source, "board resize failed");
                return Err(ResizeError::BatchEntry {
                    index,
                    board_id: board.id(),
                    source: Box::new(source),
                });
            }
            // A skipped board always sits after a failed one, which returned above.
            None => unreachable!("board {index} skipped with no earlier failure"),
        }
    }

    tracing::info!(
        boards = resized.len(),
        factor = reduction.factor(),
        "resized board batch"
    );
    Ok(resized)
}
