//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, crop, and resize. All of them work on encoded bytes in
//! memory; a backend never reads or writes files.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{CropParams, ResizeParams};
use image::ImageFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Undecodable image: {0}")]
    UndecodableImage(String),
    #[error("No encoder available for {0:?}")]
    UnsupportedFormat(ImageFormat),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Result of an identify operation: what the bytes are, without decoding pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    pub format: ImageFormat,
}

/// Trait for image processing backends.
///
/// Every output a backend produces must be encoded in the same format as the
/// input it was derived from. `Sync` so a single backend can serve a rayon
/// batch.
pub trait ImageBackend: Sync {
    /// Read format and dimensions from the image header.
    fn identify(&self, data: &[u8]) -> Result<ImageInfo, BackendError>;

    /// Cut `params.cells` out of the image, one encoded buffer per cell, in order.
    fn crop(&self, data: &[u8], params: &CropParams) -> Result<Vec<Vec<u8>>, BackendError>;

    /// Resample the image to exactly `params.width x params.height`.
    fn resize(&self, data: &[u8], params: &ResizeParams) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::calculations::CellRect;
    use crate::imaging::params::{Quality, Resampling};
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    ///
    /// Every input is identified as the configured [`ImageInfo`], except
    /// inputs listed in `undecodable`, which fail like corrupt bytes would.
    pub struct MockBackend {
        pub info: ImageInfo,
        pub undecodable: Vec<Vec<u8>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(usize),
        Crop {
            input_len: usize,
            cells: Vec<CellRect>,
            quality: u32,
        },
        Resize {
            input_len: usize,
            width: u32,
            height: u32,
            filter: Resampling,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new(width: u32, height: u32, format: ImageFormat) -> Self {
            Self {
                info: ImageInfo {
                    dimensions: Dimensions { width, height },
                    format,
                },
                undecodable: Vec::new(),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn jpeg(width: u32, height: u32) -> Self {
            Self::new(width, height, ImageFormat::Jpeg)
        }

        /// Make identify fail for exactly these input bytes.
        pub fn rejecting(mut self, data: &[u8]) -> Self {
            self.undecodable.push(data.to_vec());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn check_decodable(&self, data: &[u8]) -> Result<(), BackendError> {
            if self.undecodable.iter().any(|bad| bad == data) {
                Err(BackendError::UndecodableImage("mock rejection".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, data: &[u8]) -> Result<ImageInfo, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(data.len()));
            self.check_decodable(data)?;
            Ok(self.info)
        }

        fn crop(&self, data: &[u8], params: &CropParams) -> Result<Vec<Vec<u8>>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Crop {
                input_len: data.len(),
                cells: params.cells.clone(),
                quality: params.quality.value(),
            });
            self.check_decodable(data)?;
            // One distinguishable buffer per cell: its index
            Ok((0..params.cells.len())
                .map(|i| (i as u32).to_le_bytes().to_vec())
                .collect())
        }

        fn resize(&self, data: &[u8], params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                input_len: data.len(),
                width: params.width,
                height: params.height,
                filter: params.filter,
                quality: params.quality.value(),
            });
            self.check_decodable(data)?;
            // Input bytes followed by the target size, so outputs trace back to inputs
            let mut out = data.to_vec();
            out.extend_from_slice(&params.width.to_le_bytes());
            out.extend_from_slice(&params.height.to_le_bytes());
            Ok(out)
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::jpeg(800, 600);

        let info = backend.identify(&[0u8; 12]).unwrap();
        assert_eq!(info.dimensions.as_tuple(), (800, 600));
        assert_eq!(info.format, ImageFormat::Jpeg);

        let ops = backend.get_operations();
        assert_eq!(ops, vec![RecordedOp::Identify(12)]);
    }

    #[test]
    fn mock_rejects_listed_inputs() {
        let backend = MockBackend::jpeg(10, 10).rejecting(b"garbage");

        assert!(backend.identify(b"fine").is_ok());
        assert!(matches!(
            backend.identify(b"garbage"),
            Err(BackendError::UndecodableImage(_))
        ));
    }

    #[test]
    fn mock_records_crop() {
        let backend = MockBackend::jpeg(20, 10);
        let cells = vec![
            CellRect {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
            CellRect {
                x: 10,
                y: 0,
                width: 10,
                height: 10,
            },
        ];

        let out = backend
            .crop(
                b"img",
                &CropParams {
                    cells: cells.clone(),
                    quality: Quality::new(80),
                },
            )
            .unwrap();

        assert_eq!(out.len(), 2);
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Crop { input_len: 3, quality: 80, cells: c } if *c == cells
        ));
    }

    #[test]
    fn mock_records_resize() {
        let backend = MockBackend::jpeg(800, 600);

        backend
            .resize(
                b"img",
                &ResizeParams {
                    width: 400,
                    height: 300,
                    filter: Resampling::Lanczos3,
                    quality: Quality::new(90),
                },
            )
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize {
                width: 400,
                height: 300,
                quality: 90,
                ..
            }
        ));
    }
}
