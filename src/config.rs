//! Engine configuration module.
//!
//! Handles loading and validating `config.toml`. Every key is optional and
//! falls back to the stock default; unknown keys are rejected to catch typos
//! early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [grid]
//! remainder = "truncate"    # truncate | extend-last
//!
//! [scaling]
//! rounding = "floor"        # floor | nearest
//! filter = "lanczos3"       # lanczos3 | catmull-rom | gaussian | triangle
//!
//! [encoding]
//! jpeg_quality = 90         # 1-100
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override only the values you need:
//!
//! ```toml
//! [grid]
//! remainder = "extend-last"
//! ```

use crate::imaging::{RemainderPolicy, Resampling, RoundingPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Engine configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// How boards are cut into cells.
    pub grid: GridConfig,
    /// How board images are reduced.
    pub scaling: ScalingConfig,
    /// Encoder settings shared by every output.
    pub encoding: EncodingConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl EngineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.encoding.jpeg_quality) {
            return Err(ConfigError::Validation(
                "encoding.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub remainder: RemainderPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScalingConfig {
    pub rounding: RoundingPolicy,
    pub filter: Resampling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    /// Quality for JPEG outputs. Lossless formats ignore it.
    pub jpeg_quality: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self { jpeg_quality: 90 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers for batch resizing.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Parse and validate a config from TOML text.
pub fn parse_config(content: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load a config file. A missing file is an error; callers that want
/// defaults simply don't call this.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// The stock `config.toml`, every option documented and set to its default.
pub fn stock_config_toml() -> &'static str {
    r#"# board-slicer configuration
# All options are optional. Values shown are the defaults.

[grid]
# What to do with pixels left over when the image size is not a multiple of
# the grid: "truncate" drops the right/bottom strips, "extend-last" gives
# them to the last column and row.
remainder = "truncate"

[scaling]
# How width/height divided by the reduction factor is rounded:
# "floor" or "nearest" (halves round up).
rounding = "floor"
# Resampling filter: "lanczos3", "catmull-rom", "gaussian" or "triangle".
filter = "lanczos3"

[encoding]
# Quality for JPEG outputs (1-100). PNG, TIFF and WebP outputs are lossless.
jpeg_quality = 90

[processing]
# Maximum parallel workers for batch resizing. Omit to use every core.
# max_processes = 4
"#
}
