//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! ## Crop
//!
//! ```text
//! board.jpg: JPEG 1000x1400, grid 5x7
//! 000 r0 c0 → cards/card-000.jpg (200x200)
//! 001 r0 c1 → cards/card-001.jpg (200x200)
//! ...
//! Cropped 35 cards
//! ```
//!
//! ## Resize
//!
//! ```text
//! 001 board.jpg: 1000x1400 → 250x350 → small/board.jpg
//! Resized 1 board (factor 4)
//! ```

use crate::board::CardType;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name for the card at row-major `index`, e.g. `card-004.jpg`.
pub fn card_file_name(index: usize, extension: &str) -> String {
    format!("card-{index:03}.{extension}")
}

/// One cropped card as written to disk. Serialized into `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardEntry {
    pub index: usize,
    pub row: u32,
    pub column: u32,
    pub file: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Everything the crop command produced.
#[derive(Debug, Clone, Serialize)]
pub struct CropReport {
    pub source: PathBuf,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub columns: u32,
    pub rows: u32,
    pub cards: Vec<CardEntry>,
}

/// One resized board as written to disk.
#[derive(Debug, Clone)]
pub struct ResizeEntry {
    pub source: PathBuf,
    pub output: PathBuf,
    pub from: (u32, u32),
    pub to: (u32, u32),
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn format_crop_output(report: &CropReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} {}x{}, grid {}x{}",
        file_label(&report.source),
        report.format,
        report.width,
        report.height,
        report.columns,
        report.rows
    )];
    for card in &report.cards {
        lines.push(format!(
            "{:0>3} r{} c{} → {} ({}x{})",
            card.index,
            card.row,
            card.column,
            card.file.display(),
            card.width,
            card.height
        ));
    }
    lines.push(format!("Cropped {}", plural(report.cards.len(), "card")));
    lines
}

pub fn print_crop_output(report: &CropReport) {
    for line in format_crop_output(report) {
        println!("{}", line);
    }
}

pub fn format_resize_output(entries: &[ResizeEntry], factor: u32) -> Vec<String> {
    let mut lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "{:0>3} {}: {}x{} → {}x{} → {}",
                i + 1,
                file_label(&e.source),
                e.from.0,
                e.from.1,
                e.to.0,
                e.to.1,
                e.output.display()
            )
        })
        .collect();
    lines.push(format!(
        "Resized {} (factor {})",
        plural(entries.len(), "board"),
        factor
    ));
    lines
}

pub fn print_resize_output(entries: &[ResizeEntry], factor: u32) {
    for line in format_resize_output(entries, factor) {
        println!("{}", line);
    }
}

pub fn format_identify_output(path: &Path, format: &str, width: u32, height: u32) -> Vec<String> {
    vec![format!("{}: {} {}x{}", file_label(path), format, width, height)]
}

pub fn print_identify_output(path: &Path, format: &str, width: u32, height: u32) {
    for line in format_identify_output(path, format, width, height) {
        println!("{}", line);
    }
}

pub fn format_card_types() -> Vec<String> {
    CardType::ALL.iter().map(|t| t.to_string()).collect()
}

pub fn print_card_types() {
    for line in format_card_types() {
        println!("{}", line);
    }
}
