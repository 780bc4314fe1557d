//! # Board Slicer
//!
//! Cuts an image of a card-game board into one image per card, and makes
//! reduced copies of board images. Everything happens in memory: callers
//! hand in encoded bytes and get encoded bytes back. Storing, serving or
//! discarding them is up to the caller.
//!
//! ```text
//! crop          board bytes + Sizing(c, r)  →  c·r card images, row-major
//! resize_boards [Board] + Reduction(n)      →  [Board] with images W/n × H/n
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`board`] | `Board`, `Card`, `Sizing`, `CardType` records exchanged with callers |
//! | [`crop`] | Grid cropping: plan cells, cut them out, wrap them as cards |
//! | [`resize`] | Reduction: plan target size, resample, batch over boards with rayon |
//! | [`imaging`] | Pixel work behind the `ImageBackend` trait, pure geometry in `calculations` |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Format In, Format Out
//!
//! Every image derived from an input is encoded in the input's format. The
//! format is sniffed once when decoding and carried alongside the pixels in
//! [`imaging::DecodedImage`]; encoding reads it back from there. Nothing in
//! the crate picks an output format on its own, and a format without a
//! compiled-in encoder is an error.
//!
//! ## Two Policies, One Place Each
//!
//! Pixel-exact output depends on two choices: what to do with leftover
//! pixels when the image does not divide evenly into the grid
//! ([`imaging::RemainderPolicy`], truncate by default), and how to round
//! `W / n` when reducing ([`imaging::RoundingPolicy`], floor by default).
//! Each is a single enum consumed by a single pure function in
//! `imaging::calculations`, selectable from `config.toml`.
//!
//! ## Identity, Not Content
//!
//! Boards compare by id only. Unsaved boards have no id and equal nothing.
//! Resizing never mutates a board; it builds a new one with the same id,
//! grid and cards.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, cropping, resampling (Lanczos3) and encoding all go through the
//! `image` crate. No system libraries, no global state, so every operation
//! is safe to run from any number of threads at once.

pub mod board;
pub mod config;
pub mod crop;
pub mod imaging;
pub mod output;
pub mod resize;

#[cfg(test)]
pub(crate) mod test_helpers;
