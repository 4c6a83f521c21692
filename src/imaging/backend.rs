//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and resize.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, built on the
//! `image` crate. Everything is statically linked into the binary.

use super::params::{Dimensions, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: String, message: String },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid target dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Trait for image processing backends.
///
/// Operations and batch logic only talk to this trait, so they can be tested
/// against a recording mock without decoding a single pixel.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resample `params.source` to exactly `params.width × params.height`
    /// and write it to `params.output`.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
