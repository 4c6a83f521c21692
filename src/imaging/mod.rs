//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Resize** | `resize_exact` with Lanczos3, format from output extension |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining parameters + backend

pub mod backend;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use operations::{ResizeOutcome, get_dimensions, plan_resize, resize_image};
pub use params::{Dimensions, ParseSizeError, ResizeJob, ResizeParams, TargetSize};
pub use rust_backend::{RustBackend, supported_output_extensions};
