//! # Simple Resize
//!
//! Batch-resize app icons and screenshots to fixed pixel sizes. A batch is a
//! list of jobs, each naming a source image, an output path, and a target size:
//! a single edge length for a square, or an exact width × height.
//!
//! ```text
//! resize.toml  →  [job, job, ...]  →  run_batch  →  one status line per job
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Target sizes, the [`ImageBackend`](imaging::ImageBackend) trait, the `image`-crate backend, and the single-job [`resize_image`](imaging::resize_image) operation |
//! | [`batch`] | [`ResizeJob`](batch::ResizeJob) records and sequential batch execution |
//! | [`config`] | `resize.toml` loading, stock-default merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Outcomes Are Values
//!
//! A job never returns `Err`. It ends as [`ResizeOutcome`](imaging::ResizeOutcome)
//! `Resized`, `SourceNotFound`, or `Failed { reason }`. One unreadable file
//! does not stop the batch, and callers can still tell exactly what happened
//! to each job, which is what `--strict` and `--report` build on.
//!
//! ## Exact Sizes, Not Fitted Sizes
//!
//! Icons and store screenshots have mandated pixel sizes, so the output is
//! always exactly the requested dimensions. A rectangle target stretches or
//! squashes the source; nothing is cropped or padded. Resampling uses Lanczos3.
//!
//! ## Sizes Are a Tagged Variant
//!
//! [`TargetSize`](imaging::TargetSize) is either `Square(edge)` or
//! `Rectangle { width, height }`, decided once where the job is built (TOML
//! integer vs. array, or `192` vs. `1080x1920` on the command line).
//!
//! ## No Partial Writes
//!
//! The output is encoded in memory and written in one go. A corrupt source or
//! an unsupported output extension leaves any existing output untouched.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
