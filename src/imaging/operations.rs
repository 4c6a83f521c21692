//! High-level image operations.
//!
//! These functions take a [`ResizeJob`], resolve its parameters, and call the
//! backend. Unlike the backend, they never return `Err`: every way a job can
//! end is a [`ResizeOutcome`] value, so one bad file cannot abort a batch.

use super::backend::{BackendError, ImageBackend};
use super::params::{Dimensions, ResizeJob, ResizeParams};
use serde::Serialize;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// How a single resize job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResizeOutcome {
    /// The output file was written at exactly these dimensions.
    Resized { dimensions: Dimensions },
    /// The source path does not exist. Nothing was read or written.
    SourceNotFound,
    /// Opening, resizing, or saving failed. The output was not written.
    Failed { reason: String },
}

impl ResizeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResizeOutcome::Resized { .. })
    }
}

/// Plan a resize without executing it.
pub fn plan_resize(job: &ResizeJob) -> ResizeParams {
    let dims = job.size.dimensions();
    ResizeParams {
        source: job.source.clone(),
        output: job.output.clone(),
        width: dims.width,
        height: dims.height,
    }
}

/// Resize one image: existence check, open, resample, save.
pub fn resize_image(backend: &impl ImageBackend, job: &ResizeJob) -> ResizeOutcome {
    if !job.source.exists() {
        return ResizeOutcome::SourceNotFound;
    }

    let params = plan_resize(job);
    match backend.resize(&params) {
        Ok(()) => ResizeOutcome::Resized {
            dimensions: Dimensions {
                width: params.width,
                height: params.height,
            },
        },
        Err(e) => ResizeOutcome::Failed {
            reason: e.to_string(),
        },
    }
}
