//! Batch execution of resize jobs.
//!
//! A batch is an ordered list of [`ResizeJob`] records, usually loaded from
//! `resize.toml`. Jobs run one after another on the calling thread. They share
//! nothing, so a failure only ends the job it happened in; every remaining job
//! still runs.
//!
//! Each finished job produces a [`JobReport`], handed to a callback right away
//! (the CLI prints it) and collected into the returned [`BatchReport`].

use crate::imaging::{ImageBackend, ResizeOutcome, resize_image};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

pub use crate::imaging::ResizeJob;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A job together with how it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobReport {
    pub job: ResizeJob,
    pub outcome: ResizeOutcome,
}

/// Collected reports for a whole batch, in job order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub reports: Vec<JobReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, ResizeOutcome::Resized { .. }))
    }

    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, ResizeOutcome::SourceNotFound))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ResizeOutcome::Failed { .. }))
    }

    /// True when every job wrote its output. An empty batch counts as success.
    pub fn all_succeeded(&self) -> bool {
        self.reports.iter().all(|r| r.outcome.is_success())
    }

    fn count(&self, pred: impl Fn(&ResizeOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), BatchError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Run every job in order, calling `on_report` as each one finishes.
pub fn run_batch(
    backend: &impl ImageBackend,
    jobs: &[ResizeJob],
    mut on_report: impl FnMut(&JobReport),
) -> BatchReport {
    let mut reports = Vec::with_capacity(jobs.len());

    for job in jobs {
        let report = JobReport {
            job: job.clone(),
            outcome: resize_image(backend, job),
        };
        on_report(&report);
        reports.push(report);
    }

    BatchReport { reports }
}
