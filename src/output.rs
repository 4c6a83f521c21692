//! CLI output formatting.
//!
//! Every job produces exactly one status line:
//!
//! ```text
//! Resized assets/app-icon.png to 192x192 at public/pwa-192x192.png
//! Error: assets/screenshot-desktop.png not found
//! Failed to resize assets/broken.png: Failed to decode assets/broken.png: ...
//! ```
//!
//! and a batch ends with a summary:
//!
//! ```text
//! Done: 2 resized, 1 not found, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function is pure (returns `String` or `Vec<String>`) for
//! testability, with a `print_*` wrapper that writes to stdout.

use crate::batch::{BatchReport, JobReport, ResizeJob};
use crate::imaging::ResizeOutcome;

/// Format the status line for one finished job.
pub fn format_job_report(report: &JobReport) -> String {
    let source = report.job.source.display();
    match &report.outcome {
        ResizeOutcome::Resized { dimensions } => format!(
            "Resized {} to {} at {}",
            source,
            dimensions,
            report.job.output.display()
        ),
        ResizeOutcome::SourceNotFound => format!("Error: {} not found", source),
        ResizeOutcome::Failed { reason } => format!("Failed to resize {}: {}", source, reason),
    }
}

pub fn print_job_report(report: &JobReport) {
    println!("{}", format_job_report(report));
}

/// Format the one-line batch summary.
pub fn format_batch_summary(report: &BatchReport) -> String {
    format!(
        "Done: {} resized, {} not found, {} failed",
        report.succeeded(),
        report.not_found(),
        report.failed()
    )
}

pub fn print_batch_summary(report: &BatchReport) {
    println!("{}", format_batch_summary(report));
}

/// Format the job list shown by `check`.
///
/// ```text
/// 001 assets/app-icon.png → public/pwa-192x192.png (192x192)
///     Source: 1024x1024
/// 002 assets/missing.png → public/out.png (48x48)
///     Source: not found
/// ```
///
/// `source_info` carries one entry per job: the source dimensions when the
/// file could be identified, otherwise a short reason.
pub fn format_job_plan(
    jobs: &[ResizeJob],
    source_info: &[Result<(u32, u32), String>],
) -> Vec<String> {
    let mut lines = Vec::with_capacity(jobs.len() * 2);
    for (i, (job, info)) in jobs.iter().zip(source_info).enumerate() {
        lines.push(format!(
            "{:0>3} {} → {} ({})",
            i + 1,
            job.source.display(),
            job.output.display(),
            job.size.dimensions()
        ));
        match info {
            Ok((w, h)) => lines.push(format!("    Source: {}x{}", w, h)),
            Err(reason) => lines.push(format!("    Source: {}", reason)),
        }
    }
    lines
}

pub fn print_job_plan(jobs: &[ResizeJob], source_info: &[Result<(u32, u32), String>]) {
    for line in format_job_plan(jobs, source_info) {
        println!("{}", line);
    }
}
