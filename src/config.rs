//! Batch configuration module.
//!
//! Handles loading, validating, and merging `resize.toml`. The stock defaults
//! describe the usual PWA asset set (two square app icons and two store
//! screenshots); a user file overrides just the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_dir = "public"       # Relative outputs are written under this directory
//!
//! [[jobs]]
//! source = "assets/app-icon.png"
//! output = "pwa-192x192.png"
//! size = 192                # Square: 192x192
//!
//! [[jobs]]
//! source = "assets/screenshot-mobile.png"
//! output = "screenshot-mobile.png"
//! size = [1080, 1920]       # Rectangle: width x height, stretched to fit
//! ```
//!
//! ## Path Resolution
//!
//! Relative `source` paths are resolved against the directory holding
//! `resize.toml`. Relative `output` paths are resolved against `base_dir`,
//! which is itself relative to that directory. Absolute paths are used as-is.
//!
//! ## Partial Configuration
//!
//! Tables merge key-by-key, everything else replaces. Setting `jobs` replaces
//! the whole stock job list:
//!
//! ```toml
//! base_dir = "dist/icons"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::batch::ResizeJob;
use crate::imaging::{TargetSize, supported_output_extensions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "resize.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Batch configuration loaded from `resize.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Directory that relative `output` paths are written under.
    pub base_dir: PathBuf,
    /// Resize jobs, run in order.
    pub jobs: Vec<ResizeJob>,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        let icon = PathBuf::from("assets/app-icon.png");
        Self {
            base_dir: PathBuf::from("public"),
            jobs: vec![
                ResizeJob {
                    source: icon.clone(),
                    output: "pwa-192x192.png".into(),
                    size: TargetSize::Square(192),
                },
                ResizeJob {
                    source: icon,
                    output: "pwa-512x512.png".into(),
                    size: TargetSize::Square(512),
                },
                ResizeJob {
                    source: "assets/screenshot-mobile.png".into(),
                    output: "screenshot-mobile.png".into(),
                    size: TargetSize::Rectangle {
                        width: 1080,
                        height: 1920,
                    },
                },
                ResizeJob {
                    source: "assets/screenshot-desktop.png".into(),
                    output: "screenshot-desktop.png".into(),
                    size: TargetSize::Rectangle {
                        width: 1920,
                        height: 1080,
                    },
                },
            ],
        }
    }
}

impl ResizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs.is_empty() {
            return Err(ConfigError::Validation("jobs must not be empty".into()));
        }
        for (i, job) in self.jobs.iter().enumerate() {
            if job.size.is_degenerate() {
                return Err(ConfigError::Validation(format!(
                    "jobs[{i}].size must be non-zero (got {})",
                    job.size
                )));
            }
            let ext = job
                .output
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase);
            match ext {
                None => {
                    return Err(ConfigError::Validation(format!(
                        "jobs[{i}].output '{}' needs a file extension to pick the image format",
                        job.output.display()
                    )));
                }
                Some(ext) if !supported_output_extensions().contains(&ext.as_str()) => {
                    return Err(ConfigError::Validation(format!(
                        "jobs[{i}].output '{}' has unsupported format '{ext}' (supported: {})",
                        job.output.display(),
                        supported_output_extensions().join(", ")
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Jobs with every path resolved against `root` (the config file's directory).
    pub fn resolved_jobs(&self, root: &Path) -> Vec<ResizeJob> {
        let base = root.join(&self.base_dir);
        self.jobs
            .iter()
            .map(|job| ResizeJob {
                source: root.join(&job.source),
                output: base.join(&job.output),
                size: job.size,
            })
            .collect()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizeConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file path.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<ResizeConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Directory that relative paths in the config at `path` resolve against.
pub fn config_root(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Returns a fully-commented stock `resize.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Resize Configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory that relative `output` paths are written under.
# Relative to the directory holding this file. Must already exist.
base_dir = "public"

# ---------------------------------------------------------------------------
# Jobs
# ---------------------------------------------------------------------------
# Each job resizes one source image to one output file, in order.
#   source - image to read (relative to this file's directory)
#   output - file to write (relative to base_dir); the extension picks the
#            format: png, jpg/jpeg, webp, tif/tiff, bmp, gif, ico
#   size   - 192 for a 192x192 square, or [width, height] for an exact
#            rectangle (the image is stretched, not cropped)
#
# Defining `jobs` here replaces this whole list.

[[jobs]]
source = "assets/app-icon.png"
output = "pwa-192x192.png"
size = 192

[[jobs]]
source = "assets/app-icon.png"
output = "pwa-512x512.png"
size = 512

[[jobs]]
source = "assets/screenshot-mobile.png"
output = "screenshot-mobile.png"
size = [1080, 1920]

[[jobs]]
source = "assets/screenshot-desktop.png"
output = "screenshot-desktop.png"
size = [1920, 1080]
"##
}
