//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to resize and reports the outcome) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing operation logic.
//!
//! ## Types
//!
//! - [`TargetSize`] — Either a square edge length or an explicit width/height pair.
//! - [`Dimensions`] — A resolved `width × height` in pixels.
//! - [`ResizeJob`] — One source → output resize as configured, before size resolution.
//! - [`ResizeParams`] — Full specification for a resize: source, output path, target dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Requested output size.
///
/// In `resize.toml` a square is written as a bare integer (`size = 192`) and a
/// rectangle as a two-element array (`size = [1080, 1920]`). On the command
/// line the same sizes are written `192` and `1080x1920`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SizeRepr", into = "SizeRepr")]
pub enum TargetSize {
    /// `edge × edge`.
    Square(u32),
    /// Exact width and height. The source aspect ratio is not preserved.
    Rectangle { width: u32, height: u32 },
}

impl TargetSize {
    /// Resolve to concrete output dimensions.
    pub fn dimensions(self) -> Dimensions {
        match self {
            TargetSize::Square(edge) => Dimensions {
                width: edge,
                height: edge,
            },
            TargetSize::Rectangle { width, height } => Dimensions { width, height },
        }
    }

    /// True if any resolved dimension is zero.
    pub fn is_degenerate(self) -> bool {
        let dims = self.dimensions();
        dims.width == 0 || dims.height == 0
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSize::Square(edge) => write!(f, "{edge}"),
            TargetSize::Rectangle { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid size '{0}': expected an edge length like 192 or WIDTHxHEIGHT like 1080x1920")]
pub struct ParseSizeError(String);

impl FromStr for TargetSize {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseSizeError(s.to_string());

        match s.split_once(|c| c == 'x' || c == 'X') {
            Some((w, h)) => {
                let width = w.trim().parse().map_err(|_| err())?;
                let height = h.trim().parse().map_err(|_| err())?;
                Ok(TargetSize::Rectangle { width, height })
            }
            None => s.parse().map(TargetSize::Square).map_err(|_| err()),
        }
    }
}

/// On-disk shape of [`TargetSize`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Edge(u32),
    Pair([u32; 2]),
}

impl From<SizeRepr> for TargetSize {
    fn from(repr: SizeRepr) -> Self {
        match repr {
            SizeRepr::Edge(edge) => TargetSize::Square(edge),
            SizeRepr::Pair([width, height]) => TargetSize::Rectangle { width, height },
        }
    }
}

impl From<TargetSize> for SizeRepr {
    fn from(size: TargetSize) -> Self {
        match size {
            TargetSize::Square(edge) => SizeRepr::Edge(edge),
            TargetSize::Rectangle { width, height } => SizeRepr::Pair([width, height]),
        }
    }
}

/// One source → destination resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResizeJob {
    /// Image to read.
    pub source: PathBuf,
    /// Where to write the result. The extension picks the output format.
    pub output: PathBuf,
    /// `192` for a square, `[1080, 1920]` for width × height.
    pub size: TargetSize,
}

/// Parameters for a single resize operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}
