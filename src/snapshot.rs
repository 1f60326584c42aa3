//! Snapshot writer: one annotated JPEG per alert.
//!
//! Files are named `intruder_<YYYYMMDD_HHMMSS>.jpg` from the trigger's
//! receipt time.  Two triggers within the same second map to the same name
//! and the later one overwrites the earlier.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::ImageFormat;

use crate::error::SnapshotError;
use crate::video::Frame;
use crate::video::overlay::Overlay;

pub const FILE_PREFIX: &str = "intruder_";
pub const FILE_EXTENSION: &str = "jpg";

/// `intruder_20261014_120000.jpg` for 2026-10-14 12:00:00 local time.
pub fn file_name(at: DateTime<Local>) -> String {
    format!("{FILE_PREFIX}{}.{FILE_EXTENSION}", at.format("%Y%m%d_%H%M%S"))
}

pub struct SnapshotWriter {
    dir: PathBuf,
    overlay: Overlay,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, overlay: Overlay) -> Self {
        Self {
            dir: dir.into(),
            overlay,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Burn the overlay into a copy of `frame` and write it.
    ///
    /// Returns the absolute path of the written file.  The caller's frame is
    /// left untouched.  No retry on failure.
    pub fn write(&self, frame: &Frame, at: DateTime<Local>) -> Result<PathBuf, SnapshotError> {
        let mut annotated = frame.clone();
        self.overlay.draw(&mut annotated);

        let path = self.dir.join(file_name(at));
        annotated
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|e| SnapshotError {
                path: path.clone(),
                reason: e.to_string(),
                source: match e {
                    image::ImageError::IoError(io) => Some(io),
                    _ => None,
                },
            })?;

        Ok(std::path::absolute(&path).unwrap_or(path))
    }
}
