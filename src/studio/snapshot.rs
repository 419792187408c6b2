//! Snapshot Export
//!
//! Turns the most recently rendered frame into a downloadable PNG named with
//! a timestamp. Capture failures and empty frames are reported, never
//! written out.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use super::error::{StudioError, StudioResult};

/// Anything that can hand back the pixels of the last rendered frame.
pub trait FrameSource {
    fn capture(&mut self) -> StudioResult<RgbaImage>;
}

/// An encoded snapshot ready to be saved or downloaded.
#[derive(Debug, Clone)]
pub struct ExportedSnapshot {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl ExportedSnapshot {
    /// Write into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> StudioResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png)?;
        tracing::info!(path = %path.display(), bytes = self.png.len(), "snapshot written");
        Ok(path)
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotExporter {
    prefix: String,
}

impl Default for SnapshotExporter {
    fn default() -> Self {
        Self::new("tee-design")
    }
}

impl SnapshotExporter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn file_name(&self, timestamp_ms: u64) -> String {
        format!("{}-{}.png", self.prefix, timestamp_ms)
    }

    /// Capture from `source` and encode.
    pub fn export(
        &self,
        source: &mut dyn FrameSource,
        timestamp_ms: u64,
    ) -> StudioResult<ExportedSnapshot> {
        let frame = source.capture().inspect_err(|err| {
            tracing::error!(%err, "snapshot capture failed");
        })?;
        self.encode(frame, timestamp_ms)
    }

    /// Encode an already captured frame.
    pub fn encode(&self, frame: RgbaImage, timestamp_ms: u64) -> StudioResult<ExportedSnapshot> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 || frame.as_raw().is_empty() {
            return Err(StudioError::capture("captured frame is empty"));
        }

        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(frame)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| StudioError::Encode(e.to_string()))?;

        Ok(ExportedSnapshot {
            file_name: self.file_name(timestamp_ms),
            width,
            height,
            png,
        })
    }
}
