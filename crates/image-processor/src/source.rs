//! Page source for raster images.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use page_geometry::{InputPage, NormalizeError, PageSource};
use tracing::info;

use crate::Result;
use crate::frames::decode_frames;

/// A decoded image seen as a document with one page per frame, at a fixed
/// density.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub path: PathBuf,
    pub density: u32,
    frames: Vec<DynamicImage>,
}

impl ImageSource {
    /// Decode every frame of the image at `path`.
    pub fn open(path: &Path, density: u32) -> Result<Self> {
        let source = Self::from_frames(path, decode_frames(path)?, density);
        info!(path = %path.display(), frames = source.frames.len(), density, "Image loaded");
        Ok(source)
    }

    /// Wrap already decoded frames.
    pub fn from_frames(path: &Path, frames: Vec<DynamicImage>, density: u32) -> Self {
        Self {
            path: path.to_path_buf(),
            density,
            frames,
        }
    }

    /// Frame `index` (0-based).
    pub fn frame(&self, index: usize) -> page_geometry::Result<&DynamicImage> {
        self.frames.get(index).ok_or(NormalizeError::NotFound {
            index,
            count: self.frames.len(),
        })
    }
}

impl PageSource for ImageSource {
    fn page_count(&self) -> usize {
        self.frames.len()
    }

    fn read(&self, index: usize) -> page_geometry::Result<InputPage> {
        let frame = self.frame(index)?;
        InputPage::from_pixels(frame.width(), frame.height(), self.density)
    }
}
