//! Built-in rasterizer for image input.
//!
//! Decodes every frame of an image and executes a
//! [`page_geometry::RasterPlan`] per frame: portrait rotation, resizing to
//! the printer content width, monochrome conversion and right-margin canvas
//! extension.

pub mod canvas;
pub mod dither;
pub mod frames;
pub mod render;
pub mod resize;
pub mod rotate;
pub mod source;

// Re-exports for convenience
pub use canvas::extend_right;
pub use dither::{Monochrome, apply_monochrome, floyd_steinberg_dither, threshold_convert};
pub use frames::decode_frames;
pub use render::{RenderedFrame, render_raster, render_source};
pub use resize::resize_to_plan;
pub use rotate::rotate_to_portrait;
pub use source::ImageSource;

/// Errors that can occur while rasterizing an image.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image is {actual_width}x{actual_height}, plan expects {expected_width}x{expected_height}")]
    PlanMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error(transparent)]
    Geometry(#[from] page_geometry::NormalizeError),
}

impl From<RasterError> for page_geometry::NormalizeError {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::Geometry(inner) => inner,
            other => Self::Render(other.to_string()),
        }
    }
}

/// Result type alias for rasterizer operations.
pub type Result<T> = std::result::Result<T, RasterError>;
