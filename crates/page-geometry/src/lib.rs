//! Page geometry normalization for continuous-roll label printers.
//!
//! Computes, for any input page (any size, any `/Rotate`, any crop box), a
//! single affine transform that bakes the rotation into the content, turns
//! landscape pages to portrait and scales everything to a fixed content width.
//! The crate is pure arithmetic; reading and rendering pages is done through
//! the [`PageSource`] and [`PageRenderer`] traits.

pub mod check;
pub mod document;
pub mod job;
pub mod options;
pub mod page;
pub mod raster;
pub mod rotation;
pub mod scale;
pub mod transform;

// Re-exports for convenience
pub use check::{OutputCheck, OutputPage, check_output};
pub use document::{NormalizedDocument, PageRenderer, PageSource, normalize_document};
pub use job::PrintJobSpec;
pub use options::NormalizeConfig;
pub use page::{InputPage, NormalizedPage, normalize_page};
pub use raster::{RasterPlan, plan_raster};
pub use rotation::{Corner, Rotation};
pub use scale::{ScaledBox, fit_to_width};
pub use transform::Affine;

/// Points per inch (1 pt = 1/72 in).
pub const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Convert millimetres to points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_INCH / MM_PER_INCH
}

/// Convert pixels at `density` DPI to points.
pub fn px_to_pt(px: f64, density: u32) -> f64 {
    px * POINTS_PER_INCH / f64::from(density)
}

/// Convert points to (fractional) pixels at `density` DPI.
pub fn pt_to_px(pt: f64, density: u32) -> f64 {
    pt * f64::from(density) / POINTS_PER_INCH
}

/// Errors that can occur while normalizing pages.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Invalid page geometry {width}x{height}: width and height must be positive")]
    InvalidGeometry { width: f64, height: f64 },

    #[error("Unsupported page rotation {0}°: must be a multiple of 90")]
    UnsupportedRotation(i64),

    /// Wraps the failure of a single page; `index` is 0-based.
    #[error("Failed to process page {index}")]
    PageProcessing {
        index: usize,
        #[source]
        source: Box<NormalizeError>,
    },

    #[error("Page {index} not found (document has {count} pages)")]
    NotFound { index: usize, count: usize },

    #[error("Render error: {0}")]
    Render(String),
}

impl NormalizeError {
    /// Wrap this error as the failure of page `index`.
    pub fn for_page(self, index: usize) -> Self {
        Self::PageProcessing {
            index,
            source: Box::new(self),
        }
    }
}

/// Result type alias for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;
