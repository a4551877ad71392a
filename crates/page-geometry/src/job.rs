//! Print job description handed to the spooler.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::page::NormalizedPage;
use crate::raster::RasterPlan;

/// Output size and identity of one print job.
///
/// Sizes are whole points, rounded from the computed page size and passed on
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintJobSpec {
    pub output_width_pts: u32,
    pub output_height_pts: u32,
    pub title: String,
    pub source_path: PathBuf,
}

impl PrintJobSpec {
    pub fn new(page_width: f64, page_height: f64, title: impl Into<String>, source_path: &Path) -> Self {
        Self {
            output_width_pts: page_width.round() as u32,
            output_height_pts: page_height.round() as u32,
            title: title.into(),
            source_path: source_path.to_path_buf(),
        }
    }

    /// Job for a normalized document, sized from its first page.
    pub fn for_page(page: &NormalizedPage, title: impl Into<String>, source_path: &Path) -> Self {
        Self::new(page.page_width, page.page_height, title, source_path)
    }

    /// Job for a rasterized image.
    pub fn for_raster(plan: &RasterPlan, title: impl Into<String>, source_path: &Path) -> Self {
        Self::new(plan.page_width(), plan.page_height(), title, source_path)
    }

    /// Custom media size understood by CUPS, e.g. `Custom.283x367`.
    pub fn page_size(&self) -> String {
        format!(
            "Custom.{}x{}",
            self.output_width_pts, self.output_height_pts
        )
    }

    /// Arguments for `lp` describing this job (destination not included).
    pub fn lp_options(&self) -> Vec<String> {
        vec![
            "-t".to_string(),
            self.title.clone(),
            "-o".to_string(),
            format!("PageSize={}", self.page_size()),
        ]
    }
}
