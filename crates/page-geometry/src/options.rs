//! Normalization options.
//!
//! One process-wide configuration is built at start-up and shared read-only
//! by every page of a run.

use serde::Serialize;

use crate::{NormalizeError, Result, mm_to_pt};

/// Default content width: 10 cm.
pub const DEFAULT_CONTENT_WIDTH_MM: f64 = 100.0;

/// Target geometry for normalized pages, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizeConfig {
    /// Width the page content is scaled to.
    pub content_width: f64,

    /// Blank space appended to the right of the content. May be zero.
    pub right_margin: f64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            content_width: mm_to_pt(DEFAULT_CONTENT_WIDTH_MM),
            right_margin: 0.0,
        }
    }
}

impl NormalizeConfig {
    /// Create options with the default 10 cm content width and no margin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the content width in points.
    pub fn with_content_width(mut self, points: f64) -> Self {
        self.content_width = points;
        self
    }

    /// Builder: set the right margin in points.
    pub fn with_right_margin(mut self, points: f64) -> Self {
        self.right_margin = points;
        self
    }

    /// Full output page width (content plus margin).
    pub fn page_width(&self) -> f64 {
        self.content_width + self.right_margin
    }

    /// Reject non-positive content widths and negative margins.
    pub fn validate(&self) -> Result<()> {
        if !(self.content_width.is_finite() && self.content_width > 0.0) {
            return Err(NormalizeError::InvalidGeometry {
                width: self.content_width,
                height: 0.0,
            });
        }
        if !(self.right_margin.is_finite() && self.right_margin >= 0.0) {
            return Err(NormalizeError::InvalidGeometry {
                width: self.right_margin,
                height: 0.0,
            });
        }
        Ok(())
    }
}
