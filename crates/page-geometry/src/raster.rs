//! Geometry for raster (image) input.
//!
//! Images carry no rotation metadata, so only the portrait turn and the
//! fit-to-width step apply. The plan is expressed as rasterizer directives
//! in pixels at a fixed density; the right margin is realized by extending
//! the canvas.

use serde::Serialize;
use tracing::debug;

use crate::options::NormalizeConfig;
use crate::scale::fit_to_width;
use crate::{NormalizeError, Result, pt_to_px, px_to_pt};

/// Default rasterizer density, in dots per inch.
pub const DEFAULT_DENSITY: u32 = 208;

/// Directives for turning one image into a printer-ready page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RasterPlan {
    pub source_width_px: u32,
    pub source_height_px: u32,
    /// Rotate 90° clockwise before scaling.
    pub rotate_quarter: bool,
    pub scale: f64,
    pub content_width_px: u32,
    pub content_height_px: u32,
    /// Content width plus the right margin.
    pub canvas_width_px: u32,
    pub density: u32,
}

impl RasterPlan {
    /// Output page width in points.
    pub fn page_width(&self) -> f64 {
        px_to_pt(f64::from(self.canvas_width_px), self.density)
    }

    /// Output page height in points.
    pub fn page_height(&self) -> f64 {
        px_to_pt(f64::from(self.content_height_px), self.density)
    }

    /// Width actually covered by the image content, in points.
    pub fn content_width(&self) -> f64 {
        px_to_pt(f64::from(self.content_width_px), self.density)
    }

    /// Output size rounded to whole points.
    pub fn rounded_size(&self) -> (u32, u32) {
        (
            self.page_width().round() as u32,
            self.page_height().round() as u32,
        )
    }

    pub fn description(&self) -> String {
        let (w, h) = self.rounded_size();
        format!(
            "{}x{} px{} ⇒ {}x{} px @ {} dpi ⇒ {w}x{h}\n▶ {:.1}%",
            self.source_width_px,
            self.source_height_px,
            if self.rotate_quarter { " ↻90°" } else { "" },
            self.canvas_width_px,
            self.content_height_px,
            self.density,
            self.scale * 100.0,
        )
    }
}

/// Plan the conversion of a `width_px × height_px` image.
pub fn plan_raster(
    width_px: u32,
    height_px: u32,
    config: &NormalizeConfig,
    density: u32,
) -> Result<RasterPlan> {
    if width_px == 0 || height_px == 0 || density == 0 {
        return Err(NormalizeError::InvalidGeometry {
            width: f64::from(width_px),
            height: f64::from(height_px),
        });
    }
    config.validate()?;

    let rotate_quarter = width_px > height_px;
    let (w, h) = if rotate_quarter {
        debug!(
            w = width_px,
            h = height_px,
            "Landscape image detected, rotating to portrait"
        );
        (height_px, width_px)
    } else {
        (width_px, height_px)
    };

    let content_width_px = pt_to_px(config.content_width, density).round().max(1.0) as u32;
    let margin_px = pt_to_px(config.right_margin, density).round() as u32;
    let fit = fit_to_width(f64::from(w), f64::from(h), f64::from(content_width_px))?;
    // integer ceiling avoids float noise on exact ratios
    let content_height_px = (u64::from(h) * u64::from(content_width_px)).div_ceil(u64::from(w));

    let too_large = || NormalizeError::InvalidGeometry {
        width: config.page_width(),
        height: f64::from(h),
    };
    let content_height_px = u32::try_from(content_height_px).map_err(|_| too_large())?;
    let canvas_width_px = content_width_px
        .checked_add(margin_px)
        .ok_or_else(too_large)?;

    let plan = RasterPlan {
        source_width_px: width_px,
        source_height_px: height_px,
        rotate_quarter,
        scale: fit.scale,
        content_width_px,
        content_height_px,
        canvas_width_px,
        density,
    };
    debug!(?plan, "Raster plan computed");
    Ok(plan)
}
