//! Resizing to the planned content size.
//!
//! Uses Lanczos3 filtering; aspect ratio comes from the plan, which already
//! rounded the height up.

use image::DynamicImage;
use image::imageops::FilterType;
use page_geometry::RasterPlan;
use tracing::debug;

use crate::{RasterError, Result};

/// Resize a portrait image to exactly the plan's content size.
///
/// The image must already be in portrait orientation (see
/// [`crate::rotate_to_portrait`]).
pub fn resize_to_plan(img: &DynamicImage, plan: &RasterPlan) -> Result<DynamicImage> {
    let (orig_w, orig_h) = (img.width(), img.height());
    let (expected_w, expected_h) = if plan.rotate_quarter {
        (plan.source_height_px, plan.source_width_px)
    } else {
        (plan.source_width_px, plan.source_height_px)
    };
    if (orig_w, orig_h) != (expected_w, expected_h) {
        return Err(RasterError::PlanMismatch {
            expected_width: expected_w,
            expected_height: expected_h,
            actual_width: orig_w,
            actual_height: orig_h,
        });
    }

    let (new_width, new_height) = (plan.content_width_px, plan.content_height_px);
    if (orig_w, orig_h) == (new_width, new_height) {
        debug!(new_width, new_height, "Image already at target size, skipping resize");
        return Ok(img.clone());
    }

    debug!(
        orig_w,
        orig_h,
        new_width,
        new_height,
        "Resizing image to content width"
    );

    Ok(img.resize_exact(new_width, new_height, FilterType::Lanczos3))
}
