//! Portrait rotation for raster input.

use image::DynamicImage;
use page_geometry::RasterPlan;
use tracing::debug;

/// Rotate an image 90° clockwise when the plan asks for it.
///
/// Portrait and square images come back unchanged.
pub fn rotate_to_portrait(img: &DynamicImage, plan: &RasterPlan) -> DynamicImage {
    let (w, h) = (img.width(), img.height());

    if plan.rotate_quarter {
        debug!(w, h, "Rotating landscape image to portrait");
        img.rotate90()
    } else {
        debug!(w, h, "Image is already portrait or square, no rotation needed");
        img.clone()
    }
}
