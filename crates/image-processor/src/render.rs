//! Raster pipeline: rotate, resize, convert, extend.

use image::{DynamicImage, GrayImage};
use page_geometry::{NormalizeConfig, NormalizeError, PageSource, RasterPlan, plan_raster};
use tracing::{debug, info};

use crate::canvas::extend_right;
use crate::dither::{Monochrome, apply_monochrome};
use crate::resize::resize_to_plan;
use crate::rotate::rotate_to_portrait;
use crate::source::ImageSource;
use crate::{RasterError, Result};

/// Execute `plan` on a decoded image.
///
/// The output is `canvas_width_px × content_height_px` grayscale pixels with
/// the content flush left.
pub fn render_raster(img: &DynamicImage, plan: &RasterPlan, mode: Monochrome) -> Result<GrayImage> {
    if (img.width(), img.height()) != (plan.source_width_px, plan.source_height_px) {
        return Err(RasterError::PlanMismatch {
            expected_width: plan.source_width_px,
            expected_height: plan.source_height_px,
            actual_width: img.width(),
            actual_height: img.height(),
        });
    }

    let portrait = rotate_to_portrait(img, plan);
    let resized = resize_to_plan(&portrait, plan)?;
    let gray = apply_monochrome(&resized.to_luma8(), mode);
    let output = extend_right(&gray, plan.canvas_width_px);

    debug!(
        width = output.width(),
        height = output.height(),
        %mode,
        "Raster rendered"
    );
    Ok(output)
}

/// One frame rendered to its output page.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub plan: RasterPlan,
    pub image: GrayImage,
}

/// Plan and render every frame of `source` in order.
///
/// Each frame is planned from its own size. A failing frame aborts the
/// whole source with [`NormalizeError::PageProcessing`] carrying its index;
/// a source without frames fails with [`NormalizeError::NotFound`].
pub fn render_source(
    source: &ImageSource,
    config: &NormalizeConfig,
    mode: Monochrome,
) -> Result<Vec<RenderedFrame>> {
    let count = source.page_count();
    if count == 0 {
        return Err(NormalizeError::NotFound { index: 0, count: 0 }.into());
    }
    info!(path = %source.path.display(), frames = count, "Rasterizing image");

    (0..count)
        .map(|index| {
            render_frame(source, index, config, mode)
                .map_err(|err| RasterError::Geometry(NormalizeError::from(err).for_page(index)))
        })
        .collect()
}

fn render_frame(
    source: &ImageSource,
    index: usize,
    config: &NormalizeConfig,
    mode: Monochrome,
) -> Result<RenderedFrame> {
    let img = source.frame(index)?;
    let plan = plan_raster(img.width(), img.height(), config, source.density)?;
    let image = render_raster(img, &plan, mode)?;
    debug!(index, w = img.width(), h = img.height(), "Frame rendered");
    Ok(RenderedFrame { plan, image })
}
