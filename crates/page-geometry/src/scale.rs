//! Scale computation for fixed-width output.
//!
//! Content is scaled uniformly so its width matches the printer's content
//! width. The scaled height is always rounded up so a page is never shorter
//! than its content.

use serde::Serialize;
use tracing::debug;

use crate::{NormalizeError, Result};

/// Result of fitting a box to a target width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaledBox {
    pub scale: f64,
    /// Always equal to the requested target width.
    pub content_width: f64,
    /// `ceil(height * scale)`, ignoring float noise around whole numbers.
    pub content_height: f64,
}

/// Relative distance below which a scaled height counts as a whole number.
const WHOLE_TOLERANCE: f64 = 1e-9;

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Round up, treating values within float noise of an integer as that integer.
pub fn ceil_snapped(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() <= WHOLE_TOLERANCE * value.abs().max(1.0) {
        nearest
    } else {
        value.ceil()
    }
}

/// Scale a `width × height` box uniformly to `target_width`.
///
/// Fails with [`NormalizeError::InvalidGeometry`] if either dimension or the
/// target is not a positive finite number.
pub fn fit_to_width(width: f64, height: f64, target_width: f64) -> Result<ScaledBox> {
    if !is_positive(width) || !is_positive(height) {
        return Err(NormalizeError::InvalidGeometry { width, height });
    }
    if !is_positive(target_width) {
        return Err(NormalizeError::InvalidGeometry {
            width: target_width,
            height,
        });
    }

    let scale = target_width / width;
    // multiply before dividing so exact ratios stay exact
    let content_height = ceil_snapped(height * target_width / width);

    debug!(
        width,
        height,
        target_width,
        scale,
        content_height,
        "Fitted content to target width"
    );

    Ok(ScaledBox {
        scale,
        content_width: target_width,
        content_height,
    })
}
