//! Single-page normalization.
//!
//! [`normalize_page`] composes, in order: translate by the negated crop
//! origin, undo the page rotation, turn landscape content a further quarter
//! turn, and scale to the content width. The result is one [`Affine`] that a
//! renderer applies once.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::options::NormalizeConfig;
use crate::rotation::Rotation;
use crate::scale::fit_to_width;
use crate::transform::Affine;
use crate::{NormalizeError, Result, px_to_pt};

/// Geometry of one source page.
///
/// `width` and `height` are the crop box size in the unrotated page frame,
/// in points. `crop_origin` is the crop box lower-left corner in the page's
/// native coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputPage {
    pub width: f64,
    pub height: f64,
    pub rotation: Rotation,
    pub crop_origin: (f64, f64),
}

impl InputPage {
    /// Build a page from raw values, validating size and rotation.
    pub fn new(width: f64, height: f64, rotation_degrees: i64, crop_origin: (f64, f64)) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(NormalizeError::InvalidGeometry { width, height });
        }
        Ok(Self {
            width,
            height,
            rotation: Rotation::from_degrees(rotation_degrees)?,
            crop_origin,
        })
    }

    /// An unrotated, uncropped page of the given size.
    pub fn upright(width: f64, height: f64) -> Result<Self> {
        Self::new(width, height, 0, (0.0, 0.0))
    }

    /// A raster image of `width_px × height_px` pixels at `density` DPI.
    pub fn from_pixels(width_px: u32, height_px: u32, density: u32) -> Result<Self> {
        if density == 0 {
            return Err(NormalizeError::InvalidGeometry {
                width: f64::from(width_px),
                height: f64::from(height_px),
            });
        }
        Self::upright(
            px_to_pt(f64::from(width_px), density),
            px_to_pt(f64::from(height_px), density),
        )
    }

    /// Size as displayed, i.e. after the page rotation is applied.
    pub fn displayed_size(&self) -> (f64, f64) {
        self.rotation.rotated_size(self.width, self.height)
    }
}

/// A page after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPage {
    pub source: InputPage,
    /// Whether an extra quarter turn was applied to reach portrait.
    pub portrait_turn: bool,
    pub scale: f64,
    pub content_width: f64,
    pub content_height: f64,
    /// Content width plus the right margin.
    pub page_width: f64,
    pub page_height: f64,
    /// Maps source page space onto the output page.
    pub transform: Affine,
}

impl NormalizedPage {
    /// Output size rounded to whole points, as reported to the print spooler.
    pub fn rounded_size(&self) -> (u32, u32) {
        (
            self.page_width.round() as u32,
            self.page_height.round() as u32,
        )
    }

    /// Human-readable summary of the transform, showing the page as
    /// displayed (after its rotation), e.g.
    /// `612.0×792.0 0° ⇒ 283x367` / `▶ 0.0,0.0 46.3%`.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NormalizedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.rounded_size();
        let (shown_w, shown_h) = self.source.displayed_size();
        let (shift_x, shift_y) = self.transform.translation();
        // +0.0 turns -0.0 into 0.0 for display
        let (shift_x, shift_y) = (shift_x + 0.0, shift_y + 0.0);
        write!(
            f,
            "{:.1}×{:.1} {}°{} ⇒ {w}x{h}\n▶ {shift_x:.1},{shift_y:.1} {:.1}%",
            shown_w,
            shown_h,
            self.source.rotation.degrees(),
            if self.portrait_turn { " ↻90°" } else { "" },
            self.scale * 100.0,
        )
    }
}

/// Compute the transform and output size for one page.
pub fn normalize_page(page: &InputPage, config: &NormalizeConfig) -> Result<NormalizedPage> {
    if !(page.width.is_finite() && page.width > 0.0 && page.height.is_finite() && page.height > 0.0)
    {
        return Err(NormalizeError::InvalidGeometry {
            width: page.width,
            height: page.height,
        });
    }
    config.validate()?;

    let (origin_x, origin_y) = page.crop_origin;
    let crop = Affine::translate(-origin_x, -origin_y);

    let unrotate = page.rotation.undo(page.width, page.height);
    let (upright_w, upright_h) = page.displayed_size();

    let portrait_turn = upright_w > upright_h;
    let (turn, portrait_w, portrait_h) = if portrait_turn {
        debug!(
            w = upright_w,
            h = upright_h,
            "Landscape page detected, rotating to portrait"
        );
        (
            Rotation::Quarter.undo(upright_w, upright_h),
            upright_h,
            upright_w,
        )
    } else {
        (Affine::IDENTITY, upright_w, upright_h)
    };

    let fit = fit_to_width(portrait_w, portrait_h, config.content_width)?;
    let transform = crop
        .then(unrotate)
        .then(turn)
        .then(Affine::scale(fit.scale));

    let normalized = NormalizedPage {
        source: *page,
        portrait_turn,
        scale: fit.scale,
        content_width: fit.content_width,
        content_height: fit.content_height,
        page_width: fit.content_width + config.right_margin,
        page_height: fit.content_height,
        transform,
    };

    debug!(
        rotation = page.rotation.degrees(),
        portrait_turn,
        scale = fit.scale,
        page_width = normalized.page_width,
        page_height = normalized.page_height,
        "Page normalized"
    );

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 283.46;

    fn config() -> NormalizeConfig {
        NormalizeConfig::new().with_content_width(W)
    }

    fn page(width: f64, height: f64, rotation: i64) -> InputPage {
        InputPage::new(width, height, rotation, (0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_letter_portrait() {
        let n = normalize_page(&page(612.0, 792.0, 0), &config()).unwrap();
        assert!(!n.portrait_turn);
        assert!((n.scale - 0.46317).abs() < 1e-4);
        assert_eq!(n.content_width, W);
        assert_eq!(n.content_height, 367.0);
        assert_eq!(n.rounded_size(), (283, 367));
    }

    #[test]
    fn test_letter_landscape_matches_portrait() {
        let portrait = normalize_page(&page(612.0, 792.0, 0), &config()).unwrap();
        let landscape = normalize_page(&page(792.0, 612.0, 0), &config()).unwrap();
        assert!(landscape.portrait_turn);
        assert_eq!(landscape.content_height, portrait.content_height);
        assert_eq!(landscape.rounded_size(), portrait.rounded_size());
    }

    #[test]
    fn test_a4_rotated_quarter_cancels_portrait_turn() {
        let upright = normalize_page(&page(595.0, 842.0, 0), &config()).unwrap();
        let rotated = normalize_page(&page(595.0, 842.0, 90), &config()).unwrap();
        assert!(rotated.portrait_turn);
        assert_eq!(rotated.rounded_size(), upright.rounded_size());
        assert_eq!(rotated.content_height, upright.content_height);
        // rotation undo + portrait turn = half turn of the content
        let expected = Rotation::Half
            .undo(595.0, 842.0)
            .then(Affine::scale(upright.scale));
        assert!(rotated.transform.approx_eq(&expected, 1e-9));
    }

    #[test]
    fn test_right_margin_widens_page_only() {
        let config = config().with_right_margin(14.0);
        let n = normalize_page(&page(612.0, 792.0, 0), &config).unwrap();
        assert_eq!(n.content_width, W);
        assert_eq!(n.page_width, W + 14.0);
        assert_eq!(n.page_height, n.content_height);
        assert_eq!(n.rounded_size(), (297, 367));
    }

    #[test]
    fn test_portrait_invariant_for_all_rotations() {
        let sizes = [(612.0, 792.0), (792.0, 612.0), (100.0, 100.0), (10.0, 5000.0), (3000.0, 20.0)];
        for (w, h) in sizes {
            for rotation in [0, 90, 180, 270] {
                let n = normalize_page(&page(w, h, rotation), &config()).unwrap();
                assert!(
                    n.page_height >= n.content_width,
                    "{w}x{h}@{rotation}: {}x{}",
                    n.content_width,
                    n.page_height
                );
                assert_eq!(n.content_width, W);
            }
        }
    }

    #[test]
    fn test_content_height_is_ceiling_of_scaled_height() {
        for (w, h, rotation) in [(612.0, 792.0, 0), (595.0, 842.0, 180), (300.0, 1234.5, 270)] {
            let n = normalize_page(&page(w, h, rotation), &config()).unwrap();
            let (uw, uh) = Rotation::from_degrees(rotation).unwrap().rotated_size(w, h);
            let (pw, ph) = if uw > uh { (uh, uw) } else { (uw, uh) };
            assert_eq!(n.content_height, crate::scale::ceil_snapped(ph * W / pw));
        }
    }

    #[test]
    fn test_transform_maps_crop_box_onto_content_box() {
        let (ox, oy) = (30.0, 45.0);
        for (w, h) in [(400.0, 600.0), (600.0, 400.0)] {
            for rotation in [0, 90, 180, 270] {
                let input = InputPage::new(w, h, rotation, (ox, oy)).unwrap();
                let n = normalize_page(&input, &config()).unwrap();
                let (min_x, min_y, max_x, max_y) = n.transform.map_rect(ox, oy, ox + w, oy + h);
                assert!(min_x.abs() < 1e-9 && min_y.abs() < 1e-9, "{rotation}: origin {min_x},{min_y}");
                assert!((max_x - W).abs() < 1e-9, "{rotation}: width {max_x}");
                assert!(max_y <= n.content_height + 1e-9);
                assert!(n.content_height - max_y < 1.0);
            }
        }
    }

    #[test]
    fn test_already_normalized_page_is_unchanged() {
        let n = normalize_page(&page(W, 500.0, 0), &config()).unwrap();
        assert!(!n.portrait_turn);
        assert_eq!(n.scale, 1.0);
        assert_eq!(n.content_width, W);
        assert_eq!(n.content_height, 500.0);
        assert!(n.transform.approx_eq(&Affine::IDENTITY, 1e-12));
    }

    #[test]
    fn test_square_page_not_turned() {
        let n = normalize_page(&page(500.0, 500.0, 0), &config()).unwrap();
        assert!(!n.portrait_turn);
        assert_eq!(n.content_height, W.ceil());
    }

    #[test]
    fn test_rejects_45_degrees() {
        assert!(matches!(
            InputPage::new(612.0, 792.0, 45, (0.0, 0.0)),
            Err(NormalizeError::UnsupportedRotation(45))
        ));
    }

    #[test]
    fn test_rejects_zero_width() {
        assert!(matches!(
            InputPage::new(0.0, 792.0, 0, (0.0, 0.0)),
            Err(NormalizeError::InvalidGeometry { .. })
        ));
        let bad = InputPage {
            width: 0.0,
            height: 792.0,
            rotation: Rotation::None,
            crop_origin: (0.0, 0.0),
        };
        assert!(matches!(
            normalize_page(&bad, &config()),
            Err(NormalizeError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_from_pixels_uses_density() {
        let p = InputPage::from_pixels(416, 832, 208).unwrap();
        assert!((p.width - 144.0).abs() < 1e-9);
        assert!((p.height - 288.0).abs() < 1e-9);
        assert_eq!(p.rotation, Rotation::None);
        assert!(InputPage::from_pixels(0, 10, 208).is_err());
        assert!(InputPage::from_pixels(10, 10, 0).is_err());
    }

    #[test]
    fn test_description_format() {
        let n = normalize_page(&page(612.0, 792.0, 0), &config()).unwrap();
        assert_eq!(n.description(), "612.0×792.0 0° ⇒ 283x367\n▶ 0.0,0.0 46.3%");

        let turned = normalize_page(&page(792.0, 612.0, 0), &config()).unwrap();
        assert!(turned.description().starts_with("792.0×612.0 0° ↻90° ⇒ 283x367"));
    }

    #[test]
    fn test_description_shows_displayed_size() {
        let n = normalize_page(&page(595.0, 842.0, 90), &config()).unwrap();
        assert!(n.description().starts_with("842.0×595.0 90° ↻90° ⇒ "), "{}", n.description());

        let half = normalize_page(&page(595.0, 842.0, 180), &config()).unwrap();
        assert!(half.description().starts_with("595.0×842.0 180° ⇒ "));
    }

    #[test]
    fn test_normalized_pages_are_fixed_points() {
        for height in (284..=3_000).map(f64::from) {
            let n = normalize_page(&page(W, height, 0), &config()).unwrap();
            assert!(!n.portrait_turn);
            assert_eq!(n.scale, 1.0);
            assert_eq!(n.content_height, height, "height {height}");
            assert!(n.transform.approx_eq(&Affine::IDENTITY, 1e-12));

            let again = normalize_page(
                &page(n.content_width, n.content_height, 0),
                &config(),
            )
            .unwrap();
            assert_eq!(again.content_height, n.content_height);
        }
    }
}
