//! Monochrome conversion for thermal label printers.
//!
//! Label printers only print black dots, so grayscale content is either
//! thresholded (best for line art and text) or dithered with Floyd-Steinberg
//! error diffusion (best for photos).

use std::fmt;
use std::str::FromStr;

use image::GrayImage;
use serde::Serialize;
use tracing::debug;

/// Default threshold level for binarization, as a fraction of white.
pub const DEFAULT_THRESHOLD: f32 = 0.48;

/// How grayscale content is turned into black and white.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum Monochrome {
    /// Pixels at or above `level` (0.0..=1.0) become white.
    Threshold { level: f32 },
    /// Floyd-Steinberg error diffusion.
    Dither,
    /// Keep grayscale.
    None,
}

impl Default for Monochrome {
    fn default() -> Self {
        Monochrome::Threshold {
            level: DEFAULT_THRESHOLD,
        }
    }
}

impl FromStr for Monochrome {
    type Err = String;

    /// Parse `threshold`, `dither` or `none`; thresholds use the default level.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threshold" => Ok(Monochrome::default()),
            "dither" => Ok(Monochrome::Dither),
            "none" => Ok(Monochrome::None),
            other => Err(format!(
                "unknown monochrome mode '{other}' (expected threshold, dither or none)"
            )),
        }
    }
}

impl fmt::Display for Monochrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Monochrome::Threshold { level } => write!(f, "threshold({level:.2})"),
            Monochrome::Dither => f.write_str("dither"),
            Monochrome::None => f.write_str("none"),
        }
    }
}

/// Convert a fractional level to an 8-bit threshold.
fn level_to_u8(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Apply the selected conversion.
pub fn apply_monochrome(img: &GrayImage, mode: Monochrome) -> GrayImage {
    match mode {
        Monochrome::Threshold { level } => threshold_convert(img, level_to_u8(level)),
        Monochrome::Dither => floyd_steinberg_dither(img),
        Monochrome::None => img.clone(),
    }
}

/// Apply Floyd-Steinberg dithering to a grayscale image.
///
/// Error distribution pattern:
/// - Right:        7/16
/// - Bottom-left:  3/16
/// - Bottom:       5/16
/// - Bottom-right: 1/16
pub fn floyd_steinberg_dither(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    debug!(width, height, "Applying Floyd-Steinberg dithering");

    let (w, h) = (width as usize, height as usize);
    // i16 holds the diffused error without overflow
    let mut buffer: Vec<i16> = img.as_raw().iter().map(|&v| i16::from(v)).collect();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let old_pixel = buffer[idx];
            let new_pixel: i16 = if old_pixel >= 128 { 255 } else { 0 };
            let error = old_pixel - new_pixel;
            buffer[idx] = new_pixel;

            if x + 1 < w {
                buffer[idx + 1] += error * 7 / 16;
            }
            if y + 1 < h {
                if x > 0 {
                    buffer[idx + w - 1] += error * 3 / 16;
                }
                buffer[idx + w] += error * 5 / 16;
                if x + 1 < w {
                    buffer[idx + w + 1] += error / 16;
                }
            }
        }
    }

    let raw = buffer.iter().map(|&v| v.clamp(0, 255) as u8).collect();
    GrayImage::from_raw(width, height, raw).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Simple threshold conversion without dithering.
///
/// Pixels with values >= `threshold` become white (255), others become black (0).
pub fn threshold_convert(img: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    debug!(width, height, threshold, "Applying threshold conversion");

    let mut output = img.clone();
    for pixel in output.pixels_mut() {
        pixel.0[0] = if pixel.0[0] >= threshold { 255 } else { 0 };
    }
    output
}
