//! Canvas extension for the right margin.

use image::{GrayImage, Luma, imageops};
use tracing::debug;

/// Paper color used for added canvas.
const WHITE: Luma<u8> = Luma([255]);

/// Place `img` flush left on a white canvas `canvas_width` pixels wide.
///
/// Returns the image unchanged when it is already at least that wide.
pub fn extend_right(img: &GrayImage, canvas_width: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    if canvas_width <= width {
        return img.clone();
    }

    debug!(width, canvas_width, "Extending canvas to the right");
    let mut canvas = GrayImage::from_pixel(canvas_width, height, WHITE);
    imageops::replace(&mut canvas, img, 0, 0);
    canvas
}
