//! Decoding every frame of an image file.
//!
//! Animated GIF and APNG files yield one image per frame, composited to the
//! full canvas; every other format yields exactly one image.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, DynamicImage, Frame, ImageFormat, ImageReader};
use tracing::debug;

use crate::Result;

/// Decode all frames of the image at `path`, in file order.
pub fn decode_frames(path: &Path) -> Result<Vec<DynamicImage>> {
    let format = ImageReader::open(path)?.with_guessed_format()?.format();

    let frames = match format {
        Some(ImageFormat::Gif) => {
            let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
            into_images(decoder.into_frames().collect_frames()?)
        }
        Some(ImageFormat::Png) => {
            let decoder = PngDecoder::new(BufReader::new(File::open(path)?))?;
            if decoder.is_apng()? {
                into_images(decoder.apng()?.into_frames().collect_frames()?)
            } else {
                vec![DynamicImage::from_decoder(decoder)?]
            }
        }
        _ => vec![image::open(path)?],
    };

    debug!(path = %path.display(), ?format, frames = frames.len(), "Image decoded");
    Ok(frames)
}

fn into_images(frames: Vec<Frame>) -> Vec<DynamicImage> {
    frames
        .into_iter()
        .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()))
        .collect()
}
