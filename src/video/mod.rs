//! Video frames: the frame type, resizing, MJPEG extraction and overlay.

pub mod codec;
pub mod overlay;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbImage};

/// Decoded RGB frame.
pub type Frame = RgbImage;

/// Scale `frame` to the display resolution.  No-op if it already matches.
pub fn resize_to(frame: Frame, width: u32, height: u32) -> Frame {
    if frame.dimensions() == (width, height) {
        return frame;
    }
    imageops::resize(&frame, width, height, FilterType::Triangle)
}

/// Decode one JPEG image.  `None` if the bytes are not a valid JPEG.
pub fn decode_jpeg(bytes: &[u8]) -> Option<Frame> {
    image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .ok()
        .map(|img| img.to_rgb8())
}
