//! Frame aliases and pixel helpers shared by both pipeline stages.

use image::{GrayImage, ImageBuffer, Luma};

use crate::error::FrameError;
use crate::types::BoundingBox;

/// 16-bit camera frame, before autoscaling.
pub type RawFrame = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Crop a frame to a bounding box, clamped to the frame extents.
///
/// A box reaching past the frame border is shrunk rather than rejected; the
/// tracker can legitimately produce such a box when the glass touches the
/// frame edge.
pub fn crop_to_box(frame: &GrayImage, bounds: &BoundingBox) -> GrayImage {
    let x = bounds.x.min(frame.width());
    let y = bounds.y.min(frame.height());
    let w = bounds.width.min(frame.width() - x);
    let h = bounds.height.min(frame.height() - y);
    image::imageops::crop_imm(frame, x, y, w, h).to_image()
}

/// Keep frame pixels where the mask is lit, zero everywhere else.
pub fn mask_and(frame: &GrayImage, mask: &GrayImage) -> Result<GrayImage, FrameError> {
    if frame.dimensions() != mask.dimensions() {
        return Err(FrameError::MaskSizeMismatch {
            frame_w: frame.width(),
            frame_h: frame.height(),
            mask_w: mask.width(),
            mask_h: mask.height(),
        });
    }
    let data: Vec<u8> = frame
        .as_raw()
        .iter()
        .zip(mask.as_raw().iter())
        .map(|(&p, &m)| if m > 0 { p } else { 0 })
        .collect();
    Ok(buffer_from_raw(frame.width(), frame.height(), data))
}

/// Binary threshold: strictly brighter than `thresh` becomes 255, else 0.
pub fn threshold_binary(frame: &GrayImage, thresh: u8) -> GrayImage {
    let data: Vec<u8> = frame
        .as_raw()
        .iter()
        .map(|&p| if p > thresh { 255 } else { 0 })
        .collect();
    buffer_from_raw(frame.width(), frame.height(), data)
}

// Infallible here: `data` is always produced with exactly w*h samples.
pub(crate) fn buffer_from_raw(w: u32, h: u32, data: Vec<u8>) -> GrayImage {
    GrayImage::from_raw(w, h, data).expect("buffer length matches dimensions")
}

/// Min-max stretch of a 16-bit frame into an 8-bit frame.
///
/// A constant frame maps to all zeros.
pub fn normalize_to_u8(raw: &RawFrame) -> GrayImage {
    let mut lo = u16::MAX;
    let mut hi = u16::MIN;
    for &v in raw.as_raw() {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if hi <= lo {
        return GrayImage::new(raw.width(), raw.height());
    }
    let span = (hi - lo) as f32;
    let data: Vec<u8> = raw
        .as_raw()
        .iter()
        .map(|&v| (((v - lo) as f32 / span) * 255.0).round() as u8)
        .collect();
    buffer_from_raw(raw.width(), raw.height(), data)
}
