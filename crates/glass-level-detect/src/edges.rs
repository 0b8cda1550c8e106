//! Edge filter chain: blur, directional gradients, threshold.

use glass_level_core::{
    gradient_abs_u8, horizontal_gradient, threshold_binary, vertical_gradient,
};
use image::GrayImage;
use imageproc::filter::box_filter;

use crate::params::EdgeParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Turn a raw intensity frame into a 0/255 edge map.
///
/// Box blur suppresses sensor noise, horizontal and vertical Sobel responses
/// are taken at 16-bit precision, converted to 8-bit magnitude, combined with
/// equal weight, and thresholded. Pure function of its inputs.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, params), fields(width = frame.width(), height = frame.height()))
)]
pub fn extract_edges(frame: &GrayImage, params: &EdgeParams) -> GrayImage {
    let radius = params.blur_kernel / 2;
    let blurred = box_filter(frame, radius, radius);

    let gx = gradient_abs_u8(&horizontal_gradient(&blurred, params.sobel_aperture));
    let gy = gradient_abs_u8(&vertical_gradient(&blurred, params.sobel_aperture));

    let combined: Vec<u8> = gx
        .as_raw()
        .iter()
        .zip(gy.as_raw().iter())
        .map(|(&a, &b)| ((a as u16 + b as u16) / 2) as u8)
        .collect();
    let combined = GrayImage::from_raw(frame.width(), frame.height(), combined)
        .expect("buffer length matches dimensions");

    threshold_binary(&combined, params.threshold)
}
