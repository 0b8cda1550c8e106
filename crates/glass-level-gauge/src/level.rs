//! Multi-line edge-based fill-level estimation.

use glass_level_core::{
    gradient_abs_u8, mask_and, threshold_binary, vertical_gradient, SobelAperture,
};
use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, grayscale_dilate, grayscale_erode, Mask};
use serde::{Deserialize, Serialize};

use crate::error::GaugeError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Configuration for fill-level estimation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelParams {
    /// Radius of the grayscale erosion removing speckle (3 → 7×7).
    pub erode_radius: u8,
    /// Radius of the grayscale dilation restoring the liquid line (6 → 13×13).
    pub dilate_radius: u8,
    /// Aperture of the vertical Sobel extracting horizontal edges.
    pub sobel_aperture: SobelAperture,
    /// Binary threshold on the vertical gradient magnitude.
    pub threshold: u8,
    /// One extra binary dilation of the thresholded edges before scanning.
    pub post_dilate: bool,
    /// Horizontal positions of the detection lines, as fractions of width.
    pub line_fractions: Vec<f64>,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            erode_radius: 3,
            dilate_radius: 6,
            sobel_aperture: SobelAperture::Three,
            threshold: 30,
            post_dilate: true,
            line_fractions: (1..=9).map(|i| i as f64 / 10.0).collect(),
        }
    }
}

/// Estimates the liquid level row from a frame and the glass fill mask.
///
/// A single scan line is too easily defeated by foam, bubbles, or label
/// artifacts; sampling several independent columns and averaging attenuates
/// any one line's error.
pub struct FillLevelEstimator {
    params: LevelParams,
}

impl FillLevelEstimator {
    pub fn new(params: LevelParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    /// Estimate the fill level in pixels from the crop top.
    ///
    /// The frame is masked to the glass interior, morphologically
    /// stabilized, reduced to horizontal edges, and sampled along the
    /// configured detection lines top to bottom. The mean first-edge row is
    /// the level. A line without any edge contributes row 0 to the mean.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, fill_mask))
    )]
    pub fn estimate(&self, frame: &GrayImage, fill_mask: &GrayImage) -> Result<u32, GaugeError> {
        let masked = mask_and(frame, fill_mask)?;

        let stabilized = grayscale_erode(&masked, &Mask::square(self.params.erode_radius));
        let stabilized = grayscale_dilate(&stabilized, &Mask::square(self.params.dilate_radius));

        let grad = gradient_abs_u8(&vertical_gradient(&stabilized, self.params.sobel_aperture));
        let mut edges = threshold_binary(&grad, self.params.threshold);
        if self.params.post_dilate {
            edges = dilate(&edges, Norm::LInf, 1);
        }

        let level = scan_detection_lines(&edges, &self.params.line_fractions);
        log::debug!(
            "fill level scan over {} lines: level_px={level}",
            self.params.line_fractions.len()
        );
        Ok(level)
    }
}

/// Mean first-lit row over the detection lines.
fn scan_detection_lines(edges: &GrayImage, line_fractions: &[f64]) -> u32 {
    let (w, h) = edges.dimensions();
    if w == 0 || h == 0 || line_fractions.is_empty() {
        return 0;
    }

    let mut row_sum = 0u64;
    for &fraction in line_fractions {
        let x = ((w as f64 * fraction) as u32).min(w - 1);
        let first_lit = (0..h).find(|&y| edges.get_pixel(x, y)[0] > 0);
        row_sum += first_lit.unwrap_or(0) as u64;
    }
    (row_sum as f64 / line_fractions.len() as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Liquid-filled glass crop: dark above the line, bright below.
    fn liquid_frame(w: u32, h: u32, level_row: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |_, y| {
            if y < level_row {
                Luma([20])
            } else {
                Luma([210])
            }
        })
    }

    fn full_mask(w: u32, h: u32) -> GrayImage {
        GrayImage::from_pixel(w, h, Luma([255]))
    }

    #[test]
    fn detects_a_clean_liquid_line() {
        let estimator = FillLevelEstimator::new(LevelParams::default());
        let level = estimator
            .estimate(&liquid_frame(90, 200, 120), &full_mask(90, 200))
            .unwrap();
        // Morphology shifts the edge by a few rows; the line itself must be
        // found in the right neighborhood.
        assert!(
            (110..=130).contains(&level),
            "level {level} not near row 120"
        );
    }

    #[test]
    fn raising_the_line_by_k_lowers_the_level_by_k() {
        let estimator = FillLevelEstimator::new(LevelParams::default());
        let mask = full_mask(90, 200);
        let at_120 = estimator.estimate(&liquid_frame(90, 200, 120), &mask).unwrap();
        let at_100 = estimator.estimate(&liquid_frame(90, 200, 100), &mask).unwrap();
        let drop = at_120 as i64 - at_100 as i64;
        assert!((drop - 20).abs() <= 1, "expected ~20 rows, got {drop}");
    }

    #[test]
    fn no_edges_reports_row_zero() {
        let estimator = FillLevelEstimator::new(LevelParams::default());
        let flat = GrayImage::from_pixel(90, 200, Luma([100]));
        let level = estimator.estimate(&flat, &full_mask(90, 200)).unwrap();
        assert_eq!(level, 0);
    }

    #[test]
    fn mask_mismatch_is_an_error() {
        let estimator = FillLevelEstimator::new(LevelParams::default());
        let result = estimator.estimate(&liquid_frame(90, 200, 50), &full_mask(90, 100));
        assert!(result.is_err());
    }

    #[test]
    fn edges_outside_the_mask_are_ignored() {
        // Difference-style frame: zero where nothing changed, bright below
        // the liquid line, plus a spurious bright band in the margin region
        // the mask excludes.
        let mut frame = GrayImage::from_fn(90, 200, |_, y| {
            if y >= 150 {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        for y in 10..20 {
            for x in 0..90 {
                frame.put_pixel(x, y, Luma([255]));
            }
        }
        let mut mask = full_mask(90, 200);
        for y in 0..40 {
            for x in 0..90 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let estimator = FillLevelEstimator::new(LevelParams::default());
        let level = estimator.estimate(&frame, &mask).unwrap();
        assert!(
            (140..=155).contains(&level),
            "spurious band above the mask leaked: {level}"
        );
    }
}
