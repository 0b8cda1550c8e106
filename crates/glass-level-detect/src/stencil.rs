//! Interior stencil reconstruction from a noisy cropped edge image.
//!
//! Edge detection on a real glass breaks the outline wherever the wall is
//! thin or the shoulder curves away from the light. Reconstruction proceeds
//! in three moves: fill every plausibly-sized contour, dilate to bridge
//! small gaps, then repair the side walls row by row using the robust mean
//! wall position as ground truth for where the wall should be.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_polygon_mut;
use imageproc::morphology::dilate;
use std::ops::Range;

use crate::contour::{enclosed_area, external_contours};
use crate::params::{MarginFractions, ReferenceSize, StencilParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Reconstructed glass interior.
#[derive(Clone, Debug)]
pub struct Stencil {
    /// Full interior silhouette of the glass, congruent with the crop.
    pub interior: GrayImage,
    /// The silhouette with the top/bottom margin rows zeroed; restricts
    /// level scanning to the straight wall region where horizontal-edge
    /// detection is reliable.
    pub fill_mask: GrayImage,
}

/// Build the interior stencil and fill mask from a cropped edge frame.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(edges, params), fields(width = edges.width(), height = edges.height()))
)]
pub fn build_stencil(
    edges: &GrayImage,
    reference: ReferenceSize,
    margins: MarginFractions,
    params: &StencilParams,
) -> Stencil {
    let (w, h) = edges.dimensions();

    // Coarse silhouette: fill every contour above the noise floor.
    let mut canvas = GrayImage::new(w, h);
    for contour in external_contours(edges) {
        if enclosed_area(&contour.points) <= params.min_contour_area {
            continue;
        }
        let mut points = contour.points;
        if points.len() >= 2 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            continue;
        }
        draw_polygon_mut(&mut canvas, &points, Luma([255]));
    }

    let mut interior = dilate(&canvas, Norm::LInf, params.dilate_radius);

    let top_rows = (h as f64 * margins.top) as u32;
    let bottom_rows = (h as f64 * margins.bottom) as u32;
    let band = top_rows..h.saturating_sub(bottom_rows);
    reconstruct_walls(&mut interior, band, reference, params);

    let mut fill_mask = interior.clone();
    zero_rows(&mut fill_mask, 0..top_rows.min(h));
    zero_rows(&mut fill_mask, h.saturating_sub(bottom_rows)..h);

    Stencil {
        interior,
        fill_mask,
    }
}

/// Row-wise wall repair inside the margin band.
///
/// First pass: record each row's first/last white column, fill the span in
/// between, and accumulate columns lying near the crop border (within the
/// wall tolerance of the reference width) into the mean wall positions.
/// Second pass: widen any row narrower than the mean walls out to them.
/// With no qualifying rows the mean is undefined; the dilated silhouette is
/// kept as-is instead.
fn reconstruct_walls(
    interior: &mut GrayImage,
    band: Range<u32>,
    reference: ReferenceSize,
    params: &StencilParams,
) {
    let w = interior.width();
    if w == 0 || band.is_empty() {
        return;
    }
    let wall_tolerance = params.wall_tolerance_frac * reference.width as f64;

    let mut lefts: Vec<u32> = Vec::new();
    let mut rights: Vec<u32> = Vec::new();
    for y in band.clone() {
        let Some((first, last)) = row_span(interior, y) else {
            continue;
        };
        if (first as f64) <= wall_tolerance {
            lefts.push(first);
        }
        if ((w - 1 - last) as f64) <= wall_tolerance {
            rights.push(last);
        }
        fill_row(interior, y, first, last);
    }

    if lefts.is_empty() || rights.is_empty() {
        log::debug!(
            "no wall samples in {} band rows; keeping dilated silhouette",
            band.len()
        );
        return;
    }
    let mean_left = (lefts.iter().sum::<u32>() as f64 / lefts.len() as f64).round() as u32;
    let mean_right = (rights.iter().sum::<u32>() as f64 / rights.len() as f64).round() as u32;
    log::debug!(
        "wall reconstruction: mean_left={mean_left} ({} rows), mean_right={mean_right} ({} rows)",
        lefts.len(),
        rights.len()
    );

    for y in band {
        let Some((first, last)) = row_span(interior, y) else {
            continue;
        };
        if first > mean_left {
            fill_row(interior, y, mean_left, first);
        }
        if last < mean_right {
            fill_row(interior, y, last, mean_right);
        }
    }
}

fn row_span(img: &GrayImage, y: u32) -> Option<(u32, u32)> {
    let mut first = None;
    let mut last = None;
    for x in 0..img.width() {
        if img.get_pixel(x, y)[0] > 0 {
            if first.is_none() {
                first = Some(x);
            }
            last = Some(x);
        }
    }
    Some((first?, last?))
}

fn fill_row(img: &mut GrayImage, y: u32, from: u32, to: u32) {
    for x in from..=to.min(img.width().saturating_sub(1)) {
        img.put_pixel(x, y, Luma([255]));
    }
}

fn zero_rows(img: &mut GrayImage, rows: Range<u32>) {
    for y in rows {
        for x in 0..img.width() {
            img.put_pixel(x, y, Luma([0]));
        }
    }
}
