//! Contour helpers over binary frames.
//!
//! Thin layer over `imageproc`'s border following: external contours only,
//! enclosed area via the shoelace formula, and axis-aligned bounding boxes
//! in the convention where a filled w×h blob reports width w.

use glass_level_core::BoundingBox;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;

/// Largest external contour summary.
#[derive(Clone, Copy, Debug)]
pub struct ContourBox {
    pub bounds: BoundingBox,
    pub area: f64,
}

pub(crate) fn external_contours(binary: &GrayImage) -> Vec<Contour<i32>> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer))
        .collect()
}

/// Enclosed area of a closed boundary, shoelace formula.
pub(crate) fn enclosed_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (twice_area.abs() as f64) / 2.0
}

pub(crate) fn points_bounding_box(points: &[Point<i32>]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox::ZERO;
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BoundingBox::new(
        min_x.max(0) as u32,
        min_y.max(0) as u32,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    )
}

/// Bounding box of the external contour with the largest enclosed area.
///
/// Ties keep the first contour found. Returns `None` on an all-black frame.
pub fn largest_external_box(binary: &GrayImage) -> Option<ContourBox> {
    let mut best: Option<ContourBox> = None;
    for contour in external_contours(binary) {
        let area = enclosed_area(&contour.points);
        let replace = match &best {
            Some(current) => area > current.area,
            None => true,
        };
        if replace {
            best = Some(ContourBox {
                bounds: points_bounding_box(&contour.points),
                area,
            });
        }
    }
    best
}
