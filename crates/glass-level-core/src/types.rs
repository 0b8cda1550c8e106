use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle, relative to the frame it was computed on.
///
/// The all-zero box is the "no box yet" sentinel used by the contour tracker
/// before the first detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// The "no box yet" sentinel.
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// One past the rightmost column covered by the box.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom row covered by the box.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Largest component-wise absolute difference between two boxes.
    ///
    /// This is the distance the contour tracker compares against its pixel
    /// tolerance: a single component moving too far counts as a new box.
    pub fn max_abs_diff(&self, other: &Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dw = self.width.abs_diff(other.width);
        let dh = self.height.abs_diff(other.height);
        dx.max(dy).max(dw).max(dh)
    }
}

/// Classification of a stabilized glass bounding box.
///
/// Determined once per detection session and frozen until the detector is
/// reset. `Unknown` is a valid outcome that withholds detection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlassType {
    #[default]
    Unknown,
    Small,
    Large,
}

/// Fill level of the detected glass, in both pixel and physical units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillLevelResult {
    /// Mean first-edge row across the detection lines, in crop pixels.
    pub level_px: u32,
    /// Liquid height above the glass base in millimeters.
    pub level_mm: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_box_is_sentinel() {
        assert!(BoundingBox::ZERO.is_zero());
        assert!(!BoundingBox::new(0, 0, 1, 1).is_zero());
    }

    #[test]
    fn max_abs_diff_picks_largest_component() {
        let a = BoundingBox::new(10, 20, 100, 200);
        let b = BoundingBox::new(12, 20, 100, 170);
        assert_eq!(a.max_abs_diff(&b), 30);
        assert_eq!(b.max_abs_diff(&a), 30);
    }

    #[test]
    fn diff_against_sentinel_is_dominated_by_size() {
        let b = BoundingBox::new(4, 4, 480, 1280);
        assert_eq!(BoundingBox::ZERO.max_abs_diff(&b), 1280);
    }
}
