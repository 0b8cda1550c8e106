//! Pixel-to-millimeter conversion.

use glass_level_core::GlassType;
use serde::{Deserialize, Serialize};

/// Physical height of each vessel type in millimeters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GlassHeights {
    pub small_mm: f64,
    pub large_mm: f64,
}

impl Default for GlassHeights {
    fn default() -> Self {
        Self {
            small_mm: 118.0,
            large_mm: 145.0,
        }
    }
}

impl GlassHeights {
    fn for_type(&self, glass_type: GlassType) -> Option<f64> {
        match glass_type {
            GlassType::Small => Some(self.small_mm),
            GlassType::Large => Some(self.large_mm),
            GlassType::Unknown => None,
        }
    }
}

/// Map a pixel-space fill level onto millimeters above the glass base.
///
/// Linear scale over the glass bounding-box height: level row 0 (liquid at
/// the crop top) is the full physical height, level row `box_height` is
/// empty. Returns 0 for an unknown glass type or degenerate box height.
pub fn to_millimeters(
    level_px: u32,
    glass_type: GlassType,
    box_height_px: u32,
    heights: &GlassHeights,
) -> f64 {
    let Some(physical_mm) = heights.for_type(glass_type) else {
        return 0.0;
    };
    if box_height_px == 0 {
        return 0.0;
    }
    let height = box_height_px as f64;
    physical_mm / height * (height - level_px as f64)
}
