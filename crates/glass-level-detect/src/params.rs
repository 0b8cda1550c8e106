use glass_level_core::{GlassType, SobelAperture};
use serde::{Deserialize, Serialize};

/// Configuration for the edge filter chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeParams {
    /// Box blur kernel side, odd. Suppresses sensor noise before the
    /// gradient pass.
    pub blur_kernel: u32,
    /// Sobel aperture. Glass-boundary detection works on the full frame and
    /// wants the wider 5×5 kernel.
    pub sobel_aperture: SobelAperture,
    /// Binary threshold on the combined gradient magnitude.
    pub threshold: u8,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            blur_kernel: 7,
            sobel_aperture: SobelAperture::Five,
            threshold: 35,
        }
    }
}

/// Configuration for the temporal contour consensus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackerParams {
    /// Maximum per-component box drift that still counts as the same box.
    pub pixel_tolerance: u32,
    /// Consecutive agreeing cycles required before the box is trusted.
    pub required_cycles: u32,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            pixel_tolerance: 10,
            required_cycles: 30,
        }
    }
}

/// Expected bounding-box size of a vessel at working resolution.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ReferenceSize {
    pub width: u32,
    pub height: u32,
}

/// Configuration for glass-type classification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassifierParams {
    pub small: ReferenceSize,
    pub large: ReferenceSize,
    /// Accepted relative deviation of width and height from a reference size.
    pub tolerance_frac: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            small: ReferenceSize {
                width: 300,
                height: 800,
            },
            large: ReferenceSize {
                width: 480,
                height: 1280,
            },
            tolerance_frac: 0.1,
        }
    }
}

/// Top/bottom rows excluded from the fill mask, as fractions of crop height.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MarginFractions {
    pub top: f64,
    pub bottom: f64,
}

/// Configuration for stencil reconstruction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StencilParams {
    /// Contours below this enclosed area are treated as noise.
    pub min_contour_area: f64,
    /// Radius of the square dilation bridging broken edges (15 → 31×31).
    pub dilate_radius: u8,
    /// How close a row's first/last white pixel must be to the crop border,
    /// relative to the reference width, to count as a wall sample.
    pub wall_tolerance_frac: f64,
    /// Margins for the small vessel. Larger because its shoulder curvature
    /// breaks edges more aggressively.
    pub small_margins: MarginFractions,
    /// Margins for the large vessel.
    pub large_margins: MarginFractions,
}

impl Default for StencilParams {
    fn default() -> Self {
        Self {
            min_contour_area: 450.0,
            dilate_radius: 15,
            wall_tolerance_frac: 0.05,
            small_margins: MarginFractions {
                top: 0.2,
                bottom: 0.2,
            },
            large_margins: MarginFractions {
                top: 0.1,
                bottom: 0.1,
            },
        }
    }
}

impl StencilParams {
    /// Margin band for a classified vessel. `Unknown` never reaches the
    /// stencil stage; it falls back to the large-vessel band.
    pub fn margins_for(&self, glass_type: GlassType) -> MarginFractions {
        match glass_type {
            GlassType::Small => self.small_margins,
            GlassType::Large | GlassType::Unknown => self.large_margins,
        }
    }
}

/// Full configuration of the glass detector.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DetectorParams {
    pub edges: EdgeParams,
    pub tracker: TrackerParams,
    pub classifier: ClassifierParams,
    pub stencil: StencilParams,
}
