//! Per-frame glass detection state machine.

use glass_level_core::{crop_to_box, BoundingBox, GlassType};
use image::GrayImage;

use crate::classify::classify;
use crate::edges::extract_edges;
use crate::params::{DetectorParams, ReferenceSize};
use crate::stencil::build_stencil;
use crate::tracker::ContourTracker;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Everything frozen at the moment detection latched.
#[derive(Clone, Debug)]
pub struct DetectedGlass {
    pub bounds: BoundingBox,
    pub glass_type: GlassType,
    /// Full interior silhouette, congruent with the crop.
    pub stencil: GrayImage,
    /// Margin-trimmed variant used for level scanning.
    pub fill_mask: GrayImage,
    /// Most recent crop of the original (non-edge) frame to the glass box.
    pub glass_frame: GrayImage,
}

enum DetectorState {
    Searching,
    Stable(DetectedGlass),
}

/// Two-state detector: `Searching` until the contour consensus stabilizes on
/// a recognized vessel, then `Stable` (latched) until an explicit `reset()`.
///
/// While searching, every frame runs the edge chain and the tracker. Once
/// latched, detection stops entirely; each frame is only re-cropped to the
/// frozen box so downstream differencing sees the current glass region.
pub struct GlassDetector {
    params: DetectorParams,
    tracker: ContourTracker,
    state: DetectorState,
}

impl GlassDetector {
    pub fn new(params: DetectorParams) -> Self {
        let tracker = ContourTracker::new(params.tracker.clone());
        Self {
            params,
            tracker,
            state: DetectorState::Searching,
        }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Feed one frame.
    ///
    /// Returns the binary edge frame while searching, `None` once latched.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn detect(&mut self, frame: &GrayImage) -> Option<GrayImage> {
        if let DetectorState::Stable(glass) = &mut self.state {
            glass.glass_frame = crop_to_box(frame, &glass.bounds);
            return None;
        }

        let edges = extract_edges(frame, &self.params.edges);
        let signal = self.tracker.update(&edges);
        if signal.stable {
            self.try_latch(frame, &edges, signal.bounds);
        }
        Some(edges)
    }

    fn try_latch(&mut self, frame: &GrayImage, edges: &GrayImage, bounds: BoundingBox) {
        let glass_type = classify(&bounds, &self.params.classifier);
        if glass_type == GlassType::Unknown {
            // The stabilized shape matches no known vessel. Distrust it and
            // keep waiting; the consensus has to build up again.
            log::debug!("stable box {bounds:?} matches no known vessel, restarting consensus");
            self.tracker.reset_cycles();
            return;
        }

        let cropped_edges = crop_to_box(edges, &bounds);
        let reference = ReferenceSize {
            width: bounds.width,
            height: bounds.height,
        };
        let margins = self.params.stencil.margins_for(glass_type);
        let stencil = build_stencil(&cropped_edges, reference, margins, &self.params.stencil);
        let glass_frame = crop_to_box(frame, &bounds);

        log::info!("glass detected: type={glass_type:?} bounds={bounds:?}");
        self.state = DetectorState::Stable(DetectedGlass {
            bounds,
            glass_type,
            stencil: stencil.interior,
            fill_mask: stencil.fill_mask,
            glass_frame,
        });
    }

    /// Whether a glass has been latched.
    pub fn is_detected(&self) -> bool {
        matches!(self.state, DetectorState::Stable(_))
    }

    /// The current box estimate: the latched box once stable, otherwise the
    /// tracker's working reference (`None` before any contour was seen).
    pub fn estimated_glass(&self) -> Option<BoundingBox> {
        match &self.state {
            DetectorState::Stable(glass) => Some(glass.bounds),
            DetectorState::Searching => {
                let reference = self.tracker.reference();
                (!reference.is_zero()).then_some(reference)
            }
        }
    }

    pub fn detected(&self) -> Option<&DetectedGlass> {
        match &self.state {
            DetectorState::Stable(glass) => Some(glass),
            DetectorState::Searching => None,
        }
    }

    /// Latest crop of the original frame to the latched box.
    pub fn glass_frame(&self) -> Option<&GrayImage> {
        self.detected().map(|g| &g.glass_frame)
    }

    pub fn stencil(&self) -> Option<&GrayImage> {
        self.detected().map(|g| &g.stencil)
    }

    pub fn fill_mask(&self) -> Option<&GrayImage> {
        self.detected().map(|g| &g.fill_mask)
    }

    /// `Unknown` until a glass is latched.
    pub fn glass_type(&self) -> GlassType {
        self.detected().map(|g| g.glass_type).unwrap_or_default()
    }

    /// Drop everything and return to `Searching` with the sentinel box.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.state = DetectorState::Searching;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ClassifierParams, EdgeParams, TrackerParams};
    use glass_level_core::SobelAperture;
    use image::Luma;

    /// Bright filled rectangle on a dark frame; its edge image stabilizes on
    /// a box a few pixels wider than the drawn shape.
    fn frame_with_glass(w: u32, h: u32, x: u32, y: u32, gw: u32, gh: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |px, py| {
            if (x..x + gw).contains(&px) && (y..y + gh).contains(&py) {
                Luma([200])
            } else {
                Luma([15])
            }
        })
    }

    fn fast_params() -> DetectorParams {
        DetectorParams {
            edges: EdgeParams {
                blur_kernel: 3,
                sobel_aperture: SobelAperture::Three,
                threshold: 35,
            },
            tracker: TrackerParams {
                pixel_tolerance: 10,
                required_cycles: 3,
            },
            classifier: ClassifierParams {
                small: crate::params::ReferenceSize {
                    width: 30,
                    height: 60,
                },
                large: crate::params::ReferenceSize {
                    width: 104,
                    height: 204,
                },
                tolerance_frac: 0.1,
            },
            stencil: crate::params::StencilParams {
                dilate_radius: 2,
                ..Default::default()
            },
        }
    }

    #[test]
    fn latches_after_required_cycles_and_freezes() {
        let frame = frame_with_glass(160, 280, 30, 40, 100, 200);
        let mut detector = GlassDetector::new(fast_params());

        let mut latched_at = None;
        for i in 0..8 {
            let edges = detector.detect(&frame);
            if detector.is_detected() && latched_at.is_none() {
                latched_at = Some(i);
            }
            // Edge frames flow until the latch, then stop.
            assert_eq!(edges.is_none(), detector.is_detected());
        }
        assert_eq!(latched_at, Some(3));
        assert_eq!(detector.glass_type(), GlassType::Large);

        let bounds = detector.estimated_glass().expect("latched box");
        assert!(bounds.width >= 100 && bounds.width <= 112);
        assert!(bounds.height >= 200 && bounds.height <= 212);

        let glass = detector.detected().expect("latched glass");
        assert_eq!(
            glass.glass_frame.dimensions(),
            (bounds.width, bounds.height)
        );
        assert_eq!(glass.stencil.dimensions(), glass.fill_mask.dimensions());
    }

    #[test]
    fn unknown_shape_never_latches() {
        // A square blob matching neither reference size.
        let frame = frame_with_glass(160, 160, 40, 40, 70, 70);
        let mut detector = GlassDetector::new(fast_params());
        for _ in 0..12 {
            detector.detect(&frame);
        }
        assert!(!detector.is_detected());
        assert_eq!(detector.glass_type(), GlassType::Unknown);
        // The working reference is still exposed while searching.
        assert!(detector.estimated_glass().is_some());
    }

    #[test]
    fn reset_returns_to_searching() {
        let frame = frame_with_glass(160, 280, 30, 40, 100, 200);
        let mut detector = GlassDetector::new(fast_params());
        for _ in 0..8 {
            detector.detect(&frame);
        }
        assert!(detector.is_detected());

        detector.reset();
        assert!(!detector.is_detected());
        assert_eq!(detector.estimated_glass(), None);
        assert!(detector.detect(&frame).is_some());
    }
}
