//! Temporal consensus over per-frame contour detections.
//!
//! Single-frame contour extraction on live edge data is too noisy to trust:
//! reflections, bubbles, and sensor noise all produce transient contours.
//! The tracker requires N consecutive near-identical bounding boxes before
//! raising the stable signal, a plain hysteresis filter over the per-frame
//! detections.

use glass_level_core::BoundingBox;
use image::GrayImage;

use crate::contour::largest_external_box;
use crate::params::TrackerParams;

/// Outcome of one tracker update.
#[derive(Clone, Copy, Debug)]
pub struct StableSignal {
    pub stable: bool,
    pub bounds: BoundingBox,
}

pub struct ContourTracker {
    params: TrackerParams,
    reference: BoundingBox,
    cycles: u32,
}

impl ContourTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            reference: BoundingBox::ZERO,
            cycles: 0,
        }
    }

    /// Feed one binary frame.
    ///
    /// Finds the largest external contour and compares its bounding box
    /// against the remembered reference. A component drifting beyond the
    /// pixel tolerance replaces the reference and restarts the count; an
    /// agreeing box increments it. No contour at all zeroes the count
    /// immediately and reports the sentinel box.
    pub fn update(&mut self, binary: &GrayImage) -> StableSignal {
        let Some(found) = largest_external_box(binary) else {
            self.cycles = 0;
            return StableSignal {
                stable: false,
                bounds: BoundingBox::ZERO,
            };
        };

        if self.reference.max_abs_diff(&found.bounds) > self.params.pixel_tolerance {
            self.reference = found.bounds;
            self.cycles = 0;
        } else {
            self.cycles += 1;
        }

        StableSignal {
            stable: self.cycles >= self.params.required_cycles,
            bounds: self.reference,
        }
    }

    /// The currently remembered box; the sentinel before any detection.
    pub fn reference(&self) -> BoundingBox {
        self.reference
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Restart the consensus count without forgetting the reference box.
    ///
    /// Used when a stabilized box classifies as no known vessel: the shape
    /// is not trusted, but the next frames may still agree with it.
    pub fn reset_cycles(&mut self) {
        self.cycles = 0;
    }

    /// Forget everything and start from the sentinel box.
    pub fn reset(&mut self) {
        self.reference = BoundingBox::ZERO;
        self.cycles = 0;
    }
}
