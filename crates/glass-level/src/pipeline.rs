//! Per-frame orchestration of the full measurement pipeline.
//!
//! Data flow per processed frame: raw frame → glass detector (edge chain,
//! contour consensus, stencil) → once latched, cropped glass frame →
//! reference differencing → fill-level estimation against the fill mask →
//! millimeter conversion. The observer is notified unconditionally at each
//! stage; visualization tooling decides what to do with the callbacks.

use glass_level_core::{BoundingBox, FillLevelResult, GlassType};
use glass_level_detect::{DetectedGlass, DetectorParams, GlassDetector};
use glass_level_gauge::{
    to_millimeters, FillLevelEstimator, GaugeError, GlassHeights, LevelParams,
    ReferenceDifferencer,
};
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Full pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineParams {
    pub detector: DetectorParams,
    /// Absolute intensity distance for reference differencing.
    pub diff_distance: f64,
    pub level: LevelParams,
    pub heights: GlassHeights,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            detector: DetectorParams::default(),
            diff_distance: 80.0,
            level: LevelParams::default(),
            heights: GlassHeights::default(),
        }
    }
}

/// What one processed frame produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineUpdate {
    pub detected: bool,
    pub glass_type: GlassType,
    pub bounds: Option<BoundingBox>,
    /// Present once a glass is latched *and* a reference frame was stored.
    pub level: Option<FillLevelResult>,
}

/// Stage hooks for external diagnostics and visualization.
///
/// Called unconditionally on every event; the default implementations do
/// nothing, so an observer only overrides what it wants to see.
pub trait PipelineObserver {
    /// Binary edge frame produced while searching for the glass.
    fn on_edges(&mut self, _edges: &GrayImage) {}
    /// Fires once, on the frame where detection latches.
    fn on_glass_detected(&mut self, _glass: &DetectedGlass) {}
    /// Difference mask fed into level estimation.
    fn on_difference(&mut self, _mask: &GrayImage) {}
    /// Fill level computed for this frame.
    fn on_level(&mut self, _level: &FillLevelResult) {}
}

/// Observer that ignores every event.
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// Owns the full detector/differencer/estimator chain for one session.
pub struct LevelPipeline {
    params: PipelineParams,
    detector: GlassDetector,
    differencer: ReferenceDifferencer,
    estimator: FillLevelEstimator,
    observer: Box<dyn PipelineObserver>,
}

impl LevelPipeline {
    pub fn new(params: PipelineParams) -> Self {
        Self::with_observer(params, Box::new(NullObserver))
    }

    pub fn with_observer(params: PipelineParams, observer: Box<dyn PipelineObserver>) -> Self {
        let detector = GlassDetector::new(params.detector.clone());
        let estimator = FillLevelEstimator::new(params.level.clone());
        Self {
            params,
            detector,
            differencer: ReferenceDifferencer::new(),
            estimator,
            observer,
        }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn detector(&self) -> &GlassDetector {
        &self.detector
    }

    /// Store the current glass crop as the reference (empty-glass) frame.
    ///
    /// Returns false while no glass is latched. Replaces any previous
    /// reference wholesale.
    pub fn set_reference_from_glass(&mut self) -> bool {
        match self.detector.glass_frame() {
            Some(glass_frame) => {
                self.differencer.set_reference(glass_frame);
                log::info!("reference frame stored ({}x{})", glass_frame.width(), glass_frame.height());
                true
            }
            None => false,
        }
    }

    pub fn reference_set(&self) -> bool {
        self.differencer.is_set()
    }

    /// Feed one frame through the pipeline.
    ///
    /// Until a glass is latched this only advances detection. Afterwards,
    /// and once a reference frame is stored, every frame yields a fill
    /// level.
    pub fn process(&mut self, frame: &GrayImage) -> Result<PipelineUpdate, GaugeError> {
        let was_detected = self.detector.is_detected();
        if let Some(edges) = self.detector.detect(frame) {
            self.observer.on_edges(&edges);
        }
        if !was_detected {
            if let Some(glass) = self.detector.detected() {
                self.observer.on_glass_detected(glass);
            }
        }

        let level = self.measure()?;
        if let Some(level) = &level {
            self.observer.on_level(level);
        }

        Ok(PipelineUpdate {
            detected: self.detector.is_detected(),
            glass_type: self.detector.glass_type(),
            bounds: self.detector.estimated_glass(),
            level,
        })
    }

    fn measure(&mut self) -> Result<Option<FillLevelResult>, GaugeError> {
        if !self.differencer.is_set() {
            return Ok(None);
        }
        let Some(glass) = self.detector.detected() else {
            return Ok(None);
        };

        let diff = self
            .differencer
            .diff(&glass.glass_frame, self.params.diff_distance)?;
        self.observer.on_difference(&diff);

        let level_px = self.estimator.estimate(&diff, &glass.fill_mask)?;
        let level_mm = to_millimeters(
            level_px,
            glass.glass_type,
            glass.bounds.height,
            &self.params.heights,
        );
        Ok(Some(FillLevelResult { level_px, level_mm }))
    }

    /// Restart the whole session: detection state, reference frame.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.differencer.clear_reference();
    }
}
