//! High-level facade crate for the `glass-level-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying stage crates
//! - the `LevelPipeline` orchestrator wiring glass detection, reference
//!   differencing, and fill-level estimation into the per-frame data flow
//!
//! ## Quickstart
//!
//! ```
//! use glass_level::{LevelPipeline, PipelineParams};
//! use image::GrayImage;
//!
//! let mut pipeline = LevelPipeline::new(PipelineParams::default());
//! let frame = GrayImage::new(64, 64);
//! let update = pipeline.process(&frame).unwrap();
//! println!("detected: {}", update.detected);
//! ```
//!
//! ## API map
//! - `glass_level::core`: shared types, frame helpers, logger, mailbox.
//! - `glass_level::detect`: edge extraction, contour tracking, stencil
//!   reconstruction, the glass detector state machine.
//! - `glass_level::gauge`: reference differencing, level estimation, unit
//!   conversion.

pub use glass_level_core as core;
pub use glass_level_detect as detect;
pub use glass_level_gauge as gauge;

pub use glass_level_core::{init_with_level, BoundingBox, FillLevelResult, GlassType};
pub use glass_level_detect::{DetectedGlass, DetectorParams, GlassDetector};
pub use glass_level_gauge::{
    FillLevelEstimator, GaugeError, GlassHeights, LevelParams, ReferenceDifferencer,
};

#[cfg(feature = "tracing")]
pub use glass_level_core::init_tracing;

mod pipeline;

pub use pipeline::{
    LevelPipeline, NullObserver, PipelineObserver, PipelineParams, PipelineUpdate,
};
