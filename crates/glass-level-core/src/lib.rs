//! Core types and frame utilities for glass fill-level detection.
//!
//! This crate is intentionally small. It carries the shared vocabulary of the
//! pipeline (bounding boxes, glass types, fill-level results), pixel-level
//! helpers that both detection stages need (cropping, masking, gradients,
//! thresholding), the 16-bit camera autoscale path, a minimal logger, and the
//! single-slot frame hand-off between acquisition and processing. It does
//! *not* contain any detection logic.

mod autoscale;
mod error;
mod frame;
mod gradient;
mod logger;
mod mailbox;
mod types;

pub use autoscale::AutoscaleLut;
pub use error::FrameError;
pub use frame::{crop_to_box, mask_and, normalize_to_u8, threshold_binary, RawFrame};
pub use gradient::{
    gradient_abs_u8, horizontal_gradient, vertical_gradient, GradientFrame, SobelAperture,
};
pub use mailbox::FrameMailbox;
pub use types::{BoundingBox, FillLevelResult, GlassType};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
