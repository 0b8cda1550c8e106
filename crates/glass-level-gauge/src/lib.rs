//! Fill-level measurement over a detected glass region.
//!
//! Once the detector has latched a glass, every processed frame flows
//! through reference differencing (against a caller-chosen empty-glass
//! frame), multi-line horizontal-edge scanning restricted to the fill mask,
//! and a linear pixel-to-millimeter conversion.

mod convert;
mod diff;
mod error;
mod level;

pub use convert::{to_millimeters, GlassHeights};
pub use diff::ReferenceDifferencer;
pub use error::GaugeError;
pub use level::{FillLevelEstimator, LevelParams};
