//! Lookup-table autoscaling for 16-bit camera frames.
//!
//! The camera delivers 16-bit frames that only occupy a narrow band of the
//! intensity range. A 65536-entry table stretches `[t_min, t_max]` over the
//! full 16-bit range once, then applies to every frame with a single lookup
//! per pixel.

use crate::error::FrameError;
use crate::frame::RawFrame;

/// Precomputed 16-bit stretch table.
pub struct AutoscaleLut {
    table: Box<[u16; 65536]>,
}

impl AutoscaleLut {
    /// Build a table mapping `[t_min, t_max]` onto `[0, 65535]`.
    ///
    /// Values below `t_min` clamp to 0, values above `t_max` to 65535.
    pub fn new(t_min: u16, t_max: u16) -> Result<Self, FrameError> {
        if t_max <= t_min {
            return Err(FrameError::EmptyAutoscaleRange { t_min, t_max });
        }
        let scale = 65535.0 / (t_max as f64 - t_min as f64);
        let mut table = vec![0u16; 65536].into_boxed_slice();
        for (i, slot) in table.iter_mut().enumerate() {
            let stretched = scale * (i as f64 - t_min as f64);
            *slot = stretched.clamp(0.0, 65535.0) as u16;
        }
        let table: Box<[u16; 65536]> = table.try_into().expect("table has 65536 entries");
        Ok(Self { table })
    }

    /// Apply the table to a raw frame in place.
    pub fn apply(&self, frame: &mut RawFrame) {
        for p in frame.pixels_mut() {
            p[0] = self.table[p[0] as usize];
        }
    }

    /// Apply the table to a copy of the frame.
    pub fn autoscale(&self, frame: &RawFrame) -> RawFrame {
        let mut scaled = frame.clone();
        self.apply(&mut scaled);
        scaled
    }
}
