//! Absolute-difference masking against a stored reference frame.

use image::GrayImage;

use crate::error::GaugeError;

struct ReferenceFrame {
    width: u32,
    height: u32,
    /// Stored at floating-point precision so the per-pixel difference never
    /// wraps or truncates.
    samples: Vec<f64>,
}

/// Holds one reference frame and diffs incoming frames against it.
///
/// The reference is replaced wholesale by `set_reference`, never merged or
/// averaged. Diffing before a reference exists is a precondition error.
#[derive(Default)]
pub struct ReferenceDifferencer {
    reference: Option<ReferenceFrame>,
}

impl ReferenceDifferencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `frame` as the new reference.
    pub fn set_reference(&mut self, frame: &GrayImage) {
        self.reference = Some(ReferenceFrame {
            width: frame.width(),
            height: frame.height(),
            samples: frame.as_raw().iter().map(|&v| v as f64).collect(),
        });
    }

    /// Drop the stored reference.
    pub fn clear_reference(&mut self) {
        self.reference = None;
    }

    pub fn is_set(&self) -> bool {
        self.reference.is_some()
    }

    /// Per-pixel absolute difference against the reference, thresholded at
    /// `distance` into a 0/255 mask.
    pub fn diff(&self, frame: &GrayImage, distance: f64) -> Result<GrayImage, GaugeError> {
        let reference = self.reference.as_ref().ok_or(GaugeError::ReferenceNotSet)?;
        if frame.dimensions() != (reference.width, reference.height) {
            return Err(GaugeError::SizeMismatch {
                got_w: frame.width(),
                got_h: frame.height(),
                want_w: reference.width,
                want_h: reference.height,
            });
        }

        let data: Vec<u8> = frame
            .as_raw()
            .iter()
            .zip(reference.samples.iter())
            .map(|(&p, &r)| {
                if (p as f64 - r).abs() >= distance {
                    255
                } else {
                    0
                }
            })
            .collect();
        Ok(GrayImage::from_raw(reference.width, reference.height, data)
            .expect("buffer length matches dimensions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn diff_before_reference_is_an_error() {
        let differencer = ReferenceDifferencer::new();
        let frame = GrayImage::new(4, 4);
        assert!(matches!(
            differencer.diff(&frame, 10.0),
            Err(GaugeError::ReferenceNotSet)
        ));
    }

    #[test]
    fn identical_frame_diffs_to_all_zero() {
        let frame = GrayImage::from_pixel(6, 6, Luma([120]));
        let mut differencer = ReferenceDifferencer::new();
        differencer.set_reference(&frame);
        let mask = differencer.diff(&frame, 10.0).unwrap();
        assert!(mask.as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn changed_pixels_light_up_at_distance() {
        let reference = GrayImage::from_pixel(3, 1, Luma([100]));
        let mut frame = reference.clone();
        frame.put_pixel(0, 0, Luma([109]));
        frame.put_pixel(1, 0, Luma([110]));
        let mut differencer = ReferenceDifferencer::new();
        differencer.set_reference(&reference);
        let mask = differencer.diff(&frame, 10.0).unwrap();
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(1, 0)[0], 255);
        assert_eq!(mask.get_pixel(2, 0)[0], 0);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let mut differencer = ReferenceDifferencer::new();
        differencer.set_reference(&GrayImage::new(4, 4));
        assert!(matches!(
            differencer.diff(&GrayImage::new(4, 5), 10.0),
            Err(GaugeError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn clear_reference_requires_a_new_one() {
        let frame = GrayImage::new(4, 4);
        let mut differencer = ReferenceDifferencer::new();
        differencer.set_reference(&frame);
        assert!(differencer.is_set());
        differencer.clear_reference();
        assert!(differencer.diff(&frame, 10.0).is_err());
    }
}
