//! Glass-type classification by bounding-box proximity.

use glass_level_core::{BoundingBox, GlassType};

use crate::params::{ClassifierParams, ReferenceSize};

/// Classify a stabilized bounding box against the two known vessel sizes.
///
/// Both width and height must fall within `tolerance_frac` of a reference
/// size. A box matching neither is `Unknown`. Should a box ever match both
/// (the reference sizes are chosen far enough apart that it does not happen
/// in practice), `Small` wins deterministically.
pub fn classify(bounds: &BoundingBox, params: &ClassifierParams) -> GlassType {
    if matches_reference(bounds, &params.small, params.tolerance_frac) {
        GlassType::Small
    } else if matches_reference(bounds, &params.large, params.tolerance_frac) {
        GlassType::Large
    } else {
        GlassType::Unknown
    }
}

fn matches_reference(bounds: &BoundingBox, reference: &ReferenceSize, tolerance_frac: f64) -> bool {
    let dw = bounds.width.abs_diff(reference.width) as f64;
    let dh = bounds.height.abs_diff(reference.height) as f64;
    dw <= tolerance_frac * reference.width as f64 && dh <= tolerance_frac * reference.height as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ClassifierParams {
        ClassifierParams {
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

    #[test]
    fn exact_sizes_classify() {
        let p = params();
        assert_eq!(
            classify(&BoundingBox::new(0, 0, 300, 800), &p),
            GlassType::Small
        );
        assert_eq!(
            classify(&BoundingBox::new(0, 0, 480, 1280), &p),
            GlassType::Large
        );
    }

    #[test]
    fn deviation_within_tolerance_still_matches() {
        let p = params();
        assert_eq!(
            classify(&BoundingBox::new(5, 9, 452, 1380), &p),
            GlassType::Large
        );
    }

    #[test]
    fn one_axis_out_of_tolerance_is_unknown() {
        let p = params();
        // Width matches the large vessel, height does not.
        assert_eq!(
            classify(&BoundingBox::new(0, 0, 480, 900), &p),
            GlassType::Unknown
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let p = params();
        let b = BoundingBox::new(7, 3, 310, 790);
        assert_eq!(classify(&b, &p), classify(&b, &p));
        assert_eq!(classify(&b, &p), GlassType::Small);
    }

    #[test]
    fn overlapping_references_prefer_small() {
        let p = ClassifierParams {
            small: ReferenceSize {
                width: 100,
                height: 100,
            },
            large: ReferenceSize {
                width: 105,
                height: 105,
            },
            tolerance_frac: 0.1,
        };
        assert_eq!(
            classify(&BoundingBox::new(0, 0, 102, 102), &p),
            GlassType::Small
        );
    }
}
