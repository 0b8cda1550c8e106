use glass_level_core::FrameError;

/// Errors from the fill-measurement stage.
#[derive(thiserror::Error, Debug)]
pub enum GaugeError {
    /// `diff` was called before `set_reference`; the caller must store a
    /// reference frame first.
    #[error("reference image not set")]
    ReferenceNotSet,
    #[error("frame size {got_w}x{got_h} does not match reference size {want_w}x{want_h}")]
    SizeMismatch {
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },
    #[error(transparent)]
    Frame(#[from] FrameError),
}
