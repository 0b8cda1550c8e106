/// Errors from frame-level utilities.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("mask size {mask_w}x{mask_h} does not match frame size {frame_w}x{frame_h}")]
    MaskSizeMismatch {
        frame_w: u32,
        frame_h: u32,
        mask_w: u32,
        mask_h: u32,
    },
    #[error("autoscale range is empty (t_min={t_min}, t_max={t_max})")]
    EmptyAutoscaleRange { t_min: u16, t_max: u16 },
}
