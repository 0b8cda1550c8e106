//! Directional Sobel gradients with configurable aperture.
//!
//! Separable implementation: a smoothing tap along one axis and a derivative
//! tap along the other, accumulated at 32-bit precision and stored as `i16`
//! so intermediate magnitudes never clip. Borders are clamped (replicate).
//!
//! The 3×3 aperture is what the fill-level stage uses on already-cropped
//! glass frames; the 5×5 aperture feeds glass-boundary detection on the full
//! frame, where edges are softer after blurring.

use image::{GrayImage, ImageBuffer, Luma};
use serde::{Deserialize, Serialize};

/// Signed gradient response, one sample per pixel.
pub type GradientFrame = ImageBuffer<Luma<i16>, Vec<i16>>;

/// Sobel kernel size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SobelAperture {
    Three,
    #[default]
    Five,
}

impl SobelAperture {
    fn smooth(self) -> &'static [i32] {
        match self {
            SobelAperture::Three => &[1, 2, 1],
            SobelAperture::Five => &[1, 4, 6, 4, 1],
        }
    }

    fn deriv(self) -> &'static [i32] {
        match self {
            SobelAperture::Three => &[-1, 0, 1],
            SobelAperture::Five => &[-1, -2, 0, 2, 1],
        }
    }
}

/// Horizontal derivative (responds to vertical edges such as glass walls).
pub fn horizontal_gradient(src: &GrayImage, aperture: SobelAperture) -> GradientFrame {
    convolve_separable(src, aperture.deriv(), aperture.smooth())
}

/// Vertical derivative (responds to horizontal edges such as the liquid line).
pub fn vertical_gradient(src: &GrayImage, aperture: SobelAperture) -> GradientFrame {
    convolve_separable(src, aperture.smooth(), aperture.deriv())
}

/// Absolute gradient response saturated to 8 bits.
pub fn gradient_abs_u8(grad: &GradientFrame) -> GrayImage {
    let data: Vec<u8> = grad
        .as_raw()
        .iter()
        .map(|&v| (v as i32).unsigned_abs().min(255) as u8)
        .collect();
    crate::frame::buffer_from_raw(grad.width(), grad.height(), data)
}

fn convolve_separable(src: &GrayImage, kx: &[i32], ky: &[i32]) -> GradientFrame {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let mut out = vec![0i16; w * h];
    if w == 0 || h == 0 {
        return GradientFrame::from_raw(src.width(), src.height(), out)
            .expect("buffer length matches dimensions");
    }

    let data = src.as_raw();
    let rx = (kx.len() / 2) as i32;
    let ry = (ky.len() / 2) as i32;

    // Horizontal tap first, full i32 precision.
    let mut tmp = vec![0i32; w * h];
    for y in 0..h {
        let row = &data[y * w..(y + 1) * w];
        let out_row = &mut tmp[y * w..(y + 1) * w];
        for (x, slot) in out_row.iter_mut().enumerate() {
            let mut acc = 0i32;
            for (k, &coef) in kx.iter().enumerate() {
                let xi = (x as i32 + k as i32 - rx).clamp(0, w as i32 - 1) as usize;
                acc += coef * row[xi] as i32;
            }
            *slot = acc;
        }
    }

    // Vertical tap over the intermediate buffer.
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0i32;
            for (k, &coef) in ky.iter().enumerate() {
                let yi = (y as i32 + k as i32 - ry).clamp(0, h as i32 - 1) as usize;
                acc += coef * tmp[yi * w + x];
            }
            out[y * w + x] = acc.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        }
    }

    GradientFrame::from_raw(src.width(), src.height(), out)
        .expect("buffer length matches dimensions")
}
