//! Image gradients (Sobel/Scharr) and the 3×3 Laplacian response.
//!
//! - Convolves a 3×3 kernel pair (`X` and `Y`) with border clamping.
//! - Outputs per‑pixel `gx`, `gy`, `mag = sqrt(gx^2+gy^2)` (L2 magnitude).
//! - Responses stay on the input intensity scale (0..255 in, raw kernel sums
//!   out), so Canny thresholds can be expressed in gray levels.
//!
//! Complexity: O(W·H) per pass; memory: three float buffers.
use crate::image::{ImageF32, ImageView, ImageViewMut};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const SCHARR_KERNEL_X: Kernel3 = [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]];
const SCHARR_KERNEL_Y: Kernel3 = [[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]];

/// Aperture-3 Laplacian used for the second-derivative response.
const LAPLACIAN_KERNEL: Kernel3 = [[2.0, 0.0, 2.0], [0.0, -8.0, 0.0], [2.0, 0.0, 2.0]];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientKernel {
    Sobel,
    Scharr,
}

/// Per‑pixel gradient buffers.
#[derive(Clone, Debug)]
pub struct Grad {
    /// Horizontal derivative (convolution with kernel X)
    pub gx: ImageF32,
    /// Vertical derivative (convolution with kernel Y)
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

#[inline]
fn correlate3(rows: &[&[f32]; 3], x_idx: &[usize; 3], kernel: &Kernel3) -> f32 {
    let mut sum = 0.0;
    for (row, k_row) in rows.iter().zip(kernel.iter()) {
        sum += row[x_idx[0]] * k_row[0] + row[x_idx[1]] * k_row[1] + row[x_idx[2]] * k_row[2];
    }
    sum
}

fn gradients_with_kernels(l: &ImageF32, kernel_x: &Kernel3, kernel_y: &Kernel3) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let rows = [
            l.row(y.saturating_sub(1)),
            l.row(y),
            l.row((y + 1).min(h - 1)),
        ];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let sum_x = correlate3(&rows, &x_idx, kernel_x);
            let sum_y = correlate3(&rows, &x_idx, kernel_y);
            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    Grad { gx, gy, mag }
}

pub fn image_gradients(l: &ImageF32, kernel: GradientKernel) -> Grad {
    match kernel {
        GradientKernel::Sobel => gradients_with_kernels(l, &SOBEL_KERNEL_X, &SOBEL_KERNEL_Y),
        GradientKernel::Scharr => gradients_with_kernels(l, &SCHARR_KERNEL_X, &SCHARR_KERNEL_Y),
    }
}

/// Compute Sobel gradients on a single‑channel float image.
pub fn sobel_gradients(l: &ImageF32) -> Grad {
    image_gradients(l, GradientKernel::Sobel)
}

/// Compute Scharr gradients (better rotational symmetry than Sobel).
pub fn scharr_gradients(l: &ImageF32) -> Grad {
    image_gradients(l, GradientKernel::Scharr)
}

/// Absolute 3×3 Laplacian response with border clamping.
pub fn laplacian_abs(l: &ImageF32) -> ImageF32 {
    let (w, h) = (l.w, l.h);
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    for y in 0..h {
        let rows = [
            l.row(y.saturating_sub(1)),
            l.row(y),
            l.row((y + 1).min(h - 1)),
        ];
        let dst = out.row_mut(y);
        for (x, px) in dst.iter_mut().enumerate() {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            *px = correlate3(&rows, &x_idx, &LAPLACIAN_KERNEL).abs();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_step(w: usize, h: usize, split: usize) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in split..w {
                img.set(x, y, 255.0);
            }
        }
        img
    }

    #[test]
    fn sobel_responds_horizontally_to_vertical_step() {
        let img = vertical_step(8, 8, 4);
        let g = sobel_gradients(&img);
        assert_eq!(g.gx.get(3, 4), 1020.0);
        assert_eq!(g.gy.get(3, 4), 0.0);
        assert_eq!(g.mag.get(0, 4), 0.0);
    }

    #[test]
    fn scharr_is_stronger_than_sobel() {
        let img = vertical_step(8, 8, 4);
        let sobel = sobel_gradients(&img);
        let scharr = scharr_gradients(&img);
        assert!(scharr.mag.get(4, 4) > sobel.mag.get(4, 4));
    }

    #[test]
    fn laplacian_vanishes_on_flat_and_linear_regions() {
        let flat = ImageF32::filled(6, 6, 90.0);
        assert!(laplacian_abs(&flat).data.iter().all(|&v| v == 0.0));

        let step = vertical_step(8, 8, 4);
        let lap = laplacian_abs(&step);
        assert!(lap.get(3, 3) > 0.0);
        assert_eq!(lap.get(1, 3), 0.0);
    }
}
