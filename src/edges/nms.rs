//! Non‑maximum suppression on gradient magnitude with direction alignment.
//!
//! For each interior pixel the gradient direction is quantised into four
//! bins (0°, 45°, 90°, 135°) and the magnitude is compared against its two
//! neighbours along that direction. Ties are broken asymmetrically: the pixel
//! must be strictly greater than the "before" neighbour and at least equal to
//! the "after" neighbour, so a symmetric two-pixel ridge keeps exactly one
//! pixel instead of none.
//!
//! The outermost 1‑pixel frame is left suppressed.
use crate::edges::grad::Grad;
use crate::image::{ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.414_213_57;

/// Thin the gradient magnitude: non-maxima and sub-threshold pixels are zeroed.
pub fn suppress_non_maxima(grad: &Grad, mag_thresh: f32) -> ImageF32 {
    let w = grad.mag.w;
    let h = grad.mag.h;
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let dst = out.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= mag_thresh {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0) == (gy >= 0.0);

            let (before, after) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag > before && mag >= after {
                dst[x] = mag;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::grad::sobel_gradients;

    #[test]
    fn symmetric_step_keeps_a_single_column() {
        let mut img = ImageF32::new(10, 6);
        for y in 0..6 {
            for x in 5..10 {
                img.set(x, y, 255.0);
            }
        }
        let thin = suppress_non_maxima(&sobel_gradients(&img), 0.0);
        for y in 1..5 {
            let kept: Vec<usize> = (0..10).filter(|&x| thin.get(x, y) > 0.0).collect();
            assert_eq!(kept, vec![4], "row {y}");
        }
    }

    #[test]
    fn threshold_suppresses_weak_responses() {
        let mut img = ImageF32::new(8, 8);
        for y in 0..8 {
            for x in 4..8 {
                img.set(x, y, 10.0);
            }
        }
        let thin = suppress_non_maxima(&sobel_gradients(&img), 100.0);
        assert!(thin.data.iter().all(|&v| v == 0.0));
    }
}
