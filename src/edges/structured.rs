//! Structured edge approximation: a blend of first and second derivative
//! responses binarised with Otsu's threshold.
use super::canny::EDGE_ON;
use super::grad::{laplacian_abs, scharr_gradients, sobel_gradients};
use crate::image::ImageF32;
use crate::types::EdgeMap;
use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use log::debug;

const SOBEL_WEIGHT: f32 = 0.4;
const SCHARR_WEIGHT: f32 = 0.4;
const LAPLACIAN_WEIGHT: f32 = 0.2;

/// Weighted gradient blend, min-max normalised to 0..255.
///
/// Returns `None` when the response is flat.
pub fn structured_response(gray: &GrayImage) -> Option<GrayImage> {
    let l = ImageF32::from_gray(gray);
    let sobel = sobel_gradients(&l).mag;
    let scharr = scharr_gradients(&l).mag;
    let lap = laplacian_abs(&l);

    let mut blend = ImageF32::new(l.w, l.h);
    for (i, v) in blend.data.iter_mut().enumerate() {
        *v = SOBEL_WEIGHT * sobel.data[i]
            + SCHARR_WEIGHT * scharr.data[i]
            + LAPLACIAN_WEIGHT * lap.data[i];
    }

    normalize_to_u8(&blend)
}

/// Min-max stretch to 0..255, truncating toward zero. `None` when flat.
fn normalize_to_u8(values: &ImageF32) -> Option<GrayImage> {
    let (lo, hi) = values.min_max()?;
    let range = hi - lo;
    if range <= f32::EPSILON {
        return None;
    }
    Some(GrayImage::from_fn(values.w as u32, values.h as u32, |x, y| {
        let v = (values.get(x as usize, y as usize) - lo) / range * 255.0;
        Luma([v.clamp(0.0, 255.0) as u8])
    }))
}

pub fn structured_edges(gray: &GrayImage) -> EdgeMap {
    let Some(response) = structured_response(gray) else {
        debug!("structured edges: flat response");
        return GrayImage::new(gray.width(), gray.height());
    };
    let level = otsu_level(&response);
    debug!("structured edges: otsu level {level}");
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([if response.get_pixel(x, y).0[0] > level { EDGE_ON } else { 0 }])
    })
}
