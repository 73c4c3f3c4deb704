//! Canny edge detection: Sobel gradients, NMS, hysteresis.
//!
//! Thresholds are in gradient-magnitude units of the 0..255 gray scale.
//! Pixels above `high` seed edges, pixels above `low` extend them through
//! 8-connected chains. Output is a binary `EdgeMap` (0 or 255).
use super::grad::sobel_gradients;
use super::nms::suppress_non_maxima;
use super::threshold::{auto_thresholds, AutoCannyParams, CannyThresholds};
use crate::image::{ImageF32, ImageView};
use crate::types::EdgeMap;
use image::imageops::{resize, FilterType};
use image::{GrayImage, Luma};
use log::{debug, warn};

pub const EDGE_ON: u8 = 255;

/// Grow strong seeds (`> high`) through weak pixels (`> low`).
pub fn hysteresis(thin: &ImageF32, low: f32, high: f32) -> EdgeMap {
    let (w, h) = (thin.w, thin.h);
    let mut out = GrayImage::new(w as u32, h as u32);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..h {
        let row = thin.row(y);
        for (x, &m) in row.iter().enumerate() {
            if m > high && out.get_pixel(x as u32, y as u32).0[0] == 0 {
                out.put_pixel(x as u32, y as u32, Luma([EDGE_ON]));
                stack.push((x, y));
                while let Some((cx, cy)) = stack.pop() {
                    for ny in cy.saturating_sub(1)..=(cy + 1).min(h - 1) {
                        for nx in cx.saturating_sub(1)..=(cx + 1).min(w - 1) {
                            let px = out.get_pixel_mut(nx as u32, ny as u32);
                            if px.0[0] == 0 && thin.get(nx, ny) > low {
                                px.0[0] = EDGE_ON;
                                stack.push((nx, ny));
                            }
                        }
                    }
                }
            }
        }
    }
    out
}

/// Canny on an already smoothed gray image.
pub fn canny(gray: &GrayImage, thresholds: CannyThresholds) -> EdgeMap {
    if gray.width() == 0 || gray.height() == 0 {
        return GrayImage::new(gray.width(), gray.height());
    }
    let grad = sobel_gradients(&ImageF32::from_gray(gray));
    let thin = suppress_non_maxima(&grad, thresholds.low);
    hysteresis(&thin, thresholds.low, thresholds.high)
}

/// Canny with thresholds estimated from the image itself.
pub fn auto_canny(gray: &GrayImage, params: &AutoCannyParams) -> EdgeMap {
    let thresholds = auto_thresholds(gray, params);
    debug!(
        "auto canny {}x{} low={:.1} high={:.1}",
        gray.width(),
        gray.height(),
        thresholds.low,
        thresholds.high
    );
    canny(gray, thresholds)
}

/// Run auto-Canny at several scales and OR the maps at source resolution.
pub fn multiscale_canny(gray: &GrayImage, scales: &[f32], params: &AutoCannyParams) -> EdgeMap {
    let (w, h) = gray.dimensions();
    let mut combined = GrayImage::new(w, h);
    for &scale in scales {
        let edges = if (scale - 1.0).abs() < f32::EPSILON {
            auto_canny(gray, params)
        } else {
            let sw = (w as f32 * scale) as u32;
            let sh = (h as f32 * scale) as u32;
            if sw < 3 || sh < 3 {
                warn!("skipping edge scale {scale}: {sw}x{sh} is too small");
                continue;
            }
            let scaled = resize(gray, sw, sh, FilterType::Triangle);
            resize(&auto_canny(&scaled, params), w, h, FilterType::Nearest)
        };
        for (dst, src) in combined.pixels_mut().zip(edges.pixels()) {
            if src.0[0] > 0 {
                dst.0[0] = EDGE_ON;
            }
        }
    }
    combined
}
