//! Foreground/background blending for the base layer.
//!
//! The foreground opacity comes from its alpha channel when it has one and is
//! otherwise synthesised from a near-white test. The background only shows
//! through `1 - alpha`, so the two sliders act independently:
//!
//! `out = fg · a · tf + bg · tb · (1 - a)`

pub mod cutout;

pub use cutout::{resize_mask, split_foreground_background, CutoutOptions};

use crate::error::{Result, WireframeError};
use crate::image::ImageF32;
use crate::types::NEAR_WHITE_MIN_CHANNEL;
use image::imageops::{resize, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use log::debug;
use serde::Deserialize;

/// Slider positions in percent (0 = invisible, 100 = full strength).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub foreground_transparency: f32,
    pub background_transparency: f32,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            foreground_transparency: 100.0,
            background_transparency: 100.0,
        }
    }
}

#[inline]
fn slider_factor(percent: f32) -> f32 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0) / 100.0
}

/// Per-pixel opacity of `fg` in [0,1].
pub fn foreground_alpha(fg: &DynamicImage) -> ImageF32 {
    let (w, h) = (fg.width() as usize, fg.height() as usize);
    let rgba = fg.to_rgba8();
    let has_alpha = fg.color().has_alpha();
    let mut alpha = ImageF32::new(w, h);
    for (dst, px) in alpha.data.iter_mut().zip(rgba.pixels()) {
        *dst = if has_alpha {
            px.0[3] as f32 / 255.0
        } else if px.0[..3].iter().all(|&c| c >= NEAR_WHITE_MIN_CHANNEL) {
            0.0
        } else {
            1.0
        };
    }
    alpha
}

/// Blend `fg` over `bg` (resized to the foreground size) with independent
/// percentage sliders.
pub fn merge(
    fg: &DynamicImage,
    bg: &DynamicImage,
    fg_transparency: f32,
    bg_transparency: f32,
) -> Result<RgbImage> {
    let (w, h) = (fg.width(), fg.height());
    if w == 0 || h == 0 {
        return Err(WireframeError::EmptyImage {
            width: w,
            height: h,
        });
    }
    if bg.width() == 0 || bg.height() == 0 {
        return Err(WireframeError::EmptyImage {
            width: bg.width(),
            height: bg.height(),
        });
    }
    let tf = slider_factor(fg_transparency);
    let tb = slider_factor(bg_transparency);
    let alpha = foreground_alpha(fg);
    let fg_rgb = fg.to_rgb8();
    let bg_rgb = if (bg.width(), bg.height()) == (w, h) {
        bg.to_rgb8()
    } else {
        resize(&bg.to_rgb8(), w, h, FilterType::Triangle)
    };
    debug!(
        "merge {w}x{h} fg={:.2} bg={:.2} (bg source {}x{})",
        tf,
        tb,
        bg.width(),
        bg.height()
    );

    let mut out = RgbImage::new(w, h);
    for (((dst, f), b), &a) in out
        .pixels_mut()
        .zip(fg_rgb.pixels())
        .zip(bg_rgb.pixels())
        .zip(alpha.data.iter())
    {
        let mut px = [0u8; 3];
        for ch in 0..3 {
            let v = f.0[ch] as f32 * a * tf + b.0[ch] as f32 * tb * (1.0 - a);
            px[ch] = v.round().clamp(0.0, 255.0) as u8;
        }
        *dst = Rgb(px);
    }
    Ok(out)
}
