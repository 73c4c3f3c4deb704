//! Segmentation mask → foreground/background RGBA pair.
//!
//! The mask is scaled to 8-bit alpha, optionally restricted to its largest
//! 8-connected component and feathered with an odd Gaussian kernel. The
//! background cut uses the complementary alpha.
use crate::error::{Result, WireframeError};
use crate::image::ImageF32;
use image::{GrayImage, Luma, Rgba, RgbImage, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::region_labelling::{connected_components, Connectivity};
use log::debug;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CutoutOptions {
    pub keep_largest: bool,
    /// Odd Gaussian kernel size; 0 or even disables feathering.
    pub feather: u32,
}

impl Default for CutoutOptions {
    fn default() -> Self {
        Self {
            keep_largest: true,
            feather: 5,
        }
    }
}

/// Bilinear resize of a mask, clamped to [0,1].
pub fn resize_mask(mask: &ImageF32, width: u32, height: u32) -> ImageF32 {
    let mut out = if (mask.w, mask.h) == (width as usize, height as usize) {
        mask.clone()
    } else {
        mask.resize_bilinear(width as usize, height as usize)
    };
    out.clamp_in_place(0.0, 1.0);
    out
}

/// Conventional Gaussian sigma for a kernel of `ksize` taps.
fn sigma_for_kernel(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Zero the alpha outside the largest 8-connected `alpha > 0` region.
fn keep_largest_component(alpha: &mut GrayImage) {
    let support = GrayImage::from_fn(alpha.width(), alpha.height(), |x, y| {
        Luma([if alpha.get_pixel(x, y).0[0] > 0 { 255 } else { 0 }])
    });
    let labels = connected_components(&support, Connectivity::Eight, Luma([0u8]));
    let n = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0) as usize;
    if n < 2 {
        return;
    }
    let mut sizes = vec![0usize; n + 1];
    for p in labels.pixels() {
        sizes[p.0[0] as usize] += 1;
    }
    let keep = (1..=n).max_by_key(|&i| (sizes[i], std::cmp::Reverse(i))).unwrap_or(1);
    debug!("cutout: keeping component {keep} of {n} ({} px)", sizes[keep]);
    for (a, l) in alpha.pixels_mut().zip(labels.pixels()) {
        if l.0[0] as usize != keep {
            a.0[0] = 0;
        }
    }
}

/// Alpha matte from a mask already at image resolution.
pub fn alpha_matte(mask: &ImageF32, options: &CutoutOptions) -> GrayImage {
    let mut alpha = GrayImage::from_fn(mask.w as u32, mask.h as u32, |x, y| {
        Luma([(mask.get(x as usize, y as usize).clamp(0.0, 1.0) * 255.0) as u8])
    });
    if options.keep_largest {
        keep_largest_component(&mut alpha);
    }
    if options.feather > 0 && options.feather % 2 == 1 {
        alpha = gaussian_blur_f32(&alpha, sigma_for_kernel(options.feather));
    }
    alpha
}

/// Split `rgb` into (foreground, background) RGBA cut-outs.
pub fn split_foreground_background(
    rgb: &RgbImage,
    mask: &ImageF32,
    options: &CutoutOptions,
) -> Result<(RgbaImage, RgbaImage)> {
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(WireframeError::EmptyImage {
            width: rgb.width(),
            height: rgb.height(),
        });
    }
    WireframeError::check_dimensions(rgb.dimensions(), (mask.w as u32, mask.h as u32))?;
    let alpha = alpha_matte(mask, options);
    let cut = |invert: bool| {
        RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            let a = alpha.get_pixel(x, y).0[0];
            Rgba([r, g, b, if invert { 255 - a } else { a }])
        })
    };
    Ok((cut(false), cut(true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_blobs() -> ImageF32 {
        let mut m = ImageF32::new(20, 10);
        for y in 2..8 {
            for x in 1..8 {
                m.set(x, y, 1.0);
            }
        }
        m.set(15, 5, 1.0);
        m
    }

    #[test]
    fn largest_component_survives() {
        let opts = CutoutOptions {
            keep_largest: true,
            feather: 0,
        };
        let alpha = alpha_matte(&two_blobs(), &opts);
        assert_eq!(alpha.get_pixel(4, 4).0[0], 255);
        assert_eq!(alpha.get_pixel(15, 5).0[0], 0);
    }

    #[test]
    fn soft_region_survives_as_one_component() {
        // one connected subject with two confidence levels plus a stray speck
        let mut m = ImageF32::new(20, 10);
        for y in 2..8 {
            for x in 2..18 {
                m.set(x, y, if x < 10 { 1.0 } else { 0.6 });
            }
        }
        m.set(0, 0, 1.0);
        let opts = CutoutOptions {
            keep_largest: true,
            feather: 0,
        };
        let alpha = alpha_matte(&m, &opts);
        assert_eq!(alpha.get_pixel(5, 5).0[0], 255);
        assert_eq!(alpha.get_pixel(14, 5).0[0], 153);
        assert_eq!(alpha.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn graded_mask_keeps_its_whole_support() {
        let mut m = ImageF32::new(41, 41);
        for y in 0..41 {
            for x in 0..41 {
                let r = ((x as f32 - 20.0).powi(2) + (y as f32 - 20.0).powi(2)).sqrt();
                m.set(x, y, (1.0 - r / 20.0).max(0.0));
            }
        }
        let before = alpha_matte(
            &m,
            &CutoutOptions {
                keep_largest: false,
                feather: 0,
            },
        );
        let after = alpha_matte(
            &m,
            &CutoutOptions {
                keep_largest: true,
                feather: 0,
            },
        );
        let nonzero = |img: &GrayImage| img.pixels().filter(|p| p.0[0] > 0).count();
        assert!(nonzero(&before) > 1000);
        assert_eq!(before, after);
        assert_eq!(nonzero(&after), nonzero(&before));
    }

    #[test]
    fn fg_and_bg_alpha_are_complementary() {
        let rgb = RgbImage::from_pixel(20, 10, Rgb([9, 8, 7]));
        let (fg, bg) = split_foreground_background(&rgb, &two_blobs(), &CutoutOptions::default()).unwrap();
        for (f, b) in fg.pixels().zip(bg.pixels()) {
            assert_eq!(f.0[3] as u16 + b.0[3] as u16, 255);
            assert_eq!(&f.0[..3], &[9, 8, 7]);
        }
        assert!(fg.get_pixel(4, 4).0[3] > 200);
        assert_eq!(fg.get_pixel(15, 5).0[3], 0);
    }

    #[test]
    fn mask_is_resized_and_clamped() {
        let mut m = ImageF32::filled(2, 2, 1.5);
        m.set(0, 0, -1.0);
        let r = resize_mask(&m, 8, 8);
        assert_eq!((r.w, r.h), (8, 8));
        assert!(r.data.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn mask_size_must_match() {
        let rgb = RgbImage::new(4, 4);
        let err = split_foreground_background(&rgb, &ImageF32::new(3, 4), &CutoutOptions::default());
        assert!(matches!(err, Err(WireframeError::DimensionMismatch { .. })));
    }

    #[test]
    fn kernel_sigma_follows_kernel_size() {
        assert!((sigma_for_kernel(5) - 1.1).abs() < 1e-6);
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-6);
    }
}
