//! Final RGB → RGBA conversion.
use crate::types::{BackgroundPolicy, Point};
use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_polygon_mut;
use imageproc::morphology::erode;
use serde::Deserialize;

/// Line colors kept by the color filter.
pub const DEFAULT_PALETTE: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [255, 0, 255],
    [128, 128, 128],
];

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorFilter {
    pub palette: Vec<[u8; 3]>,
    /// Per-channel tolerance, inclusive.
    pub tolerance: u8,
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_vec(),
            tolerance: 20,
        }
    }
}

impl ColorFilter {
    pub fn keeps(&self, px: &Rgb<u8>) -> bool {
        self.palette.iter().any(|color| {
            color
                .iter()
                .zip(px.0.iter())
                .all(|(&c, &p)| c.abs_diff(p) <= self.tolerance)
        })
    }
}

/// How the stacked canvas gets its alpha channel.
#[derive(Clone, Debug, PartialEq)]
pub enum MaskingStrategy {
    /// Background pixels transparent, everything else opaque.
    LinesOnly { policy: BackgroundPolicy },
    /// Transparent inside the face polygon after eroding it `erode_passes`
    /// times with a 5×5 square.
    FaceMask { polygon: Vec<Point>, erode_passes: u32 },
    /// Opaque only near one of the palette colors.
    ColorFilter(ColorFilter),
    /// Fully opaque; alpha is left to the caller.
    Passthrough,
}

impl Default for MaskingStrategy {
    fn default() -> Self {
        Self::LinesOnly {
            policy: BackgroundPolicy::ExactWhite,
        }
    }
}

impl MaskingStrategy {
    pub fn face_mask(polygon: Vec<Point>) -> Self {
        Self::FaceMask {
            polygon,
            erode_passes: 2,
        }
    }
}

/// Filled polygon mask; fewer than three distinct vertices yields `None`.
pub(crate) fn polygon_mask(width: u32, height: u32, polygon: &[Point]) -> Option<GrayImage> {
    let mut poly: Vec<imageproc::point::Point<i32>> = Vec::with_capacity(polygon.len());
    for &p in polygon {
        let p = imageproc::point::Point::from(p);
        if poly.last() != Some(&p) {
            poly.push(p);
        }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() < 3 {
        return None;
    }
    let mut mask = GrayImage::new(width, height);
    draw_polygon_mut(&mut mask, &poly, Luma([255u8]));
    Some(mask)
}

fn with_alpha(canvas: &RgbImage, alpha: impl Fn(u32, u32, &Rgb<u8>) -> u8) -> RgbaImage {
    RgbaImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let px = canvas.get_pixel(x, y);
        Rgba([px.0[0], px.0[1], px.0[2], alpha(x, y, px)])
    })
}

pub fn to_rgba(canvas: &RgbImage, strategy: &MaskingStrategy) -> RgbaImage {
    match strategy {
        MaskingStrategy::LinesOnly { policy } => {
            with_alpha(canvas, |_, _, px| if policy.is_background(px) { 0 } else { 255 })
        }
        MaskingStrategy::FaceMask {
            polygon,
            erode_passes,
        } => {
            let Some(mut mask) = polygon_mask(canvas.width(), canvas.height(), polygon) else {
                return with_alpha(canvas, |_, _, _| 255);
            };
            for _ in 0..*erode_passes {
                mask = erode(&mask, Norm::LInf, 2);
            }
            with_alpha(canvas, |x, y, _| {
                if mask.get_pixel(x, y).0[0] > 0 {
                    0
                } else {
                    255
                }
            })
        }
        MaskingStrategy::ColorFilter(filter) => {
            with_alpha(canvas, |_, _, px| if filter.keeps(px) { 255 } else { 0 })
        }
        MaskingStrategy::Passthrough => with_alpha(canvas, |_, _, _| 255),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BLACK, WHITE};

    fn canvas() -> RgbImage {
        let mut img = RgbImage::from_pixel(30, 30, WHITE);
        img.put_pixel(1, 1, BLACK);
        img.put_pixel(2, 1, Rgb([254, 255, 255]));
        img.put_pixel(3, 1, Rgb([250, 20, 10]));
        img
    }

    #[test]
    fn lines_only_alpha_is_binary_on_pure_white() {
        let img = canvas();
        let rgba = to_rgba(&img, &MaskingStrategy::default());
        for (src, out) in img.pixels().zip(rgba.pixels()) {
            let expected = if *src == WHITE { 0 } else { 255 };
            assert_eq!(out.0[3], expected);
            assert_eq!(&out.0[..3], &src.0);
        }
    }

    #[test]
    fn tolerant_lines_only_hides_near_white() {
        let rgba = to_rgba(
            &canvas(),
            &MaskingStrategy::LinesOnly {
                policy: BackgroundPolicy::near_white(),
            },
        );
        assert_eq!(rgba.get_pixel(2, 1).0[3], 0);
        assert_eq!(rgba.get_pixel(1, 1).0[3], 255);
    }

    #[test]
    fn face_mask_clears_eroded_interior() {
        let square = vec![
            Point::new(5, 5),
            Point::new(25, 5),
            Point::new(25, 25),
            Point::new(5, 25),
            Point::new(5, 5),
        ];
        let rgba = to_rgba(&canvas(), &MaskingStrategy::face_mask(square));
        assert_eq!(rgba.get_pixel(15, 15).0[3], 0);
        assert_eq!(rgba.get_pixel(6, 15).0[3], 255);
        assert_eq!(rgba.get_pixel(1, 1).0[3], 255);
    }

    #[test]
    fn degenerate_face_polygon_keeps_everything() {
        let line = vec![Point::new(0, 0), Point::new(10, 10)];
        let rgba = to_rgba(&canvas(), &MaskingStrategy::face_mask(line));
        assert!(rgba.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn color_filter_keeps_palette_neighbours() {
        let rgba = to_rgba(&canvas(), &MaskingStrategy::ColorFilter(ColorFilter::default()));
        assert_eq!(rgba.get_pixel(3, 1).0[3], 255);
        assert_eq!(rgba.get_pixel(1, 1).0[3], 0);
        assert_eq!(rgba.get_pixel(0, 0).0[3], 0);
    }
}
