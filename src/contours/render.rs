//! Anti-aliased stroke rendering of closed contours.
//!
//! Strokes are accumulated into a coverage buffer holding, per pixel, the
//! maximum coverage over all segments. The buffer is blended onto the
//! background once, so overlapping segments never darken each other and the
//! same input always yields the same raster.
use super::ContourSet;
use crate::image::ImageF32;
use crate::types::{Point, BLACK, WHITE};
use image::{Rgb, RgbImage};
use nalgebra::Vector2;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub line_color: [u8; 3],
    pub line_thickness: f32,
    pub background: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_color: BLACK.0,
            line_thickness: 2.0,
            background: WHITE.0,
        }
    }
}

/// Per-pixel stroke coverage in [0,1].
pub(crate) struct Coverage {
    buf: ImageF32,
}

impl Coverage {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageF32::new(width as usize, height as usize),
        }
    }

    /// Stroke the segment `a`–`b` with a line of width `thickness`.
    pub(crate) fn stroke(&mut self, a: Vector2<f64>, b: Vector2<f64>, thickness: f64) {
        let (w, h) = (self.buf.w as i64, self.buf.h as i64);
        if w == 0 || h == 0 {
            return;
        }
        let half = thickness * 0.5;
        let reach = half + 1.0;
        let x0 = ((a.x.min(b.x) - reach).floor() as i64).max(0);
        let x1 = ((a.x.max(b.x) + reach).ceil() as i64).min(w - 1);
        let y0 = ((a.y.min(b.y) - reach).floor() as i64).max(0);
        let y1 = ((a.y.max(b.y) + reach).ceil() as i64).min(h - 1);
        let ab = b - a;
        let len2 = ab.norm_squared();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vector2::new(x as f64, y as f64);
                let t = if len2 > 0.0 {
                    ((p - a).dot(&ab) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = (p - (a + ab * t)).norm();
                let cov = (half + 0.5 - d).clamp(0.0, 1.0) as f32;
                let idx = self.buf.idx(x as usize, y as usize);
                if cov > self.buf.data[idx] {
                    self.buf.data[idx] = cov;
                }
            }
        }
    }

    pub(crate) fn stroke_closed(&mut self, points: &[Point], thickness: f64) {
        let n = points.len();
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            self.stroke(
                Vector2::new(a.x as f64, a.y as f64),
                Vector2::new(b.x as f64, b.y as f64),
                thickness,
            );
        }
    }

    pub(crate) fn blend_onto(&self, canvas: &mut RgbImage, color: Rgb<u8>) {
        for (px, &c) in canvas.pixels_mut().zip(&self.buf.data) {
            if c <= 0.0 {
                continue;
            }
            for ch in 0..3 {
                let bg = px.0[ch] as f32;
                let fg = color.0[ch] as f32;
                px.0[ch] = (bg + (fg - bg) * c).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Draw every contour of `set` onto a fresh `width`×`height` canvas.
pub fn render_contours(set: &ContourSet, width: u32, height: u32, options: &RenderOptions) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(options.background));
    if set.is_empty() {
        return canvas;
    }
    let mut coverage = Coverage::new(width, height);
    for contour in set.iter() {
        coverage.stroke_closed(contour.points(), options.line_thickness as f64);
    }
    coverage.blend_onto(&mut canvas, Rgb(options.line_color));
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contours::Contour;

    fn square_set() -> ContourSet {
        let c = Contour::new(vec![
            Point::new(10, 10),
            Point::new(30, 10),
            Point::new(30, 30),
            Point::new(10, 30),
        ])
        .unwrap();
        ContourSet::new(vec![c])
    }

    #[test]
    fn empty_set_renders_blank_canvas() {
        let img = render_contours(&ContourSet::default(), 8, 6, &RenderOptions::default());
        assert!(img.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn stroke_lands_on_outline_only() {
        let img = render_contours(&square_set(), 40, 40, &RenderOptions::default());
        assert_eq!(*img.get_pixel(20, 10), BLACK);
        assert_eq!(*img.get_pixel(30, 20), BLACK);
        assert_eq!(*img.get_pixel(20, 20), WHITE);
        assert_eq!(*img.get_pixel(2, 2), WHITE);
    }

    #[test]
    fn rendering_is_deterministic() {
        let opts = RenderOptions {
            line_color: [200, 20, 20],
            line_thickness: 3.0,
            background: [0, 0, 0],
        };
        let a = render_contours(&square_set(), 40, 40, &opts);
        let b = render_contours(&square_set(), 40, 40, &opts);
        assert_eq!(a, b);
        assert_eq!(*a.get_pixel(20, 10), Rgb([200, 20, 20]));
    }
}
