use image::{Rgb, RgbImage};
use std::f64::consts::TAU;
use wireframe_portrait::types::Point;

/// White canvas with a centred black square of side `side`.
pub fn square_on_white(width: u32, height: u32, side: u32) -> RgbImage {
    assert!(side <= width && side <= height, "square must fit the canvas");
    let x0 = (width - side) / 2;
    let y0 = (height - side) / 2;
    RgbImage::from_fn(width, height, |x, y| {
        let inside = (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y);
        if inside {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}

/// `n` integer points on a circle, counter-clockwise from angle zero.
pub fn circle_polygon(n: usize, cx: f64, cy: f64, radius: f64) -> Vec<Point> {
    assert!(n >= 3, "a polygon needs at least three points");
    (0..n)
        .map(|i| {
            let t = TAU * i as f64 / n as f64;
            Point::new(
                (cx + radius * t.cos()).round() as i32,
                (cy + radius * t.sin()).round() as i32,
            )
        })
        .collect()
}

pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}
