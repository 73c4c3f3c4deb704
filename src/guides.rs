//! Construction guides derived from face landmarks.
//!
//! Two lines are drawn on a white canvas: a vertical line through the centre
//! of the landmark bounding box and a horizontal eye-level line. The eye level
//! is the mean of the two eye centres when eye landmark indices are
//! configured, otherwise 40% down the face box.
use crate::contours::geometry::convex_hull;
use crate::contours::render::Coverage;
use crate::types::{FaceLandmarks, Point, WHITE};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Fraction of the face height at which the fallback eye line sits.
const EYE_LINE_FALLBACK: f32 = 0.4;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GuideOptions {
    /// Landmark indices averaged into the left eye centre.
    pub left_eye: Vec<usize>,
    pub right_eye: Vec<usize>,
    /// Ordered face-outline indices; empty means convex hull of all points.
    pub face_oval: Vec<usize>,
    pub line_color: [u8; 3],
    pub line_thickness: f32,
    /// Radius of the eye-centre dots; 0 disables them.
    pub eye_dot_radius: i32,
}

impl Default for GuideOptions {
    fn default() -> Self {
        Self {
            left_eye: Vec::new(),
            right_eye: Vec::new(),
            face_oval: Vec::new(),
            line_color: [180, 180, 180],
            line_thickness: 1.0,
            eye_dot_radius: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideLine {
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceGuides {
    pub face_box: Option<FaceBox>,
    pub eye_centers: Option<[Point; 2]>,
    pub vertical: GuideLine,
    pub eye_level: GuideLine,
}

impl FaceGuides {
    /// Centred guides used when there is no face to measure.
    pub fn centered(width: u32, height: u32) -> Self {
        let (w, h) = (width as i32, height as i32);
        Self {
            face_box: None,
            eye_centers: None,
            vertical: GuideLine {
                from: Point::new(w / 2, 0),
                to: Point::new(w / 2, h),
            },
            eye_level: GuideLine {
                from: Point::new(0, h / 3),
                to: Point::new(w, h / 3),
            },
        }
    }

    pub fn from_landmarks(
        landmarks: &FaceLandmarks,
        width: u32,
        height: u32,
        options: &GuideOptions,
    ) -> Self {
        let pts = landmarks.pixels(width, height);
        let Some(face_box) = bounding_box(&pts) else {
            return Self::centered(width, height);
        };
        let (w, h) = (width as i32, height as i32);
        let center_x = face_box.x + face_box.width / 2;

        let eye_centers = match (
            eye_center(landmarks, &options.left_eye, width, height),
            eye_center(landmarks, &options.right_eye, width, height),
        ) {
            (Some(l), Some(r)) => Some([l, r]),
            _ => None,
        };
        let eye_y = match eye_centers {
            Some([l, r]) => (l.y + r.y).div_euclid(2),
            None => face_box.y + (face_box.height as f32 * EYE_LINE_FALLBACK) as i32,
        };

        Self {
            face_box: Some(face_box),
            eye_centers,
            vertical: GuideLine {
                from: Point::new(center_x, 0),
                to: Point::new(center_x, h),
            },
            eye_level: GuideLine {
                from: Point::new(0, eye_y),
                to: Point::new(w, eye_y),
            },
        }
    }

    /// Guides on a white canvas, ready to be used as the construction layer.
    pub fn render(&self, width: u32, height: u32, options: &GuideOptions) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(width, height, WHITE);
        let mut coverage = Coverage::new(width, height);
        for line in [self.vertical, self.eye_level] {
            coverage.stroke(
                Vector2::new(line.from.x as f64, line.from.y as f64),
                Vector2::new(line.to.x as f64, line.to.y as f64),
                options.line_thickness as f64,
            );
        }
        let color = Rgb(options.line_color);
        coverage.blend_onto(&mut canvas, color);
        if options.eye_dot_radius > 0 {
            for eye in self.eye_centers.iter().flatten() {
                draw_filled_circle_mut(&mut canvas, (eye.x, eye.y), options.eye_dot_radius, color);
            }
        }
        canvas
    }
}

fn bounding_box(points: &[Point]) -> Option<FaceBox> {
    let first = points.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in points {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    Some(FaceBox {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

/// Mean of the indexed landmarks in pixels; `None` if any index is missing.
fn eye_center(
    landmarks: &FaceLandmarks,
    indices: &[usize],
    width: u32,
    height: u32,
) -> Option<Point> {
    if indices.is_empty() {
        return None;
    }
    let mut sum = Vector2::<f64>::zeros();
    for &i in indices {
        let lm = landmarks.points.get(i)?;
        sum += Vector2::new(lm.x as f64 * width as f64, lm.y as f64 * height as f64);
    }
    let c = sum / indices.len() as f64;
    Some(Point::new(c.x as i32, c.y as i32))
}

/// Face outline in pixels: the configured oval, else the hull of all landmarks.
pub fn face_polygon(
    landmarks: &FaceLandmarks,
    width: u32,
    height: u32,
    options: &GuideOptions,
) -> Vec<Point> {
    if !options.face_oval.is_empty() {
        return options
            .face_oval
            .iter()
            .filter_map(|&i| landmarks.pixel(i, width, height))
            .collect();
    }
    convex_hull(&landmarks.pixels(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark { x, y, z: 0.0 }
    }

    fn face() -> FaceLandmarks {
        FaceLandmarks::new(vec![
            lm(0.25, 0.2),
            lm(0.75, 0.2),
            lm(0.75, 0.8),
            lm(0.25, 0.8),
            lm(0.375, 0.5),
            lm(0.625, 0.5),
            lm(0.5, 0.5),
        ])
    }

    #[test]
    fn fallback_eye_line_sits_at_forty_percent() {
        let g = FaceGuides::from_landmarks(&face(), 100, 100, &GuideOptions::default());
        assert_eq!(
            g.face_box,
            Some(FaceBox {
                x: 25,
                y: 20,
                width: 50,
                height: 60
            })
        );
        assert_eq!(g.vertical.from, Point::new(50, 0));
        assert_eq!(g.eye_level.from.y, 44);
        assert!(g.eye_centers.is_none());
    }

    #[test]
    fn configured_eyes_set_the_eye_line() {
        let opts = GuideOptions {
            left_eye: vec![4],
            right_eye: vec![5],
            ..GuideOptions::default()
        };
        let g = FaceGuides::from_landmarks(&face(), 100, 100, &opts);
        assert_eq!(g.eye_centers, Some([Point::new(37, 50), Point::new(62, 50)]));
        assert_eq!(g.eye_level.from.y, 50);
    }

    #[test]
    fn rendered_guides_are_gray_on_white() {
        let opts = GuideOptions {
            eye_dot_radius: 0,
            ..GuideOptions::default()
        };
        let g = FaceGuides::from_landmarks(&face(), 100, 100, &opts);
        let img = g.render(100, 100, &opts);
        assert_eq!(*img.get_pixel(50, 10), Rgb([180, 180, 180]));
        assert_eq!(*img.get_pixel(10, 44), Rgb([180, 180, 180]));
        assert_eq!(*img.get_pixel(10, 10), WHITE);
    }

    #[test]
    fn face_polygon_defaults_to_hull() {
        let poly = face_polygon(&face(), 100, 100, &GuideOptions::default());
        assert_eq!(poly.len(), 4);
        let oval = GuideOptions {
            face_oval: vec![0, 1, 2],
            ..GuideOptions::default()
        };
        assert_eq!(face_polygon(&face(), 100, 100, &oval).len(), 3);
    }

    #[test]
    fn empty_landmarks_fall_back_to_centered_guides() {
        let g = FaceGuides::from_landmarks(&FaceLandmarks::default(), 90, 60, &GuideOptions::default());
        assert_eq!(g, FaceGuides::centered(90, 60));
    }
}
