//! Polygon measures on integer contours: area, closed perimeter, convex hull
//! and the minimum-area enclosing rectangle.
use crate::types::Point;
use imageproc::geometry;
use imageproc::point::Point as PixelPoint;
use nalgebra::Vector2;
use serde::Serialize;

#[inline]
pub(crate) fn to_vec2(p: Point) -> Vector2<f64> {
    Vector2::new(p.x as f64, p.y as f64)
}

pub(crate) fn to_pixel_points(points: &[Point]) -> Vec<PixelPoint<i32>> {
    points.iter().copied().map(PixelPoint::from).collect()
}

/// Absolute shoelace area of the closed polygon.
pub fn polygon_area(points: &[Point]) -> f64 {
    geometry::contour_area(&to_pixel_points(points))
}

/// Length of the closed polyline including the closing edge.
pub fn closed_perimeter(points: &[Point]) -> f64 {
    geometry::arc_length(&to_pixel_points(points), true)
}

/// Convex hull of a point set; collinear points are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    geometry::convex_hull(to_pixel_points(points))
        .into_iter()
        .map(Point::from)
        .collect()
}

/// Minimum-area rectangle enclosing a point set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotatedRect {
    /// Corners in order around the rectangle, snapped outward to pixels.
    pub corners: [Point; 4],
    pub center: [f64; 2],
    pub width: f64,
    pub height: f64,
    /// Orientation of the `width` side in degrees.
    pub angle_deg: f64,
}

impl RotatedRect {
    fn from_corners(corners: [Point; 4]) -> Self {
        let c: Vec<Vector2<f64>> = corners.iter().copied().map(to_vec2).collect();
        let side = c[1] - c[0];
        let center = (c[0] + c[2]) * 0.5;
        Self {
            corners,
            center: [center.x, center.y],
            width: side.norm(),
            height: (c[2] - c[1]).norm(),
            angle_deg: side.y.atan2(side.x).to_degrees(),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// `max(w/h, h/w)`, or `None` for a degenerate rectangle.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((self.width / self.height).max(self.height / self.width))
    }
}

/// Rotating calipers over the convex hull. An empty input gives a
/// zero-sized rectangle at the origin.
pub fn min_area_rect(points: &[Point]) -> RotatedRect {
    if points.is_empty() {
        return RotatedRect::from_corners([Point::new(0, 0); 4]);
    }
    let corners = geometry::min_area_rect(&to_pixel_points(points)).map(Point::from);
    RotatedRect::from_corners(corners)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: i32, h: i32) -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(w, h),
            Point::new(0, h),
        ]
    }

    #[test]
    fn area_and_perimeter_of_rectangle() {
        let r = rect(10, 4);
        assert_eq!(polygon_area(&r), 40.0);
        assert_eq!(closed_perimeter(&r), 28.0);
        let mut rev = r.clone();
        rev.reverse();
        assert_eq!(polygon_area(&rev), 40.0);
    }

    #[test]
    fn axis_aligned_rect_is_recovered() {
        let r = min_area_rect(&rect(40, 10));
        assert!((r.area() - 400.0).abs() <= 60.0, "area {}", r.area());
        let aspect = r.aspect_ratio().unwrap();
        assert!((aspect - 4.0).abs() < 0.5, "aspect {aspect}");
    }

    #[test]
    fn rotated_square_has_unit_aspect() {
        let diamond = vec![
            Point::new(100, 0),
            Point::new(200, 100),
            Point::new(100, 200),
            Point::new(0, 100),
        ];
        let r = min_area_rect(&diamond);
        assert!((r.area() - 20_000.0).abs() < 1_000.0, "area {}", r.area());
        assert!((r.aspect_ratio().unwrap() - 1.0).abs() < 0.05);
        assert!((r.center[0] - 100.0).abs() < 2.0 && (r.center[1] - 100.0).abs() < 2.0);
    }

    #[test]
    fn collinear_points_give_degenerate_rect() {
        let line = vec![Point::new(0, 0), Point::new(5, 5), Point::new(10, 10)];
        let r = min_area_rect(&line);
        assert_eq!(r.height, 0.0);
        assert!(r.aspect_ratio().is_none());
        assert!(min_area_rect(&[]).aspect_ratio().is_none());
    }

    #[test]
    fn hull_drops_interior_points() {
        let pts = vec![
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(2, 1),
            Point::new(4, 4),
            Point::new(0, 4),
        ];
        assert_eq!(convex_hull(&pts).len(), 4);
    }
}
