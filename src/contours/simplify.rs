//! Douglas–Peucker simplification of closed contours.
//!
//! The polygon is split at the vertex farthest from its first point and each
//! half is simplified as an open chain, so the closing edge is preserved.
use super::geometry::to_pixel_points;
use crate::types::Point;
use imageproc::geometry::approximate_polygon_dp;

/// Simplify a closed polygon with tolerance `epsilon` (pixels).
///
/// Never returns more points than it was given; if fewer than three points
/// would survive, or `epsilon` is not positive, the input is returned
/// unchanged.
pub fn douglas_peucker_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 || epsilon.is_nan() || epsilon <= 0.0 {
        return points.to_vec();
    }
    let pts = to_pixel_points(points);
    let dist2 = |i: usize| {
        let (dx, dy) = ((pts[i].x - pts[0].x) as i64, (pts[i].y - pts[0].y) as i64);
        dx * dx + dy * dy
    };
    // Last of the farthest points wins ties.
    let split = (1..n).max_by_key(|&i| dist2(i)).unwrap_or(0);
    if split == 0 || dist2(split) == 0 {
        return points.to_vec();
    }

    let mut out = approximate_polygon_dp(&pts[..=split], epsilon, false);
    out.pop();
    let mut tail = pts[split..].to_vec();
    tail.push(pts[0]);
    let mut back = approximate_polygon_dp(&tail, epsilon, false);
    back.pop();
    out.extend(back);

    if out.len() < 3 {
        return points.to_vec();
    }
    out.into_iter().map(Point::from).collect()
}
