//! Chaikin corner cutting and the strength presets that pair it with
//! Douglas–Peucker.
use super::geometry::to_vec2;
use crate::types::Point;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Jointly tuned smoothing parameters.
///
/// Heavier presets use more iterations, a larger cut ratio and a smaller
/// simplification tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmoothingParams {
    pub iterations: u32,
    pub cut_ratio: f64,
    pub epsilon_factor: f64,
}

impl SmoothingParams {
    pub const fn light() -> Self {
        Self {
            iterations: 1,
            cut_ratio: 0.2,
            epsilon_factor: 0.008,
        }
    }

    pub const fn medium() -> Self {
        Self {
            iterations: 2,
            cut_ratio: 0.25,
            epsilon_factor: 0.005,
        }
    }

    pub const fn heavy() -> Self {
        Self {
            iterations: 3,
            cut_ratio: 0.3,
            epsilon_factor: 0.003,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingStrength {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl SmoothingStrength {
    pub const fn params(self) -> SmoothingParams {
        match self {
            SmoothingStrength::Light => SmoothingParams::light(),
            SmoothingStrength::Medium => SmoothingParams::medium(),
            SmoothingStrength::Heavy => SmoothingParams::heavy(),
        }
    }
}

/// One or more Chaikin passes over a closed float polygon.
pub fn chaikin_points(points: &[Vector2<f64>], iterations: u32, ratio: f64) -> Vec<Vector2<f64>> {
    let mut current = points.to_vec();
    if current.len() < 3 {
        return current;
    }
    for _ in 0..iterations {
        let n = current.len();
        let mut next = Vec::with_capacity(n * 2);
        for i in 0..n {
            let p1 = current[i];
            let d = current[(i + 1) % n] - p1;
            next.push(p1 + d * ratio);
            next.push(p1 + d * (1.0 - ratio));
        }
        current = next;
    }
    current
}

/// Chaikin smoothing of an integer contour, rounded back to pixels once.
pub fn chaikin_smooth(points: &[Point], iterations: u32, ratio: f64) -> Vec<Point> {
    if points.len() < 3 || iterations == 0 {
        return points.to_vec();
    }
    let pts: Vec<Vector2<f64>> = points.iter().copied().map(to_vec2).collect();
    chaikin_points(&pts, iterations, ratio)
        .into_iter()
        .map(|p| Point::new(p.x.round() as i32, p.y.round() as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 100),
            Point::new(0, 100),
        ]
    }

    #[test]
    fn one_pass_cuts_every_corner() {
        let out = chaikin_smooth(&square(), 1, 0.25);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], Point::new(25, 0));
        assert_eq!(out[1], Point::new(75, 0));
        assert_eq!(out[7], Point::new(0, 25));
    }

    #[test]
    fn passes_compose_on_floats() {
        let pts: Vec<Vector2<f64>> = square().into_iter().map(to_vec2).collect();
        for (n, m) in [(1, 1), (1, 2), (2, 1)] {
            let chained = chaikin_points(&chaikin_points(&pts, n, 0.25), m, 0.25);
            let direct = chaikin_points(&pts, n + m, 0.25);
            assert_eq!(chained.len(), direct.len());
            for (a, b) in chained.iter().zip(&direct) {
                assert!((a - b).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn integer_passes_compose_up_to_rounding() {
        let chained = chaikin_smooth(&chaikin_smooth(&square(), 1, 0.25), 2, 0.25);
        let direct = chaikin_smooth(&square(), 3, 0.25);
        assert_eq!(chained.len(), direct.len());
        for (a, b) in chained.iter().zip(&direct) {
            assert!((a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn presets_trade_iterations_against_epsilon() {
        let (l, m, h) = (
            SmoothingParams::light(),
            SmoothingParams::medium(),
            SmoothingParams::heavy(),
        );
        assert!(l.iterations < m.iterations && m.iterations < h.iterations);
        assert!(l.cut_ratio < m.cut_ratio && m.cut_ratio < h.cut_ratio);
        assert!(l.epsilon_factor > m.epsilon_factor && m.epsilon_factor > h.epsilon_factor);
        assert_eq!(SmoothingStrength::default().params(), m);
    }
}
