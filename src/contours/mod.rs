//! Contour extraction and refinement.
//!
//! Outer borders are traced from a binary edge map, filtered by geometry,
//! simplified with Douglas–Peucker and smoothed with Chaikin subdivision.
//! A [`ContourSet`] is always ordered by non-increasing area; ties keep the
//! extraction order.

pub mod geometry;
pub mod render;
pub mod simplify;
pub mod smooth;
pub mod stats;

pub use geometry::{closed_perimeter, min_area_rect, polygon_area, RotatedRect};
pub use render::{render_contours, RenderOptions};
pub use simplify::douglas_peucker_closed;
pub use smooth::{chaikin_smooth, SmoothingParams, SmoothingStrength};
pub use stats::ContourStats;

use crate::types::{EdgeMap, Point};
use imageproc::contours::{find_contours, BorderType};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Closed polygon with at least three vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// `None` when fewer than three points are given.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        (points.len() >= 3).then_some(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    pub fn perimeter(&self) -> f64 {
        closed_perimeter(&self.points)
    }

    pub fn min_area_rect(&self) -> RotatedRect {
        min_area_rect(&self.points)
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Vector projection of one contour.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourPath {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Contours sorted by non-increasing area.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContourSet {
    contours: Vec<Contour>,
}

impl ContourSet {
    /// Sorts by descending area; the sort is stable.
    pub fn new(contours: Vec<Contour>) -> Self {
        let mut keyed: Vec<(f64, Contour)> = contours.into_iter().map(|c| (c.area(), c)).collect();
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self {
            contours: keyed.into_iter().map(|(_, c)| c).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contour> {
        self.contours.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Contour> {
        self.contours.get(idx)
    }

    pub fn to_paths(&self) -> Vec<ContourPath> {
        self.contours
            .iter()
            .map(|c| ContourPath {
                points: c.points.clone(),
                closed: true,
            })
            .collect()
    }

    pub fn stats(&self) -> ContourStats {
        ContourStats::from_set(self)
    }

    pub fn into_vec(self) -> Vec<Contour> {
        self.contours
    }
}

impl<'a> IntoIterator for &'a ContourSet {
    type Item = &'a Contour;
    type IntoIter = std::slice::Iter<'a, Contour>;

    fn into_iter(self) -> Self::IntoIter {
        self.contours.iter()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainApprox {
    /// Every traced border pixel.
    None,
    /// Interior points of straight runs removed.
    #[default]
    Simple,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub min_contour_area: f64,
    pub chain: ChainApprox,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_contour_area: 100.0,
            chain: ChainApprox::Simple,
        }
    }
}

/// Geometric acceptance window.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContourFilter {
    pub min_area: f64,
    pub max_area: Option<f64>,
    pub min_perimeter: f64,
    pub aspect_ratio_range: (f64, f64),
}

impl Default for ContourFilter {
    fn default() -> Self {
        Self {
            min_area: 500.0,
            max_area: None,
            min_perimeter: 100.0,
            aspect_ratio_range: (0.1, 10.0),
        }
    }
}

impl ContourFilter {
    pub fn accepts(&self, contour: &Contour) -> bool {
        let area = contour.area();
        if area < self.min_area || self.max_area.is_some_and(|max| area > max) {
            return false;
        }
        if contour.perimeter() < self.min_perimeter {
            return false;
        }
        match contour.min_area_rect().aspect_ratio() {
            Some(ratio) => (self.aspect_ratio_range.0..=self.aspect_ratio_range.1).contains(&ratio),
            None => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContourOptions {
    pub extract: ExtractOptions,
    /// `None` disables the geometric filter.
    pub filter: Option<ContourFilter>,
    pub simplify: bool,
    pub smooth: bool,
    pub strength: SmoothingStrength,
}

impl Default for ContourOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            filter: Some(ContourFilter::default()),
            simplify: true,
            smooth: true,
            strength: SmoothingStrength::Medium,
        }
    }
}

/// Drop the interior points of straight runs along a traced border.
fn compress_chain(points: Vec<Point>) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
        })
        .map(|i| points[i])
        .collect();
    if kept.len() < 3 {
        return points;
    }
    kept
}

/// Outer borders of the foreground in `edges`, sorted by area.
pub fn extract_contours(edges: &EdgeMap, options: &ExtractOptions) -> ContourSet {
    let traced = find_contours::<i32>(edges);
    let total = traced.len();
    let contours: Vec<Contour> = traced
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| {
            let points: Vec<Point> = c.points.into_iter().map(Point::from).collect();
            let points = match options.chain {
                ChainApprox::Simple => compress_chain(points),
                ChainApprox::None => points,
            };
            Contour::new(points)
        })
        .filter(|c| c.area() >= options.min_contour_area)
        .collect();
    debug!(
        "extracted {} of {} traced borders (min area {})",
        contours.len(),
        total,
        options.min_contour_area
    );
    ContourSet::new(contours)
}

pub fn filter_contours(set: ContourSet, filter: &ContourFilter) -> ContourSet {
    let before = set.len();
    let kept: Vec<Contour> = set.into_vec().into_iter().filter(|c| filter.accepts(c)).collect();
    debug!("geometric filter: {} -> {}", before, kept.len());
    ContourSet::new(kept)
}

/// Douglas–Peucker with `epsilon = epsilon_factor · perimeter`.
pub fn simplify_contour(contour: &Contour, epsilon_factor: f64) -> Contour {
    let epsilon = epsilon_factor * contour.perimeter();
    Contour {
        points: douglas_peucker_closed(&contour.points, epsilon),
    }
}

pub fn smooth_contour(contour: &Contour, iterations: u32, cut_ratio: f64) -> Contour {
    Contour {
        points: chaikin_smooth(&contour.points, iterations, cut_ratio),
    }
}

/// Simplify then smooth with the preset's parameters.
pub fn adaptive_smooth(contour: &Contour, params: &SmoothingParams) -> Contour {
    let simplified = simplify_contour(contour, params.epsilon_factor);
    smooth_contour(&simplified, params.iterations, params.cut_ratio)
}

/// Full extraction, filtering, simplification and smoothing.
pub fn process_contours(edges: &EdgeMap, options: &ContourOptions) -> ContourSet {
    let mut set = extract_contours(edges, &options.extract);
    if set.is_empty() {
        warn!("no contours found in edge map");
        return set;
    }
    if let Some(filter) = &options.filter {
        set = filter_contours(set, filter);
    }

    let defaults = SmoothingParams::medium();
    let params = options.strength.params();
    let processed: Vec<Contour> = set
        .iter()
        .map(|c| match (options.simplify, options.smooth) {
            (true, true) => adaptive_smooth(c, &params),
            (true, false) => simplify_contour(c, defaults.epsilon_factor),
            (false, true) => smooth_contour(c, defaults.iterations, defaults.cut_ratio),
            (false, false) => c.clone(),
        })
        .collect();
    ContourSet::new(processed)
}
