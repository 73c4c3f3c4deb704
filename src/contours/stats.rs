//! Summary statistics over a contour set, used for reporting and tests.
use super::ContourSet;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourStats {
    pub count: usize,
    pub total_area: f64,
    pub mean_area: f64,
    pub median_area: f64,
    pub mean_perimeter: f64,
    pub largest_area: f64,
}

impl ContourStats {
    pub fn from_set(set: &ContourSet) -> Self {
        if set.is_empty() {
            return Self::default();
        }
        let mut areas: Vec<f64> = set.iter().map(|c| c.area()).collect();
        let count = areas.len();
        let total_area: f64 = areas.iter().sum();
        let perimeter_sum: f64 = set.iter().map(|c| c.perimeter()).sum();
        areas.sort_by(f64::total_cmp);
        let median_area = if count % 2 == 1 {
            areas[count / 2]
        } else {
            0.5 * (areas[count / 2 - 1] + areas[count / 2])
        };
        Self {
            count,
            total_area,
            mean_area: total_area / count as f64,
            median_area,
            mean_perimeter: perimeter_sum / count as f64,
            largest_area: areas[count - 1],
        }
    }
}
