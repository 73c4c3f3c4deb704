//! Automatic Canny thresholds derived from the intensity histogram.
//!
//! Two candidate pairs are combined conservatively:
//! - median based: `(1-σ)·m` and `(1+σ)·m`, truncated and clipped to [0,255];
//! - percentile based: `p50·0.5` and `p99·0.7`.
//!
//! The final pair keeps the larger low and the smaller high, swapping them if
//! that leaves `low > high`.
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// 256-bin histogram of an 8-bit image.
#[derive(Clone, Debug)]
pub struct IntensityHistogram {
    bins: [u64; 256],
    total: u64,
}

impl IntensityHistogram {
    pub fn from_gray(gray: &GrayImage) -> Self {
        let mut bins = [0u64; 256];
        for &v in gray.as_raw() {
            bins[v as usize] += 1;
        }
        Self {
            bins,
            total: gray.as_raw().len() as u64,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Value at the k-th position (0-based) of the sorted samples.
    fn nth(&self, k: u64) -> f32 {
        let mut seen = 0u64;
        for (value, &count) in self.bins.iter().enumerate() {
            seen += count;
            if seen > k {
                return value as f32;
            }
        }
        255.0
    }

    /// Percentile `q ∈ [0,100]` with linear interpolation between neighbouring
    /// order statistics. Returns 0 for an empty histogram.
    pub fn percentile(&self, q: f32) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        let pos = (q.clamp(0.0, 100.0) / 100.0) as f64 * (self.total - 1) as f64;
        let lo = pos.floor() as u64;
        let hi = pos.ceil() as u64;
        let frac = (pos - lo as f64) as f32;
        let a = self.nth(lo);
        let b = self.nth(hi);
        a + (b - a) * frac
    }

    pub fn median(&self) -> f32 {
        self.percentile(50.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CannyThresholds {
    pub low: f32,
    pub high: f32,
}

/// Tuning of the automatic threshold estimate.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutoCannyParams {
    /// Relative spread around the median.
    pub sigma: f64,
    pub low_percentile_factor: f32,
    pub high_percentile: f32,
    pub high_percentile_factor: f32,
}

impl Default for AutoCannyParams {
    fn default() -> Self {
        Self {
            sigma: 0.33,
            low_percentile_factor: 0.5,
            high_percentile: 99.0,
            high_percentile_factor: 0.7,
        }
    }
}

pub fn auto_thresholds(gray: &GrayImage, params: &AutoCannyParams) -> CannyThresholds {
    let hist = IntensityHistogram::from_gray(gray);
    let median = hist.median();
    let spread = params.sigma;
    let low_median = ((1.0 - spread) * median as f64).floor().clamp(0.0, 255.0) as f32;
    let high_median = ((1.0 + spread) * median as f64).floor().clamp(0.0, 255.0) as f32;

    let low_pct = median * params.low_percentile_factor;
    let high_pct = hist.percentile(params.high_percentile) * params.high_percentile_factor;

    let mut low = low_median.max(low_pct);
    let mut high = high_median.min(high_pct);
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }
    CannyThresholds { low, high }
}
