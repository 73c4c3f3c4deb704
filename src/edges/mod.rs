//! Edge detection for portrait line art.
//!
//! The detector turns a color (optionally alpha) image into a binary
//! [`EdgeMap`](crate::types::EdgeMap):
//!
//! - Preprocessing: transparent pixels painted white, BT.601 grayscale,
//!   edge-preserving smoothing ([`preprocess`]).
//! - Auto-Canny with thresholds estimated from the histogram
//!   ([`threshold`], [`canny`]).
//! - Multi-scale Canny, OR-combined at source resolution.
//! - A structured response (Sobel + Scharr + Laplacian blend, Otsu cut).
//! - Optional morphological refinement ([`refine`]).
//!
//! Borders are handled by clamping indices everywhere. Detection never
//! fails: an empty input yields an empty map.

pub mod canny;
pub mod filters;
pub mod grad;
pub mod nms;
pub mod preprocess;
pub mod refine;
pub mod structured;
pub mod threshold;

pub use canny::{auto_canny, canny, hysteresis, multiscale_canny, EDGE_ON};
pub use grad::{scharr_gradients, sobel_gradients, Grad};
pub use preprocess::{preprocess, to_grayscale, BilateralParams, PreprocessMethod};
pub use refine::{refine_edges, remove_small_components, RefineOptions};
pub use structured::structured_edges;
pub use threshold::{auto_thresholds, AutoCannyParams, CannyThresholds};

use crate::types::EdgeMap;
use image::DynamicImage;
use log::debug;
use serde::Deserialize;
use std::time::Instant;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMethod {
    #[default]
    AutoCanny,
    Multiscale,
    Structured,
}

/// Tuning shared by the edge methods.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    pub auto_canny: AutoCannyParams,
    /// Scales visited by [`EdgeMethod::Multiscale`].
    pub scales: Vec<f32>,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            auto_canny: AutoCannyParams::default(),
            scales: vec![1.0, 0.8, 1.2],
        }
    }
}

/// Everything needed to go from an image to a refined edge map.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeOptions {
    pub method: EdgeMethod,
    pub preprocess: PreprocessMethod,
    pub params: EdgeParams,
    /// Morphological clean-up; `None` skips refinement entirely.
    pub refine: Option<RefineOptions>,
}

/// Binary edge map of `image`. Empty input yields an empty map.
pub fn detect_edges(
    image: &DynamicImage,
    method: EdgeMethod,
    preprocess_method: PreprocessMethod,
    params: &EdgeParams,
) -> EdgeMap {
    let start = Instant::now();
    let gray = preprocess(image, preprocess_method);
    if gray.width() == 0 || gray.height() == 0 {
        debug!("detect_edges: empty input");
        return gray;
    }
    let edges = match method {
        EdgeMethod::AutoCanny => auto_canny(&gray, &params.auto_canny),
        EdgeMethod::Multiscale => multiscale_canny(&gray, &params.scales, &params.auto_canny),
        EdgeMethod::Structured => structured_edges(&gray),
    };
    debug!(
        "detect_edges {:?}/{:?} {}x{} -> {} edge px in {:.2} ms",
        method,
        preprocess_method,
        gray.width(),
        gray.height(),
        edges.pixels().filter(|p| p.0[0] > 0).count(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    edges
}

/// [`detect_edges`] followed by the configured refinement.
pub fn detect_edges_with(image: &DynamicImage, options: &EdgeOptions) -> EdgeMap {
    let edges = detect_edges(image, options.method, options.preprocess, &options.params);
    match &options.refine {
        Some(refine) => refine_edges(&edges, refine),
        None => edges,
    }
}
