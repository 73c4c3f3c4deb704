//! Portrait-to-wireframe line art.
//!
//! The crate turns a raster portrait into layered line art: adaptive edge
//! detection ([`edges`]), contour refinement ([`contours`]), ordered layer
//! compositing ([`compose`]) and background blending ([`merge`]). The
//! [`pipeline`] module wires these together with injected landmark and
//! segmentation models.

// Core stages
pub mod compose;
pub mod contours;
pub mod edges;
pub mod merge;

// Orchestration and supporting surface
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod guides;
pub mod image;
pub mod pipeline;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::compose::{to_rgba, LayerCompositor, LayerStack, MaskingStrategy};
pub use crate::contours::{process_contours, render_contours, ContourSet, ContourStats};
pub use crate::edges::{detect_edges, EdgeMethod, PreprocessMethod};
pub use crate::error::{Result, WireframeError};
pub use crate::merge::merge;
pub use crate::pipeline::{WireframeConfig, WireframeOutput, WireframeProcessor};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use wireframe_portrait::prelude::*;
///
/// # fn main() -> wireframe_portrait::Result<()> {
/// let image = load_image(std::path::Path::new("portrait.png"))?;
/// let processor = WireframeProcessor::new(WireframeConfig::outline_only());
/// let out = processor.process(&WireframeInput::new(image), &Collaborators::new())?;
/// println!("{} contours", out.contours.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::io::load_image;
    pub use crate::pipeline::{
        Collaborators, LandmarkDetector, SegmentationModel, WireframeConfig, WireframeInput,
        WireframeProcessor,
    };
    pub use crate::types::{FaceLandmarks, Landmark, Layer, LayerKind, Point};
}
