use super::timing::TimingBreakdown;
use crate::contours::{ContourPath, ContourStats};
use crate::guides::FaceGuides;
use crate::types::LayerKind;
use serde::Serialize;

/// JSON-friendly summary of one processed image.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireframeReport {
    pub width: u32,
    pub height: u32,
    pub face_detected: bool,
    /// Layers that ended up on the canvas, bottom first.
    pub layers: Vec<LayerKind>,
    pub stats: ContourStats,
    pub paths: Vec<ContourPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guides: Option<FaceGuides>,
    pub timing: TimingBreakdown,
}
