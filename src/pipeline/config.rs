//! Feature toggles and stage options of a wireframe run, with named presets.
use crate::compose::ColorFilter;
use crate::contours::{ContourOptions, RenderOptions};
use crate::edges::EdgeOptions;
use crate::guides::GuideOptions;
use crate::merge::{CutoutOptions, MergeOptions};
use crate::types::{BackgroundPolicy, LayerKind};
use serde::Deserialize;

/// Alpha strategy selected by configuration. The face polygon of
/// [`MaskingMode::FaceMask`] is resolved from landmarks at run time.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskingMode {
    /// Pure white becomes transparent.
    #[default]
    LinesOnly,
    /// Channels all `>= 250` become transparent.
    LinesOnlyTolerant,
    FaceMask,
    ColorFilter(ColorFilter),
    Passthrough,
}

impl MaskingMode {
    pub fn lines_only_policy(&self) -> Option<BackgroundPolicy> {
        match self {
            MaskingMode::LinesOnly => Some(BackgroundPolicy::ExactWhite),
            MaskingMode::LinesOnlyTolerant => Some(BackgroundPolicy::near_white()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WireframeConfig {
    pub construction_lines: bool,
    pub mesh: bool,
    pub pose: bool,
    pub outline: bool,
    pub background_merge: bool,
    pub edges: EdgeOptions,
    pub contours: ContourOptions,
    pub render: RenderOptions,
    pub guides: GuideOptions,
    pub merge: MergeOptions,
    pub cutout: CutoutOptions,
    pub masking: MaskingMode,
}

/// Every layer off and lines-only masking; needs no collaborator until a
/// layer is switched on. Use a preset for a ready-made combination.
impl Default for WireframeConfig {
    fn default() -> Self {
        Self {
            construction_lines: false,
            mesh: false,
            pose: false,
            outline: false,
            background_merge: false,
            edges: EdgeOptions::default(),
            contours: ContourOptions::default(),
            render: RenderOptions::default(),
            guides: GuideOptions::default(),
            merge: MergeOptions::default(),
            cutout: CutoutOptions::default(),
            masking: MaskingMode::default(),
        }
    }
}

impl WireframeConfig {
    fn with_features(construction_lines: bool, mesh: bool, outline: bool) -> Self {
        Self {
            construction_lines,
            mesh,
            outline,
            ..Self::default()
        }
    }

    /// Construction lines, mesh and outline.
    pub fn beginner() -> Self {
        Self::with_features(true, true, true)
    }

    /// Construction lines and mesh.
    pub fn intermediate() -> Self {
        Self::with_features(true, true, false)
    }

    /// Construction lines only.
    pub fn advanced() -> Self {
        Self::with_features(true, false, false)
    }

    pub fn outline_only() -> Self {
        Self::with_features(false, false, true)
    }

    pub fn mesh_only() -> Self {
        Self::with_features(false, true, false)
    }

    /// Look up a preset by its snake_case name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "beginner" => Some(Self::beginner()),
            "intermediate" => Some(Self::intermediate()),
            "advanced" => Some(Self::advanced()),
            "outline_only" => Some(Self::outline_only()),
            "mesh_only" => Some(Self::mesh_only()),
            _ => None,
        }
    }

    pub fn is_enabled(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::BackgroundMerge => self.background_merge,
            LayerKind::Mesh => self.mesh,
            LayerKind::ConstructionLines => self.construction_lines,
            LayerKind::Pose => self.pose,
            LayerKind::Outline => self.outline,
        }
    }

    /// Enabled layers, bottom first.
    pub fn enabled_layers(&self) -> Vec<LayerKind> {
        LayerKind::STACK_ORDER
            .into_iter()
            .filter(|&k| self.is_enabled(k))
            .collect()
    }

    /// Whether a run has to detect face landmarks.
    pub fn needs_landmarks(&self) -> bool {
        self.construction_lines || self.mesh || self.masking == MaskingMode::FaceMask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_toggle_expected_layers() {
        assert_eq!(
            WireframeConfig::beginner().enabled_layers(),
            vec![LayerKind::Mesh, LayerKind::ConstructionLines, LayerKind::Outline]
        );
        assert_eq!(
            WireframeConfig::outline_only().enabled_layers(),
            vec![LayerKind::Outline]
        );
        assert!(!WireframeConfig::outline_only().needs_landmarks());
        assert!(WireframeConfig::mesh_only().needs_landmarks());
        assert_eq!(
            WireframeConfig::preset("advanced").map(|c| c.enabled_layers()),
            Some(vec![LayerKind::ConstructionLines])
        );
        assert!(WireframeConfig::preset("expert").is_none());
    }

    #[test]
    fn default_config_runs_without_collaborators() {
        let cfg = WireframeConfig::default();
        assert!(cfg.enabled_layers().is_empty());
        assert!(!cfg.needs_landmarks());
        let partial: WireframeConfig = serde_json::from_str(r#"{ "outline": true }"#).unwrap();
        assert_eq!(partial.enabled_layers(), vec![LayerKind::Outline]);
        assert!(!partial.needs_landmarks());
    }

    #[test]
    fn config_parses_from_json() {
        let cfg: WireframeConfig = serde_json::from_str(
            r#"{
                "construction_lines": false,
                "outline": true,
                "masking": "face_mask",
                "edges": { "method": "structured", "preprocess": "gaussian" },
                "contours": { "strength": "heavy", "filter": null },
                "render": { "line_thickness": 3.0 }
            }"#,
        )
        .unwrap();
        assert!(cfg.outline && !cfg.construction_lines);
        assert_eq!(cfg.masking, MaskingMode::FaceMask);
        assert!(cfg.needs_landmarks());
        assert!(cfg.contours.filter.is_none());
        assert_eq!(cfg.render.line_thickness, 3.0);
    }
}
