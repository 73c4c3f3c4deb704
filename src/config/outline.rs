use crate::pipeline::WireframeConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Config of the `outline_demo` tool.
#[derive(Debug, Deserialize)]
pub struct OutlineToolConfig {
    pub input: PathBuf,
    /// Named preset, used when no `wireframe` section is given.
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub wireframe: Option<WireframeConfig>,
    pub output: OutlineOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutlineOutputConfig {
    pub edges_image: PathBuf,
    pub outline_image: PathBuf,
    pub rgba_image: PathBuf,
    pub report_json: PathBuf,
}

impl OutlineToolConfig {
    /// Explicit `wireframe` section, else the preset, else outline-only.
    pub fn resolve_wireframe(&self) -> Option<WireframeConfig> {
        if let Some(cfg) = &self.wireframe {
            return Some(cfg.clone());
        }
        match &self.preset {
            Some(name) => WireframeConfig::preset(name),
            None => Some(WireframeConfig::outline_only()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_is_resolved_by_name() {
        let cfg: OutlineToolConfig = serde_json::from_str(
            r#"{
                "input": "portrait.png",
                "preset": "beginner",
                "output": {
                    "edges_image": "out/edges.png",
                    "outline_image": "out/outline.png",
                    "rgba_image": "out/wireframe.png",
                    "report_json": "out/report.json"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.resolve_wireframe(), Some(WireframeConfig::beginner()));
    }

    #[test]
    fn partial_wireframe_section_needs_no_landmarks() {
        let cfg: OutlineToolConfig = serde_json::from_str(
            r#"{
                "input": "portrait.png",
                "wireframe": { "outline": true },
                "output": {
                    "edges_image": "out/edges.png",
                    "outline_image": "out/outline.png",
                    "rgba_image": "out/wireframe.png",
                    "report_json": "out/report.json"
                }
            }"#,
        )
        .unwrap();
        let wireframe = cfg.resolve_wireframe().unwrap();
        assert!(wireframe.outline);
        assert!(!wireframe.needs_landmarks());
    }
}
