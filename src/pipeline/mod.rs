//! Per-image orchestration and batch processing.
//!
//! A run flattens the source onto white, detects landmarks when a feature
//! needs them, builds every enabled layer, stacks the layers and converts the
//! canvas to RGBA. Mesh and pose rasters come from the caller; the outline,
//! construction guides and merged background are generated here.

pub mod collaborators;
pub mod config;

pub use collaborators::{Collaborators, LandmarkDetector, SegmentationModel};
pub use config::{MaskingMode, WireframeConfig};

use crate::compose::{to_rgba, LayerCompositor, LayerStack, MaskingStrategy};
use crate::contours::{process_contours, render_contours, ContourSet, ContourStats};
use crate::diagnostics::{elapsed_ms, TimingBreakdown, WireframeReport};
use crate::edges::detect_edges_with;
use crate::error::{Result, WireframeError};
use crate::guides::{face_polygon, FaceGuides};
use crate::image::io::flatten_onto_white;
use crate::merge::{merge, resize_mask, split_foreground_background};
use crate::types::{FaceLandmarks, Layer, LayerKind};
use image::{DynamicImage, RgbImage, RgbaImage};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::time::Instant;

/// One image plus the externally rendered layers that go with it.
#[derive(Clone, Debug)]
pub struct WireframeInput {
    pub image: DynamicImage,
    pub mesh: Option<RgbImage>,
    pub pose: Option<RgbImage>,
    /// Replacement background for the merge layer.
    pub background: Option<DynamicImage>,
}

impl WireframeInput {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            mesh: None,
            pose: None,
            background: None,
        }
    }

    pub fn with_mesh(mut self, mesh: RgbImage) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_pose(mut self, pose: RgbImage) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn with_background(mut self, background: DynamicImage) -> Self {
        self.background = Some(background);
        self
    }
}

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct WireframeOutput {
    pub canvas: RgbImage,
    pub rgba: RgbaImage,
    pub contours: ContourSet,
    pub stats: ContourStats,
    pub landmarks: Option<FaceLandmarks>,
    pub guides: Option<FaceGuides>,
    pub layers: Vec<LayerKind>,
    pub timing: TimingBreakdown,
}

impl WireframeOutput {
    pub fn report(&self) -> WireframeReport {
        WireframeReport {
            width: self.canvas.width(),
            height: self.canvas.height(),
            face_detected: self.landmarks.is_some(),
            layers: self.layers.clone(),
            stats: self.stats,
            paths: self.contours.to_paths(),
            guides: self.guides.clone(),
            timing: self.timing.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WireframeProcessor {
    config: WireframeConfig,
}

impl WireframeProcessor {
    pub fn new(config: WireframeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WireframeConfig {
        &self.config
    }

    fn detect_landmarks(
        &self,
        rgb: &RgbImage,
        collaborators: &Collaborators<'_>,
    ) -> Result<Option<FaceLandmarks>> {
        if !self.config.needs_landmarks() {
            return Ok(None);
        }
        let detector = collaborators.landmarks.ok_or_else(|| {
            WireframeError::Collaborator("landmark detector required but not provided".into())
        })?;
        match detector.detect(rgb)? {
            Some(lms) if !lms.is_empty() => Ok(Some(lms)),
            _ => Err(WireframeError::NoFaceDetected),
        }
    }

    /// Edges → contours → stroked outline raster.
    pub fn outline(&self, image: &DynamicImage) -> (ContourSet, RgbImage) {
        let edges = detect_edges_with(image, &self.config.edges);
        let contours = process_contours(&edges, &self.config.contours);
        let raster = render_contours(&contours, image.width(), image.height(), &self.config.render);
        (contours, raster)
    }

    fn background_layer(
        &self,
        input: &WireframeInput,
        rgb: &RgbImage,
        collaborators: &Collaborators<'_>,
    ) -> Result<Option<RgbImage>> {
        let Some(background) = &input.background else {
            return Ok(None);
        };
        let foreground = match collaborators.segmentation {
            Some(model) => {
                let mask = resize_mask(&model.predict(rgb)?, rgb.width(), rgb.height());
                let (fg, _) = split_foreground_background(rgb, &mask, &self.config.cutout)?;
                DynamicImage::ImageRgba8(fg)
            }
            None => input.image.clone(),
        };
        let merged = merge(
            &foreground,
            background,
            self.config.merge.foreground_transparency,
            self.config.merge.background_transparency,
        )?;
        Ok(Some(merged))
    }

    fn masking_strategy(&self, landmarks: Option<&FaceLandmarks>, width: u32, height: u32) -> MaskingStrategy {
        match &self.config.masking {
            MaskingMode::FaceMask => match landmarks {
                Some(lms) => {
                    MaskingStrategy::face_mask(face_polygon(lms, width, height, &self.config.guides))
                }
                None => MaskingStrategy::face_mask(Vec::new()),
            },
            MaskingMode::ColorFilter(filter) => MaskingStrategy::ColorFilter(filter.clone()),
            MaskingMode::Passthrough => MaskingStrategy::Passthrough,
            mode => MaskingStrategy::LinesOnly {
                policy: mode.lines_only_policy().unwrap_or_default(),
            },
        }
    }

    /// Produce the layered wireframe for one image.
    pub fn process(
        &self,
        input: &WireframeInput,
        collaborators: &Collaborators<'_>,
    ) -> Result<WireframeOutput> {
        let total_start = Instant::now();
        let (w, h) = (input.image.width(), input.image.height());
        if w == 0 || h == 0 {
            return Err(WireframeError::EmptyImage {
                width: w,
                height: h,
            });
        }
        let mut timing = TimingBreakdown::default();
        let rgb = flatten_onto_white(&input.image);

        let landmarks = timing.time("landmarks", || self.detect_landmarks(&rgb, collaborators))?;

        let mut stack = LayerStack::new();
        if self.config.background_merge {
            if let Some(layer) =
                timing.time("background_merge", || self.background_layer(input, &rgb, collaborators))?
            {
                stack.insert(Layer::new(LayerKind::BackgroundMerge, layer));
            }
        }
        if self.config.mesh {
            if let Some(mesh) = &input.mesh {
                stack.insert(Layer::new(LayerKind::Mesh, mesh.clone()));
            }
        }
        let mut guides = None;
        if self.config.construction_lines {
            if let Some(lms) = &landmarks {
                let g = FaceGuides::from_landmarks(lms, w, h, &self.config.guides);
                let raster = timing.time("construction_lines", || g.render(w, h, &self.config.guides));
                stack.insert(Layer::new(LayerKind::ConstructionLines, raster));
                guides = Some(g);
            }
        }
        if self.config.pose {
            if let Some(pose) = &input.pose {
                stack.insert(Layer::new(LayerKind::Pose, pose.clone()));
            }
        }
        let mut contours = ContourSet::default();
        if self.config.outline {
            let (set, raster) = timing.time("outline", || self.outline(&input.image));
            if set.is_empty() {
                warn!("outline stage produced no contours");
            }
            stack.insert(Layer::new(LayerKind::Outline, raster));
            contours = set;
        }

        let compositor = self
            .config
            .enabled_layers()
            .into_iter()
            .fold(LayerCompositor::new(w, h), LayerCompositor::require);
        let compose_start = Instant::now();
        let canvas = compositor.compose(&stack)?;
        let strategy = self.masking_strategy(landmarks.as_ref(), w, h);
        let rgba = to_rgba(&canvas, &strategy);
        timing.push("compose", elapsed_ms(compose_start));
        timing.total_ms = elapsed_ms(total_start);

        let layers: Vec<LayerKind> = stack.iter().map(|(kind, _)| kind).collect();
        debug!(
            "processed {w}x{h}: layers {:?}, {} contours in {:.2} ms",
            layers,
            contours.len(),
            timing.total_ms
        );
        Ok(WireframeOutput {
            canvas,
            rgba,
            stats: contours.stats(),
            contours,
            landmarks,
            guides,
            layers,
            timing,
        })
    }

    /// Process inputs in parallel; one failure never affects the others.
    pub fn process_batch(
        &self,
        inputs: &[WireframeInput],
        collaborators: &Collaborators<'_>,
    ) -> Vec<Result<WireframeOutput>> {
        let start = Instant::now();
        let results: Vec<Result<WireframeOutput>> = inputs
            .par_iter()
            .map(|input| self.process(input, collaborators))
            .collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            "batch: {}/{} images succeeded in {:.1} ms",
            results.len() - failed,
            results.len(),
            elapsed_ms(start)
        );
        for (idx, err) in results.iter().enumerate().filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e))) {
            warn!("batch item {idx} failed: {err}");
        }
        results
    }
}
