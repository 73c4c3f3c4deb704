//! Externally owned models the pipeline calls into.
//!
//! Implementations are passed in by reference and never created or cached
//! by the pipeline. They must be `Sync` because a batch shares them across
//! rayon workers; backends that cannot run concurrently should serialise
//! internally.
use crate::error::Result;
use crate::image::ImageF32;
use crate::types::FaceLandmarks;
use image::RgbImage;

/// Face landmark model returning the primary face, if any.
pub trait LandmarkDetector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> Result<Option<FaceLandmarks>>;
}

/// Foreground segmentation model.
pub trait SegmentationModel: Send + Sync {
    /// Foreground probability in [0,1] at any resolution.
    fn predict(&self, image: &RgbImage) -> Result<ImageF32>;
}

/// Borrowed collaborator handles for one run.
#[derive(Clone, Copy, Default)]
pub struct Collaborators<'a> {
    pub landmarks: Option<&'a dyn LandmarkDetector>,
    pub segmentation: Option<&'a dyn SegmentationModel>,
}

impl<'a> Collaborators<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_landmarks(mut self, detector: &'a dyn LandmarkDetector) -> Self {
        self.landmarks = Some(detector);
        self
    }

    pub fn with_segmentation(mut self, model: &'a dyn SegmentationModel) -> Self {
        self.segmentation = Some(model);
        self
    }
}

impl std::fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("landmarks", &self.landmarks.is_some())
            .field("segmentation", &self.segmentation.is_some())
            .finish()
    }
}
