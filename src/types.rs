//! Shared value types flowing between the pipeline stages.
use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// Binary edge raster: every pixel is either 0 or 255.
pub type EdgeMap = GrayImage;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<imageproc::point::Point<i32>> for Point {
    fn from(p: imageproc::point::Point<i32>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point> for imageproc::point::Point<i32> {
    fn from(p: Point) -> Self {
        imageproc::point::Point::new(p.x, p.y)
    }
}

/// Role of a raster layer inside the compositor stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    BackgroundMerge,
    Mesh,
    ConstructionLines,
    Pose,
    Outline,
}

/// How a layer decides which of its pixels are untouched canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackgroundPolicy {
    /// Only `(255, 255, 255)` counts as background.
    ExactWhite,
    /// A pixel whose channels are all `>= min_channel` counts as background.
    NearWhite { min_channel: u8 },
}

/// Channel threshold used by the tolerant near-white test.
pub const NEAR_WHITE_MIN_CHANNEL: u8 = 250;

impl BackgroundPolicy {
    pub const fn near_white() -> Self {
        Self::NearWhite {
            min_channel: NEAR_WHITE_MIN_CHANNEL,
        }
    }

    #[inline]
    pub fn is_background(&self, px: &Rgb<u8>) -> bool {
        match *self {
            Self::ExactWhite => px.0 == [255, 255, 255],
            Self::NearWhite { min_channel } => px.0.iter().all(|&c| c >= min_channel),
        }
    }
}

impl Default for BackgroundPolicy {
    fn default() -> Self {
        Self::ExactWhite
    }
}

impl LayerKind {
    /// Bottom-to-top stacking order.
    pub const STACK_ORDER: [LayerKind; 5] = [
        LayerKind::BackgroundMerge,
        LayerKind::Mesh,
        LayerKind::ConstructionLines,
        LayerKind::Pose,
        LayerKind::Outline,
    ];

    pub const fn background_policy(self) -> BackgroundPolicy {
        match self {
            LayerKind::Mesh | LayerKind::Outline => BackgroundPolicy::near_white(),
            LayerKind::ConstructionLines | LayerKind::Pose | LayerKind::BackgroundMerge => {
                BackgroundPolicy::ExactWhite
            }
        }
    }

    /// Guide layers are darkened so they stay subordinate to edges and mesh.
    pub const fn is_emphasis(self) -> bool {
        matches!(self, LayerKind::ConstructionLines | LayerKind::Pose)
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            LayerKind::BackgroundMerge => 0,
            LayerKind::Mesh => 1,
            LayerKind::ConstructionLines => 2,
            LayerKind::Pose => 3,
            LayerKind::Outline => 4,
        }
    }
}

/// A rendered raster together with its role.
#[derive(Clone, Debug)]
pub struct Layer {
    pub kind: LayerKind,
    pub image: RgbImage,
}

impl Layer {
    pub fn new(kind: LayerKind, image: RgbImage) -> Self {
        Self { kind, image }
    }
}

/// One normalised landmark; `x`/`y` are relative to the image size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Ordered landmark list of the primary face.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Project landmark `idx` into pixel space, truncating like the drawing code.
    pub fn pixel(&self, idx: usize, width: u32, height: u32) -> Option<Point> {
        self.points.get(idx).map(|lm| {
            Point::new(
                (lm.x * width as f32) as i32,
                (lm.y * height as f32) as i32,
            )
        })
    }

    pub fn pixels(&self, width: u32, height: u32) -> Vec<Point> {
        (0..self.points.len())
            .filter_map(|i| self.pixel(i, width, height))
            .collect()
    }
}
