//! Ordered layer stacking onto a white canvas.
//!
//! Layers are applied bottom to top in [`LayerKind::STACK_ORDER`]. A layer
//! pixel replaces the canvas pixel only when the layer's
//! [`BackgroundPolicy`](crate::types::BackgroundPolicy) says it is not
//! background; construction and pose pixels are darkened on the way.
//! The stacked canvas is turned into RGBA by one [`MaskingStrategy`].

pub mod mask;

pub use mask::{to_rgba, ColorFilter, MaskingStrategy};

use crate::error::{Result, WireframeError};
use crate::types::{Layer, LayerKind, WHITE};
use image::{Rgb, RgbImage};
use log::debug;

/// Multiplicative darkening applied to emphasis layers.
pub const EMPHASIS_FACTOR: f32 = 0.8;
/// Upper bound on any emphasis channel after darkening.
pub const EMPHASIS_MAX: f32 = 180.0;

/// At most one raster per [`LayerKind`].
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    slots: [Option<RgbImage>; 5],
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `layer`, returning the raster it replaced.
    pub fn insert(&mut self, layer: Layer) -> Option<RgbImage> {
        self.slots[layer.kind.slot()].replace(layer.image)
    }

    pub fn with(mut self, layer: Layer) -> Self {
        self.insert(layer);
        self
    }

    pub fn get(&self, kind: LayerKind) -> Option<&RgbImage> {
        self.slots[kind.slot()].as_ref()
    }

    pub fn contains(&self, kind: LayerKind) -> bool {
        self.get(kind).is_some()
    }

    /// Present layers, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, &RgbImage)> + '_ {
        LayerKind::STACK_ORDER
            .iter()
            .filter_map(move |&kind| self.get(kind).map(|img| (kind, img)))
    }
}

#[inline]
pub fn emphasize(px: Rgb<u8>) -> Rgb<u8> {
    Rgb(px.0.map(|c| (c as f32 * EMPHASIS_FACTOR).min(EMPHASIS_MAX) as u8))
}

/// Overwrite `canvas` with every non-background pixel of `layer`.
pub fn apply_layer(canvas: &mut RgbImage, layer: &RgbImage, kind: LayerKind) -> Result<()> {
    WireframeError::check_dimensions(canvas.dimensions(), layer.dimensions())?;
    let policy = kind.background_policy();
    let emphasis = kind.is_emphasis();
    for (dst, src) in canvas.pixels_mut().zip(layer.pixels()) {
        if policy.is_background(src) {
            continue;
        }
        *dst = if emphasis { emphasize(*src) } else { *src };
    }
    Ok(())
}

/// Canvas size plus the layers a run cannot do without.
#[derive(Clone, Debug)]
pub struct LayerCompositor {
    width: u32,
    height: u32,
    required: Vec<LayerKind>,
}

impl LayerCompositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            required: Vec::new(),
        }
    }

    pub fn require(mut self, kind: LayerKind) -> Self {
        if !self.required.contains(&kind) {
            self.required.push(kind);
        }
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Stack all present layers onto a fresh white canvas.
    pub fn compose(&self, stack: &LayerStack) -> Result<RgbImage> {
        if self.width == 0 || self.height == 0 {
            return Err(WireframeError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if let Some(&missing) = self.required.iter().find(|&&k| !stack.contains(k)) {
            return Err(WireframeError::MissingLayer(missing));
        }
        let mut canvas = RgbImage::from_pixel(self.width, self.height, WHITE);
        for (kind, image) in stack.iter() {
            apply_layer(&mut canvas, image, kind)?;
            debug!("composited {kind:?} layer");
        }
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BLACK;

    fn layer_with(kind: LayerKind, px: Rgb<u8>, at: (u32, u32)) -> Layer {
        let mut img = RgbImage::from_pixel(4, 4, WHITE);
        img.put_pixel(at.0, at.1, px);
        Layer::new(kind, img)
    }

    #[test]
    fn upper_layers_win() {
        let stack = LayerStack::new()
            .with(layer_with(LayerKind::Mesh, Rgb([10, 10, 10]), (1, 1)))
            .with(layer_with(LayerKind::Outline, BLACK, (1, 1)));
        let canvas = LayerCompositor::new(4, 4).compose(&stack).unwrap();
        assert_eq!(*canvas.get_pixel(1, 1), BLACK);
        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn near_white_is_background_only_for_tolerant_layers() {
        let faint = Rgb([252, 252, 252]);
        let stack = LayerStack::new()
            .with(layer_with(LayerKind::Outline, faint, (0, 0)))
            .with(layer_with(LayerKind::BackgroundMerge, faint, (2, 2)));
        let canvas = LayerCompositor::new(4, 4).compose(&stack).unwrap();
        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
        assert_eq!(*canvas.get_pixel(2, 2), faint);
    }

    #[test]
    fn guide_layers_are_darkened() {
        let stack = LayerStack::new()
            .with(layer_with(LayerKind::ConstructionLines, Rgb([250, 100, 0]), (3, 3)));
        let canvas = LayerCompositor::new(4, 4).compose(&stack).unwrap();
        assert_eq!(*canvas.get_pixel(3, 3), Rgb([180, 80, 0]));
    }

    #[test]
    fn missing_required_layer_aborts() {
        let compositor = LayerCompositor::new(4, 4).require(LayerKind::ConstructionLines);
        let err = compositor.compose(&LayerStack::new()).unwrap_err();
        assert!(matches!(err, WireframeError::MissingLayer(LayerKind::ConstructionLines)));
    }

    #[test]
    fn mismatched_layer_is_rejected() {
        let stack = LayerStack::new().with(Layer::new(LayerKind::Mesh, RgbImage::new(3, 4)));
        let err = LayerCompositor::new(4, 4).compose(&stack).unwrap_err();
        assert!(matches!(err, WireframeError::DimensionMismatch { actual_width: 3, .. }));
    }
}
