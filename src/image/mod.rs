//! Raster buffers used by the pipeline.
//!
//! 8-bit rasters use the `image` crate types directly (`GrayImage`,
//! `RgbImage`, `RgbaImage`). Numeric intermediates (gradients, alpha maps,
//! segmentation masks) live in [`ImageF32`], a compact row-major float buffer.
pub mod f32;
pub mod io;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut};
