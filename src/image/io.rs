//! I/O helpers for rasters and JSON reports.
//!
//! - `load_image`: read a PNG/JPEG into a `DynamicImage`, alpha preserved.
//! - `flatten_onto_white`: blend an RGBA image over a white background.
//! - `save_gray` / `save_rgb` / `save_rgba`: write PNGs, creating directories.
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::error::Result;
use image::{DynamicImage, GrayImage, Rgb, RgbImage, RgbaImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk keeping its channel layout.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    Ok(image::open(path)?)
}

/// Composite an image with alpha over white; opaque images are converted as-is.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let px = rgba.get_pixel(x, y).0;
        let a = px[3] as f32 / 255.0;
        let blend = |c: u8| (a * c as f32 + (1.0 - a) * 255.0).round() as u8;
        Rgb([blend(px[0]), blend(px[1]), blend(px[2])])
    })
}

pub fn save_gray(image: &GrayImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    image.save(path)?;
    Ok(())
}

pub fn save_rgb(image: &RgbImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    image.save(path)?;
    Ok(())
}

pub fn save_rgba(image: &RgbaImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    image.save(path)?;
    Ok(())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::flatten_onto_white;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let flat = flatten_onto_white(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [10, 20, 30]);
    }
}
