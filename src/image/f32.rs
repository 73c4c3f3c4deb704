//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Used for gradient responses, alpha maps and segmentation masks. Values are
//! not normalised by the type itself: gradient buffers hold raw kernel
//! responses on the 0..255 intensity scale, alpha maps hold `[0, 1]`.
use image::{GrayImage, Luma};

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing row-major buffer; `None` when the length does not match.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Option<Self> {
        (data.len() == w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Intensities of an 8-bit grayscale raster, kept on the 0..255 scale.
    pub fn from_gray(gray: &GrayImage) -> Self {
        let (w, h) = (gray.width() as usize, gray.height() as usize);
        let data = gray.as_raw().iter().map(|&v| v as f32).collect();
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Minimum and maximum sample, `None` for an empty buffer.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Clamp every sample into `[lo, hi]`.
    pub fn clamp_in_place(&mut self, lo: f32, hi: f32) {
        for v in &mut self.data {
            *v = v.clamp(lo, hi);
        }
    }

    /// Round and saturate to an 8-bit raster.
    pub fn to_gray_u8(&self) -> GrayImage {
        GrayImage::from_fn(self.w as u32, self.h as u32, |x, y| {
            Luma([self.get(x as usize, y as usize).round().clamp(0.0, 255.0) as u8])
        })
    }

    /// Bilinear sample at pixel-centre coordinates with border clamping.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let max_x = (self.w - 1) as f32;
        let max_y = (self.h - 1) as f32;
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);
        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.w - 1);
        let y1 = (y0 + 1).min(self.h - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;
        let top = self.get(x0, y0) * (1.0 - fx) + self.get(x1, y0) * fx;
        let bottom = self.get(x0, y1) * (1.0 - fx) + self.get(x1, y1) * fx;
        top * (1.0 - fy) + bottom * fy
    }

    /// Resize with bilinear interpolation using half-pixel centre alignment.
    pub fn resize_bilinear(&self, new_w: usize, new_h: usize) -> ImageF32 {
        let mut out = ImageF32::new(new_w, new_h);
        if self.is_empty() || new_w == 0 || new_h == 0 {
            return out;
        }
        let sx = self.w as f32 / new_w as f32;
        let sy = self.h as f32 / new_h as f32;
        for y in 0..new_h {
            let src_y = (y as f32 + 0.5) * sy - 0.5;
            for x in 0..new_w {
                let src_x = (x as f32 + 0.5) * sx - 0.5;
                out.set(x, y, self.sample_bilinear(src_x, src_y));
            }
        }
        out
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl crate::image::traits::ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::ImageF32;
    use image::{GrayImage, Luma};

    #[test]
    fn gray_round_trip_keeps_intensity_scale() {
        let gray = GrayImage::from_fn(3, 2, |x, y| Luma([(x * 40 + y * 100) as u8]));
        let f = ImageF32::from_gray(&gray);
        assert_eq!(f.get(2, 1), 180.0);
        assert_eq!(f.to_gray_u8(), gray);
    }

    #[test]
    fn min_max_of_empty_is_none() {
        assert!(ImageF32::new(0, 4).min_max().is_none());
        let img = ImageF32::from_vec(2, 1, vec![-1.0, 3.0]).expect("valid buffer");
        assert_eq!(img.min_max(), Some((-1.0, 3.0)));
    }

    #[test]
    fn bilinear_resize_of_constant_is_constant() {
        let img = ImageF32::filled(4, 4, 0.75);
        let up = img.resize_bilinear(9, 7);
        assert_eq!((up.w, up.h), (9, 7));
        assert!(up.data.iter().all(|&v| (v - 0.75).abs() < 1e-6));
    }

    #[test]
    fn bilinear_sample_interpolates_between_columns() {
        let img = ImageF32::from_vec(2, 1, vec![0.0, 1.0]).expect("valid buffer");
        assert!((img.sample_bilinear(0.5, 0.0) - 0.5).abs() < 1e-6);
        assert_eq!(img.sample_bilinear(-3.0, 0.0), 0.0);
    }
}
