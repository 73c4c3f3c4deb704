use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters used for smoothing.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Simple wrapper around a static filter kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Normalised 5-tap Gaussian with sigma = 1.0.
pub const GAUSSIAN_5TAP_SIGMA1: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.054_488_68, 0.244_201_34, 0.402_619_96, 0.244_201_34, 0.054_488_68]);

/// Apply a separable filter (horizontal then vertical pass) with clamped borders.
pub fn apply(filter: &dyn SeparableFilter, inp: &ImageF32) -> ImageF32 {
    let taps = filter.taps();
    let (w, h) = (inp.w, inp.h);
    if w == 0 || h == 0 || taps.is_empty() {
        return inp.clone();
    }
    let half = (taps.len() / 2) as isize;
    let clamp = |v: isize, n: usize| v.clamp(0, n as isize - 1) as usize;

    let mut tmp = ImageF32::new(w, h);
    for y in 0..h {
        let src = inp.row(y);
        let dst = tmp.row_mut(y);
        for (x, px) in dst.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                acc += t * src[clamp(x as isize + k as isize - half, w)];
            }
            *px = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                acc += t * tmp.get(x, clamp(y as isize + k as isize - half, h));
            }
            out.set(x, y, acc);
        }
    }
    out
}
