//! Logo correlation between a page crop and candidate template images.

use image::DynamicImage;
use ndarray::{s, Array2, ArrayView2};
use tracing::trace;

/// Similarity between two images.
pub trait ImageMatcher: Send + Sync {
    /// Best correlation of `template` placed anywhere inside `image`,
    /// in `[-1.0, 1.0]`. Unusable inputs score `0.0`.
    fn correlate(&self, image: &DynamicImage, template: &DynamicImage) -> f32;

    /// Best score over several candidates.
    fn best_of(&self, image: &DynamicImage, candidates: &[DynamicImage]) -> f32 {
        candidates
            .iter()
            .map(|candidate| self.correlate(image, candidate))
            .fold(0.0, f32::max)
    }
}

/// Zero-mean normalized cross-correlation over grayscale pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NccMatcher;

impl NccMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl ImageMatcher for NccMatcher {
    fn correlate(&self, image: &DynamicImage, template: &DynamicImage) -> f32 {
        let haystack = to_array(image);
        let needle = to_array(template);
        let (ih, iw) = haystack.dim();
        let (th, tw) = needle.dim();

        if th == 0 || tw == 0 || ih < th || iw < tw {
            trace!("Template {}x{} does not fit image {}x{}", tw, th, iw, ih);
            return 0.0;
        }

        let needle_mean = needle.mean().unwrap_or(0.0);
        let needle = needle.mapv(|v| v - needle_mean);
        let needle_norm = needle.mapv(|v| v * v).sum().sqrt();
        if needle_norm == 0.0 {
            return 0.0;
        }

        let mut best = f32::MIN;
        for y in 0..=(ih - th) {
            for x in 0..=(iw - tw) {
                let window = haystack.slice(s![y..y + th, x..x + tw]);
                let score = window_score(window, needle.view(), needle_norm);
                if score > best {
                    best = score;
                }
            }
        }
        best.clamp(-1.0, 1.0)
    }
}

fn window_score(window: ArrayView2<f32>, needle: ArrayView2<f32>, needle_norm: f32) -> f32 {
    let mean = window.mean().unwrap_or(0.0);
    let mut dot = 0.0f32;
    let mut norm = 0.0f32;
    for (w, n) in window.iter().zip(needle.iter()) {
        let centered = w - mean;
        dot += centered * n;
        norm += centered * centered;
    }
    if norm == 0.0 {
        return 0.0;
    }
    dot / (norm.sqrt() * needle_norm)
}

fn to_array(image: &DynamicImage) -> Array2<f32> {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        gray.get_pixel(x as u32, y as u32)[0] as f32
    })
}
