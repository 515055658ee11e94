//! Fine-grained static saliency.
//!
//! Multi-scale center-surround contrast on the luminance plane: at every
//! pixel and scale, the mean of a small center window is compared with the
//! mean of a larger surround window. Positive differences (bright on dark)
//! and negative ones (dark on bright) are accumulated separately and summed,
//! giving a full-resolution map with sharp responses at small structures.

use ndarray::Array2;

use crate::saliency::domain::saliency_estimator::{SaliencyError, SaliencyEstimator};
use crate::saliency::domain::saliency_map::SaliencyMap;
use crate::shared::frame::Frame;

/// Surround window radii in pixels, one per scale.
const SURROUND_RADII: [usize; 5] = [2, 4, 8, 16, 32];

/// Center window radius as a fraction (divisor) of the surround radius.
const CENTER_DIVISOR: usize = 4;

pub struct FineGrainedSaliency;

impl FineGrainedSaliency {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FineGrainedSaliency {
    fn default() -> Self {
        Self::new()
    }
}

impl SaliencyEstimator for FineGrainedSaliency {
    fn compute(&self, frame: &Frame) -> Result<SaliencyMap, SaliencyError> {
        if frame.is_empty() {
            return Err(SaliencyError::EmptyInput);
        }
        if !frame.is_well_formed() {
            return Err(SaliencyError::Unsupported(
                "pixel buffer does not match dimensions".into(),
            ));
        }

        let luma = frame.luma();
        let integral = IntegralImage::new(&luma);
        let (h, w) = luma.dim();

        let mut on = Array2::<f32>::zeros((h, w));
        let mut off = Array2::<f32>::zeros((h, w));
        for &radius in &SURROUND_RADII {
            let center_radius = radius / CENTER_DIVISOR;
            for y in 0..h {
                for x in 0..w {
                    let center = integral.mean(y, x, center_radius);
                    let surround = integral.mean(y, x, radius);
                    let diff = (center - surround) as f32;
                    if diff > 0.0 {
                        on[[y, x]] += diff;
                    } else {
                        off[[y, x]] -= diff;
                    }
                }
            }
        }

        SaliencyMap::from_responses(&(on + off))
    }
}

/// Summed-area table with one row and column of zero padding.
struct IntegralImage {
    sums: Array2<f64>,
    height: usize,
    width: usize,
}

impl IntegralImage {
    fn new(plane: &Array2<f32>) -> Self {
        let (height, width) = plane.dim();
        let mut sums = Array2::<f64>::zeros((height + 1, width + 1));
        for y in 0..height {
            let mut row_sum = 0.0f64;
            for x in 0..width {
                row_sum += plane[[y, x]] as f64;
                sums[[y + 1, x + 1]] = sums[[y, x + 1]] + row_sum;
            }
        }
        Self {
            sums,
            height,
            width,
        }
    }

    /// Mean over the square window of `radius` around `(y, x)`, clipped to
    /// the plane.
    fn mean(&self, y: usize, x: usize, radius: usize) -> f64 {
        let y0 = y.saturating_sub(radius);
        let x0 = x.saturating_sub(radius);
        let y1 = (y + radius).min(self.height - 1) + 1;
        let x1 = (x + radius).min(self.width - 1) + 1;
        let total = self.sums[[y1, x1]] - self.sums[[y0, x1]] - self.sums[[y1, x0]]
            + self.sums[[y0, x0]];
        total / ((y1 - y0) * (x1 - x0)) as f64
    }
}
