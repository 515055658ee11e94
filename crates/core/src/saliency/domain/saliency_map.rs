use ndarray::Array2;

use crate::shared::focus_point::FocusPoint;

use super::saliency_estimator::SaliencyError;

/// Per-pixel importance scores in `[0, 255]`, shape `(height, width)`.
///
/// Either the same size as the analysed frame or a scaled-down variant;
/// [`SaliencyMap::peak_in`] maps back to frame coordinates in both cases.
#[derive(Clone, Debug, PartialEq)]
pub struct SaliencyMap {
    scores: Array2<u8>,
}

impl SaliencyMap {
    pub fn new(scores: Array2<u8>) -> Result<Self, SaliencyError> {
        if scores.is_empty() {
            return Err(SaliencyError::EmptyInput);
        }
        Ok(Self { scores })
    }

    /// Min-max normalises raw responses into `[0, 255]`, truncating.
    ///
    /// A flat response becomes an all-zero map, so every cell ties and the
    /// peak is the origin. Non-finite values are degenerate.
    pub fn from_responses(responses: &Array2<f32>) -> Result<Self, SaliencyError> {
        if responses.is_empty() {
            return Err(SaliencyError::EmptyInput);
        }
        if responses.iter().any(|v| !v.is_finite()) {
            return Err(SaliencyError::Degenerate("non-finite response".into()));
        }
        let min = responses.iter().copied().fold(f32::INFINITY, f32::min);
        let max = responses.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;
        if range <= f32::EPSILON {
            return Ok(Self::flat(responses.nrows(), responses.ncols()));
        }
        let scores = responses.mapv(|v| (((v - min) / range) * 255.0) as u8);
        Ok(Self { scores })
    }

    /// All-zero map of the given shape.
    pub fn flat(height: usize, width: usize) -> Self {
        Self {
            scores: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> u32 {
        self.scores.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.scores.nrows() as u32
    }

    pub fn scores(&self) -> &Array2<u8> {
        &self.scores
    }

    /// Cell with the highest score as `(x, y)`; ties go to the first
    /// cell in row-major order.
    pub fn peak(&self) -> (u32, u32) {
        let mut best = (0usize, 0usize);
        let mut best_score = self.scores[[0, 0]];
        for ((row, col), &score) in self.scores.indexed_iter() {
            if score > best_score {
                best_score = score;
                best = (row, col);
            }
        }
        (best.1 as u32, best.0 as u32)
    }

    /// Peak mapped into a `width` × `height` frame by proportional scaling.
    pub fn peak_in(&self, width: u32, height: u32) -> FocusPoint {
        let (px, py) = self.peak();
        FocusPoint::new(
            rescale(px, self.width(), width),
            rescale(py, self.height(), height),
        )
    }
}

fn rescale(value: u32, from: u32, to: u32) -> u32 {
    if from == to {
        return value.min(to.saturating_sub(1));
    }
    let scaled = (value as u64 * to as u64) / from.max(1) as u64;
    scaled.min(to.saturating_sub(1) as u64) as u32
}
