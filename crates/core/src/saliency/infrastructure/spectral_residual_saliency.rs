//! Spectral-residual static saliency (Hou & Zhang).
//!
//! The log-amplitude spectrum of natural images is locally smooth; whatever
//! deviates from its local average (the "spectral residual") corresponds to
//! the unexpected, salient parts of the scene. The map is computed on a
//! small fixed-size thumbnail and is therefore a scaled variant of the frame.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use ndarray::{Array2, Axis};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::saliency::domain::saliency_estimator::{SaliencyError, SaliencyEstimator};
use crate::saliency::domain::saliency_map::SaliencyMap;
use crate::shared::frame::Frame;

/// Side length of the square analysis thumbnail.
pub const ANALYSIS_SIZE: u32 = 64;

/// Gaussian sigma applied to the reconstructed map.
const SMOOTHING_SIGMA: f32 = 2.5;

/// Luminance spread below which the frame is treated as featureless.
const MIN_LUMA_RANGE: f32 = 1.0;

pub struct SpectralResidualSaliency {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl SpectralResidualSaliency {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        Self {
            forward: planner.plan_fft_forward(ANALYSIS_SIZE as usize),
            inverse: planner.plan_fft_inverse(ANALYSIS_SIZE as usize),
        }
    }
}

impl Default for SpectralResidualSaliency {
    fn default() -> Self {
        Self::new()
    }
}

impl SaliencyEstimator for SpectralResidualSaliency {
    fn compute(&self, frame: &Frame) -> Result<SaliencyMap, SaliencyError> {
        if frame.is_empty() {
            return Err(SaliencyError::EmptyInput);
        }
        if !frame.is_well_formed() {
            return Err(SaliencyError::Unsupported(
                "pixel buffer does not match dimensions".into(),
            ));
        }

        let thumb = thumbnail(&frame.luma());
        let min = thumb.iter().copied().fold(f32::INFINITY, f32::min);
        let max = thumb.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if max - min < MIN_LUMA_RANGE {
            let side = ANALYSIS_SIZE as usize;
            return Ok(SaliencyMap::flat(side, side));
        }

        let mut spectrum = thumb.mapv(|v| Complex::new(v, 0.0));
        fft2(&mut spectrum, &self.forward);

        // ln(1 + |F|) keeps exactly-zero bins from dominating the residual
        let log_amplitude = spectrum.mapv(|c| c.norm().ln_1p());
        let residual = &log_amplitude - &box_mean_3x3(&log_amplitude);

        let mut reconstructed = Array2::from_shape_fn(spectrum.dim(), |idx| {
            let phase = spectrum[idx].arg();
            Complex::from_polar(residual[idx].exp(), phase)
        });
        fft2(&mut reconstructed, &self.inverse);

        let energy = reconstructed.mapv(|c| c.norm_sqr());
        let raw = SaliencyMap::from_responses(&energy)?;
        smooth(&raw)
    }
}

/// Downscales a luminance plane to the square analysis size.
fn thumbnail(luma: &Array2<f32>) -> Array2<f32> {
    let (h, w) = luma.dim();
    let gray = GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([luma[[y as usize, x as usize]].round().clamp(0.0, 255.0) as u8])
    });
    let small = imageops::resize(&gray, ANALYSIS_SIZE, ANALYSIS_SIZE, FilterType::Triangle);
    Array2::from_shape_fn(
        (ANALYSIS_SIZE as usize, ANALYSIS_SIZE as usize),
        |(y, x)| small.get_pixel(x as u32, y as u32)[0] as f32,
    )
}

/// In-place separable 2-D transform: every row, then every column.
fn fft2(data: &mut Array2<Complex<f32>>, fft: &Arc<dyn Fft<f32>>) {
    for axis in [Axis(1), Axis(0)] {
        for mut lane in data.lanes_mut(axis) {
            let mut buf = lane.to_vec();
            fft.process(&mut buf);
            for (dst, src) in lane.iter_mut().zip(buf) {
                *dst = src;
            }
        }
    }
}

/// 3×3 mean filter. The spectrum is periodic, so the window wraps around
/// the edges.
fn box_mean_3x3(plane: &Array2<f32>) -> Array2<f32> {
    let (h, w) = plane.dim();
    Array2::from_shape_fn((h, w), |(y, x)| {
        let mut sum = 0.0;
        for dy in [-1i64, 0, 1] {
            for dx in [-1i64, 0, 1] {
                let yy = (y as i64 + dy).rem_euclid(h as i64) as usize;
                let xx = (x as i64 + dx).rem_euclid(w as i64) as usize;
                sum += plane[[yy, xx]];
            }
        }
        sum / 9.0
    })
}

fn smooth(map: &SaliencyMap) -> Result<SaliencyMap, SaliencyError> {
    let scores = map.scores();
    let gray = GrayImage::from_fn(map.width(), map.height(), |x, y| {
        Luma([scores[[y as usize, x as usize]]])
    });
    let blurred = imageproc::filter::gaussian_blur_f32(&gray, SMOOTHING_SIGMA);
    let responses = Array2::from_shape_fn(scores.dim(), |(y, x)| {
        blurred.get_pixel(x as u32, y as u32)[0] as f32
    });
    SaliencyMap::from_responses(&responses)
}
