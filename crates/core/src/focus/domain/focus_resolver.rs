use std::fmt;

use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::saliency::domain::saliency_estimator::{SaliencyError, SaliencyEstimator};
use crate::saliency::domain::saliency_map::SaliencyMap;
use crate::shared::face_box::FaceBox;
use crate::shared::focus_point::FocusPoint;
use crate::shared::frame::Frame;

use super::face_selection::FaceSelection;

/// Precondition violations. A structurally valid frame never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FocusError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    MalformedFrame { expected: usize, actual: usize },
}

/// Which fallback level produced a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusTier {
    Face,
    Saliency,
    Center,
}

impl fmt::Display for FocusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Face => "face",
            Self::Saliency => "saliency",
            Self::Center => "center",
        };
        f.write_str(name)
    }
}

/// A resolved point together with how it was obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusResolution {
    pub point: FocusPoint,
    pub tier: FocusTier,
    /// Every face the detector reported, clamped to the frame.
    pub faces: Vec<FaceBox>,
}

/// Composes face detection and saliency into a single focus point.
///
/// Policy, in priority order:
/// 1. faces found: mean of the selected face centers, truncated;
/// 2. no faces: the saliency map's peak;
/// 3. saliency failed or disabled: the frame center.
///
/// Capability failures are logged and demoted to the next tier, never
/// retried. The resolver holds no mutable state, so a single instance can
/// be shared between threads when its capabilities allow it.
pub struct FocusResolver {
    detector: Box<dyn FaceDetector>,
    estimator: Option<Box<dyn SaliencyEstimator>>,
    selection: FaceSelection,
}

impl FocusResolver {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        estimator: Option<Box<dyn SaliencyEstimator>>,
        selection: FaceSelection,
    ) -> Self {
        Self {
            detector,
            estimator,
            selection,
        }
    }

    pub fn selection(&self) -> FaceSelection {
        self.selection
    }

    pub fn resolve(&self, frame: &Frame) -> Result<FocusPoint, FocusError> {
        self.resolve_detailed(frame).map(|r| r.point)
    }

    pub fn resolve_detailed(&self, frame: &Frame) -> Result<FocusResolution, FocusError> {
        validate(frame)?;
        let (w, h) = (frame.width(), frame.height());

        let faces = self.detect_faces(frame);
        if !faces.is_empty() {
            let selected = self.selection.select(&faces);
            let (cx, cy) = mean_center(&selected);
            let point = FocusPoint::from_truncated(cx, cy, w, h);
            log::info!(
                "Using face center of {}/{} faces: ({}, {})",
                selected.len(),
                faces.len(),
                point.x,
                point.y
            );
            return Ok(FocusResolution {
                point,
                tier: FocusTier::Face,
                faces,
            });
        }

        log::info!("No face found, trying saliency");
        if let Some(point) = self.saliency_peak(frame) {
            log::info!("Using saliency peak: ({}, {})", point.x, point.y);
            return Ok(FocusResolution {
                point,
                tier: FocusTier::Saliency,
                faces,
            });
        }

        let point = FocusPoint::center_of(w, h);
        log::info!("Falling back to center: ({}, {})", point.x, point.y);
        Ok(FocusResolution {
            point,
            tier: FocusTier::Center,
            faces,
        })
    }

    /// Detected faces, clamped to the frame. Detector errors and boxes with
    /// non-finite coordinates are dropped.
    pub fn detect_faces(&self, frame: &Frame) -> Vec<FaceBox> {
        match self.detector.detect(frame) {
            Ok(faces) => faces
                .into_iter()
                .filter(FaceBox::is_finite)
                .map(|f| f.clamped(frame.width(), frame.height()))
                .collect(),
            Err(e) => {
                log::warn!("Face detection failed, treating as no faces: {e}");
                Vec::new()
            }
        }
    }

    /// Raw saliency map for `frame`, for callers that want the map itself.
    pub fn saliency_map(&self, frame: &Frame) -> Result<SaliencyMap, SaliencyError> {
        match &self.estimator {
            Some(estimator) => estimator.compute(frame),
            None => Err(SaliencyError::Unsupported("saliency is disabled".into())),
        }
    }

    fn saliency_peak(&self, frame: &Frame) -> Option<FocusPoint> {
        self.estimator.as_ref()?;
        match self.saliency_map(frame) {
            Ok(map) => Some(map.peak_in(frame.width(), frame.height())),
            Err(e) => {
                log::warn!("Saliency error: {e}");
                None
            }
        }
    }
}

fn validate(frame: &Frame) -> Result<(), FocusError> {
    if frame.is_empty() {
        return Err(FocusError::EmptyFrame {
            width: frame.width(),
            height: frame.height(),
        });
    }
    if !frame.is_well_formed() {
        return Err(FocusError::MalformedFrame {
            expected: frame.expected_len(),
            actual: frame.data().len(),
        });
    }
    Ok(())
}

/// Unweighted mean of box centers, each axis averaged independently.
fn mean_center(faces: &[FaceBox]) -> (f64, f64) {
    let n = faces.len() as f64;
    let (sx, sy) = faces.iter().fold((0.0, 0.0), |(sx, sy), f| {
        let (cx, cy) = f.center();
        (sx + cx, sy + cy)
    });
    (sx / n, sy / n)
}
