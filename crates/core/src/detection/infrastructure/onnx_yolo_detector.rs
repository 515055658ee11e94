//! YOLO face detector using ONNX Runtime via `ort`.
//!
//! Handles letterbox preprocessing, inference, and NMS post-processing.
//! Boxes are mapped back to frame coordinates and clamped to the frame.
use std::path::Path;
use std::sync::Mutex;

use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

use super::execution_provider::preferred_execution_providers;

/// Fallback YOLO model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for face detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Values per detection row before any keypoints: cx, cy, w, h, conf.
const BOX_VALUES: usize = 5;

/// YOLO face detector backed by an ONNX Runtime session.
///
/// Inference needs exclusive access to the session, so it sits behind a
/// mutex: one detector can serve concurrent callers, one frame at a time.
pub struct OnnxYoloDetector {
    session: Mutex<ort::session::Session>,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Load a YOLO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (expecting NCHW).
    /// Falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    // [N, C, H, W]; square input, so H is enough
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::info!(
            "Loaded face model {} (input {input_size}x{input_size}, confidence {confidence})",
            model_path.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            confidence,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceBox>, DetectionError> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        if frame.is_empty() || !frame.is_well_formed() {
            return Err("frame has no usable pixels".into());
        }

        let (input_tensor, transform) = letterbox(frame, self.input_size);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let rows = decode_rows(data, &shape)?;
        let mut candidates: Vec<FaceBox> = rows
            .into_iter()
            .filter(|row| row[4] as f64 >= self.confidence)
            .map(|row| transform.to_frame_box(&row))
            .collect();

        let kept = nms(&mut candidates, NMS_IOU_THRESH);
        log::debug!("YOLO kept {} of {} candidate faces", kept.len(), candidates.len());

        Ok(kept
            .into_iter()
            .map(|b| b.clamped(frame.width(), frame.height()))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Scale and padding applied by [`letterbox`], needed to undo it.
#[derive(Clone, Copy, Debug)]
struct LetterboxTransform {
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

impl LetterboxTransform {
    /// Maps a `[cx, cy, w, h, conf, ..]` row from model space to frame space.
    fn to_frame_box(&self, row: &[f32]) -> FaceBox {
        let (cx, cy, w, h) = (row[0] as f64, row[1] as f64, row[2] as f64, row[3] as f64);
        let px = self.pad_x as f64;
        let py = self.pad_y as f64;
        FaceBox::new(
            ((cx - w / 2.0) - px) / self.scale,
            ((cy - h / 2.0) - py) / self.scale,
            ((cx + w / 2.0) - px) / self.scale,
            ((cy + h / 2.0) - py) / self.scale,
            row[4] as f64,
        )
    }
}

/// Letterbox-resize a frame to `target_size` × `target_size`.
///
/// Returns the NCHW float32 tensor and the transform back to frame space.
fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, LetterboxTransform) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    // Padding is 114/255 gray, YOLO convention
    let gray = 114.0f32 / 255.0;
    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, target_size as usize, target_size as usize), gray);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        LetterboxTransform {
            scale,
            pad_x,
            pad_y,
        },
    )
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

/// Splits raw YOLO output into per-detection rows.
///
/// Output is `[1, features, detections]` (transposed, the usual export) or
/// `[1, detections, features]`; the smaller axis is taken as features.
fn decode_rows(data: &[f32], shape: &[usize]) -> Result<Vec<Vec<f32>>, DetectionError> {
    if shape.len() != 3 {
        return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
    }
    let transposed = shape[1] < shape[2];
    let (num_dets, num_feats) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if num_feats < BOX_VALUES {
        return Err(format!("YOLO output has {num_feats} features, need at least {BOX_VALUES}").into());
    }
    if data.len() < num_dets * num_feats {
        return Err("YOLO output shorter than its shape".into());
    }

    Ok((0..num_dets)
        .map(|i| {
            if transposed {
                (0..num_feats).map(|f| data[f * num_dets + i]).collect()
            } else {
                data[i * num_feats..(i + 1) * num_feats].to_vec()
            }
        })
        .collect())
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
fn nms(dets: &mut [FaceBox], iou_thresh: f64) -> Vec<FaceBox> {
    dets.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep = Vec::new();
    let mut suppressed = vec![false; dets.len()];

    for i in 0..dets.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(dets[i]);
        for j in (i + 1)..dets.len() {
            if !suppressed[j] && dets[i].iou(&dets[j]) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn face(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> FaceBox {
        FaceBox::new(x1, y1, x2, y2, confidence)
    }

    #[test]
    fn test_letterbox_preserves_aspect_ratio() {
        // 200x100 → 640: scale 3.2, new 640x320, pad_y 160
        let frame = Frame::new(vec![128u8; 200 * 100 * 3], 200, 100, 3);
        let (tensor, lb) = letterbox(&frame, 640);

        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        assert_relative_eq!(lb.scale, 3.2, epsilon = 0.01);
        assert_eq!(lb.pad_x, 0);
        assert_eq!(lb.pad_y, 160);
    }

    #[test]
    fn test_letterbox_values_normalized() {
        let frame = Frame::new(vec![255u8; 100 * 50 * 3], 100, 50, 3);
        let (tensor, lb) = letterbox(&frame, 640);

        let y = lb.pad_y as usize + 1;
        let x = lb.pad_x as usize + 1;
        assert_relative_eq!(tensor[[0, 0, y, x]], 1.0, epsilon = 0.01);
        assert_relative_eq!(tensor[[0, 0, 0, 0]], 114.0 / 255.0, epsilon = 0.01);
    }

    #[test]
    fn test_to_frame_box_undoes_letterbox() {
        // 200x100 frame: scale 3.2, pad_y 160
        let frame = Frame::new(vec![0u8; 200 * 100 * 3], 200, 100, 3);
        let (_, lb) = letterbox(&frame, 640);
        // model-space box centered at (320, 320) of size 64x64
        let b = lb.to_frame_box(&[320.0, 320.0, 64.0, 64.0, 0.8]);
        assert_relative_eq!(b.x1, 90.0, epsilon = 1e-6);
        assert_relative_eq!(b.x2, 110.0, epsilon = 1e-6);
        assert_relative_eq!(b.y1, 40.0, epsilon = 1e-6);
        assert_relative_eq!(b.y2, 60.0, epsilon = 1e-6);
        assert_relative_eq!(b.confidence, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_decode_rows_transposed_layout() {
        // 6 detections x 5 features, stored feature-major: value = f * 10 + i
        let data: Vec<f32> = (0..5)
            .flat_map(|f| (0..6).map(move |i| (f * 10 + i) as f32))
            .collect();
        let rows = decode_rows(&data, &[1, 5, 6]).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[2], vec![2.0, 12.0, 22.0, 32.0, 42.0]);
    }

    #[test]
    fn test_decode_rows_rejects_too_few_features() {
        // [1, 3, 6] reads as 3 features per detection
        let data: Vec<f32> = (0..18).map(|v| v as f32).collect();
        assert!(decode_rows(&data, &[1, 3, 6]).is_err());
    }

    #[test]
    fn test_decode_rows_detection_major() {
        let data: Vec<f32> = (0..30).map(|v| v as f32).collect();
        let rows = decode_rows(&data, &[1, 6, 5]).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[1], vec![5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_decode_rows_rejects_bad_shape() {
        assert!(decode_rows(&[0.0; 4], &[4]).is_err());
    }

    #[test]
    fn test_nms_suppresses_overlapping() {
        let mut dets = vec![
            face(0.0, 0.0, 100.0, 100.0, 0.9),
            face(5.0, 5.0, 105.0, 105.0, 0.8),
        ];
        let kept = nms(&mut dets, 0.3);
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn test_nms_keeps_non_overlapping() {
        let mut dets = vec![
            face(0.0, 0.0, 50.0, 50.0, 0.9),
            face(200.0, 200.0, 250.0, 250.0, 0.8),
        ];
        assert_eq!(nms(&mut dets, 0.3).len(), 2);
    }

    #[test]
    fn test_nms_confidence_ordering() {
        let mut dets = vec![
            face(0.0, 0.0, 100.0, 100.0, 0.5),
            face(2.0, 2.0, 102.0, 102.0, 0.9),
        ];
        let kept = nms(&mut dets, 0.3);
        assert_eq!(kept.len(), 1);
        assert_relative_eq!(kept[0].confidence, 0.9);
    }

    #[test]
    fn test_nms_empty_input() {
        assert!(nms(&mut [], 0.3).is_empty());
    }
}
