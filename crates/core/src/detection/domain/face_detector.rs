use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

pub type DetectionError = Box<dyn std::error::Error + Send + Sync>;

/// Domain interface for face detection.
///
/// Detection takes `&self`: backends holding mutable inference state must
/// synchronise internally so one instance can serve concurrent requests.
/// Output order is unspecified; boxes lie inside the frame.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceBox>, DetectionError>;
}
