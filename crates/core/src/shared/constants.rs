pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Faces averaged by the face tier unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 3;

pub const FETCH_TIMEOUT_SECS: u64 = 10;
pub const FETCH_USER_AGENT: &str = "Mozilla/5.0";
/// Largest image body accepted from a remote source.
pub const MAX_IMAGE_BYTES: u64 = 50 * 1024 * 1024;

/// Debug overlay styling.
pub const BOX_STROKE_WIDTH: u32 = 3;
pub const FOCUS_MARKER_RADIUS: i32 = 5;
pub const JPEG_QUALITY: u8 = 90;
