use std::path::Path;

use crate::focus::domain::focus_resolver::{FocusResolution, FocusResolver};
use crate::imaging::domain::image_source::ImageSource;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::rendering::debug_renderer::draw_focus_point;

/// Load → resolve, optionally rendering the point onto the image.
pub struct FocusPointUseCase {
    source: Box<dyn ImageSource>,
    resolver: FocusResolver,
    image_writer: Box<dyn ImageWriter>,
}

impl FocusPointUseCase {
    pub fn new(
        source: Box<dyn ImageSource>,
        resolver: FocusResolver,
        image_writer: Box<dyn ImageWriter>,
    ) -> Self {
        Self {
            source,
            resolver,
            image_writer,
        }
    }

    pub fn execute(&self, location: &str) -> Result<FocusResolution, Box<dyn std::error::Error>> {
        let frame = self.source.load(location)?;
        Ok(self.resolver.resolve_detailed(&frame)?)
    }

    /// Resolves the point and writes the image with a marker drawn on it.
    pub fn execute_to_file(
        &self,
        location: &str,
        output_path: &Path,
    ) -> Result<FocusResolution, Box<dyn std::error::Error>> {
        let frame = self.source.load(location)?;
        let resolution = self.resolver.resolve_detailed(&frame)?;
        let marked = draw_focus_point(&frame, resolution.point)?;
        self.image_writer.write(output_path, &marked)?;
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
    use crate::focus::domain::face_selection::FaceSelection;
    use crate::focus::domain::focus_resolver::FocusTier;
    use crate::imaging::domain::image_source::ImageSourceError;
    use crate::shared::face_box::FaceBox;
    use crate::shared::focus_point::FocusPoint;
    use crate::shared::frame::Frame;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubSource {
        frame: Option<Frame>,
    }

    impl ImageSource for StubSource {
        fn load(&self, _location: &str) -> Result<Frame, ImageSourceError> {
            self.frame.clone().ok_or(ImageSourceError::EmptyImage)
        }
    }

    struct StubDetector {
        faces: Vec<FaceBox>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&self, _frame: &Frame) -> Result<Vec<FaceBox>, DetectionError> {
            Ok(self.faces.clone())
        }
    }

    #[derive(Default)]
    struct StubImageWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    // --- Helpers ---

    fn make_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![128; (w * h * 3) as usize], w, h, 3)
    }

    type Written = Arc<Mutex<Vec<(PathBuf, Frame)>>>;

    fn use_case(frame: Option<Frame>, faces: Vec<FaceBox>) -> (FocusPointUseCase, Written) {
        let writer = StubImageWriter::default();
        let written = writer.written.clone();
        let resolver = FocusResolver::new(
            Box::new(StubDetector { faces }),
            None,
            FaceSelection::default(),
        );
        (
            FocusPointUseCase::new(Box::new(StubSource { frame }), resolver, Box::new(writer)),
            written,
        )
    }

    // --- Tests ---

    #[test]
    fn test_returns_face_center() {
        let (uc, _) = use_case(Some(make_frame(100, 100)), vec![FaceBox::new(10.0, 10.0, 50.0, 50.0, 0.9)]);
        let resolution = uc.execute("img.jpg").unwrap();
        assert_eq!(resolution.point, FocusPoint::new(30, 30));
        assert_eq!(resolution.tier, FocusTier::Face);
    }

    #[test]
    fn test_no_faces_no_saliency_returns_center() {
        let (uc, _) = use_case(Some(make_frame(640, 480)), vec![]);
        assert_eq!(uc.execute("img.jpg").unwrap().point, FocusPoint::new(320, 240));
    }

    #[test]
    fn test_source_error_propagates() {
        let (uc, written) = use_case(None, vec![]);
        let err = uc.execute_to_file("missing.jpg", Path::new("out.jpg")).unwrap_err();
        assert_eq!(err.to_string(), "image has no pixels");
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_execute_to_file_writes_marked_image() {
        let (uc, written) = use_case(Some(make_frame(40, 40)), vec![FaceBox::new(10.0, 10.0, 30.0, 30.0, 0.9)]);
        let resolution = uc.execute_to_file("img.jpg", Path::new("out/focus.jpg")).unwrap();
        assert_eq!(resolution.point, FocusPoint::new(20, 20));

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 1);
        let (path, frame) = &written[0];
        assert_eq!(path, Path::new("out/focus.jpg"));
        assert_eq!(&frame.data()[(20 * 40 + 20) * 3..][..3], &[255, 0, 0]);
    }
}
