use std::path::Path;

use crate::focus::domain::focus_resolver::FocusResolver;
use crate::imaging::domain::image_source::ImageSource;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::rendering::debug_renderer::saliency_to_frame;
use crate::shared::frame::Frame;

pub const SALIENCY_UNAVAILABLE: &str = "Could not compute saliency map.";

/// Load → compute the saliency map → write it as a greyscale image.
pub struct SaliencyMapUseCase {
    source: Box<dyn ImageSource>,
    resolver: FocusResolver,
    image_writer: Box<dyn ImageWriter>,
}

impl SaliencyMapUseCase {
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

    /// The rendered map. Unlike focus resolution, a failed or disabled
    /// estimator is an error here since there is nothing to fall back to.
    pub fn execute(&self, location: &str) -> Result<Frame, Box<dyn std::error::Error>> {
        let frame = self.source.load(location)?;
        match self.resolver.saliency_map(&frame) {
            Ok(map) => Ok(saliency_to_frame(&map)),
            Err(e) => {
                log::warn!("Saliency map unavailable for {location}: {e}");
                Err(SALIENCY_UNAVAILABLE.into())
            }
        }
    }

    pub fn execute_to_file(
        &self,
        location: &str,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let rendered = self.execute(location)?;
        self.image_writer.write(output_path, &rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
    use crate::focus::domain::face_selection::FaceSelection;
    use crate::imaging::domain::image_source::ImageSourceError;
    use crate::saliency::domain::saliency_estimator::{SaliencyError, SaliencyEstimator};
    use crate::saliency::domain::saliency_map::SaliencyMap;
    use crate::shared::face_box::FaceBox;
    use ndarray::Array2;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubSource;

    impl ImageSource for StubSource {
        fn load(&self, _location: &str) -> Result<Frame, ImageSourceError> {
            Ok(Frame::new(vec![0; 8 * 6 * 3], 8, 6, 3))
        }
    }

    struct NoFaces;

    impl FaceDetector for NoFaces {
        fn detect(&self, _frame: &Frame) -> Result<Vec<FaceBox>, DetectionError> {
            Ok(Vec::new())
        }
    }

    struct StubEstimator {
        map: Result<SaliencyMap, SaliencyError>,
    }

    impl SaliencyEstimator for StubEstimator {
        fn compute(&self, _frame: &Frame) -> Result<SaliencyMap, SaliencyError> {
            self.map.clone()
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

    fn use_case(
        map: Option<Result<SaliencyMap, SaliencyError>>,
    ) -> (SaliencyMapUseCase, Arc<Mutex<Vec<(PathBuf, Frame)>>>) {
        let writer = StubImageWriter::default();
        let written = writer.written.clone();
        let estimator = map.map(|map| Box::new(StubEstimator { map }) as Box<dyn SaliencyEstimator>);
        let resolver = FocusResolver::new(Box::new(NoFaces), estimator, FaceSelection::default());
        (
            SaliencyMapUseCase::new(Box::new(StubSource), resolver, Box::new(writer)),
            written,
        )
    }

    // --- Tests ---

    #[test]
    fn test_renders_map_as_greyscale() {
        let mut scores = Array2::<u8>::zeros((6, 8));
        scores[[2, 5]] = 255;
        let (uc, _) = use_case(Some(Ok(SaliencyMap::new(scores).unwrap())));
        let frame = uc.execute("x").unwrap();
        assert_eq!((frame.width(), frame.height(), frame.channels()), (8, 6, 1));
        assert_eq!(frame.data()[2 * 8 + 5], 255);
    }

    #[test]
    fn test_estimator_failure_is_reported() {
        let (uc, _) = use_case(Some(Err(SaliencyError::Degenerate("non-finite response".into()))));
        assert_eq!(uc.execute("x").unwrap_err().to_string(), SALIENCY_UNAVAILABLE);
    }

    #[test]
    fn test_disabled_saliency_is_reported() {
        let (uc, written) = use_case(None);
        let err = uc.execute_to_file("x", Path::new("map.jpg")).unwrap_err();
        assert_eq!(err.to_string(), SALIENCY_UNAVAILABLE);
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_execute_to_file_writes_map() {
        let (uc, written) = use_case(Some(Ok(SaliencyMap::new(Array2::from_elem((6, 8), 7)).unwrap())));
        uc.execute_to_file("x", Path::new("map.jpg")).unwrap();
        let written = written.lock().unwrap();
        assert_eq!(written[0].0, Path::new("map.jpg"));
        assert_eq!(written[0].1.channels(), 1);
    }
}
