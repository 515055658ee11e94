use std::path::Path;

use serde::Serialize;

use crate::focus::domain::focus_resolver::FocusResolver;
use crate::imaging::domain::image_source::ImageSource;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::rendering::debug_renderer::draw_face_boxes;
use crate::shared::face_box::FaceBox;

/// A detected face as reported to callers: integer `[x1, y1, x2, y2]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectedFace {
    pub bbox: [i32; 4],
}

impl From<&FaceBox> for DetectedFace {
    fn from(face: &FaceBox) -> Self {
        Self {
            bbox: face.to_pixel_corners(),
        }
    }
}

/// Load → detect, reporting every face or drawing them onto the image.
pub struct DetectFacesUseCase {
    source: Box<dyn ImageSource>,
    resolver: FocusResolver,
    image_writer: Box<dyn ImageWriter>,
}

impl DetectFacesUseCase {
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

    pub fn execute(&self, location: &str) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
        let frame = self.source.load(location)?;
        let faces = self.resolver.detect_faces(&frame);
        log::info!("Detected {} faces in {location}", faces.len());
        Ok(faces.iter().map(DetectedFace::from).collect())
    }

    /// Writes the image with every detected face outlined.
    pub fn execute_to_file(
        &self,
        location: &str,
        output_path: &Path,
    ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
        let frame = self.source.load(location)?;
        let faces = self.resolver.detect_faces(&frame);
        let outlined = draw_face_boxes(&frame, &faces)?;
        self.image_writer.write(output_path, &outlined)?;
        Ok(faces.iter().map(DetectedFace::from).collect())
    }
}
