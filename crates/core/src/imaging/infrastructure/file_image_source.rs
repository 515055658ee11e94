use std::path::Path;

use crate::imaging::domain::image_source::{ImageSource, ImageSourceError};
use crate::shared::frame::Frame;

use super::image_decoder::decode_frame;

/// Loads images from the local filesystem.
pub struct FileImageSource;

impl FileImageSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource for FileImageSource {
    fn load(&self, location: &str) -> Result<Frame, ImageSourceError> {
        let path = Path::new(location);
        let bytes = std::fs::read(path).map_err(|source| ImageSourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        decode_frame(&bytes)
    }
}
