use crate::imaging::domain::image_source::{ImageSource, ImageSourceError};
use crate::shared::frame::Frame;

/// Routes `http://` and `https://` locations to one source and everything
/// else (filesystem paths) to another.
pub struct LocationImageSource {
    remote: Box<dyn ImageSource>,
    local: Box<dyn ImageSource>,
}

impl LocationImageSource {
    pub fn new(remote: Box<dyn ImageSource>, local: Box<dyn ImageSource>) -> Self {
        Self { remote, local }
    }
}

pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl ImageSource for LocationImageSource {
    fn load(&self, location: &str) -> Result<Frame, ImageSourceError> {
        if is_remote(location) {
            self.remote.load(location)
        } else {
            self.local.load(location)
        }
    }
}
