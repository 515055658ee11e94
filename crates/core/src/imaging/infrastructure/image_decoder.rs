use crate::imaging::domain::image_source::ImageSourceError;
use crate::shared::frame::Frame;

/// Decodes any format the `image` crate recognises into an RGB frame.
/// Alpha is dropped and greyscale is expanded.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, ImageSourceError> {
    let img = image::load_from_memory(bytes)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(ImageSourceError::EmptyImage);
    }
    Ok(Frame::from_rgb_image(img.to_rgb8()))
}
