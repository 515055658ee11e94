use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::constants::JPEG_QUALITY;
use crate::shared::frame::Frame;

/// Encodes RGB or greyscale frames as JPEG files.
pub struct JpegFileWriter {
    quality: u8,
}

impl JpegFileWriter {
    pub fn new() -> Self {
        Self::with_quality(JPEG_QUALITY)
    }

    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for JpegFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let color = match frame.channels() {
            1 => ExtendedColorType::L8,
            3 => ExtendedColorType::Rgb8,
            n => return Err(format!("cannot encode {n}-channel frame as JPEG").into()),
        };

        let out = BufWriter::new(File::create(path)?);
        let mut encoder = JpegEncoder::new_with_quality(out, self.quality);
        encoder.encode(frame.data(), frame.width(), frame.height(), color)?;
        log::debug!("Wrote {}x{} JPEG to {}", frame.width(), frame.height(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, channels: u8, value: u8) -> Frame {
        let len = (width * height) as usize * channels as usize;
        Frame::new(vec![value; len], width, height, channels)
    }

    #[test]
    fn test_writes_rgb_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        JpegFileWriter::new().write(&path, &solid(40, 30, 3, 200)).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
        let px = img.to_rgb8().get_pixel(20, 15).0;
        // lossy, but a flat colour survives nearly intact
        assert!(px.iter().all(|&c| c.abs_diff(200) <= 3), "{px:?}");
    }

    #[test]
    fn test_writes_greyscale_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.jpg");
        JpegFileWriter::new().write(&path, &solid(16, 16, 1, 90)).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.color(), image::ColorType::L8);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.jpg");
        JpegFileWriter::new().write(&path, &solid(8, 8, 3, 0)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rejects_unsupported_channel_count() {
        let dir = tempfile::tempdir().unwrap();
        let result = JpegFileWriter::new().write(&dir.path().join("x.jpg"), &solid(2, 2, 4, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(JpegFileWriter::with_quality(0).quality, 1);
        assert_eq!(JpegFileWriter::with_quality(255).quality, 100);
    }
}
