use image::{GrayImage, RgbImage};
use ndarray::{Array2, ArrayView3};

/// A decoded image: contiguous bytes in row-major order, interleaved channels.
///
/// Three channels (RGB) for source images, one channel for greyscale
/// intermediates such as rendered saliency maps. Immutable once decoded;
/// detectors and estimators only ever borrow it.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 3)
    }

    pub fn from_gray_image(img: GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 1)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// True when the frame has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// True when the buffer length agrees with the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.channels > 0 && self.data.len() == self.expected_len()
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Luminance plane as `f32` in `[0, 255]`, shape `(height, width)`.
    ///
    /// RGB frames use BT.601 weights; single-channel frames are copied as-is.
    pub fn luma(&self) -> Array2<f32> {
        let h = self.height as usize;
        let w = self.width as usize;
        let c = self.channels as usize;
        Array2::from_shape_fn((h, w), |(y, x)| {
            let i = (y * w + x) * c;
            if c >= 3 {
                0.299 * self.data[i] as f32
                    + 0.587 * self.data[i + 1] as f32
                    + 0.114 * self.data[i + 2] as f32
            } else {
                self.data[i] as f32
            }
        })
    }

    /// Converts to an `image` buffer, expanding greyscale to RGB.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        match self.channels {
            3 => RgbImage::from_raw(self.width, self.height, self.data.clone()),
            1 => {
                let rgb = self.data.iter().flat_map(|&v| [v, v, v]).collect();
                RgbImage::from_raw(self.width, self.height, rgb)
            }
            _ => None,
        }
    }

    /// Buffer length implied by the declared dimensions.
    pub fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * (self.channels as usize)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.data(), &data[..]);
        assert!(frame.is_well_formed());
        assert!(!frame.is_empty());
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3);
    }

    #[test]
    fn test_zero_sized_frame_is_empty() {
        let frame = Frame::new(Vec::new(), 0, 10, 3);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGB: pixel (row=1, col=0) is red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let frame = Frame::new(data, 2, 2, 3);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_luma_weights_rgb() {
        let frame = Frame::new(vec![255, 0, 0, 0, 255, 0, 0, 0, 255], 3, 1, 3);
        let luma = frame.luma();
        assert_eq!(luma.shape(), &[1, 3]);
        assert_relative_eq!(luma[[0, 0]], 0.299 * 255.0, epsilon = 1e-3);
        assert_relative_eq!(luma[[0, 1]], 0.587 * 255.0, epsilon = 1e-3);
        assert_relative_eq!(luma[[0, 2]], 0.114 * 255.0, epsilon = 1e-3);
    }

    #[test]
    fn test_luma_passes_through_greyscale() {
        let frame = Frame::new(vec![7, 9], 2, 1, 1);
        let luma = frame.luma();
        assert_relative_eq!(luma[[0, 0]], 7.0);
        assert_relative_eq!(luma[[0, 1]], 9.0);
    }

    #[test]
    fn test_rgb_image_conversion_keeps_pixels() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgb([1, 2, 3]));
        let frame = Frame::from_rgb_image(img);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        let back = frame.to_rgb_image().unwrap();
        assert_eq!(back.get_pixel(2, 1).0, [1, 2, 3]);
    }

    #[test]
    fn test_greyscale_expands_to_rgb() {
        let frame = Frame::from_gray_image(GrayImage::from_raw(1, 1, vec![42]).unwrap());
        let rgb = frame.to_rgb_image().unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [42, 42, 42]);
    }
}
