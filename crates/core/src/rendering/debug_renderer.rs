//! Debug overlays for inspecting detection and saliency output.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use thiserror::Error;

use crate::saliency::domain::saliency_map::SaliencyMap;
use crate::shared::constants::{BOX_STROKE_WIDTH, FOCUS_MARKER_RADIUS};
use crate::shared::face_box::FaceBox;
use crate::shared::focus_point::FocusPoint;
use crate::shared::frame::Frame;

const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("cannot draw on a {0}-channel frame")]
    UnsupportedChannels(u8),
}

/// Copy of `frame` with every box outlined in red.
///
/// The stroke grows inward from the box edge, so the outline never covers
/// pixels outside the box.
pub fn draw_face_boxes(frame: &Frame, boxes: &[FaceBox]) -> Result<Frame, RenderError> {
    let mut canvas = canvas(frame)?;
    for face in boxes {
        let [x1, y1, x2, y2] = face.to_pixel_corners();
        for inset in 0..BOX_STROKE_WIDTH as i32 {
            let w = x2 - x1 + 1 - 2 * inset;
            let h = y2 - y1 + 1 - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(x1 + inset, y1 + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut canvas, rect, MARKER_COLOR);
        }
    }
    Ok(Frame::from_rgb_image(canvas))
}

/// Copy of `frame` with a filled red dot at `point`.
pub fn draw_focus_point(frame: &Frame, point: FocusPoint) -> Result<Frame, RenderError> {
    let mut canvas = canvas(frame)?;
    draw_filled_circle_mut(
        &mut canvas,
        (point.x as i32, point.y as i32),
        FOCUS_MARKER_RADIUS,
        MARKER_COLOR,
    );
    Ok(Frame::from_rgb_image(canvas))
}

/// Greyscale frame of the saliency scores, one pixel per map cell.
pub fn saliency_to_frame(map: &SaliencyMap) -> Frame {
    let (w, h) = (map.width(), map.height());
    let img = GrayImage::from_fn(w, h, |x, y| {
        image::Luma([map.scores()[[y as usize, x as usize]]])
    });
    Frame::from_gray_image(img)
}

fn canvas(frame: &Frame) -> Result<RgbImage, RenderError> {
    frame
        .to_rgb_image()
        .ok_or(RenderError::UnsupportedChannels(frame.channels()))
}
