use std::cmp::Ordering;

/// Axis-aligned face bounding box in frame pixel coordinates.
///
/// Corners satisfy `x1 <= x2` and `y1 <= y2`. Produced fresh by a
/// detector for each request and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
}

impl FaceBox {
    /// Builds a box from two corners, normalising their order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
            confidence,
        }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Clamps both corners onto a `width` × `height` frame. Box edges are
    /// continuous coordinates, so the far edge may equal the frame size.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let max_x = width as f64;
        let max_y = height as f64;
        Self {
            x1: self.x1.clamp(0.0, max_x),
            y1: self.y1.clamp(0.0, max_y),
            x2: self.x2.clamp(0.0, max_x),
            y2: self.y2.clamp(0.0, max_y),
            confidence: self.confidence,
        }
    }

    pub fn iou(&self, other: &FaceBox) -> f64 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// Integer corners `[x1, y1, x2, y2]`, truncated toward zero.
    pub fn to_pixel_corners(&self) -> [i32; 4] {
        [
            self.x1 as i32,
            self.y1 as i32,
            self.x2 as i32,
            self.y2 as i32,
        ]
    }

    /// Total order for "largest first": area descending, then corners
    /// ascending so equal-area boxes sort the same regardless of input order.
    pub fn cmp_largest_first(a: &FaceBox, b: &FaceBox) -> Ordering {
        b.area()
            .total_cmp(&a.area())
            .then_with(|| a.y1.total_cmp(&b.y1))
            .then_with(|| a.x1.total_cmp(&b.x1))
            .then_with(|| a.y2.total_cmp(&b.y2))
            .then_with(|| a.x2.total_cmp(&b.x2))
    }
}
