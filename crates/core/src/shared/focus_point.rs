use serde::Serialize;

/// The resolved point of interest, serialised as `{"x": .., "y": ..}`.
///
/// Always lies inside the frame it was resolved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FocusPoint {
    pub x: u32,
    pub y: u32,
}

impl FocusPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Geometric center with integer division: `(W / 2, H / 2)`.
    pub fn center_of(width: u32, height: u32) -> Self {
        Self::new(width / 2, height / 2)
    }

    /// Truncates fractional coordinates toward zero and clamps into the frame.
    pub fn from_truncated(x: f64, y: f64, width: u32, height: u32) -> Self {
        Self::new(truncate_into(x, width), truncate_into(y, height))
    }
}

fn truncate_into(value: f64, extent: u32) -> u32 {
    let max = extent.saturating_sub(1);
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    (value.trunc() as u64).min(max as u64) as u32
}
