use crate::shared::constants::DEFAULT_TOP_K;
use crate::shared::face_box::FaceBox;

/// Which detected faces take part in the face-tier average.
///
/// A few large (near) faces should dominate framing over many small
/// background faces, hence `Largest(k)` by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceSelection {
    /// The `k` largest boxes by area. `k == 0` behaves like `k == 1`.
    Largest(usize),
    /// Every detected box.
    All,
}

impl Default for FaceSelection {
    fn default() -> Self {
        Self::Largest(DEFAULT_TOP_K)
    }
}

impl FaceSelection {
    /// Returns the participating boxes, largest first.
    ///
    /// Ordering is total over box geometry, so the selection does not
    /// depend on the order the detector reported faces in.
    pub fn select(&self, faces: &[FaceBox]) -> Vec<FaceBox> {
        let mut sorted = faces.to_vec();
        sorted.sort_by(FaceBox::cmp_largest_first);
        if let Self::Largest(k) = *self {
            sorted.truncate(k.max(1));
        }
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x1: f64, y1: f64, x2: f64, y2: f64) -> FaceBox {
        FaceBox::new(x1, y1, x2, y2, 0.9)
    }

    fn faces() -> Vec<FaceBox> {
        vec![
            face(0.0, 0.0, 10.0, 10.0),
            face(0.0, 0.0, 40.0, 40.0),
            face(50.0, 50.0, 55.0, 55.0),
            face(60.0, 0.0, 90.0, 30.0),
            face(0.0, 60.0, 20.0, 80.0),
        ]
    }

    #[test]
    fn test_default_is_top_three() {
        assert_eq!(FaceSelection::default(), FaceSelection::Largest(3));
    }

    #[test]
    fn test_largest_keeps_k_biggest() {
        let selected = FaceSelection::Largest(3).select(&faces());
        let areas: Vec<f64> = selected.iter().map(|f| f.area()).collect();
        assert_eq!(areas, vec![1600.0, 900.0, 400.0]);
    }

    #[test]
    fn test_largest_with_fewer_faces_than_k_keeps_all() {
        let selected = FaceSelection::Largest(3).select(&faces()[..2]);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_largest_zero_keeps_one() {
        assert_eq!(FaceSelection::Largest(0).select(&faces()).len(), 1);
    }

    #[test]
    fn test_all_keeps_every_face() {
        assert_eq!(FaceSelection::All.select(&faces()).len(), 5);
    }

    #[test]
    fn test_selection_ignores_input_order() {
        let mut reversed = faces();
        reversed.reverse();
        assert_eq!(
            FaceSelection::Largest(3).select(&faces()),
            FaceSelection::Largest(3).select(&reversed)
        );
    }

    #[test]
    fn test_empty_input_selects_nothing() {
        assert!(FaceSelection::Largest(3).select(&[]).is_empty());
    }
}
