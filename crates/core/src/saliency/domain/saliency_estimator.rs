use thiserror::Error;

use crate::shared::frame::Frame;

use super::saliency_map::SaliencyMap;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaliencyError {
    #[error("cannot compute saliency of an empty image")]
    EmptyInput,
    #[error("degenerate saliency response: {0}")]
    Degenerate(String),
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

/// Domain interface for visual-saliency estimation.
///
/// Implementations are pure functions of the frame, so `&self` and
/// shareable across threads. A failed computation is a value, not a panic:
/// callers decide how to degrade.
pub trait SaliencyEstimator: Send + Sync {
    fn compute(&self, frame: &Frame) -> Result<SaliencyMap, SaliencyError>;
}
