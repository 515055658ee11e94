use crate::detection::domain::face_detector::FaceDetector;
use crate::focus::domain::face_selection::FaceSelection;
use crate::focus::domain::focus_resolver::FocusResolver;
use crate::saliency::infrastructure::estimator_factory::{create_estimator, SaliencyAlgorithm};

/// Resolver policy knobs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusConfig {
    pub face_selection: FaceSelection,
    pub saliency: SaliencyAlgorithm,
}

/// Wires a detector and the configured saliency backend into a resolver.
pub fn build_resolver(detector: Box<dyn FaceDetector>, config: &FocusConfig) -> FocusResolver {
    log::info!(
        "Building focus resolver (faces: {:?}, saliency: {})",
        config.face_selection,
        config.saliency
    );
    FocusResolver::new(detector, create_estimator(config.saliency), config.face_selection)
}
