use std::fmt;
use std::str::FromStr;

use crate::saliency::domain::saliency_estimator::SaliencyEstimator;

use super::fine_grained_saliency::FineGrainedSaliency;
use super::spectral_residual_saliency::SpectralResidualSaliency;

/// Saliency algorithm preference.
///
/// `Disabled` removes the saliency tier entirely: images without faces
/// resolve straight to the frame center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaliencyAlgorithm {
    #[default]
    FineGrained,
    SpectralResidual,
    Disabled,
}

impl FromStr for SaliencyAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fine-grained" | "fine_grained" | "finegrained" => Ok(Self::FineGrained),
            "spectral-residual" | "spectral_residual" | "spectral" => Ok(Self::SpectralResidual),
            "none" | "off" | "disabled" => Ok(Self::Disabled),
            other => Err(format!(
                "Saliency must be one of: fine-grained, spectral-residual, none, got '{other}'"
            )),
        }
    }
}

impl fmt::Display for SaliencyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FineGrained => "fine-grained",
            Self::SpectralResidual => "spectral-residual",
            Self::Disabled => "none",
        };
        f.write_str(name)
    }
}

/// Creates the estimator for `algorithm`, or `None` when saliency is disabled.
pub fn create_estimator(algorithm: SaliencyAlgorithm) -> Option<Box<dyn SaliencyEstimator>> {
    log::info!("Using {algorithm} saliency");
    match algorithm {
        SaliencyAlgorithm::FineGrained => Some(Box::new(FineGrainedSaliency::new())),
        SaliencyAlgorithm::SpectralResidual => Some(Box::new(SpectralResidualSaliency::new())),
        SaliencyAlgorithm::Disabled => None,
    }
}
