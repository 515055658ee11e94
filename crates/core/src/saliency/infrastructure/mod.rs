pub mod estimator_factory;
pub mod fine_grained_saliency;
pub mod spectral_residual_saliency;
