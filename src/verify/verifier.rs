use crate::config::VerifierSettings;
use crate::error::AppError;
use image::{imageops::FilterType, DynamicImage};
use imghash::{perceptual::PerceptualHasher, ImageHasher};

/// Judgment of whether a candidate frame shows the same face as the
/// reference image. Synchronous and potentially slow; callers run it off
/// the capture and render threads.
pub trait Verifier: Send + Sync {
    fn verify(&self, candidate: &DynamicImage, reference: &DynamicImage) -> Result<bool, AppError>;
}

/// Perceptual-hash backed verifier: both images are downscaled and hashed,
/// and a small bit distance counts as a match. The similarity judgment
/// itself is delegated entirely to the hashing library.
pub struct PerceptualVerifier {
    hasher: PerceptualHasher,
    distance_threshold: usize,
    probe_size: u32,
}

impl PerceptualVerifier {
    pub fn new(settings: &VerifierSettings) -> Self {
        Self {
            hasher: PerceptualHasher::default(),
            distance_threshold: settings.distance_threshold as usize,
            probe_size: settings.probe_size.max(8),
        }
    }
}

impl Verifier for PerceptualVerifier {
    fn verify(&self, candidate: &DynamicImage, reference: &DynamicImage) -> Result<bool, AppError> {
        let candidate_probe =
            candidate.resize(self.probe_size, self.probe_size, FilterType::Nearest);
        let reference_probe =
            reference.resize(self.probe_size, self.probe_size, FilterType::Nearest);

        let candidate_hash = self.hasher.hash_from_img(&candidate_probe);
        let reference_hash = self.hasher.hash_from_img(&reference_probe);
        let distance = candidate_hash
            .distance(&reference_hash)
            .map_err(|e| AppError::Verification(format!("hash distance failed: {e:?}")))?;

        tracing::debug!(
            "perceptual distance {} (threshold {})",
            distance,
            self.distance_threshold
        );
        Ok(distance <= self.distance_threshold)
    }
}
