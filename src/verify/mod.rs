pub mod verdict;
pub mod verifier;

pub use verdict::Verdict;
pub use verifier::{PerceptualVerifier, Verifier};

use crate::error::AppError;
use image::DynamicImage;
use std::path::Path;

/// Loads the reference image once at startup. A missing or unreadable file
/// is the only intended fatal failure in the program.
pub fn load_reference(path: &Path) -> Result<DynamicImage, AppError> {
    let image = image::open(path).map_err(|source| AppError::Reference {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "loaded reference image {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}
