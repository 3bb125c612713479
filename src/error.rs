use std::path::PathBuf;
use thiserror::Error;

// Main application error type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("camera error: {0}")]
    Camera(#[from] nokhwa::NokhwaError),
    #[error("failed to load reference image {path:?}: {source}")]
    Reference {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("verification error: {0}")]
    Verification(String),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("display error: {0}")]
    Gui(#[from] eframe::Error),
}
