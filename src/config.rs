use crate::error::AppError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub camera: CameraSettings,
    pub sampling: SamplingSettings,
    pub verifier: VerifierSettings,
    pub reference_path: PathBuf,
    pub frame_buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub index: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Verify every Nth captured frame.
    pub interval_frames: u64,
    /// When true, a due sample is skipped while a prior verification task is
    /// still running instead of piling up concurrent tasks.
    pub skip_when_busy: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerifierSettings {
    /// Largest perceptual-hash bit distance still reported as a match.
    pub distance_threshold: u32,
    /// Edge length both images are downscaled to before hashing.
    pub probe_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            sampling: SamplingSettings::default(),
            verifier: VerifierSettings::default(),
            reference_path: PathBuf::from("reference.jpg"),
            frame_buffer_size: 60,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            index: 0,
            width: 640,
            height: 480,
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            interval_frames: 30,
            skip_when_busy: false,
        }
    }
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            distance_threshold: 12,
            probe_size: 64,
        }
    }
}

impl Settings {
    /// Loads `facegate.toml` (optional) layered with `FACEGATE_`-prefixed
    /// environment variables; every field falls back to its default.
    pub fn load() -> Result<Self, AppError> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::with_name("facegate").required(false))
            .add_source(config::Environment::with_prefix("FACEGATE").separator("__"))
            .build()?
            .try_deserialize()?;

        if settings.sampling.interval_frames == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "sampling.interval_frames must be at least 1".to_string(),
            )));
        }
        Ok(settings)
    }
}
