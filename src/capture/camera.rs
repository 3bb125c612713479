use crate::capture::frame::Frame;
use crate::config::CameraSettings;
use crate::error::AppError;
use image::DynamicImage;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
    Camera,
};

/// Source of captured frames. A read failure is transient by contract: the
/// caller skips the iteration and tries again on the next pass.
pub trait FrameSource: Send {
    fn read(&mut self) -> Result<Frame, AppError>;
}

/// Webcam-backed frame source. Holds the exclusive OS device handle for the
/// lifetime of the value; dropping it releases the device.
pub struct WebcamSource {
    camera: Camera,
}

impl WebcamSource {
    pub fn open(settings: &CameraSettings) -> Result<Self, AppError> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(settings.width, settings.height),
                FrameFormat::MJPEG,
                30,
            ),
        ));
        let mut camera = Camera::new(CameraIndex::Index(settings.index), requested)?;
        camera.open_stream()?;
        tracing::info!(
            "opened camera {} ({}x{} requested)",
            settings.index,
            settings.width,
            settings.height
        );
        Ok(Self { camera })
    }
}

impl FrameSource for WebcamSource {
    fn read(&mut self) -> Result<Frame, AppError> {
        let buffer = self.camera.frame()?;
        let rgb = buffer.decode_image::<RgbFormat>()?;
        Ok(Frame::new(DynamicImage::ImageRgb8(rgb)))
    }
}

impl Drop for WebcamSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            tracing::warn!("failed to stop camera stream: {e}");
        }
    }
}
