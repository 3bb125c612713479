use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::sync::Arc;
use uuid::Uuid;

/// One captured camera image. Cloning is cheap and shares the pixel buffer,
/// so a verification task can outlive the loop iteration that captured the
/// frame without the buffer ever being overwritten under it.
#[derive(Clone)]
pub struct Frame {
    image: Arc<DynamicImage>,
    captured_at: DateTime<Utc>,
    id: Uuid,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
            captured_at: Utc::now(),
            id: Uuid::new_v4(),
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn image_handle(&self) -> Arc<DynamicImage> {
        Arc::clone(&self.image)
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}
