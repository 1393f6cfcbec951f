use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::sync::Arc;
use uuid::Uuid;

use crate::session::SlotLabel;

/// Opaque reference to one photo produced by the camera.
#[derive(Clone)]
pub struct CapturedImage {
    id: Uuid,
    image: Arc<DynamicImage>,
    captured_at: DateTime<Utc>,
    label: Option<SlotLabel>,
}

impl CapturedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self::with_metadata(Uuid::new_v4(), image, Utc::now())
    }

    pub fn with_metadata(id: Uuid, image: DynamicImage, captured_at: DateTime<Utc>) -> Self {
        Self {
            id,
            image: Arc::new(image),
            captured_at,
            label: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Slot the image was stored into; `None` until it is stored.
    pub fn label(&self) -> Option<SlotLabel> {
        self.label
    }

    pub(crate) fn assign_label(&mut self, label: SlotLabel) {
        self.label = Some(label);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = self.dimensions();
        f.debug_struct("CapturedImage")
            .field("id", &self.id)
            .field("width", &width)
            .field("height", &height)
            .field("captured_at", &self.captured_at)
            .field("label", &self.label)
            .finish()
    }
}
