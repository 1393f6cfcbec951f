use std::time::Duration;

use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, Rgb};
use rand::Rng;
use tracing::debug;

use crate::camera::Camera;
use crate::common::CapturedImage;
use crate::error::CaptureError;

/// Camera that renders shaded skin-tone frames, for demos and tests.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    permission: bool,
    ready: bool,
    active: bool,
    activations: Vec<bool>,
    failure_rate: f64,
    latency: Duration,
    shots: u32,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            permission: true,
            ready: true,
            active: false,
            activations: Vec::new(),
            failure_rate: 0.0,
            latency: Duration::ZERO,
            shots: 0,
        }
    }

    pub fn with_permission(mut self, granted: bool) -> Self {
        self.permission = granted;
        self
    }

    /// Probability in `[0, 1]` that a capture fails like a driver error.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Every `set_active` call received, oldest first.
    pub fn activations(&self) -> &[bool] {
        &self.activations
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    fn render(&self) -> DynamicImage {
        let base = [224u8, 172, 140];
        let step = (self.shots % 8) as u8 * 4;
        let height = self.height.max(1);
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(self.width, self.height, |_, y| {
            let falloff = (y * 40 / height) as u8;
            Rgb([
                base[0].saturating_sub(falloff),
                base[1].saturating_sub(falloff / 2).saturating_add(step),
                base[2].saturating_sub(falloff / 2),
            ])
        }))
    }
}

#[async_trait]
impl Camera for SyntheticCamera {
    async fn request_permission(&mut self) -> bool {
        self.permission
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        self.activations.push(active);
    }

    fn is_ready(&self) -> bool {
        self.ready && self.active
    }

    async fn capture(&mut self) -> Result<CapturedImage, CaptureError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failure_rate > 0.0 && rand::rng().random_bool(self.failure_rate) {
            return Err(CaptureError::CaptureFailure("sensor read timed out".to_string()));
        }
        let image = CapturedImage::new(self.render());
        self.shots += 1;
        debug!("Synthetic frame {} captured ({})", self.shots, image.id());
        Ok(image)
    }
}
