pub mod synthetic;

use async_trait::async_trait;

use crate::common::CapturedImage;
use crate::error::CaptureError;

pub use synthetic::SyntheticCamera;

/// Device camera as seen by a capture flow.
///
/// `capture` is only called after permission was granted, after the camera
/// was switched on with `set_active(true)`, and while `is_ready` reports true.
/// `set_active(false)` means no further camera I/O until it is switched back on.
#[async_trait]
pub trait Camera: Send {
    async fn request_permission(&mut self) -> bool;
    fn set_active(&mut self, active: bool);
    fn is_ready(&self) -> bool;
    async fn capture(&mut self) -> Result<CapturedImage, CaptureError>;
}
