pub mod captured_image;

pub use captured_image::CapturedImage;
