pub mod capture_session;
pub mod review;
pub mod slot;

pub use capture_session::{next_empty_slot, CaptureSession, CaptureTransition, SessionMode};
pub use review::ReviewNavigator;
pub use slot::{Slot, SlotLabel, SlotLayout};
