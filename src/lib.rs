pub mod analysis;
pub mod camera;
pub mod common;
pub mod config;
pub mod error;
pub mod flow;
pub mod session;

pub use analysis::{AnalysisController, AnalysisStatus, MockSkinAnalyzer, Report, SkinAnalyzer};
pub use camera::{Camera, SyntheticCamera};
pub use common::CapturedImage;
pub use config::Configuration;
pub use error::{AnalysisError, AppError, CaptureError, SessionError};
pub use flow::{CaptureFlow, CaptureFlowBuilder, CaptureOutcome, FlowSnapshot, SkipReason};
pub use session::{CaptureSession, SessionMode, SlotLabel, SlotLayout};
