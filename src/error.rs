use std::time::Duration;

use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Session Error: {0}")]
    Session(#[from] SessionError),
    #[error("Capture Error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Analysis Error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Session state machine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Slot index {index} is out of range for a session of {len} slots")]
    SlotOutOfRange { index: usize, len: usize },
    #[error("The session is not capturing.")]
    NotCapturing,
    #[error("The session is not reviewing.")]
    NotReviewing,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Camera permission has not been granted.")]
    PermissionDenied,
    #[error("Camera failed to capture: {0}")]
    CaptureFailure(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Analysis needs {required} captured photos, only {captured} available")]
    NotReady { captured: usize, required: usize },
    #[error("An analysis request is already in flight.")]
    AlreadyPending,
    #[error("Analysis failed: {0}")]
    Failure(String),
    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),
    #[error("Analysis result discarded because the photos changed.")]
    Superseded,
}

impl AnalysisError {
    /// Rejections leave the analysis state untouched; failures reset it to idle.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AnalysisError::NotReady { .. } | AnalysisError::AlreadyPending
        )
    }
}
