use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::analysis::{
    AnalysisController, AnalysisServiceBuilder, AnalysisStatus, MockSkinAnalyzer, Report,
    SkinAnalyzer,
};
use crate::camera::Camera;
use crate::common::CapturedImage;
use crate::config::Configuration;
use crate::error::{AnalysisError, AppError, CaptureError, SessionError};
use crate::session::{CaptureSession, CaptureTransition, SessionMode, SlotLabel, SlotLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PermissionState {
    Unknown,
    Granted,
    Denied,
}

/// Why a capture attempt left the session untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotCapturing,
    CameraNotReady,
    CaptureFailed(CaptureError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Stored(CaptureTransition),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSnapshot {
    pub label: SlotLabel,
    pub filled: bool,
    pub image_id: Option<Uuid>,
}

/// Everything a renderer reads, in one serialisable value.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub mode: SessionMode,
    pub permission: PermissionState,
    pub slots: Vec<SlotSnapshot>,
    pub active_capture_index: usize,
    pub displayed_index: usize,
    pub progress: String,
    pub status: AnalysisStatus,
    pub report: Option<Report>,
}

/// Capture-and-review flow for one screen: session, camera and analysis together.
pub struct CaptureFlow<C> {
    session: CaptureSession,
    analysis: AnalysisController,
    camera: C,
    camera_active: bool,
    permission: PermissionState,
}

impl<C: Camera> CaptureFlow<C> {
    pub fn new(session: CaptureSession, analysis: AnalysisController, camera: C) -> Self {
        Self {
            session,
            analysis,
            camera,
            camera_active: false,
            permission: PermissionState::Unknown,
        }
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Handle onto the shared analysis state, usable while a request is in flight.
    pub fn analysis(&self) -> AnalysisController {
        self.analysis.clone()
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub async fn request_permission(&mut self) -> Result<(), CaptureError> {
        if self.camera.request_permission().await {
            self.permission = PermissionState::Granted;
            info!("Camera permission granted");
            self.sync_camera();
            Ok(())
        } else {
            self.permission = PermissionState::Denied;
            warn!("Camera permission denied");
            Err(CaptureError::PermissionDenied)
        }
    }

    pub fn start_capture(&mut self, target_index: usize) -> Result<(), SessionError> {
        self.session.start_capture(target_index)?;
        self.sync_camera();
        Ok(())
    }

    pub fn request_retake(&mut self, index: usize) -> Result<(), SessionError> {
        self.session.request_retake(index)?;
        self.sync_camera();
        Ok(())
    }

    /// Takes one photo into the active slot.
    ///
    /// A camera that is not ready or fails leaves the session as it was and
    /// is reported as [`CaptureOutcome::Skipped`] so the same slot can be retried.
    #[instrument(skip(self), fields(slot = self.session.active_capture_index()))]
    pub async fn capture(&mut self) -> Result<CaptureOutcome, AppError> {
        if self.permission != PermissionState::Granted {
            warn!("Capture blocked, camera permission is {:?}", self.permission);
            return Err(CaptureError::PermissionDenied.into());
        }
        if self.session.mode() != SessionMode::Capturing {
            debug!("Capture ignored while reviewing");
            return Ok(CaptureOutcome::Skipped(SkipReason::NotCapturing));
        }
        self.sync_camera();
        if !self.camera.is_ready() {
            warn!("Camera not ready, capture ignored");
            return Ok(CaptureOutcome::Skipped(SkipReason::CameraNotReady));
        }

        match self.camera.capture().await {
            Ok(image) => Ok(self.on_image_captured(image)),
            Err(e) => {
                warn!("Capture failed, slot unchanged: {}", e);
                Ok(CaptureOutcome::Skipped(SkipReason::CaptureFailed(e)))
            }
        }
    }

    /// Stores an image produced outside [`CaptureFlow::capture`] into the active slot.
    ///
    /// Like `capture`, an image arriving while reviewing is skipped.
    pub fn on_image_captured(&mut self, image: CapturedImage) -> CaptureOutcome {
        let transition = match self.session.on_image_captured(image) {
            Ok(transition) => transition,
            Err(e) => {
                debug!("Image dropped: {}", e);
                return CaptureOutcome::Skipped(SkipReason::NotCapturing);
            }
        };
        self.analysis.reset();
        self.sync_camera();
        CaptureOutcome::Stored(transition)
    }

    pub fn retake_all(&mut self) {
        self.session.retake_all();
        self.analysis.reset();
        self.sync_camera();
        info!("Session restarted, {} slots cleared", self.session.len());
    }

    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.session.next()
    }

    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.session.previous()
    }

    /// Starts an analysis of the current photos.
    ///
    /// The images are taken now; the returned future does not borrow the
    /// flow, so navigation and retakes stay available while it is pending.
    pub fn analyze(
        &self,
    ) -> impl Future<Output = Result<Report, AnalysisError>> + Send + 'static {
        let analysis = self.analysis.clone();
        let images = AnalysisController::images_for(&self.session);

        async move {
            let result = match images {
                Ok(images) => analysis.analyze_images(images).await,
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                if e.is_rejection() {
                    debug!("Analyze trigger ignored: {}", e);
                }
            }
            result
        }
    }

    // The camera runs only while permitted and capturing.
    fn sync_camera(&mut self) {
        let active = self.permission == PermissionState::Granted
            && self.session.mode() == SessionMode::Capturing;
        if active != self.camera_active {
            debug!("Camera {}", if active { "activated" } else { "released" });
            self.camera.set_active(active);
            self.camera_active = active;
        }
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            mode: self.session.mode(),
            permission: self.permission,
            slots: self
                .session
                .slots()
                .iter()
                .map(|slot| SlotSnapshot {
                    label: slot.label(),
                    filled: slot.is_filled(),
                    image_id: slot.image().map(CapturedImage::id),
                })
                .collect(),
            active_capture_index: self.session.active_capture_index(),
            displayed_index: self.session.displayed_index(),
            progress: self.session.progress(),
            status: self.analysis.status(),
            report: self.analysis.report(),
        }
    }
}

pub struct CaptureFlowBuilder {
    configuration: Configuration,
    analysis_timeout: Option<Duration>,
    analyzer: Option<Box<dyn SkinAnalyzer>>,
}

impl CaptureFlowBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            analysis_timeout: configuration.analysis_timeout(),
            configuration,
            analyzer: None,
        }
    }

    // Overrides the configured slot layout.
    pub fn layout(mut self, layout: SlotLayout) -> Self {
        self.configuration.layout = layout;
        self
    }

    // Overrides the configured analysis timeout; `None` waits indefinitely.
    pub fn analysis_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    // Replaces the mock engine with a real one.
    pub fn analyzer(mut self, analyzer: Box<dyn SkinAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn build<C: Camera>(self, camera: C) -> CaptureFlow<C> {
        let analyzer = self.analyzer.unwrap_or_else(|| {
            Box::new(
                MockSkinAnalyzer::new().with_delay(self.configuration.mock_analysis_delay()),
            )
        });
        let analysis = AnalysisServiceBuilder::new(analyzer)
            .optional_timeout(self.analysis_timeout)
            .build_controller();

        CaptureFlow::new(
            CaptureSession::new(self.configuration.layout),
            analysis,
            camera,
        )
    }
}
