use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tower::{Service, ServiceExt};
use tracing::{debug, info, instrument, warn};

use crate::analysis::report::Report;
use crate::analysis::service::{into_analysis_error, AnalysisRequest, BoxedAnalysisService};
use crate::error::AnalysisError;
use crate::session::CaptureSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalysisStatus {
    Idle,
    Pending,
    Completed,
}

#[derive(Debug)]
struct AnalysisState {
    status: AnalysisStatus,
    report: Option<Report>,
    // Set while a request is outstanding, even one whose result was invalidated.
    in_flight: bool,
    // Bumped on every reset; a request only settles into the epoch it started in.
    epoch: u64,
}

/// Sequences requests to the analysis service and exposes their progress.
///
/// Cloning yields another handle onto the same state, so a renderer can poll
/// `status()` while a request is in flight. At most one request is
/// outstanding at a time, including after a `reset()` invalidated it.
#[derive(Clone)]
pub struct AnalysisController {
    state: Arc<Mutex<AnalysisState>>,
    service: Arc<Mutex<BoxedAnalysisService>>,
    timeout: Option<Duration>,
}

impl AnalysisController {
    /// `timeout` must be the one layered onto `service`; use
    /// [`AnalysisServiceBuilder::build_controller`](crate::analysis::AnalysisServiceBuilder::build_controller).
    pub(crate) fn new(service: BoxedAnalysisService, timeout: Option<Duration>) -> Self {
        Self {
            state: Arc::new(Mutex::new(AnalysisState {
                status: AnalysisStatus::Idle,
                report: None,
                in_flight: false,
                epoch: 0,
            })),
            service: Arc::new(Mutex::new(service)),
            timeout,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn status(&self) -> AnalysisStatus {
        self.lock_state().status
    }

    pub fn report(&self) -> Option<Report> {
        self.lock_state().report.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == AnalysisStatus::Pending
    }

    /// True while a request is outstanding, whether or not its result will be kept.
    pub fn is_in_flight(&self) -> bool {
        self.lock_state().in_flight
    }

    /// Drops any report and invalidates an in-flight request.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.epoch += 1;
        if state.status != AnalysisStatus::Idle {
            debug!("Analysis reset from {:?} to Idle", state.status);
        }
        state.status = AnalysisStatus::Idle;
        state.report = None;
    }

    /// Images of a fully captured session in slot order.
    pub fn images_for(session: &CaptureSession) -> Result<AnalysisRequest, AnalysisError> {
        session.captured_images().ok_or(AnalysisError::NotReady {
            captured: session.filled_count(),
            required: session.len(),
        })
    }

    #[instrument(skip(self, session), fields(slots = session.len()))]
    pub async fn analyze(&self, session: &CaptureSession) -> Result<Report, AnalysisError> {
        let images = Self::images_for(session).inspect_err(|e| {
            debug!("Analysis rejected: {}", e);
        })?;
        self.analyze_images(images).await
    }

    pub async fn analyze_images(&self, images: AnalysisRequest) -> Result<Report, AnalysisError> {
        let epoch = {
            let mut state = self.lock_state();
            if state.in_flight {
                debug!("Analysis rejected: request already in flight");
                return Err(AnalysisError::AlreadyPending);
            }
            state.in_flight = true;
            state.status = AnalysisStatus::Pending;
            state.report = None;
            state.epoch
        };
        let mut guard = PendingGuard {
            state: self.state.clone(),
            epoch,
            armed: true,
        };

        info!("Submitting {} images for analysis", images.len());
        let mut service = self
            .service
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let result = match service.ready().await {
            Ok(ready) => ready.call(images).await,
            Err(e) => Err(e),
        }
        .map_err(|e| into_analysis_error(e, self.timeout));

        guard.armed = false;
        let mut state = self.lock_state();
        state.in_flight = false;
        if state.epoch != epoch {
            debug!("Discarding analysis result from a superseded request");
            return Err(AnalysisError::Superseded);
        }

        match result {
            Ok(report) => {
                info!(
                    "Analysis completed: {} ({}% confidence)",
                    report.skin_type,
                    report.confidence_percent()
                );
                state.status = AnalysisStatus::Completed;
                state.report = Some(report.clone());
                Ok(report)
            }
            Err(e) => {
                warn!("Analysis failed, returning to idle: {}", e);
                state.status = AnalysisStatus::Idle;
                state.report = None;
                Err(e)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, AnalysisState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Releases the in-flight slot when a request future is dropped before settling.
struct PendingGuard {
    state: Arc<Mutex<AnalysisState>>,
    epoch: u64,
    armed: bool,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = false;
        if state.epoch == self.epoch && state.status == AnalysisStatus::Pending {
            debug!("Analysis request cancelled, returning to idle");
            state.status = AnalysisStatus::Idle;
        }
    }
}
