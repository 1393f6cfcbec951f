use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::BoxFuture;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{BoxError, Service, ServiceBuilder};

use crate::analysis::analyzer::SkinAnalyzer;
use crate::analysis::controller::AnalysisController;
use crate::analysis::instrumented::InstrumentedLayer;
use crate::analysis::report::Report;
use crate::common::CapturedImage;
use crate::error::AnalysisError;

pub type AnalysisRequest = Vec<CapturedImage>;
pub type BoxedAnalysisService = BoxCloneService<AnalysisRequest, Report, BoxError>;

/// Adapts a [`SkinAnalyzer`] to a tower service so layers can be stacked on it.
#[derive(Clone)]
pub struct AnalyzerService {
    inner: Arc<dyn SkinAnalyzer>,
}

impl AnalyzerService {
    pub fn new(inner: Box<dyn SkinAnalyzer>) -> Self {
        Self {
            inner: Arc::from(inner),
        }
    }
}

impl Service<AnalysisRequest> for AnalyzerService {
    type Response = Report;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: AnalysisRequest) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let report = inner.analyze(&req).await?;
            Ok(report)
        })
    }
}

pub struct AnalysisServiceBuilder {
    analyzer: Box<dyn SkinAnalyzer>,
    timeout: Option<Duration>,
}

impl AnalysisServiceBuilder {
    pub fn new(analyzer: Box<dyn SkinAnalyzer>) -> Self {
        Self {
            analyzer,
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn optional_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the service together with a controller that knows its timeout.
    pub fn build_controller(self) -> AnalysisController {
        let timeout = self.timeout;
        AnalysisController::new(self.build(), timeout)
    }

    pub fn build(self) -> BoxedAnalysisService {
        let name = self.analyzer.name();
        let service = ServiceBuilder::new()
            .layer(InstrumentedLayer::new(name))
            .option_layer(self.timeout.map(TimeoutLayer::new))
            .service(AnalyzerService::new(self.analyzer));

        BoxCloneService::new(service)
    }
}

/// Recovers the typed error from whatever the layered stack returned.
pub fn into_analysis_error(error: BoxError, timeout: Option<Duration>) -> AnalysisError {
    if error.is::<Elapsed>() {
        return AnalysisError::Timeout(timeout.unwrap_or_default());
    }
    match error.downcast::<AnalysisError>() {
        Ok(analysis_error) => *analysis_error,
        Err(other) => AnalysisError::Failure(other.to_string()),
    }
}
