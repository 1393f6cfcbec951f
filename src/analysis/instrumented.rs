use std::task::{Context, Poll};
use std::time::Instant;

use futures::future::BoxFuture;
use tower::Service;
use tower_layer::Layer;
use tracing::{debug, warn};

/// Wraps a service so every request is timed and its outcome logged.
#[derive(Debug, Clone)]
pub struct InstrumentedLayer {
    name: &'static str,
}

impl InstrumentedLayer {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl<S> Layer<S> for InstrumentedLayer {
    type Service = InstrumentedService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedService {
            inner,
            name: self.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstrumentedService<S> {
    inner: S,
    name: &'static str,
}

impl<S, Request> Service<Request> for InstrumentedService<S>
where
    S: Service<Request>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: std::fmt::Display + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<S::Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let name = self.name;
        let start = Instant::now();
        debug!("Starting request on '{}'", name);
        let future = self.inner.call(req);

        Box::pin(async move {
            let result = future.await;
            let duration_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => debug!("'{}' completed in {}ms", name, duration_ms),
                Err(e) => warn!("'{}' failed after {}ms: {}", name, duration_ms, e),
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::{service_fn, ServiceExt};

    #[tokio::test]
    async fn passes_responses_and_errors_through() {
        let doubler = service_fn(|value: u32| async move {
            if value == 0 {
                Err("zero".to_string())
            } else {
                Ok(value * 2)
            }
        });
        let service = InstrumentedLayer::new("doubler").layer(doubler);

        assert_eq!(service.clone().oneshot(21).await, Ok(42));
        assert_eq!(service.oneshot(0).await, Err("zero".to_string()));
    }
}
