//! Tower adapter for the switch.
//!
//! # Responsibilities
//! - Buffer the request body (bounded) and hand the request to the switch
//! - Collect the written response through a `Recorder`
//! - Log and count each dispatch outcome
//! - Let the active switch be replaced while requests are in flight

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use arc_swap::{ArcSwap, Guard};
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::response::IntoResponse;
use tower::Service;

use crate::http::recorder::Recorder;
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::routing::{Dispatch, RegexSwitch};

/// Shared, atomically replaceable reference to the active switch.
///
/// Each request loads the switch once; a replacement only affects requests
/// that start after it.
#[derive(Clone)]
pub struct SwitchHandle {
    inner: Arc<ArcSwap<RegexSwitch>>,
}

impl SwitchHandle {
    pub fn new(switch: RegexSwitch) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(switch)),
        }
    }

    /// The switch currently in effect.
    pub fn load(&self) -> Guard<Arc<RegexSwitch>> {
        self.inner.load()
    }

    /// Replace the switch for subsequent requests.
    pub fn store(&self, switch: RegexSwitch) {
        metrics::set_active_rules(switch.len());
        self.inner.store(Arc::new(switch));
    }
}

/// `tower::Service` that routes every request through the active switch.
#[derive(Clone)]
pub struct SwitchService {
    switch: SwitchHandle,
    max_body_bytes: usize,
}

impl SwitchService {
    pub fn new(switch: SwitchHandle, max_body_bytes: usize) -> Self {
        Self {
            switch,
            max_body_bytes,
        }
    }

    /// Route a single request.
    pub async fn handle(&self, request: Request<Body>) -> Response<Body> {
        let start = Instant::now();
        let request_id = request_id(&request).to_string();
        let (parts, body) = request.into_parts();

        let body = match axum::body::to_bytes(body, self.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    path = %parts.uri.path(),
                    error = %e,
                    "Rejected request body"
                );
                metrics::record_rejected();
                return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
            }
        };
        let request = Request::from_parts(parts, body);

        let switch = self.switch.load();
        let mut recorder = Recorder::new();
        let dispatch = switch.serve(&request, &mut recorder);

        match &dispatch {
            Dispatch::Handled { pattern, rank } => tracing::debug!(
                request_id = %request_id,
                path = %request.uri().path(),
                pattern = %pattern,
                rank,
                status = %recorder.status(),
                "Request handled"
            ),
            Dispatch::NotFound { declined } => tracing::debug!(
                request_id = %request_id,
                path = %request.uri().path(),
                declined,
                "No route handled request"
            ),
        }
        metrics::record_dispatch(&dispatch, start);

        recorder.into_response()
    }
}

impl Service<Request<Body>> for SwitchService {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(request).await) })
    }
}
