//! In-memory response writer.
//!
//! Collects status, headers and body so they can be turned into an
//! `http::Response` once the switch is done with the request.

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Response, StatusCode};

use crate::http::writer::ResponseWriter;

/// Buffers a response written through [`ResponseWriter`].
#[derive(Debug, Default)]
pub struct Recorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, `200 OK` if none.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(Bytes::from(self.body)));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseWriter for Recorder {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write(&mut self, body: &[u8]) {
        self.write_status(StatusCode::OK);
        self.body.extend_from_slice(body);
    }
}
