//! Response-writer capability.
//!
//! # Responsibilities
//! - Define the sink handlers write status, headers and body into
//! - Define the optional capabilities a writer may carry
//!
//! # Design Decisions
//! - Capabilities are discovered at runtime through `as_vars` / `as_check`,
//!   which default to `None`. Handlers never downcast to a concrete writer.

use std::collections::BTreeMap;

use axum::http::{HeaderMap, StatusCode};

/// Captured path variables keyed by 1-based group index ("1", "2", ...).
pub type Vars = BTreeMap<String, String>;

/// A sink for an HTTP response.
pub trait ResponseWriter {
    /// Response headers written so far.
    fn headers(&self) -> &HeaderMap;

    /// Mutable access to the response headers.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Set the response status. Only the first status written takes effect.
    fn write_status(&mut self, status: StatusCode);

    /// Append to the response body. Implies `200 OK` if no status was written.
    fn write(&mut self, body: &[u8]);

    /// Variable lookup capability, if this writer carries one.
    fn as_vars(&self) -> Option<&dyn VarsResponseWriter> {
        None
    }

    /// Write-tracking capability, if this writer carries one.
    fn as_check(&self) -> Option<&dyn CheckResponseWriter> {
        None
    }
}

/// A writer that exposes the path variables captured for the current route.
pub trait VarsResponseWriter {
    fn vars(&self) -> &Vars;
}

/// A writer that records whether anything was written through it.
pub trait CheckResponseWriter {
    fn has_written(&self) -> bool;
}

/// Variables visible through `w`, or an empty map if it has no such capability.
pub fn vars_of(w: &dyn ResponseWriter) -> Vars {
    w.as_vars().map(|v| v.vars().clone()).unwrap_or_default()
}
