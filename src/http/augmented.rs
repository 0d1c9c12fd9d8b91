//! Writer wrapper handed to route handlers.

use axum::http::{HeaderMap, StatusCode};

use crate::http::writer::{CheckResponseWriter, ResponseWriter, Vars, VarsResponseWriter};

/// Wraps the caller's writer for the duration of one handler attempt.
///
/// Every write is forwarded unchanged; the wrapper only remembers that a write
/// happened and carries the captured variables of the rule being tried.
/// Taking `headers_mut` counts as a write.
pub struct AugmentedWriter<'w> {
    inner: &'w mut dyn ResponseWriter,
    vars: Vars,
    written: bool,
}

impl<'w> AugmentedWriter<'w> {
    pub fn new(inner: &'w mut dyn ResponseWriter, vars: Vars) -> Self {
        Self {
            inner,
            vars,
            written: false,
        }
    }
}

impl ResponseWriter for AugmentedWriter<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.written = true;
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.written = true;
        self.inner.write_status(status);
    }

    fn write(&mut self, body: &[u8]) {
        self.written = true;
        self.inner.write(body);
    }

    fn as_vars(&self) -> Option<&dyn VarsResponseWriter> {
        Some(self)
    }

    fn as_check(&self) -> Option<&dyn CheckResponseWriter> {
        Some(self)
    }
}

impl VarsResponseWriter for AugmentedWriter<'_> {
    fn vars(&self) -> &Vars {
        &self.vars
    }
}

impl CheckResponseWriter for AugmentedWriter<'_> {
    fn has_written(&self) -> bool {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::recorder::Recorder;

    #[test]
    fn test_starts_unwritten() {
        let mut rec = Recorder::new();
        let w = AugmentedWriter::new(&mut rec, Vars::new());
        assert!(!w.has_written());
        assert!(w.headers().is_empty());
        assert!(!w.has_written());
    }

    #[test]
    fn test_each_write_kind_is_tracked() {
        let mut rec = Recorder::new();

        let mut w = AugmentedWriter::new(&mut rec, Vars::new());
        w.write(b"x");
        assert!(w.has_written());

        let mut w = AugmentedWriter::new(&mut rec, Vars::new());
        w.write_status(StatusCode::ACCEPTED);
        assert!(w.has_written());

        let mut w = AugmentedWriter::new(&mut rec, Vars::new());
        w.headers_mut().insert("x-a", "1".parse().unwrap());
        assert!(w.has_written());
    }

    #[test]
    fn test_writes_pass_through() {
        let mut rec = Recorder::new();
        {
            let mut w = AugmentedWriter::new(&mut rec, Vars::new());
            w.write_status(StatusCode::CREATED);
            w.headers_mut().insert("x-a", "1".parse().unwrap());
            w.write(b"hello");
        }
        assert_eq!(rec.status(), StatusCode::CREATED);
        assert_eq!(rec.headers()["x-a"], "1");
        assert_eq!(rec.body(), b"hello");
    }

    #[test]
    fn test_capabilities_are_exposed() {
        let mut rec = Recorder::new();
        let vars = Vars::from([("1".to_string(), "peter".to_string())]);
        let w = AugmentedWriter::new(&mut rec, vars);
        let dyn_w: &dyn ResponseWriter = &w;
        assert_eq!(dyn_w.as_vars().unwrap().vars()["1"], "peter");
        assert!(!dyn_w.as_check().unwrap().has_written());
    }
}
