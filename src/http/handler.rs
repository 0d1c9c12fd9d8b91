//! Handler capability.

use std::sync::Arc;

use axum::body::Bytes;

use crate::http::writer::ResponseWriter;

/// Request as seen by handlers. The body is fully buffered.
pub type Request = axum::http::Request<Bytes>;

/// Shared, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

/// Processes a request by writing into a [`ResponseWriter`].
///
/// A handler that writes nothing declines the request; the switch then offers
/// it to the next matching route.
pub trait Handler: Send + Sync {
    fn serve(&self, req: &Request, w: &mut dyn ResponseWriter);
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut dyn ResponseWriter) + Send + Sync,
{
    fn serve(&self, req: &Request, w: &mut dyn ResponseWriter) {
        self(req, w)
    }
}

/// Box a closure into a [`BoxHandler`].
pub fn handler_fn<F>(f: F) -> BoxHandler
where
    F: Fn(&Request, &mut dyn ResponseWriter) + Send + Sync + 'static,
{
    Arc::new(f)
}
