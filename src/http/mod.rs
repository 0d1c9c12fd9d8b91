//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → service.rs (buffer body, load active switch)
//!     → routing::RegexSwitch (writes into a Recorder through an AugmentedWriter)
//!     → recorder.rs (collected response)
//!     → Send to client
//! ```
//!
//! Handlers only ever see the `ResponseWriter` trait from writer.rs and the
//! capabilities it exposes.

pub mod augmented;
pub mod handler;
pub mod recorder;
pub mod request;
pub mod server;
pub mod service;
pub mod writer;

pub use augmented::AugmentedWriter;
pub use handler::{handler_fn, BoxHandler, Handler, Request};
pub use recorder::Recorder;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
pub use service::{SwitchHandle, SwitchService};
pub use writer::{vars_of, CheckResponseWriter, ResponseWriter, Vars, VarsResponseWriter};
