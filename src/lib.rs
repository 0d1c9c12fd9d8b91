//! Regular-expression HTTP request router.
//!
//! A [`RegexSwitch`] holds a set of path patterns, each bound to a
//! [`Handler`]. Every request is matched against all patterns; the pattern
//! with the longest matched span wins and its capture groups are handed to
//! the handler as variables (`"1"`, `"2"`, ...) through the response writer.
//! A handler that writes nothing declines, and the next-best match is tried.
//!
//! ```
//! use regex_router::{handler_fn, vars_of, Recorder, RegexSwitch, Request, ResponseWriter};
//!
//! let switch = RegexSwitch::build([(
//!     "/people/([a-z]+)",
//!     handler_fn(|_req, w| {
//!         let name = vars_of(w)["1"].clone();
//!         w.write(format!("You are looking for {name}").as_bytes());
//!     }),
//! )])
//! .unwrap();
//!
//! let req: Request = axum::http::Request::builder().uri("/people/peter").body(Default::default()).unwrap();
//! let mut rec = Recorder::new();
//! switch.serve(&req, &mut rec);
//! assert_eq!(rec.body(), b"You are looking for peter");
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use error::RouterError;
pub use http::{
    handler_fn, vars_of, AugmentedWriter, BoxHandler, CheckResponseWriter, Handler, HttpServer, Recorder,
    Request, ResponseWriter, Vars, VarsResponseWriter,
};
pub use lifecycle::Shutdown;
pub use routing::{Dispatch, PathRule, RegexSwitch};
