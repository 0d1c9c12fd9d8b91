//! Built-in handlers for configured routes.
//!
//! # Responsibilities
//! - Turn `HandlerConfig` entries into handler values
//! - Expand `$1` / `${1}` references against the captured variables
//! - Build a `RegexSwitch` from the configured route list

use std::sync::Arc;

use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};

use crate::config::{ConfigError, HandlerConfig, RouteConfig};
use crate::config::validation::ValidationError;
use crate::http::handler::{BoxHandler, Handler, Request};
use crate::http::writer::{vars_of, ResponseWriter, Vars};
use crate::routing::RegexSwitch;

/// Text body, optionally templated.
#[derive(Debug, Clone)]
pub struct TextHandler {
    status: StatusCode,
    body: String,
    content_type: HeaderValue,
}

/// Answers with the captured variables as a JSON object.
#[derive(Debug, Clone)]
pub struct JsonHandler {
    status: StatusCode,
}

/// Redirects to a templated location.
#[derive(Debug, Clone)]
pub struct RedirectHandler {
    status: StatusCode,
    location: String,
}

/// Writes a status code and nothing else.
#[derive(Debug, Clone)]
pub struct StatusHandler {
    status: StatusCode,
}

/// Never writes, so the switch moves on to the next matching route.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineHandler;

impl Handler for TextHandler {
    fn serve(&self, _req: &Request, w: &mut dyn ResponseWriter) {
        let body = expand(&self.body, &vars_of(w));
        w.headers_mut().insert(CONTENT_TYPE, self.content_type.clone());
        w.write_status(self.status);
        w.write(body.as_bytes());
    }
}

impl Handler for JsonHandler {
    fn serve(&self, _req: &Request, w: &mut dyn ResponseWriter) {
        let body = match serde_json::to_vec(&vars_of(w)) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode vars");
                w.write_status(StatusCode::INTERNAL_SERVER_ERROR);
                return;
            }
        };
        w.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        w.write_status(self.status);
        w.write(&body);
    }
}

impl Handler for RedirectHandler {
    fn serve(&self, _req: &Request, w: &mut dyn ResponseWriter) {
        let location = expand(&self.location, &vars_of(w));
        match HeaderValue::from_str(&location) {
            Ok(value) => {
                w.headers_mut().insert(LOCATION, value);
                w.write_status(self.status);
            }
            Err(_) => {
                tracing::warn!(location = %location, "Expanded redirect location is not a valid header");
                w.write_status(StatusCode::BAD_REQUEST);
            }
        }
    }
}

impl Handler for StatusHandler {
    fn serve(&self, _req: &Request, w: &mut dyn ResponseWriter) {
        w.write_status(self.status);
    }
}

impl Handler for DeclineHandler {
    fn serve(&self, _req: &Request, _w: &mut dyn ResponseWriter) {}
}

/// Create the handler described by `config`.
pub fn from_config(config: &HandlerConfig) -> Result<BoxHandler, ConfigError> {
    let handler: BoxHandler = match config {
        HandlerConfig::Text {
            status,
            body,
            content_type,
        } => Arc::new(TextHandler {
            status: status_code(*status)?,
            body: body.clone(),
            content_type: HeaderValue::from_str(content_type).map_err(|_| {
                invalid("handler.content_type", format!("`{content_type}` is not a valid header value"))
            })?,
        }),
        HandlerConfig::Json { status } => Arc::new(JsonHandler {
            status: status_code(*status)?,
        }),
        HandlerConfig::Redirect { location, status } => Arc::new(RedirectHandler {
            status: status_code(*status)?,
            location: location.clone(),
        }),
        HandlerConfig::Status { status } => Arc::new(StatusHandler {
            status: status_code(*status)?,
        }),
        HandlerConfig::Decline => Arc::new(DeclineHandler),
    };
    Ok(handler)
}

/// Compile configured routes into a switch.
pub fn build_switch(routes: &[RouteConfig]) -> Result<RegexSwitch, ConfigError> {
    let handlers = routes
        .iter()
        .map(|route| Ok((route.pattern.clone(), from_config(&route.handler)?)))
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok(RegexSwitch::build(handlers)?)
}

/// Substitute `$N` and `${N}` with the matching variable; unknown names expand
/// to the empty string and `$$` is a literal `$`.
pub fn expand(template: &str, vars: &Vars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];

        if let Some(tail) = rest.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('{') {
            match tail.find('}') {
                Some(end) => {
                    out.push_str(vars.get(&tail[..end]).map_or("", String::as_str));
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push_str("${");
                    rest = tail;
                }
            }
        } else {
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            if end == 0 {
                out.push('$');
            } else {
                out.push_str(vars.get(&rest[..end]).map_or("", String::as_str));
            }
            rest = &rest[end..];
        }
    }

    out.push_str(rest);
    out
}

fn status_code(status: u16) -> Result<StatusCode, ConfigError> {
    StatusCode::from_u16(status)
        .map_err(|_| invalid("handler.status", format!("{status} is not a valid status code")))
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::Validation(vec![ValidationError {
        field: field.to_string(),
        message,
    }])
}
