//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, limits and status codes
//! - Compile every route pattern and detect duplicates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use axum::http::StatusCode;

use crate::config::schema::{HandlerConfig, RouterConfig};
use crate::routing::Pattern;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `routes[2].pattern`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address", config.listener.bind_address),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }
    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::new("limits.request_timeout_secs", "must be greater than 0"));
    }

    if config.routes.is_empty() {
        errors.push(ValidationError::new("routes", "at least one route is required"));
    }

    let mut seen = HashSet::new();
    for (i, route) in config.routes.iter().enumerate() {
        let field = format!("routes[{i}]");

        if route.pattern.is_empty() {
            errors.push(ValidationError::new(format!("{field}.pattern"), "must not be empty"));
        } else if let Err(e) = Pattern::new(&route.pattern) {
            errors.push(ValidationError::new(format!("{field}.pattern"), e.to_string()));
        }

        if !seen.insert(route.pattern.as_str()) {
            errors.push(ValidationError::new(
                format!("{field}.pattern"),
                format!("duplicate pattern `{}`", route.pattern),
            ));
        }

        if let Some(status) = route.handler.status() {
            if StatusCode::from_u16(status).is_err() {
                errors.push(ValidationError::new(
                    format!("{field}.handler.status"),
                    format!("{status} is not a valid status code"),
                ));
            }
        }

        if let HandlerConfig::Redirect { status, .. } = route.handler {
            if !(300..400).contains(&status) {
                errors.push(ValidationError::new(
                    format!("{field}.handler.status"),
                    format!("redirect status must be 3xx, got {status}"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
