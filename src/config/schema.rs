//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request limits applied by the HTTP layer.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions. Order is irrelevant to precedence.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Limits enforced before a request reaches the switch.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum buffered request body in bytes.
    pub max_body_bytes: usize,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A route: a path pattern and the handler it dispatches to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Regular expression matched against the request path. Not anchored
    /// implicitly; use `^` / `$` for exact matching.
    pub pattern: String,

    /// Handler invoked when this route wins.
    pub handler: HandlerConfig,
}

/// Built-in handlers available to configured routes.
///
/// Templates may reference captured groups as `$1` or `${1}`; `$$` is a
/// literal dollar sign.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerConfig {
    /// Fixed or templated text body.
    Text {
        #[serde(default = "default_status")]
        status: u16,
        body: String,
        #[serde(default = "default_content_type")]
        content_type: String,
    },

    /// The captured variables as a JSON object.
    Json {
        #[serde(default = "default_status")]
        status: u16,
    },

    /// Redirect to a templated location.
    Redirect {
        location: String,
        #[serde(default = "default_redirect_status")]
        status: u16,
    },

    /// Bare status code, empty body.
    Status { status: u16 },

    /// Write nothing, passing the request to the next matching route.
    Decline,
}

impl HandlerConfig {
    /// Status code this handler answers with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            HandlerConfig::Text { status, .. }
            | HandlerConfig::Json { status }
            | HandlerConfig::Redirect { status, .. }
            | HandlerConfig::Status { status } => Some(*status),
            HandlerConfig::Decline => None,
        }
    }
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "text/plain; charset=utf-8".to_string()
}

fn default_redirect_status() -> u16 {
    302
}
