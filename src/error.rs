//! Error types for switch construction.
//!
//! Request-time outcomes (no match, handler declined) are not errors and
//! never surface here. See [`crate::routing::Dispatch`].

use thiserror::Error;

/// Error raised while building a [`crate::routing::RegexSwitch`].
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route pattern is not a valid regular expression.
    #[error("invalid route pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A valid pattern could not be compiled for longest-match search.
    #[error("failed to compile route pattern `{pattern}`: {source}")]
    Compile {
        pattern: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RouterError {
    pub(crate) fn engine(
        pattern: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Compile {
            pattern: pattern.to_string(),
            source: Box::new(source),
        }
    }
}
