//! A single route: one pattern bound to one handler.
//!
//! # Responsibilities
//! - Test a path against the route pattern
//! - Extract capture groups for the handler
//! - Invoke the bound handler
//!
//! # Design Decisions
//! - Stateless: `matches` is a pure function of the path
//! - Groups that did not participate in the match are reported as `""`

use std::fmt;

use crate::error::RouterError;
use crate::http::handler::{BoxHandler, Request};
use crate::http::writer::{ResponseWriter, Vars};
use crate::routing::pattern::Pattern;

/// A compiled pattern and the handler it routes to.
pub struct PathRule {
    pattern: Pattern,
    handler: BoxHandler,
}

/// A successful match of a [`PathRule`] against a path.
#[derive(Debug, Clone)]
pub struct RuleMatch<'r> {
    rule: &'r PathRule,
    submatches: Vec<String>,
    span_len: usize,
}

impl PathRule {
    /// Compile `pattern` and bind it to `handler`.
    pub fn new(pattern: &str, handler: BoxHandler) -> Result<Self, RouterError> {
        Ok(Self {
            pattern: Pattern::new(pattern)?,
            handler,
        })
    }

    /// The pattern text this rule was built from.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Match `path`, returning the captured groups on success.
    pub fn matches(&self, path: &str) -> Option<RuleMatch<'_>> {
        let found = self.pattern.captures(path)?;
        let span_len = found.span().len();
        let submatches = found
            .groups()
            .map(|g| g.unwrap_or_default().to_string())
            .collect();

        Some(RuleMatch {
            rule: self,
            submatches,
            span_len,
        })
    }

    /// Invoke the bound handler.
    pub fn dispatch(&self, req: &Request, w: &mut dyn ResponseWriter) {
        self.handler.serve(req, w);
    }
}

impl fmt::Debug for PathRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRule")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

impl<'r> RuleMatch<'r> {
    pub fn rule(&self) -> &'r PathRule {
        self.rule
    }

    /// Captured groups 1..N, in group order.
    pub fn submatches(&self) -> &[String] {
        &self.submatches
    }

    /// Length in bytes of the whole matched span.
    pub fn span_len(&self) -> usize {
        self.span_len
    }

    /// Submatches keyed by their 1-based group index.
    pub fn vars(&self) -> Vars {
        self.submatches
            .iter()
            .enumerate()
            .map(|(i, s)| ((i + 1).to_string(), s.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler::handler_fn;
    use crate::http::recorder::Recorder;
    use axum::body::Bytes;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn noop() -> BoxHandler {
        handler_fn(|_req, _w| {})
    }

    #[test]
    fn test_match_and_dispatch() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let rule = PathRule::new(
            "^/people/([^/]+)",
            handler_fn(move |_req, _w| flag.store(true, Ordering::SeqCst)),
        )
        .unwrap();

        let m = rule.matches("/people/peter").expect("rule should match");
        assert_eq!(m.submatches(), ["peter"]);
        assert_eq!(m.span_len(), "/people/peter".len());

        let req = Request::new(Bytes::new());
        rule.dispatch(&req, &mut Recorder::new());
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_no_match() {
        let rule = PathRule::new("^/people/([^/]+)", noop()).unwrap();
        assert!(rule.matches("/animals/rex").is_none());
    }

    #[test]
    fn test_optional_group_is_empty() {
        let rule = PathRule::new("^/a(/b)?(/c)", noop()).unwrap();
        let m = rule.matches("/a/c").unwrap();
        assert_eq!(m.submatches(), ["", "/c"]);
    }

    #[test]
    fn test_vars_are_one_based() {
        let rule = PathRule::new("/([a-z]+)/([0-9]+)", noop()).unwrap();
        let vars = rule.matches("/item/42").unwrap().vars();
        assert_eq!(vars["1"], "item");
        assert_eq!(vars["2"], "42");
        assert!(!vars.contains_key("0"));
    }

    #[test]
    fn test_longest_alternative_is_captured() {
        let rule = PathRule::new("^/(a|ab)", noop()).unwrap();
        let m = rule.matches("/ab").unwrap();
        assert_eq!(m.submatches(), ["ab"]);
        assert_eq!(m.span_len(), 3);
    }

    #[test]
    fn test_long_path_match_is_fast() {
        let rule = PathRule::new(r"^/files/.*\.txt", noop()).unwrap();
        let path = format!("/files/a.txt/{}", "b".repeat(60_000));

        let started = std::time::Instant::now();
        let m = rule.matches(&path).unwrap();
        assert_eq!(m.span_len(), 12);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_verbose_pattern_builds() {
        let rule = PathRule::new("(?x) ^/a  # a comment", noop()).unwrap();
        assert_eq!(rule.matches("/a").unwrap().span_len(), 2);
    }

    #[test]
    fn test_span_of_unanchored_match() {
        let rule = PathRule::new("thing", noop()).unwrap();
        assert_eq!(rule.matches("/some/thing/bla").unwrap().span_len(), 5);
    }
}
