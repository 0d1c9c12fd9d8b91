//! Route selection and dispatch.
//!
//! # Responsibilities
//! - Compile the caller's pattern → handler mapping into rules
//! - Rank every matching rule for a path by specificity
//! - Dispatch to the best rule, falling back while handlers decline
//! - Answer `404 Not Found` when no rule is left
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Specificity is the length of the matched span, longest first
//! - Equal spans: the longer pattern text ranks first (`/some/.+` over `/.+`);
//!   beyond that the order is unspecified
//! - Rules live in a `HashMap`; ranking never depends on its iteration order
//! - A handler that writes nothing has declined the request

use std::collections::HashMap;

use axum::http::StatusCode;

use crate::error::RouterError;
use crate::http::augmented::AugmentedWriter;
use crate::http::handler::{BoxHandler, Request};
use crate::http::writer::{CheckResponseWriter, ResponseWriter};
use crate::routing::rule::{PathRule, RuleMatch};

/// Regular-expression request router.
#[derive(Debug, Default)]
pub struct RegexSwitch {
    rules: HashMap<String, PathRule>,
}

/// Result of offering a request to one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The handler wrote a response.
    Handled,
    /// The handler wrote nothing.
    Declined,
}

/// How a request left the switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<'s> {
    /// A handler wrote the response.
    Handled {
        /// Pattern of the rule whose handler answered.
        pattern: &'s str,
        /// Position of that rule in the precedence order, 0 for the best match.
        rank: usize,
    },
    /// The default `404 Not Found` was written.
    NotFound {
        /// Number of matching rules whose handlers declined.
        declined: usize,
    },
}

impl RegexSwitch {
    /// Build a switch from a mapping of patterns to handlers.
    ///
    /// Fails on the first pattern that does not compile; no partial switch is
    /// returned.
    pub fn build<I, K>(patterns: I) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = (K, BoxHandler)>,
        K: Into<String>,
    {
        let mut rules = HashMap::new();
        for (pattern, handler) in patterns {
            let pattern = pattern.into();
            let rule = PathRule::new(&pattern, handler)?;
            rules.insert(pattern, rule);
        }
        Ok(Self { rules })
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pattern texts of all rules, in no particular order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Every rule matching `path`, most specific first.
    pub fn rank(&self, path: &str) -> Vec<RuleMatch<'_>> {
        let mut matches: Vec<_> = self
            .rules
            .values()
            .filter_map(|rule| rule.matches(path))
            .collect();
        matches.sort_by(|a, b| {
            b.span_len()
                .cmp(&a.span_len())
                .then_with(|| b.rule().pattern().len().cmp(&a.rule().pattern().len()))
        });
        matches
    }

    /// Route `req` and write the response into `w`.
    pub fn serve(&self, req: &Request, w: &mut dyn ResponseWriter) -> Dispatch<'_> {
        let path = req.uri().path();
        let ranked = self.rank(path);

        for (rank, candidate) in ranked.iter().enumerate() {
            match Self::attempt(candidate, req, w) {
                Attempt::Handled => {
                    return Dispatch::Handled {
                        pattern: candidate.rule().pattern(),
                        rank,
                    };
                }
                Attempt::Declined => {
                    tracing::trace!(
                        path = %path,
                        pattern = %candidate.rule().pattern(),
                        rank,
                        "Handler declined, trying next rule"
                    );
                }
            }
        }

        not_found(w);
        Dispatch::NotFound {
            declined: ranked.len(),
        }
    }

    fn attempt(candidate: &RuleMatch<'_>, req: &Request, w: &mut dyn ResponseWriter) -> Attempt {
        let mut writer = AugmentedWriter::new(w, candidate.vars());
        candidate.rule().dispatch(req, &mut writer);

        if writer.has_written() {
            Attempt::Handled
        } else {
            Attempt::Declined
        }
    }
}

/// The default response for unrouted requests: `404`, empty body.
pub fn not_found(w: &mut dyn ResponseWriter) {
    w.write_status(StatusCode::NOT_FOUND);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler::handler_fn;
    use crate::http::recorder::Recorder;
    use crate::http::writer::vars_of;
    use axum::body::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn get(path: &str) -> Request {
        axum::http::Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    fn tag(name: &'static str) -> BoxHandler {
        handler_fn(move |_req, w| {
            w.headers_mut().insert("handler", name.parse().unwrap());
        })
    }

    fn decline() -> BoxHandler {
        handler_fn(|_req, _w| {})
    }

    #[test]
    fn test_longest_match_wins_in_either_order() {
        let orders = [
            vec![("/.+", tag("a")), ("/some/.+", tag("b"))],
            vec![("/some/.+", tag("b")), ("/.+", tag("a"))],
        ];
        for routes in orders {
            let switch = RegexSwitch::build(routes).unwrap();
            let mut rec = Recorder::new();
            let outcome = switch.serve(&get("/some/thing/bla"), &mut rec);
            assert_eq!(rec.headers()["handler"], "b");
            assert_eq!(
                outcome,
                Dispatch::Handled {
                    pattern: "/some/.+",
                    rank: 0
                }
            );
        }
    }

    #[test]
    fn test_vars_reach_handler() {
        let switch = RegexSwitch::build([(
            "/([a-z]+)/?",
            handler_fn(|_req, w| {
                let path = vars_of(w)["1"].clone();
                w.headers_mut().insert("x-path", path.parse().unwrap());
            }),
        )])
        .unwrap();

        let mut rec = Recorder::new();
        switch.serve(&get("/testpath/"), &mut rec);
        assert_eq!(rec.headers()["x-path"], "testpath");

        let mut rec = Recorder::new();
        let outcome = switch.serve(&get("/!!!/"), &mut rec);
        assert_eq!(rec.status(), StatusCode::NOT_FOUND);
        assert!(rec.body().is_empty());
        assert_eq!(outcome, Dispatch::NotFound { declined: 0 });
    }

    #[test]
    fn test_writer_carries_both_capabilities() {
        let switch = RegexSwitch::build([(
            "/.*",
            handler_fn(|_req, w| {
                let vars = w.as_vars().is_some();
                let check = w.as_check().is_some();
                w.headers_mut()
                    .insert("was-vrw", vars.to_string().parse().unwrap());
                w.headers_mut()
                    .insert("was-crw", check.to_string().parse().unwrap());
            }),
        )])
        .unwrap();

        let mut rec = Recorder::new();
        switch.serve(&get("/"), &mut rec);
        assert_eq!(rec.headers()["was-vrw"], "true");
        assert_eq!(rec.headers()["was-crw"], "true");
    }

    #[test]
    fn test_sole_decline_is_not_found() {
        let switch = RegexSwitch::build([("^/x", decline())]).unwrap();
        let mut rec = Recorder::new();
        let outcome = switch.serve(&get("/x"), &mut rec);
        assert_eq!(rec.status(), StatusCode::NOT_FOUND);
        assert_eq!(outcome, Dispatch::NotFound { declined: 1 });
    }

    #[test]
    fn test_decline_falls_back_with_fresh_vars() {
        let switch = RegexSwitch::build([
            // Longer span, ranked first; declines.
            ("^/(users)/([a-z]+)", decline()),
            (
                "^/(u[a-z]+)",
                handler_fn(|_req, w| {
                    let vars = vars_of(w);
                    w.write(format!("{}:{}", vars.len(), vars["1"]).as_bytes());
                }),
            ),
        ])
        .unwrap();

        let mut rec = Recorder::new();
        let outcome = switch.serve(&get("/users/peter"), &mut rec);
        assert_eq!(rec.status(), StatusCode::OK);
        assert_eq!(rec.body(), b"1:users");
        assert_eq!(
            outcome,
            Dispatch::Handled {
                pattern: "^/(u[a-z]+)",
                rank: 1
            }
        );
    }

    #[test]
    fn test_every_declining_rule_is_tried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = |calls: Arc<AtomicUsize>| {
            handler_fn(move |_req, _w| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        let switch = RegexSwitch::build([
            ("/a", counting(calls.clone())),
            ("/a/b", counting(calls.clone())),
            ("/a/b/c", counting(calls.clone())),
        ])
        .unwrap();

        let mut rec = Recorder::new();
        let outcome = switch.serve(&get("/a/b/c"), &mut rec);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome, Dispatch::NotFound { declined: 3 });
    }

    #[test]
    fn test_rank_orders_by_span() {
        let switch = RegexSwitch::build([
            ("/", decline()),
            ("/some", decline()),
            ("/some/thing", decline()),
        ])
        .unwrap();
        let ranked: Vec<_> = switch
            .rank("/some/thing/bla")
            .iter()
            .map(|m| m.rule().pattern())
            .collect();
        assert_eq!(ranked, ["/some/thing", "/some", "/"]);
    }

    #[test]
    fn test_equal_spans_prefer_longer_pattern() {
        let switch = RegexSwitch::build([("/.+", decline()), ("/some/.+", decline())]).unwrap();
        let ranked = switch.rank("/some/thing/bla");
        assert_eq!(ranked[0].span_len(), ranked[1].span_len());
        assert_eq!(ranked[0].rule().pattern(), "/some/.+");
    }

    #[test]
    fn test_invalid_pattern_fails_build() {
        let err = RegexSwitch::build([("/ok", decline()), ("/(bad", decline())]).unwrap_err();
        assert!(err.to_string().contains("/(bad"));
    }

    #[test]
    fn test_empty_switch_is_not_found() {
        let switch = RegexSwitch::default();
        assert!(switch.is_empty());
        let mut rec = Recorder::new();
        assert_eq!(
            switch.serve(&get("/anything"), &mut rec),
            Dispatch::NotFound { declined: 0 }
        );
        assert_eq!(rec.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_switch_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RegexSwitch>();
    }
}
