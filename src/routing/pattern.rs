//! Compiled route patterns with leftmost-longest matching.
//!
//! # Responsibilities
//! - Compile a pattern string once, at switch construction
//! - Find the leftmost-longest match of the pattern in a path
//! - Expose the capture groups of that match
//!
//! # Design Decisions
//! - The `regex` crate is leftmost-first: `a|ab` against `ab` yields `a`.
//!   Precedence ranking needs the longest span, so matching runs in three
//!   linear passes:
//!   1. a leftmost-first search locates the leftmost start
//!   2. a lazy DFA with `MatchKind::All` runs anchored at that start and
//!      reports the longest end
//!   3. a capture search pinned to `[start, end]` assigns the groups
//! - Every pass sees the whole path, so `^`, `$` and `\b` are evaluated at
//!   their real positions. The capture pass stops at `end`; it only decides
//!   group boundaries, never the span.
//! - Programs are built from the parsed syntax tree, never by splicing
//!   pattern text, so flags such as `(?x)` behave as written.
//! - The lazy DFA gives up on non-ASCII input when a pattern uses a Unicode
//!   word boundary; such matches keep their leftmost-first span.

use std::fmt;
use std::ops::Range;

use regex::Regex;
use regex_automata::hybrid::dfa::{Cache, DFA};
use regex_automata::nfa::thompson;
use regex_automata::util::pool::Pool;
use regex_automata::{meta, Anchored, Input, MatchKind};
use regex_syntax::hir::{Hir, Look};

use crate::error::RouterError;

type CacheFn = Box<dyn Fn() -> Cache + Send + Sync>;

/// A route pattern compiled for leftmost-longest search.
pub struct Pattern {
    /// Unanchored leftmost-first program, used to locate the match start.
    search: Regex,
    /// Lazy DFA reporting the longest end of an anchored match.
    longest: DFA,
    caches: Pool<Cache, CacheFn>,
    /// The pattern followed by an end-of-text assertion, for group extraction.
    exact: meta::Regex,
}

/// The leftmost-longest match of a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'h> {
    haystack: &'h str,
    span: Range<usize>,
    groups: Vec<Option<Range<usize>>>,
}

impl Pattern {
    /// Compile a pattern.
    pub fn new(source: &str) -> Result<Self, RouterError> {
        let search = Regex::new(source).map_err(|e| RouterError::InvalidPattern {
            pattern: source.to_string(),
            source: e,
        })?;

        let hir = regex_syntax::parse(source).map_err(|e| RouterError::engine(source, e))?;

        let nfa = thompson::Compiler::new()
            .build_from_hir(&hir)
            .map_err(|e| RouterError::engine(source, e))?;
        let longest = DFA::builder()
            .configure(
                DFA::config()
                    .match_kind(MatchKind::All)
                    .unicode_word_boundary(true),
            )
            .build_from_nfa(nfa)
            .map_err(|e| RouterError::engine(source, e))?;

        let exact = meta::Builder::new()
            .build_from_hir(&Hir::concat(vec![hir, Hir::look(Look::End)]))
            .map_err(|e| RouterError::engine(source, e))?;

        let dfa = longest.clone();
        let create: CacheFn = Box::new(move || dfa.create_cache());
        let caches = Pool::new(create);

        Ok(Self {
            search,
            longest,
            caches,
            exact,
        })
    }

    /// The pattern text as supplied by the caller.
    pub fn as_str(&self) -> &str {
        self.search.as_str()
    }

    /// Find the leftmost-longest match in `haystack`.
    pub fn captures<'h>(&self, haystack: &'h str) -> Option<PatternMatch<'h>> {
        let first = self.search.find(haystack)?;
        let start = first.start();
        let end = self
            .longest_end(haystack, start)
            .filter(|&end| end >= first.end() && haystack.is_char_boundary(end))
            .unwrap_or(first.end());

        if let Some(groups) = self.groups(haystack, start, end) {
            return Some(PatternMatch {
                haystack,
                span: start..end,
                groups,
            });
        }

        // The span is a real match, but the group pass could not reproduce it
        // on the truncated input (e.g. `\B` right at the end).
        let caps = self.search.captures_at(haystack, start)?;
        let span = caps.get(0).map_or(start..first.end(), |m| m.range());
        Some(PatternMatch {
            haystack,
            span,
            groups: caps.iter().skip(1).map(|g| g.map(|m| m.range())).collect(),
        })
    }

    fn longest_end(&self, haystack: &str, start: usize) -> Option<usize> {
        let input = Input::new(haystack).range(start..).anchored(Anchored::Yes);
        let mut cache = self.caches.get();
        match self.longest.try_search_fwd(&mut cache, &input) {
            Ok(found) => found.map(|m| m.offset()),
            Err(e) => {
                tracing::trace!(pattern = %self.as_str(), error = %e, "Longest-match search gave up");
                None
            }
        }
    }

    fn groups(&self, haystack: &str, start: usize, end: usize) -> Option<Vec<Option<Range<usize>>>> {
        let input = Input::new(&haystack[..end]).range(start..).anchored(Anchored::Yes);
        let mut caps = self.exact.create_captures();
        self.exact.search_captures(&input, &mut caps);
        if !caps.is_match() {
            return None;
        }
        Some(
            (1..caps.group_len())
                .map(|i| caps.get_group(i).map(|span| span.range()))
                .collect(),
        )
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl<'h> PatternMatch<'h> {
    /// The matched text.
    pub fn as_str(&self) -> &'h str {
        &self.haystack[self.span.clone()]
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Text of each capture group in order, `None` where a group did not
    /// participate.
    pub fn groups(&self) -> impl Iterator<Item = Option<&'h str>> + '_ {
        self.groups
            .iter()
            .map(|g| g.as_ref().map(|r| &self.haystack[r.clone()]))
    }
}
