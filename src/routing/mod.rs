//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → switch.rs (evaluate every rule, rank by matched span)
//!     → rule.rs (pattern match, capture groups)
//!     → AugmentedWriter (vars + write tracking)
//!     → handler; declined → next rule; exhausted → 404
//!
//! Switch Construction (at startup or reload):
//!     pattern → handler mapping
//!     → pattern.rs (compile, leftmost-longest)
//!     → Freeze as immutable RegexSwitch
//! ```
//!
//! # Design Decisions
//! - Rules compiled once, immutable at runtime
//! - Longest matched span wins, independent of registration order
//! - A handler that writes nothing passes the request on

pub mod pattern;
pub mod rule;
pub mod switch;

pub use pattern::{Pattern, PatternMatch};
pub use rule::{PathRule, RuleMatch};
pub use switch::{not_found, Attempt, Dispatch, RegexSwitch};
