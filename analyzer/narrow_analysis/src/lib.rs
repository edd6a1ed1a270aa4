//! Ownership-narrowing analysis.
//!
//! Decides, per candidate entity (a function's returned local, a private
//! data member, or a function parameter), whether shared reference-counted
//! ownership can be narrowed to exclusive ownership without changing
//! program behavior, and when it can, composes the text edits performing
//! the rewrite.
//!
//! # Architecture
//!
//! - [`policy`]: the per-role escape whitelist tables. One classifier,
//!   parameterized by policy; role differences live in the checks.
//! - [`escape`]: the classifier; enumerates usages of a candidate in its
//!   scope and reports every usage it cannot certify safe.
//! - [`rewrite`]: ordered rule sets with first-applicable semantics and
//!   recursive descendant sub-rewriting.
//! - [`checks`]: the three candidate selectors wiring patterns, the
//!   classifier, and rule sets together.
//! - [`pipeline`]: parallel driving over top-level declarations with a
//!   single-threaded edit merge.
//!
//! The analysis is deliberately conservative and unsound-by-design in the
//! safe direction: with no interprocedural visibility, any usage that
//! cannot be locally certified is an escape. Missed narrowings are
//! accepted; behavior-changing rewrites are not.

pub mod checks;
mod config;
pub mod escape;
pub mod pipeline;
mod policy;
pub mod rewrite;

pub use config::{NarrowConfig, RewriteNames};
pub use escape::{classify, EscapePoint, EscapeReason};
pub use pipeline::{analyze, analyze_with_config};
pub use policy::EscapePolicy;
pub use rewrite::{EditTemplate, RangeSelector, RewriteRule, RuleSet, TextTemplate};

/// Capture name under which every check binds its candidate declaration.
pub const CANDIDATE: narrow_match::Capture = "candidate";
