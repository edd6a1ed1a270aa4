//! Per-role escape policy tables.
//!
//! Conservative by construction: every table is an explicit enumerated
//! whitelist, so "safe" is something you can read off, and everything not
//! listed is an escape.

use narrow_ir::OpKind;

/// What counts as a safe usage for one candidate role.
#[derive(Clone, Debug)]
pub struct EscapePolicy {
    /// Free functions the candidate may be passed to. Empty means
    /// default-deny.
    pub safe_free_callees: Vec<String>,
    /// Ownership-neutral members callable on the candidate as receiver.
    pub safe_members: Vec<String>,
    /// Operators usable on the candidate unconditionally.
    pub safe_operators: Vec<OpKind>,
    /// Whether `candidate = shared_factory(...)` is a safe same-identity
    /// re-initialization. Sound because reference-counted semantics keep
    /// the prior value's lifetime independent; any earlier escape of that
    /// prior value is caught separately by the tables above.
    pub factory_reassignment_is_safe: bool,
    /// Whether returning the candidate from the surrounding scope is an
    /// escape (true for data members: the member leaves the class).
    pub return_is_escape: bool,
}

impl EscapePolicy {
    /// Policy for a function's returned shared-ownership local.
    /// Returning the local is the analyzed sink, not an escape.
    pub fn owning_local() -> Self {
        EscapePolicy {
            safe_free_callees: Vec::new(),
            safe_members: strings(&["use_count", "unique", "owner_before", "swap"]),
            safe_operators: vec![OpKind::Deref, OpKind::Arrow, OpKind::Index],
            factory_reassignment_is_safe: true,
            return_is_escape: false,
        }
    }

    /// Policy for a private data member, scoped over every method of the
    /// enclosing record.
    pub fn data_member() -> Self {
        EscapePolicy {
            return_is_escape: true,
            ..EscapePolicy::owning_local()
        }
    }

    /// Policy for a function parameter. Only the raw-pointer accessor is
    /// whitelisted (the rewrite erases those calls); reassignment and
    /// returning are escapes because the caller may hold aliases.
    pub fn parameter() -> Self {
        EscapePolicy {
            safe_free_callees: Vec::new(),
            safe_members: strings(&["get"]),
            safe_operators: vec![OpKind::Deref, OpKind::Arrow, OpKind::Index],
            factory_reassignment_is_safe: false,
            return_is_escape: true,
        }
    }

    /// Extend the free-callee whitelist with host-trusted functions.
    #[must_use]
    pub fn with_trusted_callees(mut self, callees: &[String]) -> Self {
        self.safe_free_callees
            .extend(callees.iter().cloned());
        self
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}
