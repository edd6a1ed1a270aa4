//! The escape classifier.
//!
//! Enumerates usages of a candidate declaration within a scope and
//! reports every usage the policy cannot certify safe. A candidate is
//! safe iff the report is empty. Classification never errors: a usage
//! that cannot be resolved (dangling declaration handle, unknown callee)
//! fails certification and surfaces as an escape.

use narrow_ir::{NodeId, OpKind, Ownership, SyntaxTree};
use narrow_match::{
    all_of, any_of, callee_in, equals_bound_decl, factory_of, has_any_argument, has_initializer,
    has_lhs, has_operand, has_return_value, has_rhs, is_call, is_member_call, is_return, is_var,
    match_with, method_in, on_receiver, operator_in, ref_to, unless, Bindings, Matcher,
};
use tracing::debug;

use crate::{EscapePolicy, CANDIDATE};

/// Why a usage could not be certified safe.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EscapeReason {
    /// Passed to a free function outside the trusted whitelist.
    FreeFunctionArgument,
    /// Passed into a fresh ownership-managed construction.
    FactoryArgument,
    /// Used in a member call outside the ownership-neutral whitelist.
    MemberCall,
    /// Used with an operator the policy does not allow, or assigned
    /// from anything but a fresh shared factory construction.
    OperatorUse,
    /// Copied into another declaration's initializer (a new alias).
    AliasInitialization,
    /// Returned from the surrounding scope.
    Returned,
}

/// A usage that blocks narrowing, with the rule that rejected it.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EscapePoint {
    pub node: NodeId,
    pub reason: EscapeReason,
}

/// A reference to the declaration bound as the current candidate.
fn ref_to_candidate() -> Matcher {
    ref_to(equals_bound_decl(CANDIDATE))
}

/// One `(reason, matcher)` pair per usage category in the policy table.
pub fn escape_matchers(policy: &EscapePolicy) -> Vec<(EscapeReason, Matcher)> {
    let safe_callees: Vec<&str> = policy.safe_free_callees.iter().map(String::as_str).collect();
    let safe_members: Vec<&str> = policy.safe_members.iter().map(String::as_str).collect();

    let free_call = all_of(vec![
        is_call(),
        has_any_argument(ref_to_candidate()),
        unless(callee_in(&safe_callees)),
    ]);

    let factory_argument = all_of(vec![
        any_of(vec![
            factory_of(Ownership::Shared),
            factory_of(Ownership::Exclusive),
        ]),
        has_any_argument(ref_to_candidate()),
    ]);

    let member_call = all_of(vec![
        is_member_call(),
        any_of(vec![
            on_receiver(ref_to_candidate()),
            has_any_argument(ref_to_candidate()),
        ]),
        unless(all_of(vec![
            on_receiver(ref_to_candidate()),
            method_in(&safe_members),
        ])),
    ]);

    let mut safe_operator_uses = vec![operator_in(&policy.safe_operators)];
    if policy.factory_reassignment_is_safe {
        safe_operator_uses.push(all_of(vec![
            operator_in(&[OpKind::Assign]),
            has_lhs(ref_to_candidate()),
            has_rhs(factory_of(Ownership::Shared)),
        ]));
    }
    let operator_use = all_of(vec![
        operator_in(&[OpKind::Assign, OpKind::Deref, OpKind::Arrow, OpKind::Index]),
        has_operand(ref_to_candidate()),
        unless(any_of(safe_operator_uses)),
    ]);

    // A copy into another declaration is a new owner; exclusive ownership
    // cannot be duplicated.
    let alias_initialization = all_of(vec![is_var(), has_initializer(ref_to_candidate())]);

    let mut matchers = vec![
        (EscapeReason::FreeFunctionArgument, free_call),
        (EscapeReason::FactoryArgument, factory_argument),
        (EscapeReason::MemberCall, member_call),
        (EscapeReason::OperatorUse, operator_use),
        (EscapeReason::AliasInitialization, alias_initialization),
    ];
    if policy.return_is_escape {
        matchers.push((
            EscapeReason::Returned,
            all_of(vec![is_return(), has_return_value(ref_to_candidate())]),
        ));
    }
    matchers
}

/// Collect every escape point for `candidate` within `scope`.
///
/// `candidate` is the declaring node; `scope` is the subtree reachable
/// from its declaration (function body, or one method of the enclosing
/// record for data members; callers union the per-method results).
pub fn classify(
    tree: &SyntaxTree,
    scope: NodeId,
    candidate: NodeId,
    policy: &EscapePolicy,
) -> Vec<EscapePoint> {
    let mut seed = Bindings::new();
    seed.insert(CANDIDATE, candidate);

    let matchers = escape_matchers(policy);
    let mut points = Vec::new();
    for node in tree.descendants(scope) {
        for (reason, matcher) in &matchers {
            if !match_with(tree, matcher, node, &seed).is_empty() {
                points.push(EscapePoint {
                    node,
                    reason: *reason,
                });
                break;
            }
        }
    }
    if !points.is_empty() {
        debug!(
            candidate = ?tree.span(candidate),
            escapes = points.len(),
            "candidate rejected"
        );
    }
    points
}

#[cfg(test)]
mod tests;
