//! Non-owning parameter check.
//!
//! A shared-ownership parameter the function only ever reads through
//! qualifies for demotion to a raw pointer. The whitelist is narrower
//! than for owned locals: the raw-pointer accessor is the only safe
//! member (the rewrite erases those calls), and reassignment or
//! returning is an escape because the caller may hold aliases.
//!
//! The rewrite replaces the whole parameter declaration with its spelled
//! raw form (`T* name`, or `Elem name[]` for array pointees) and
//! rewrites `name.get()` calls to plain `name`.

use narrow_diagnostic::Edit;
use narrow_ir::{NodeId, NodeKind, Ownership, SyntaxTree};
use narrow_match::{
    all_of, declared_ownership, equals_bound_decl, is_member_call, is_param, match_node,
    method_in, on_receiver, optionally, pointee_is_array, ref_to, Capture, Matcher,
};
use tracing::debug;

use crate::rewrite::{EditTemplate, RangeSelector, RewriteRule, RuleSet, TextTemplate};
use crate::{classify, EscapePolicy, NarrowConfig};

pub const RATIONALE: &str =
    "use a raw pointer or reference to indicate a non-owning function parameter";

const PARAM: Capture = "param";
const PARAM_ARRAY: Capture = "param_array";
const GET_CALL: Capture = "get_call";

/// Shared-ownership parameter; the array branch is bound as a flag so
/// the replacement text can pick the decayed spelling.
fn param_pattern() -> Matcher {
    all_of(vec![
        is_param(),
        declared_ownership(Ownership::Shared),
        optionally(pointee_is_array().bind(PARAM_ARRAY)),
    ])
    .bind(PARAM)
}

pub fn check(tree: &SyntaxTree, func: NodeId, config: &NarrowConfig) -> Vec<Edit> {
    let NodeKind::Function { params, body, .. } = tree.kind(func) else {
        return Vec::new();
    };
    // A prototype has no usage set to certify against.
    let Some(body) = *body else {
        return Vec::new();
    };

    let policy = EscapePolicy::parameter().with_trusted_callees(&config.trusted_callees);

    let mut edits = Vec::new();
    for &param in params {
        let envs = match_node(tree, &param_pattern(), param);
        let Some(env) = envs.first() else {
            continue;
        };
        if !classify(tree, body, param, &policy).is_empty() {
            debug!(param = ?tree.span(param), "parameter failed certification");
            continue;
        }

        edits.extend(declaration_rules().apply_first(tree, param, env));
        edits.extend(accessor_rules().apply_to_descendants(tree, body, env));
    }
    edits
}

/// Replace the full declaration with the raw spelling.
fn declaration_rules() -> RuleSet {
    let raw_form = TextTemplate::IfBound {
        capture: PARAM_ARRAY,
        then: Box::new(TextTemplate::Concat(vec![
            TextTemplate::ElementDisplay(PARAM),
            TextTemplate::literal(" "),
            TextTemplate::DeclName(PARAM),
            TextTemplate::literal("[]"),
        ])),
        otherwise: Box::new(TextTemplate::Concat(vec![
            TextTemplate::PointeeDisplay(PARAM),
            TextTemplate::literal("* "),
            TextTemplate::DeclName(PARAM),
        ])),
    };
    RuleSet::new(vec![RewriteRule::new(
        narrow_match::anything(),
        vec![EditTemplate::change_to(RangeSelector::Node(PARAM), raw_form)],
        RATIONALE,
    )])
}

/// `param.get()` becomes plain `param` once the parameter is raw.
fn accessor_rules() -> RuleSet {
    RuleSet::new(vec![RewriteRule::new(
        all_of(vec![
            is_member_call(),
            on_receiver(ref_to(equals_bound_decl(PARAM))),
            method_in(&["get"]),
        ])
        .bind(GET_CALL),
        vec![EditTemplate::change_to(
            RangeSelector::Node(GET_CALL),
            TextTemplate::DeclName(PARAM),
        )],
        RATIONALE,
    )])
}
