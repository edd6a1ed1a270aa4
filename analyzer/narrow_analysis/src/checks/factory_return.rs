//! Factory-return check.
//!
//! A function whose resolved return type is shared-ownership qualifies
//! when every `return` produces a value the function exclusively owns: a
//! fresh shared construction, or a local that is factory-initialized (or
//! factory-assigned) and never escapes its body. Pass-through functions,
//! ones that return one of their own parameters, are excluded up front
//! since the caller owns that value.
//!
//! The rewrite changes the written return annotation, each qualifying
//! local's annotation, and every fresh construction feeding them.

use narrow_diagnostic::Edit;
use narrow_ir::{DeclId, NodeId, NodeKind, OpKind, Ownership, SyntaxTree};
use narrow_match::{
    all_of, anything, equals_bound_decl, factory_of, for_each_descendant, has_any_param,
    has_initializer, has_lhs, has_return_value, has_rhs, has_type_spec, is_function, is_return,
    is_var, match_node, operator_in, optionally, ref_to, returns_ownership, unless, Bindings,
    Capture, Matcher,
};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::rewrite::{EditTemplate, RangeSelector, RewriteRule, RuleSet, TextTemplate};
use crate::{classify, EscapePolicy, NarrowConfig};

pub const RATIONALE: &str =
    "prefer exclusive ownership for the return type of factory functions";

const FUNC: Capture = "func";
const FUNC_SPEC: Capture = "func_spec";
const LOCAL: Capture = "local";
const LOCAL_SPEC: Capture = "local_spec";
const LOCAL_INIT: Capture = "local_init";
const FACTORY: Capture = "factory";
const RET_DECL: Capture = "ret_decl";

/// Shared-returning function that is not a pass-through for one of its
/// own parameters. Binds the written return annotation when present.
fn candidate_pattern() -> Matcher {
    all_of(vec![
        is_function().bind(FUNC),
        returns_ownership(Ownership::Shared),
        optionally(has_type_spec(anything().bind(FUNC_SPEC))),
        unless(pass_through()),
    ])
}

/// Some returned reference resolves to one of the function's parameters.
fn pass_through() -> Matcher {
    all_of(vec![
        for_each_descendant(all_of(vec![
            is_return(),
            has_return_value(ref_to(anything().bind(RET_DECL))),
        ])),
        has_any_param(equals_bound_decl(RET_DECL)),
    ])
}

pub fn check(tree: &SyntaxTree, func: NodeId, config: &NarrowConfig) -> Vec<Edit> {
    let envs = match_node(tree, &candidate_pattern(), func);
    let Some(env) = envs.first() else {
        return Vec::new();
    };
    let NodeKind::Function {
        body: Some(body), ..
    } = tree.kind(func)
    else {
        return Vec::new();
    };
    let body = *body;

    let policy = EscapePolicy::owning_local().with_trusted_callees(&config.trusted_callees);

    // Certify every return. One bad return rejects the whole function:
    // the annotation can only change if all paths produce owned values.
    let mut locals: FxHashSet<NodeId> = FxHashSet::default();
    let mut saw_return = false;
    for node in tree.descendants(body) {
        let NodeKind::Return { value } = tree.kind(node) else {
            continue;
        };
        saw_return = true;
        let Some(value) = *value else {
            return Vec::new();
        };
        match tree.kind(value) {
            NodeKind::FactoryCall {
                ownership: Ownership::Shared,
                ..
            } => {}
            NodeKind::DeclRef { .. } => {
                let Some(local) = qualifying_local(tree, body, value, &policy) else {
                    debug!(func = ?tree.span(func), "returned local failed certification");
                    return Vec::new();
                };
                locals.insert(local);
            }
            _ => return Vec::new(),
        }
    }
    if !saw_return {
        return Vec::new();
    }

    let mut edits = Vec::new();
    edits.extend(signature_rules(config).apply_first(tree, func, env));
    for local in locals {
        let mut seeded = Bindings::new();
        seeded.insert(LOCAL, local);
        edits.extend(local_rules(config).apply_to_descendants(tree, body, &seeded));
    }
    edits
}

/// Return annotation plus naked returned constructions.
fn signature_rules(config: &NarrowConfig) -> RuleSet {
    let returned_factory = RewriteRule::new(
        all_of(vec![
            is_return(),
            has_return_value(factory_of(Ownership::Shared).bind(FACTORY)),
        ]),
        vec![EditTemplate::change_to(
            RangeSelector::Name(FACTORY),
            TextTemplate::literal(config.names.exclusive_factory.as_str()),
        )],
        RATIONALE,
    );
    RuleSet::new(vec![RewriteRule::new(
        anything(),
        vec![
            EditTemplate::if_bound(
                FUNC_SPEC,
                EditTemplate::change_to(
                    RangeSelector::Name(FUNC_SPEC),
                    TextTemplate::literal(config.names.exclusive_type.as_str()),
                ),
            ),
            EditTemplate::rewrite_descendants(FUNC, RuleSet::new(vec![returned_factory])),
        ],
        RATIONALE,
    )])
}

/// Declaration annotation, initializer, and reassignments of one
/// certified local.
fn local_rules(config: &NarrowConfig) -> RuleSet {
    let declaration = RewriteRule::new(
        all_of(vec![
            is_var(),
            equals_bound_decl(LOCAL),
            optionally(has_type_spec(anything().bind(LOCAL_SPEC))),
            optionally(has_initializer(
                factory_of(Ownership::Shared).bind(LOCAL_INIT),
            )),
        ]),
        vec![
            EditTemplate::if_bound(
                LOCAL_SPEC,
                EditTemplate::change_to(
                    RangeSelector::Name(LOCAL_SPEC),
                    TextTemplate::literal(config.names.exclusive_type.as_str()),
                ),
            ),
            EditTemplate::if_bound(
                LOCAL_INIT,
                EditTemplate::change_to(
                    RangeSelector::Name(LOCAL_INIT),
                    TextTemplate::literal(config.names.exclusive_factory.as_str()),
                ),
            ),
        ],
        RATIONALE,
    );
    let reassignment = RewriteRule::new(
        all_of(vec![
            operator_in(&[OpKind::Assign]),
            has_lhs(ref_to(equals_bound_decl(LOCAL))),
            has_rhs(factory_of(Ownership::Shared).bind(FACTORY)),
        ]),
        vec![EditTemplate::change_to(
            RangeSelector::Name(FACTORY),
            TextTemplate::literal(config.names.exclusive_factory.as_str()),
        )],
        RATIONALE,
    );
    RuleSet::new(vec![declaration, reassignment])
}

/// The declaring node of a returned local the function exclusively owns:
/// declared inside `body` with shared ownership, every value it holds is
/// a fresh construction, and no usage escapes.
fn qualifying_local(
    tree: &SyntaxTree,
    body: NodeId,
    ref_node: NodeId,
    policy: &EscapePolicy,
) -> Option<NodeId> {
    let decl = tree.decl_identity(ref_node)?;
    let local = tree.decl_node(decl)?;
    let NodeKind::Var { ty, init, .. } = tree.kind(local) else {
        return None;
    };
    let init = *init;
    if tree.types().ownership(*ty) != Some(Ownership::Shared) {
        return None;
    }
    if !tree.ancestors(local).any(|a| a == body) {
        return None;
    }

    let fresh_init = matches!(
        init.map(|i| tree.kind(i)),
        Some(NodeKind::FactoryCall {
            ownership: Ownership::Shared,
            ..
        })
    );
    if init.is_some() && !fresh_init {
        return None;
    }
    if !fresh_init
        && !tree
            .descendants(body)
            .any(|n| is_factory_assignment_to(tree, n, decl))
    {
        return None;
    }

    if !classify(tree, body, local, policy).is_empty() {
        return None;
    }
    Some(local)
}

fn is_factory_assignment_to(tree: &SyntaxTree, node: NodeId, decl: DeclId) -> bool {
    let NodeKind::OperatorCall {
        op: OpKind::Assign,
        lhs,
        rhs: Some(rhs),
    } = tree.kind(node)
    else {
        return false;
    };
    tree.decl_identity(*lhs) == Some(decl)
        && matches!(
            tree.kind(*rhs),
            NodeKind::FactoryCall {
                ownership: Ownership::Shared,
                ..
            }
        )
}
