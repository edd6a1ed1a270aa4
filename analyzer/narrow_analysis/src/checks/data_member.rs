//! Private data-member check.
//!
//! A private shared-ownership field qualifies when no method of the
//! enclosing record lets it escape. Privacy makes the record's methods
//! the complete usage set, so certification is the union of per-method
//! classifications under the data-member policy (returning the member
//! hands out the reference count, so it is an escape here).
//!
//! The candidate pattern yields one environment per rewrite site: one
//! binding the field's written annotation, one per fresh construction
//! assigned to it anywhere in the record. The rule then fires once per
//! environment.

use narrow_diagnostic::Edit;
use narrow_ir::{NodeId, NodeKind, OpKind, Ownership, SyntaxTree};
use narrow_match::{
    all_of, anything, declared_ownership, each_of, equals_bound_decl, factory_of,
    for_each_descendant, has_ancestor, has_lhs, has_rhs, has_type_spec, is_private_field,
    is_record, match_node, operator_in, ref_to, Capture, Matcher,
};
use tracing::debug;

use crate::rewrite::{EditTemplate, RangeSelector, RewriteRule, RuleSet, TextTemplate};
use crate::{classify, EscapePolicy, NarrowConfig};

pub const RATIONALE: &str = "prefer exclusive ownership for class-internal data members";

const MEMBER: Capture = "member";
const MEMBER_SPEC: Capture = "member_spec";
const FACTORY: Capture = "factory";

/// Private shared-ownership field. `each_of` unions the rewrite sites:
/// the written annotation, and every `member = shared_factory(...)`
/// under the enclosing record.
fn field_pattern() -> Matcher {
    all_of(vec![
        is_private_field(),
        declared_ownership(Ownership::Shared),
        anything().bind(MEMBER),
        each_of(vec![
            has_type_spec(anything().bind(MEMBER_SPEC)),
            has_ancestor(all_of(vec![
                is_record(),
                for_each_descendant(all_of(vec![
                    operator_in(&[OpKind::Assign]),
                    has_lhs(ref_to(equals_bound_decl(MEMBER))),
                    has_rhs(factory_of(Ownership::Shared).bind(FACTORY)),
                ])),
            ])),
        ]),
    ])
}

pub fn check(tree: &SyntaxTree, record: NodeId, config: &NarrowConfig) -> Vec<Edit> {
    let NodeKind::Record { members, .. } = tree.kind(record) else {
        return Vec::new();
    };
    let bodies: Vec<NodeId> = members
        .iter()
        .filter_map(|&m| match tree.kind(m) {
            NodeKind::Function { body, .. } => *body,
            _ => None,
        })
        .collect();

    let policy = EscapePolicy::data_member().with_trusted_callees(&config.trusted_callees);

    let mut edits = Vec::new();
    'fields: for &member in members {
        let envs = match_node(tree, &field_pattern(), member);
        if envs.is_empty() {
            continue;
        }
        for &body in &bodies {
            if !classify(tree, body, member, &policy).is_empty() {
                debug!(field = ?tree.span(member), "field failed certification");
                continue 'fields;
            }
        }
        for env in &envs {
            edits.extend(member_rules(config).apply_first(tree, member, env));
        }
    }
    edits
}

/// One edit per environment: the annotation when bound, the assigned
/// construction when bound.
fn member_rules(config: &NarrowConfig) -> RuleSet {
    RuleSet::new(vec![RewriteRule::new(
        anything(),
        vec![
            EditTemplate::if_bound(
                MEMBER_SPEC,
                EditTemplate::change_to(
                    RangeSelector::Name(MEMBER_SPEC),
                    TextTemplate::literal(config.names.exclusive_type.as_str()),
                ),
            ),
            EditTemplate::if_bound(
                FACTORY,
                EditTemplate::change_to(
                    RangeSelector::Name(FACTORY),
                    TextTemplate::literal(config.names.exclusive_factory.as_str()),
                ),
            ),
        ],
        RATIONALE,
    )])
}
