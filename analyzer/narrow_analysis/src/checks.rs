//! The candidate-selecting checks.
//!
//! Each check owns one candidate role: functions returning a fresh
//! shared-ownership value, private shared-ownership data members, and
//! shared-ownership parameters used non-owningly. A check selects its
//! candidates, certifies them with the escape classifier under the
//! role's policy, and composes the edits through a rewrite rule set.

pub mod data_member;
pub mod factory_return;
pub mod parameter;

use narrow_diagnostic::Edit;
use narrow_ir::{NodeId, NodeKind, SyntaxTree};

use crate::NarrowConfig;

/// Run every enabled check against one top-level declaration. Methods of
/// a record get the function checks too.
pub fn check_decl(tree: &SyntaxTree, node: NodeId, config: &NarrowConfig) -> Vec<Edit> {
    let mut edits = Vec::new();
    match tree.kind(node) {
        NodeKind::Function { .. } => check_function(tree, node, config, &mut edits),
        NodeKind::Record { members, .. } => {
            if config.data_members {
                edits.extend(data_member::check(tree, node, config));
            }
            for &member in members {
                if matches!(tree.kind(member), NodeKind::Function { .. }) {
                    check_function(tree, member, config, &mut edits);
                }
            }
        }
        _ => {}
    }
    edits
}

fn check_function(tree: &SyntaxTree, func: NodeId, config: &NarrowConfig, out: &mut Vec<Edit>) {
    if config.factory_returns {
        out.extend(factory_return::check(tree, func, config));
    }
    if config.parameters {
        out.extend(parameter::check(tree, func, config));
    }
}
