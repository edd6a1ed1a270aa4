//! Match evaluation.
//!
//! A match attempt returns `Vec<Bindings>`: empty for "no match", one
//! environment per distinct way the pattern matched otherwise. Failure is
//! never an error; malformed input (a reference whose declaration handle is
//! not backed by the tree) simply fails the sub-pattern, which downstream
//! classification reads as "cannot certify, treat as escaping".

use narrow_ir::{Access, NodeId, NodeKind, SyntaxTree};
use tracing::trace;

use crate::{Bindings, Matcher, Predicate};

/// Match `matcher` against `node` with an empty starting environment.
pub fn match_node(tree: &SyntaxTree, matcher: &Matcher, node: NodeId) -> Vec<Bindings> {
    match_with(tree, matcher, node, &Bindings::new())
}

/// Match `matcher` against `node`, threading an inherited environment.
pub fn match_with(
    tree: &SyntaxTree,
    matcher: &Matcher,
    node: NodeId,
    env: &Bindings,
) -> Vec<Bindings> {
    match matcher {
        Matcher::AllOf(subs) => {
            let mut envs = vec![env.clone()];
            for sub in subs {
                let mut next = Vec::new();
                for current in &envs {
                    next.extend(match_with(tree, sub, node, current));
                }
                if next.is_empty() {
                    return Vec::new();
                }
                envs = next;
            }
            envs
        }
        Matcher::AnyOf(subs) => {
            for sub in subs {
                let result = match_with(tree, sub, node, env);
                if !result.is_empty() {
                    return result;
                }
            }
            Vec::new()
        }
        Matcher::EachOf(subs) => {
            let mut envs = Vec::new();
            for sub in subs {
                envs.extend(match_with(tree, sub, node, env));
            }
            envs
        }
        Matcher::Unless(sub) => {
            if match_with(tree, sub, node, env).is_empty() {
                vec![env.clone()]
            } else {
                Vec::new()
            }
        }
        Matcher::Optionally(sub) => {
            let result = match_with(tree, sub, node, env);
            if result.is_empty() {
                vec![env.clone()]
            } else {
                result
            }
        }
        Matcher::HasDescendant(sub) => {
            for descendant in tree.descendants(node) {
                let result = match_with(tree, sub, descendant, env);
                if !result.is_empty() {
                    return result;
                }
            }
            Vec::new()
        }
        Matcher::HasAncestor(sub) => {
            for ancestor in tree.ancestors(node) {
                let result = match_with(tree, sub, ancestor, env);
                if !result.is_empty() {
                    return result;
                }
            }
            Vec::new()
        }
        Matcher::ForEachDescendant(sub) => {
            let mut envs = Vec::new();
            for descendant in tree.descendants(node) {
                envs.extend(match_with(tree, sub, descendant, env));
            }
            envs
        }
        Matcher::Bind(name, sub) => {
            let mut envs = match_with(tree, sub, node, env);
            for bound in &mut envs {
                bound.insert(*name, node);
            }
            envs
        }
        Matcher::EqualsBoundDecl(name) => {
            let Some(bound) = env.get(*name) else {
                trace!(capture = *name, "equals_bound_decl with unbound capture");
                return Vec::new();
            };
            match (tree.decl_identity(node), tree.decl_identity(bound)) {
                // Fail closed unless both sides resolve to a live handle.
                (Some(current), Some(expected))
                    if current == expected && tree.decl_node(current).is_some() =>
                {
                    vec![env.clone()]
                }
                _ => Vec::new(),
            }
        }
        Matcher::Is(predicate) => eval_predicate(tree, predicate, node, env),
        Matcher::Anything => vec![env.clone()],
    }
}

fn eval_predicate(
    tree: &SyntaxTree,
    predicate: &Predicate,
    node: NodeId,
    env: &Bindings,
) -> Vec<Bindings> {
    let succeed = || vec![env.clone()];
    let fail = Vec::new;

    match predicate {
        Predicate::IsFunction => match tree.kind(node) {
            NodeKind::Function { .. } => succeed(),
            _ => fail(),
        },
        Predicate::IsRecord => match tree.kind(node) {
            NodeKind::Record { .. } => succeed(),
            _ => fail(),
        },
        Predicate::IsVar => match tree.kind(node) {
            NodeKind::Var { .. } => succeed(),
            _ => fail(),
        },
        Predicate::IsField => match tree.kind(node) {
            NodeKind::Field { .. } => succeed(),
            _ => fail(),
        },
        Predicate::IsParam => match tree.kind(node) {
            NodeKind::Param { .. } => succeed(),
            _ => fail(),
        },
        Predicate::IsReturn => match tree.kind(node) {
            NodeKind::Return { .. } => succeed(),
            _ => fail(),
        },
        Predicate::IsCall => match tree.kind(node) {
            NodeKind::Call { .. } => succeed(),
            _ => fail(),
        },
        Predicate::IsMemberCall => match tree.kind(node) {
            NodeKind::MemberCall { .. } => succeed(),
            _ => fail(),
        },
        Predicate::PointeeIsArray => match tree.kind(node) {
            NodeKind::Var { ty, .. } | NodeKind::Field { ty, .. } | NodeKind::Param { ty, .. } => {
                let types = tree.types();
                match types.pointee(*ty) {
                    Some(pointee)
                        if matches!(types.kind(pointee), narrow_ir::TypeKind::Array(_)) =>
                    {
                        succeed()
                    }
                    _ => fail(),
                }
            }
            _ => fail(),
        },
        Predicate::IsPrivateField => match tree.kind(node) {
            NodeKind::Field { access, .. } if *access == Access::Private => succeed(),
            _ => fail(),
        },
        Predicate::DeclaredOwnership(ownership) => match tree.kind(node) {
            NodeKind::Var { ty, .. } | NodeKind::Field { ty, .. } | NodeKind::Param { ty, .. }
                if tree.types().ownership(*ty) == Some(*ownership) =>
            {
                succeed()
            }
            _ => fail(),
        },
        Predicate::ReturnsOwnership(ownership) => match tree.kind(node) {
            NodeKind::Function {
                return_ty: Some(ty),
                ..
            } if tree.types().ownership(*ty) == Some(*ownership) => succeed(),
            _ => fail(),
        },
        Predicate::FactoryOf(ownership) => match tree.kind(node) {
            NodeKind::FactoryCall {
                ownership: actual, ..
            } if actual == ownership => succeed(),
            _ => fail(),
        },
        Predicate::RefTo(sub) => match tree.kind(node) {
            NodeKind::DeclRef { target } => match tree.decl_node(*target) {
                Some(decl_node) => match_with(tree, sub, decl_node, env),
                // Dangling handle: cannot certify anything about it.
                None => fail(),
            },
            _ => fail(),
        },
        Predicate::HasInitializer(sub) => match tree.kind(node) {
            NodeKind::Var {
                init: Some(init), ..
            } => match_with(tree, sub, *init, env),
            _ => fail(),
        },
        Predicate::HasAnyParam(sub) => match tree.kind(node) {
            NodeKind::Function { params, .. } => {
                for &param in params {
                    let result = match_with(tree, sub, param, env);
                    if !result.is_empty() {
                        return result;
                    }
                }
                fail()
            }
            _ => fail(),
        },
        Predicate::HasAnyArgument(sub) => {
            let args: Vec<NodeId> = match tree.kind(node) {
                NodeKind::Call { args, .. } => args.iter().copied().collect(),
                NodeKind::FactoryCall { args, .. } => args.iter().copied().collect(),
                NodeKind::MemberCall { args, .. } => args.iter().copied().collect(),
                _ => return fail(),
            };
            for arg in args {
                let result = match_with(tree, sub, arg, env);
                if !result.is_empty() {
                    return result;
                }
            }
            fail()
        }
        Predicate::HasReturnValue(sub) => match tree.kind(node) {
            NodeKind::Return { value: Some(value) } => match_with(tree, sub, *value, env),
            _ => fail(),
        },
        Predicate::OnReceiver(sub) => match tree.kind(node) {
            NodeKind::MemberCall { receiver, .. } => match_with(tree, sub, *receiver, env),
            _ => fail(),
        },
        Predicate::MethodIn(names) => match tree.kind(node) {
            NodeKind::MemberCall { method, .. }
                if names.iter().any(|n| n == tree.name(*method)) =>
            {
                succeed()
            }
            _ => fail(),
        },
        Predicate::MethodNotIn(names) => match tree.kind(node) {
            NodeKind::MemberCall { method, .. }
                if !names.iter().any(|n| n == tree.name(*method)) =>
            {
                succeed()
            }
            _ => fail(),
        },
        Predicate::CalleeIn(names) => match tree.kind(node) {
            NodeKind::Call { callee, .. } if names.iter().any(|n| n == tree.name(*callee)) => {
                succeed()
            }
            _ => fail(),
        },
        Predicate::OperatorIn(ops) => match tree.kind(node) {
            NodeKind::OperatorCall { op, .. } if ops.contains(op) => succeed(),
            _ => fail(),
        },
        Predicate::HasLhs(sub) => match tree.kind(node) {
            NodeKind::OperatorCall { lhs, .. } => match_with(tree, sub, *lhs, env),
            _ => fail(),
        },
        Predicate::HasRhs(sub) => match tree.kind(node) {
            NodeKind::OperatorCall { rhs: Some(rhs), .. } => match_with(tree, sub, *rhs, env),
            _ => fail(),
        },
        Predicate::HasOperand(sub) => match tree.kind(node) {
            NodeKind::OperatorCall { lhs, rhs, .. } => {
                let result = match_with(tree, sub, *lhs, env);
                if !result.is_empty() {
                    return result;
                }
                match rhs {
                    Some(rhs) => match_with(tree, sub, *rhs, env),
                    None => fail(),
                }
            }
            _ => fail(),
        },
        Predicate::HasTypeSpec(sub) => {
            let spec = match tree.kind(node) {
                NodeKind::Var { spec, .. }
                | NodeKind::Field { spec, .. }
                | NodeKind::Param { spec, .. } => *spec,
                NodeKind::Function { return_spec, .. } => *return_spec,
                _ => None,
            };
            match spec {
                Some(spec) => match_with(tree, sub, spec, env),
                None => fail(),
            }
        }
    }
}

#[cfg(test)]
mod tests;
