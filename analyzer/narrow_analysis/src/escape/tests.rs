#![allow(clippy::unwrap_used)]

use narrow_ir::{NodeId, OpKind, Ownership, Span, SyntaxTree, TreeBuilder};
use pretty_assertions::assert_eq;

use super::*;

/// Builds `f() { var v = shared_factory(); <use>; return v; }` where the
/// use statement is produced by the callback from `(builder, v_decl)`.
fn local_with_use(
    build_use: impl FnOnce(&mut TreeBuilder, narrow_ir::DeclHandle) -> Option<NodeId>,
) -> (SyntaxTree, NodeId, NodeId) {
    let mut b = TreeBuilder::new();
    let int_ty = b.named_type("int");
    let shared = b.shared_of(int_ty);
    let factory = b.factory_call(Ownership::Shared, shared, Span::new(8, 19), vec![], Span::new(8, 24));
    let v = b.var("v", None, shared, Some(factory), Span::new(0, 25));

    let mut stmts = vec![v.node];
    if let Some(stmt) = build_use(&mut b, v) {
        stmts.push(stmt);
    }
    let ret_ref = b.decl_ref(v.decl, Span::new(90, 91));
    let ret = b.ret(Some(ret_ref), Span::new(83, 92));
    stmts.push(ret);

    let body = b.block(stmts, Span::new(0, 94));
    let func = b.function("f", vec![], None, Some(shared), Some(body), Span::new(0, 94));
    let tree = b.finish(vec![func.node]).unwrap();
    (tree, body, v.node)
}

fn reasons(points: &[EscapePoint]) -> Vec<EscapeReason> {
    points.iter().map(|p| p.reason).collect()
}

#[test]
fn test_whitelisted_members_are_safe() {
    for method in ["use_count", "unique", "owner_before", "swap"] {
        let (tree, body, v) = local_with_use(|b, v| {
            let recv = b.decl_ref(v.decl, Span::new(30, 31));
            let call = b.member_call(recv, method, vec![], Span::new(30, 45));
            Some(b.expr_stmt(call, Span::new(30, 46)))
        });
        let points = classify(&tree, body, v, &EscapePolicy::owning_local());
        assert_eq!(points, vec![], "{method} should be whitelisted");
    }
}

#[test]
fn test_non_whitelisted_member_escapes() {
    for method in ["reset", "get"] {
        let (tree, body, v) = local_with_use(|b, v| {
            let recv = b.decl_ref(v.decl, Span::new(30, 31));
            let call = b.member_call(recv, method, vec![], Span::new(30, 40));
            Some(b.expr_stmt(call, Span::new(30, 41)))
        });
        let points = classify(&tree, body, v, &EscapePolicy::owning_local());
        assert_eq!(
            reasons(&points),
            vec![EscapeReason::MemberCall],
            "{method} should escape an owning local"
        );
    }
}

#[test]
fn test_get_is_safe_for_parameter_policy() {
    let (tree, body, v) = local_with_use(|b, v| {
        let recv = b.decl_ref(v.decl, Span::new(30, 31));
        let call = b.member_call(recv, "get", vec![], Span::new(30, 39));
        Some(b.expr_stmt(call, Span::new(30, 40)))
    });
    // Parameter policy treats the final `return v` as an escape, so only
    // check that no MemberCall point is produced for the accessor.
    let points = classify(&tree, body, v, &EscapePolicy::parameter());
    assert!(!reasons(&points).contains(&EscapeReason::MemberCall));
}

#[test]
fn test_free_function_argument_escapes() {
    let (tree, body, v) = local_with_use(|b, v| {
        let arg = b.decl_ref(v.decl, Span::new(40, 41));
        let call = b.call("do_something", vec![arg], Span::new(27, 42));
        Some(b.expr_stmt(call, Span::new(27, 43)))
    });
    let points = classify(&tree, body, v, &EscapePolicy::owning_local());
    assert_eq!(reasons(&points), vec![EscapeReason::FreeFunctionArgument]);
}

#[test]
fn test_trusted_free_callee_is_safe() {
    let (tree, body, v) = local_with_use(|b, v| {
        let arg = b.decl_ref(v.decl, Span::new(40, 41));
        let call = b.call("trusted_log", vec![arg], Span::new(28, 42));
        Some(b.expr_stmt(call, Span::new(28, 43)))
    });
    let policy =
        EscapePolicy::owning_local().with_trusted_callees(&["trusted_log".to_string()]);
    assert_eq!(classify(&tree, body, v, &policy), vec![]);
}

#[test]
fn test_factory_reassignment_safe_for_local_not_parameter() {
    let build = |b: &mut TreeBuilder, v: narrow_ir::DeclHandle| {
        let lhs = b.decl_ref(v.decl, Span::new(27, 28));
        let int_ty = b.named_type("int");
        let shared = b.shared_of(int_ty);
        let rhs = b.factory_call(Ownership::Shared, shared, Span::new(31, 42), vec![], Span::new(31, 47));
        let assign = b.assign(lhs, rhs, Span::new(27, 47));
        Some(b.expr_stmt(assign, Span::new(27, 48)))
    };

    let (tree, body, v) = local_with_use(build);
    assert_eq!(classify(&tree, body, v, &EscapePolicy::owning_local()), vec![]);

    let (tree, body, v) = local_with_use(build);
    let points = classify(&tree, body, v, &EscapePolicy::parameter());
    assert!(reasons(&points).contains(&EscapeReason::OperatorUse));
}

#[test]
fn test_assignment_from_other_variable_escapes() {
    let (tree, body, v) = local_with_use(|b, v| {
        let int_ty = b.named_type("int");
        let shared = b.shared_of(int_ty);
        let w = b.var("w", None, shared, None, Span::new(27, 45));
        let lhs = b.decl_ref(w.decl, Span::new(47, 48));
        let rhs = b.decl_ref(v.decl, Span::new(51, 52));
        let assign = b.assign(lhs, rhs, Span::new(47, 52));
        let stmt = b.expr_stmt(assign, Span::new(47, 53));
        Some(b.block(vec![w.node, stmt], Span::new(27, 54)))
    });
    let points = classify(&tree, body, v, &EscapePolicy::owning_local());
    assert_eq!(reasons(&points), vec![EscapeReason::OperatorUse]);
}

#[test]
fn test_alias_initialization_escapes() {
    let (tree, body, v) = local_with_use(|b, v| {
        let int_ty = b.named_type("int");
        let shared = b.shared_of(int_ty);
        let init = b.decl_ref(v.decl, Span::new(40, 41));
        let w = b.var("w", None, shared, Some(init), Span::new(27, 42));
        Some(w.node)
    });
    let points = classify(&tree, body, v, &EscapePolicy::owning_local());
    assert_eq!(reasons(&points), vec![EscapeReason::AliasInitialization]);
}

#[test]
fn test_deref_is_safe() {
    let (tree, body, v) = local_with_use(|b, v| {
        let operand = b.decl_ref(v.decl, Span::new(28, 29));
        let deref = b.operator_call(OpKind::Deref, operand, None, Span::new(27, 29));
        Some(b.expr_stmt(deref, Span::new(27, 30)))
    });
    assert_eq!(classify(&tree, body, v, &EscapePolicy::owning_local()), vec![]);
}

#[test]
fn test_return_is_escape_only_when_policy_says_so() {
    let (tree, body, v) = local_with_use(|_, _| None);
    assert_eq!(classify(&tree, body, v, &EscapePolicy::owning_local()), vec![]);
    let points = classify(&tree, body, v, &EscapePolicy::data_member());
    assert_eq!(reasons(&points), vec![EscapeReason::Returned]);
}

#[test]
fn test_passing_to_factory_escapes() {
    let (tree, body, v) = local_with_use(|b, v| {
        let widget = b.named_type("Widget");
        let shared_widget = b.shared_of(widget);
        let arg = b.decl_ref(v.decl, Span::new(45, 46));
        let factory = b.factory_call(
            Ownership::Shared,
            shared_widget,
            Span::new(30, 41),
            vec![arg],
            Span::new(30, 47),
        );
        Some(b.expr_stmt(factory, Span::new(30, 48)))
    });
    let points = classify(&tree, body, v, &EscapePolicy::owning_local());
    assert_eq!(reasons(&points), vec![EscapeReason::FactoryArgument]);
}
