#![allow(clippy::unwrap_used)]

use narrow_ir::{Ownership, Span, SyntaxTree, TreeBuilder};
use pretty_assertions::assert_eq;

use crate::*;

/// ```text
/// f() -> shared<int> {
///     if (cond) { var v = shared(42); return v; }
///     else      { var v = shared(21); return v; }
/// }
/// ```
/// Two same-spelled locals in sibling branches; distinct declarations.
fn sibling_branch_tree() -> (SyntaxTree, narrow_ir::NodeId) {
    let mut b = TreeBuilder::new();
    let int_ty = b.named_type("int");
    let shared = b.shared_of(int_ty);

    let f1 = b.factory_call(Ownership::Shared, shared, Span::new(20, 26), vec![], Span::new(20, 30));
    let v1 = b.var("v", None, shared, Some(f1), Span::new(12, 31));
    let r1 = b.decl_ref(v1.decl, Span::new(40, 41));
    let ret1 = b.ret(Some(r1), Span::new(33, 42));
    let then_branch = b.block(vec![v1.node, ret1], Span::new(10, 44));

    let f2 = b.factory_call(Ownership::Shared, shared, Span::new(60, 66), vec![], Span::new(60, 70));
    let v2 = b.var("v", None, shared, Some(f2), Span::new(52, 71));
    let r2 = b.decl_ref(v2.decl, Span::new(80, 81));
    let ret2 = b.ret(Some(r2), Span::new(73, 82));
    let else_branch = b.block(vec![v2.node, ret2], Span::new(50, 84));

    let cond = b.bool_lit(true, Span::new(4, 8));
    let branch = b.if_stmt(cond, then_branch, Some(else_branch), Span::new(0, 84));
    let body = b.block(vec![branch], Span::new(0, 86));
    let func = b.function("f", vec![], None, Some(shared), Some(body), Span::new(0, 86));
    let tree = b.finish(vec![func.node]).unwrap();
    (tree, func.node)
}

#[test]
fn test_unless_anything_denies_all() {
    let (tree, func) = sibling_branch_tree();
    assert!(match_node(&tree, &unless(anything()), func).is_empty());
    assert_eq!(match_node(&tree, &anything(), func).len(), 1);
}

#[test]
fn test_for_each_descendant_yields_one_env_per_match() {
    let (tree, func) = sibling_branch_tree();
    let pattern = for_each_descendant(is_var().bind("local"));
    let envs = match_node(&tree, &pattern, func);
    assert_eq!(envs.len(), 2);
    let bound: Vec<_> = envs.iter().map(|e| e.get("local").unwrap()).collect();
    assert_ne!(bound[0], bound[1]);
}

#[test]
fn test_equals_bound_decl_tracks_identity_not_spelling() {
    let (tree, func) = sibling_branch_tree();
    // For each local: some return in the *function* returns that exact
    // declaration. Both locals are spelled "v"; identity keeps them apart.
    let pattern = for_each_descendant(all_of(vec![
        is_var().bind("local"),
        has_ancestor(all_of(vec![
            is_function(),
            has_descendant(all_of(vec![
                is_return(),
                has_return_value(ref_to(equals_bound_decl("local"))),
            ])),
        ])),
    ]));
    let envs = match_node(&tree, &pattern, func);
    assert_eq!(envs.len(), 2);

    // A reference to the then-branch local is not a reference to the
    // else-branch local, despite identical spelling.
    let first_local = envs[0].get("local").unwrap();
    let refs = for_each_descendant(ref_to(equals_bound_decl("local")));
    let mut seed = Bindings::new();
    seed.insert("local", first_local);
    let ref_envs = match_with(&tree, &refs, func, &seed);
    assert_eq!(ref_envs.len(), 1);
}

#[test]
fn test_optionally_leaves_capture_unbound() {
    let (tree, func) = sibling_branch_tree();
    let pattern = all_of(vec![
        is_function(),
        optionally(has_type_spec(anything().bind("spec"))),
    ]);
    let envs = match_node(&tree, &pattern, func);
    assert_eq!(envs.len(), 1);
    assert!(!envs[0].is_bound("spec"));
}

#[test]
fn test_any_of_short_circuits_bindings() {
    let (tree, func) = sibling_branch_tree();
    let pattern = any_of(vec![
        is_function().bind("first"),
        is_function().bind("second"),
    ]);
    let envs = match_node(&tree, &pattern, func);
    assert_eq!(envs.len(), 1);
    assert!(envs[0].is_bound("first"));
    assert!(!envs[0].is_bound("second"));
}

#[test]
fn test_each_of_unions_environments() {
    let (tree, func) = sibling_branch_tree();
    let pattern = each_of(vec![
        is_function().bind("first"),
        is_function().bind("second"),
    ]);
    let envs = match_node(&tree, &pattern, func);
    assert_eq!(envs.len(), 2);
    assert!(envs[0].is_bound("first"));
    assert!(envs[1].is_bound("second"));
}

#[test]
fn test_all_of_threads_environments_through_for_each() {
    let (tree, func) = sibling_branch_tree();
    // Bind each local, then require its initializer to be a shared factory
    // call bound in the same environment.
    let pattern = for_each_descendant(all_of(vec![
        is_var().bind("local"),
        has_initializer(factory_of(Ownership::Shared).bind("factory")),
    ]));
    let envs = match_node(&tree, &pattern, func);
    assert_eq!(envs.len(), 2);
    for env in &envs {
        assert!(env.is_bound("local"));
        assert!(env.is_bound("factory"));
        assert_ne!(env.get("local"), env.get("factory"));
    }
}

#[test]
fn test_has_ancestor_innermost_first() {
    let (tree, func) = sibling_branch_tree();
    let var = match_node(&tree, &for_each_descendant(is_var().bind("v")), func)[0]
        .get("v")
        .unwrap();
    let envs = match_with(
        &tree,
        &has_ancestor(is_function()),
        var,
        &Bindings::new(),
    );
    assert_eq!(envs.len(), 1);
}

#[test]
fn test_dangling_decl_ref_fails_closed() {
    // A handle minted by a different builder is dangling here; `ref_to`
    // must fail rather than certify anything.
    let mut other = TreeBuilder::new();
    let int_ty = other.named_type("int");
    let _ = other.var("a", None, int_ty, None, Span::new(0, 1));
    let _ = other.var("b", None, int_ty, None, Span::new(2, 3));
    let foreign = other.var("c", None, int_ty, None, Span::new(4, 5));

    let mut b = TreeBuilder::new();
    let reference = b.decl_ref(foreign.decl, Span::new(0, 1));
    let stmt = b.expr_stmt(reference, Span::new(0, 2));
    let body = b.block(vec![stmt], Span::new(0, 3));
    let func = b.function("f", vec![], None, None, Some(body), Span::new(0, 3));
    let tree = b.finish(vec![func.node]).unwrap();

    let envs = match_with(
        &tree,
        &ref_to(anything()),
        reference,
        &Bindings::new(),
    );
    assert!(envs.is_empty());
}

#[test]
fn test_method_whitelist_predicates() {
    let mut b = TreeBuilder::new();
    let int_ty = b.named_type("int");
    let shared = b.shared_of(int_ty);
    let v = b.var("v", None, shared, None, Span::new(0, 10));
    let recv = b.decl_ref(v.decl, Span::new(12, 13));
    let call = b.member_call(recv, "use_count", vec![], Span::new(12, 25));
    let stmt = b.expr_stmt(call, Span::new(12, 26));
    let body = b.block(vec![v.node, stmt], Span::new(0, 28));
    let func = b.function("f", vec![], None, None, Some(body), Span::new(0, 28));
    let tree = b.finish(vec![func.node]).unwrap();

    let safe = method_in(&["use_count", "unique"]);
    let unsafe_ = method_not_in(&["use_count", "unique"]);
    assert_eq!(match_node(&tree, &safe, call).len(), 1);
    assert!(match_node(&tree, &unsafe_, call).is_empty());
}
