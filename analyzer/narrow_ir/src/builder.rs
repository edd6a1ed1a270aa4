//! Tree construction.
//!
//! Hosts lower their resolved AST into this builder; tests use it to
//! transcribe fixtures. Nodes are created bottom-up; `finish` wires parent
//! links and validates the structural invariants the matcher depends on
//! (single parent per node, every declaration handle backed by a
//! declaration node). A tree that fails validation is rejected whole: the
//! analysis never runs over a malformed tree.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    Access, DeclId, Interner, Node, NodeId, NodeKind, OpKind, Ownership, Span, SyntaxTree, TypeId,
    TypeKind, TypeTable,
};

/// A declaration's node plus its identity handle.
#[derive(Copy, Clone, Debug)]
pub struct DeclHandle {
    pub node: NodeId,
    pub decl: DeclId,
}

/// Structural validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("node {child:?} is claimed as a child by both {first:?} and {second:?}")]
    DuplicateParent {
        child: NodeId,
        first: NodeId,
        second: NodeId,
    },
    #[error("declaration handle {decl:?} points at {node:?}, which is not a declaration")]
    NotADeclaration { decl: DeclId, node: NodeId },
    #[error("node reference {node:?} is out of bounds (arena holds {len} nodes)")]
    UnknownNode { node: NodeId, len: usize },
    #[error("tree exceeds the u32 arena index range")]
    IndexOverflow,
}

/// Builder for one [`SyntaxTree`].
#[derive(Default, Debug)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    decls: Vec<NodeId>,
    types: TypeTable,
    interner: Interner,
    overflow: bool,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    /// Intern a plain named type.
    pub fn named_type(&mut self, name: &str) -> TypeId {
        let name = self.interner.intern(name);
        self.types.intern(TypeKind::Named(name))
    }

    pub fn shared_of(&mut self, pointee: TypeId) -> TypeId {
        self.types.intern(TypeKind::Shared(pointee))
    }

    pub fn exclusive_of(&mut self, pointee: TypeId) -> TypeId {
        self.types.intern(TypeKind::Exclusive(pointee))
    }

    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        self.types.intern(TypeKind::Array(element))
    }

    // Indices past u32 mark the builder as overflowed; `finish` rejects
    // the whole tree rather than letting two handles conflate.
    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = match u32::try_from(self.nodes.len()) {
            Ok(raw) => NodeId(raw),
            Err(_) => {
                self.overflow = true;
                NodeId(u32::MAX)
            }
        };
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
        });
        id
    }

    fn next_decl(&mut self) -> DeclId {
        match u32::try_from(self.decls.len()) {
            Ok(raw) => DeclId(raw),
            Err(_) => {
                self.overflow = true;
                DeclId(u32::MAX)
            }
        }
    }

    /// Written type annotation. `head` is the sub-span of the head name.
    pub fn type_spec(&mut self, ty: TypeId, head: Span, span: Span) -> NodeId {
        self.push(NodeKind::TypeSpec { ty, head }, span)
    }

    pub fn function(
        &mut self,
        name: &str,
        params: Vec<NodeId>,
        return_spec: Option<NodeId>,
        return_ty: Option<TypeId>,
        body: Option<NodeId>,
        span: Span,
    ) -> DeclHandle {
        let name = self.interner.intern(name);
        let decl = self.next_decl();
        let node = self.push(
            NodeKind::Function {
                name,
                decl,
                params: SmallVec::from_vec(params),
                return_spec,
                return_ty,
                body,
            },
            span,
        );
        self.decls.push(node);
        DeclHandle { node, decl }
    }

    pub fn record(&mut self, name: &str, members: Vec<NodeId>, span: Span) -> DeclHandle {
        let name = self.interner.intern(name);
        let decl = self.next_decl();
        let node = self.push(
            NodeKind::Record {
                name,
                decl,
                members: SmallVec::from_vec(members),
            },
            span,
        );
        self.decls.push(node);
        DeclHandle { node, decl }
    }

    pub fn var(
        &mut self,
        name: &str,
        spec: Option<NodeId>,
        ty: TypeId,
        init: Option<NodeId>,
        span: Span,
    ) -> DeclHandle {
        let name = self.interner.intern(name);
        let decl = self.next_decl();
        let node = self.push(
            NodeKind::Var {
                name,
                decl,
                spec,
                ty,
                init,
            },
            span,
        );
        self.decls.push(node);
        DeclHandle { node, decl }
    }

    pub fn field(
        &mut self,
        name: &str,
        spec: Option<NodeId>,
        ty: TypeId,
        access: Access,
        span: Span,
    ) -> DeclHandle {
        let name = self.interner.intern(name);
        let decl = self.next_decl();
        let node = self.push(
            NodeKind::Field {
                name,
                decl,
                spec,
                ty,
                access,
            },
            span,
        );
        self.decls.push(node);
        DeclHandle { node, decl }
    }

    pub fn param(
        &mut self,
        name: &str,
        spec: Option<NodeId>,
        ty: TypeId,
        span: Span,
    ) -> DeclHandle {
        let name = self.interner.intern(name);
        let decl = self.next_decl();
        let node = self.push(NodeKind::Param { name, decl, spec, ty }, span);
        self.decls.push(node);
        DeclHandle { node, decl }
    }

    pub fn decl_ref(&mut self, target: DeclId, span: Span) -> NodeId {
        self.push(NodeKind::DeclRef { target }, span)
    }

    pub fn call(&mut self, callee: &str, args: Vec<NodeId>, span: Span) -> NodeId {
        let callee = self.interner.intern(callee);
        self.push(
            NodeKind::Call {
                callee,
                args: SmallVec::from_vec(args),
            },
            span,
        )
    }

    pub fn member_call(
        &mut self,
        receiver: NodeId,
        method: &str,
        args: Vec<NodeId>,
        span: Span,
    ) -> NodeId {
        let method = self.interner.intern(method);
        self.push(
            NodeKind::MemberCall {
                receiver,
                method,
                args: SmallVec::from_vec(args),
            },
            span,
        )
    }

    pub fn operator_call(
        &mut self,
        op: OpKind,
        lhs: NodeId,
        rhs: Option<NodeId>,
        span: Span,
    ) -> NodeId {
        self.push(NodeKind::OperatorCall { op, lhs, rhs }, span)
    }

    /// `lhs = rhs` through the overloaded assignment operator.
    pub fn assign(&mut self, lhs: NodeId, rhs: NodeId, span: Span) -> NodeId {
        self.operator_call(OpKind::Assign, lhs, Some(rhs), span)
    }

    pub fn factory_call(
        &mut self,
        ownership: Ownership,
        result: TypeId,
        callee: Span,
        args: Vec<NodeId>,
        span: Span,
    ) -> NodeId {
        self.push(
            NodeKind::FactoryCall {
                ownership,
                result,
                callee,
                args: SmallVec::from_vec(args),
            },
            span,
        )
    }

    pub fn ret(&mut self, value: Option<NodeId>, span: Span) -> NodeId {
        self.push(NodeKind::Return { value }, span)
    }

    pub fn block(&mut self, stmts: Vec<NodeId>, span: Span) -> NodeId {
        self.push(NodeKind::Block { stmts }, span)
    }

    pub fn if_stmt(
        &mut self,
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
        span: Span,
    ) -> NodeId {
        self.push(
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        )
    }

    pub fn expr_stmt(&mut self, expr: NodeId, span: Span) -> NodeId {
        self.push(NodeKind::ExprStmt { expr }, span)
    }

    pub fn int_lit(&mut self, value: i64, span: Span) -> NodeId {
        self.push(NodeKind::IntLit(value), span)
    }

    pub fn bool_lit(&mut self, value: bool, span: Span) -> NodeId {
        self.push(NodeKind::BoolLit(value), span)
    }

    /// Wire parent links, validate, and freeze the tree.
    pub fn finish(mut self, top_level: Vec<NodeId>) -> Result<SyntaxTree, BuildError> {
        if self.overflow {
            return Err(BuildError::IndexOverflow);
        }
        let len = self.nodes.len();
        let check = |node: NodeId| {
            if (node.0 as usize) < len {
                Ok(())
            } else {
                Err(BuildError::UnknownNode { node, len })
            }
        };

        for id in top_level.iter().copied() {
            check(id)?;
        }

        // Parent wiring: every node may be claimed by at most one parent.
        let ids: Vec<NodeId> = (0..len).map(|i| NodeId(u32::try_from(i).unwrap_or(u32::MAX))).collect();
        for &parent in &ids {
            let children = self.nodes[parent.0 as usize].kind.children();
            for child in children {
                check(child)?;
                let slot = &mut self.nodes[child.0 as usize].parent;
                if let Some(first) = *slot {
                    if first != parent {
                        return Err(BuildError::DuplicateParent {
                            child,
                            first,
                            second: parent,
                        });
                    }
                } else {
                    *slot = Some(parent);
                }
            }
        }

        // Every declaration handle must be backed by a declaration node.
        for (index, &node) in self.decls.iter().enumerate() {
            check(node)?;
            let decl = DeclId(u32::try_from(index).unwrap_or(u32::MAX));
            if self.nodes[node.0 as usize].kind.decl() != Some(decl) {
                return Err(BuildError::NotADeclaration { decl, node });
            }
        }

        Ok(SyntaxTree {
            nodes: self.nodes,
            decls: self.decls,
            types: self.types,
            interner: self.interner,
            top_level,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_finish_wires_parents() {
        let mut b = TreeBuilder::new();
        let lit = b.int_lit(42, Span::new(5, 7));
        let stmt = b.expr_stmt(lit, Span::new(5, 8));
        let body = b.block(vec![stmt], Span::new(0, 10));
        let func = b.function("f", vec![], None, None, Some(body), Span::new(0, 10));
        let tree = b.finish(vec![func.node]).unwrap();
        assert_eq!(tree.parent(lit), Some(stmt));
        assert_eq!(tree.parent(stmt), Some(body));
        assert_eq!(tree.parent(body), Some(func.node));
        assert_eq!(tree.parent(func.node), None);
    }

    #[test]
    fn test_duplicate_parent_rejected() {
        let mut b = TreeBuilder::new();
        let lit = b.int_lit(1, Span::new(0, 1));
        let s1 = b.expr_stmt(lit, Span::new(0, 2));
        let s2 = b.expr_stmt(lit, Span::new(3, 5));
        let body = b.block(vec![s1, s2], Span::new(0, 6));
        let func = b.function("f", vec![], None, None, Some(body), Span::new(0, 6));
        let err = b.finish(vec![func.node]).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateParent { .. }));
    }

    #[test]
    fn test_unknown_top_level_rejected() {
        let b = TreeBuilder::new();
        let err = b.finish(vec![NodeId(7)]).unwrap_err();
        assert!(matches!(err, BuildError::UnknownNode { .. }));
    }

    #[test]
    fn test_index_overflow_rejected() {
        // The flag is only reachable past u32::MAX pushes; set it
        // directly to pin the fail-closed path.
        let mut b = TreeBuilder::new();
        let lit = b.int_lit(1, Span::new(0, 1));
        b.overflow = true;
        let err = b.finish(vec![lit]).unwrap_err();
        assert!(matches!(err, BuildError::IndexOverflow));
    }
}
