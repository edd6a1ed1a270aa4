//! Flat arena node types.
//!
//! Nodes reference children by `NodeId` index; declarations additionally
//! carry a `DeclId` handle into the tree's declaration table. All
//! references to a declaration (`DeclRef`) point at the handle, so two
//! same-spelled variables in sibling branches are distinct candidates.

use smallvec::SmallVec;

use crate::{Name, Ownership, Span, TypeId};

/// Arena index of a node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Handle identifying a declaration. Handle equality is the referential
/// identity the matcher's `equals_bound_decl` constraint compares.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Member accessibility.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Access {
    Public,
    Private,
}

/// Overloaded operators the escape table distinguishes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OpKind {
    /// `lhs = rhs`
    Assign,
    /// `*ptr`
    Deref,
    /// `ptr->member`
    Arrow,
    /// `ptr[index]`
    Index,
}

/// One arena node: kind, source range, parent link.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Node kinds.
///
/// Declarations carry their resolved type (`TypeId`) separately from the
/// *written* annotation (`spec`, a `TypeSpec` child): an inferred
/// declaration has a type but no spec, which is exactly what the
/// `optionally`-bound type-spec captures in the rewrite rules rely on.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Function or method declaration.
    Function {
        name: Name,
        decl: DeclId,
        params: SmallVec<[NodeId; 4]>,
        /// Written return-type annotation, if any.
        return_spec: Option<NodeId>,
        /// Resolved return type, if the function returns a value.
        return_ty: Option<TypeId>,
        /// Body block; `None` for a bare prototype.
        body: Option<NodeId>,
    },
    /// Class/record declaration: fields and methods.
    Record {
        name: Name,
        decl: DeclId,
        members: SmallVec<[NodeId; 8]>,
    },
    /// Local variable declaration.
    Var {
        name: Name,
        decl: DeclId,
        spec: Option<NodeId>,
        ty: TypeId,
        init: Option<NodeId>,
    },
    /// Data-member declaration inside a record.
    Field {
        name: Name,
        decl: DeclId,
        spec: Option<NodeId>,
        ty: TypeId,
        access: Access,
    },
    /// Function parameter declaration.
    Param {
        name: Name,
        decl: DeclId,
        spec: Option<NodeId>,
        ty: TypeId,
    },
    /// A written type annotation. `head` is the sub-span of the head name
    /// (`shared_ptr` in `shared_ptr<int>`), which is what the type rewrite
    /// replaces.
    TypeSpec { ty: TypeId, head: Span },
    /// Reference to a declaration (variable, parameter, or data member).
    DeclRef { target: DeclId },
    /// Call to a free (non-member) function.
    Call {
        callee: Name,
        args: SmallVec<[NodeId; 4]>,
    },
    /// Member call `receiver.method(args)`.
    MemberCall {
        receiver: NodeId,
        method: Name,
        args: SmallVec<[NodeId; 2]>,
    },
    /// Overloaded operator use.
    OperatorCall {
        op: OpKind,
        lhs: NodeId,
        rhs: Option<NodeId>,
    },
    /// Construction of a new ownership-managed value (`make_shared`-style).
    /// `callee` is the sub-span naming the factory, which the rewrite
    /// replaces with the exclusive-ownership equivalent.
    FactoryCall {
        ownership: Ownership,
        result: TypeId,
        callee: Span,
        args: SmallVec<[NodeId; 2]>,
    },
    /// Return statement.
    Return { value: Option<NodeId> },
    /// Statement block.
    Block { stmts: Vec<NodeId> },
    /// Conditional.
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    /// Expression evaluated for effect.
    ExprStmt { expr: NodeId },
    /// Integer literal.
    IntLit(i64),
    /// Boolean literal.
    BoolLit(bool),
}

impl NodeKind {
    /// Declaration handle, if this node declares something.
    pub fn decl(&self) -> Option<DeclId> {
        match self {
            NodeKind::Function { decl, .. }
            | NodeKind::Record { decl, .. }
            | NodeKind::Var { decl, .. }
            | NodeKind::Field { decl, .. }
            | NodeKind::Param { decl, .. } => Some(*decl),
            _ => None,
        }
    }

    /// Declared name, if this node declares something.
    pub fn decl_name(&self) -> Option<Name> {
        match self {
            NodeKind::Function { name, .. }
            | NodeKind::Record { name, .. }
            | NodeKind::Var { name, .. }
            | NodeKind::Field { name, .. }
            | NodeKind::Param { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// Child nodes in source order.
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        match self {
            NodeKind::Function {
                params,
                return_spec,
                body,
                ..
            } => {
                out.extend(params.iter().copied());
                out.extend(return_spec.iter().copied());
                out.extend(body.iter().copied());
            }
            NodeKind::Record { members, .. } => out.extend(members.iter().copied()),
            NodeKind::Var { spec, init, .. } => {
                out.extend(spec.iter().copied());
                out.extend(init.iter().copied());
            }
            NodeKind::Field { spec, .. } | NodeKind::Param { spec, .. } => {
                out.extend(spec.iter().copied());
            }
            NodeKind::Call { args, .. } => out.extend(args.iter().copied()),
            NodeKind::MemberCall { receiver, args, .. } => {
                out.push(*receiver);
                out.extend(args.iter().copied());
            }
            NodeKind::OperatorCall { lhs, rhs, .. } => {
                out.push(*lhs);
                out.extend(rhs.iter().copied());
            }
            NodeKind::FactoryCall { args, .. } => out.extend(args.iter().copied()),
            NodeKind::Return { value } => out.extend(value.iter().copied()),
            NodeKind::Block { stmts } => out.extend(stmts.iter().copied()),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(*cond);
                out.push(*then_branch);
                out.extend(else_branch.iter().copied());
            }
            NodeKind::ExprStmt { expr } => out.push(*expr),
            NodeKind::TypeSpec { .. }
            | NodeKind::DeclRef { .. }
            | NodeKind::IntLit(_)
            | NodeKind::BoolLit(_) => {}
        }
        out
    }
}
