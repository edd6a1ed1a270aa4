//! The arena-backed syntax tree for one translation unit.

use crate::{DeclId, Interner, Name, Node, NodeId, NodeKind, Span, TypeTable};

/// Immutable syntax tree: node arena, declaration table, type table, and
/// interner. Built once by [`crate::TreeBuilder`], then only read.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) nodes: Vec<Node>,
    /// `DeclId` -> declaring node.
    pub(crate) decls: Vec<NodeId>,
    pub(crate) types: TypeTable,
    pub(crate) interner: Interner,
    /// Top-level declarations (functions and records) in source order.
    pub(crate) top_level: Vec<NodeId>,
}

impl SyntaxTree {
    pub fn node(&self, id: NodeId) -> &Node {
        // Ids are only minted by the builder that produced this arena.
        &self.nodes[id.0 as usize]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Node that declares `decl`, or `None` for a foreign/dangling handle.
    ///
    /// Dangling handles are a malformed-input condition; callers classify
    /// them closed (as escaping), never panic.
    pub fn decl_node(&self, decl: DeclId) -> Option<NodeId> {
        self.decls.get(decl.0 as usize).copied()
    }

    /// Declared name of `decl`, if the handle is valid.
    pub fn decl_name(&self, decl: DeclId) -> Option<Name> {
        self.decl_node(decl)
            .and_then(|node| self.kind(node).decl_name())
    }

    /// Resolve a node to a declaration handle: a declaration node yields
    /// its own handle, a `DeclRef` yields its target.
    pub fn decl_identity(&self, id: NodeId) -> Option<DeclId> {
        match self.kind(id) {
            NodeKind::DeclRef { target } => Some(*target),
            kind => kind.decl(),
        }
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn name(&self, name: Name) -> &str {
        self.interner.resolve(name)
    }

    /// Top-level declarations in source order.
    pub fn top_level(&self) -> &[NodeId] {
        &self.top_level
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order descendants of `root`, excluding `root` itself.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.kind(root).children().into_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Ancestors of `id`, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }
}

/// Pre-order descendant iterator (explicit stack; depth-bounded).
pub struct Descendants<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children = self.tree.kind(id).children();
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}

/// Innermost-to-outermost ancestor iterator.
pub struct Ancestors<'t> {
    tree: &'t SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::{NodeKind, Ownership, Span, TreeBuilder, TypeKind};

    #[test]
    fn test_descendants_preorder() {
        let mut b = TreeBuilder::new();
        let int_ty = b.named_type("int");
        let shared = b.types_mut().intern(TypeKind::Shared(int_ty));
        let factory = b.factory_call(
            Ownership::Shared,
            shared,
            Span::new(10, 21),
            vec![],
            Span::new(10, 25),
        );
        let ret = b.ret(Some(factory), Span::new(3, 26));
        let body = b.block(vec![ret], Span::new(0, 30));
        let func = b.function("make", vec![], None, Some(shared), Some(body), Span::new(0, 30));
        let tree = b.finish(vec![func.node]).unwrap();

        let order: Vec<_> = tree
            .descendants(func.node)
            .map(|id| std::mem::discriminant(tree.kind(id)))
            .collect();
        assert_eq!(order.len(), 3); // block, return, factory call
        // Return's parent chain reaches the function
        assert!(tree.ancestors(factory).any(|a| a == func.node));
    }

    #[test]
    fn test_decl_identity() {
        let mut b = TreeBuilder::new();
        let int_ty = b.named_type("int");
        let shared = b.types_mut().intern(TypeKind::Shared(int_ty));
        let var = b.var("v", None, shared, None, Span::new(0, 10));
        let reference = b.decl_ref(var.decl, Span::new(12, 13));
        let stmt = b.expr_stmt(reference, Span::new(12, 14));
        let body = b.block(vec![var.node, stmt], Span::new(0, 20));
        let func = b.function("f", vec![], None, None, Some(body), Span::new(0, 20));
        let tree = b.finish(vec![func.node]).unwrap();

        assert_eq!(tree.decl_identity(var.node), Some(var.decl));
        assert_eq!(tree.decl_identity(reference), Some(var.decl));
        assert!(matches!(tree.kind(reference), NodeKind::DeclRef { .. }));
        assert_eq!(tree.decl_node(var.decl), Some(var.node));
    }
}
