//! Syntax tree data model for the narrow ownership analyzer.
//!
//! This crate holds the read-only view of one translation unit that the
//! analysis runs over:
//!
//! - `Span`: compact 8-byte source ranges
//! - `Name` + `Interner`: interned identifiers
//! - `TypeTable`: resolved type identity with ownership classification
//! - `SyntaxTree`: flat arena of nodes with parent links and declaration
//!   handles (`DeclId`), so "same declaration" is handle equality rather
//!   than name comparison
//! - `TreeBuilder`: how hosts (and tests) assemble a tree; validates
//!   structural invariants on `finish()`
//!
//! # Design
//!
//! No `Box<Node>` anywhere: nodes are `NodeId(u32)` indices into one
//! contiguous array, declarations are `DeclId(u32)` indices into a side
//! table mapping back to the declaring node. The tree is immutable once
//! built; every downstream structure is a derived view discarded after one
//! analysis pass.

mod builder;
mod name;
mod node;
mod span;
mod tree;
mod types;

pub use builder::{BuildError, DeclHandle, TreeBuilder};
pub use name::{Interner, Name};
pub use node::{Access, DeclId, Node, NodeId, NodeKind, OpKind};
pub use span::Span;
pub use tree::{Ancestors, Descendants, SyntaxTree};
pub use types::{Ownership, TypeId, TypeKind, TypeTable};
