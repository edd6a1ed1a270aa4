//! The matcher combinator tree.
//!
//! Composite combinators mirror the classic AST-matcher vocabulary
//! (`all_of`, `any_of`, `unless`, `has_descendant`, ...); leaf predicates
//! are the node-level checks the ownership analysis needs. Everything is
//! inspectable data so rule ordering and recursion stay first-class values.

use narrow_ir::{OpKind, Ownership};

use crate::Capture;

/// A composed predicate over one syntax node.
#[derive(Clone, Debug)]
pub enum Matcher {
    /// Succeeds iff every sub-pattern succeeds against the same node;
    /// environments thread left to right (flat-map).
    AllOf(Vec<Matcher>),
    /// First succeeding sub-pattern wins; short-circuits.
    AnyOf(Vec<Matcher>),
    /// Union of the environments of *all* succeeding sub-patterns.
    EachOf(Vec<Matcher>),
    /// Succeeds iff the sub-pattern fails; binds nothing.
    Unless(Box<Matcher>),
    /// Always succeeds; keeps the sub-pattern's bindings when it matches.
    Optionally(Box<Matcher>),
    /// Existential pre-order search; binds from the first witness.
    HasDescendant(Box<Matcher>),
    /// Existential search innermost-to-outermost.
    HasAncestor(Box<Matcher>),
    /// One environment per matching descendant.
    ForEachDescendant(Box<Matcher>),
    /// Bind the current node to a capture when the sub-pattern succeeds.
    Bind(Capture, Box<Matcher>),
    /// Referential identity: the current node is the same *declaration* as
    /// the node already bound to the capture.
    EqualsBoundDecl(Capture),
    /// Leaf predicate.
    Is(Predicate),
    /// Matches any node.
    Anything,
}

/// Leaf node predicates.
#[derive(Clone, Debug)]
pub enum Predicate {
    IsFunction,
    IsRecord,
    IsVar,
    IsField,
    IsParam,
    IsReturn,
    /// Free (non-member) function call.
    IsCall,
    /// Member call.
    IsMemberCall,
    /// Declaration whose ownership type points at an array
    /// (`shared_ptr<T[]>`); drives the array-decay parameter rewrite.
    PointeeIsArray,
    /// Field with non-public accessibility.
    IsPrivateField,
    /// Declaration (var/field/param) whose resolved type has the given
    /// ownership discipline.
    DeclaredOwnership(Ownership),
    /// Function whose resolved return type has the given ownership.
    ReturnsOwnership(Ownership),
    /// Factory construction of a value with the given ownership.
    FactoryOf(Ownership),
    /// `DeclRef` whose target's *declaring node* matches.
    RefTo(Box<Matcher>),
    /// Var with an initializer matching.
    HasInitializer(Box<Matcher>),
    /// Function with some parameter matching.
    HasAnyParam(Box<Matcher>),
    /// Call/member-call/factory-call with some argument matching.
    HasAnyArgument(Box<Matcher>),
    /// Return statement whose value matches.
    HasReturnValue(Box<Matcher>),
    /// Member call whose receiver matches.
    OnReceiver(Box<Matcher>),
    /// Member call whose method name is in the list.
    MethodIn(Vec<String>),
    /// Member call whose method name is *not* in the list.
    MethodNotIn(Vec<String>),
    /// Free-function call whose callee name is in the list.
    CalleeIn(Vec<String>),
    /// Operator call whose operator is in the list.
    OperatorIn(Vec<OpKind>),
    /// Operator call whose left operand matches.
    HasLhs(Box<Matcher>),
    /// Operator call whose right operand matches.
    HasRhs(Box<Matcher>),
    /// Operator call with either operand matching.
    HasOperand(Box<Matcher>),
    /// Declaration with a written type annotation matching.
    HasTypeSpec(Box<Matcher>),
}

impl Matcher {
    /// Bind the matched node to `name`.
    #[must_use]
    pub fn bind(self, name: Capture) -> Matcher {
        Matcher::Bind(name, Box::new(self))
    }
}

// -- Composite constructors --

pub fn all_of(matchers: Vec<Matcher>) -> Matcher {
    Matcher::AllOf(matchers)
}

pub fn any_of(matchers: Vec<Matcher>) -> Matcher {
    Matcher::AnyOf(matchers)
}

pub fn each_of(matchers: Vec<Matcher>) -> Matcher {
    Matcher::EachOf(matchers)
}

pub fn unless(matcher: Matcher) -> Matcher {
    Matcher::Unless(Box::new(matcher))
}

pub fn optionally(matcher: Matcher) -> Matcher {
    Matcher::Optionally(Box::new(matcher))
}

pub fn has_descendant(matcher: Matcher) -> Matcher {
    Matcher::HasDescendant(Box::new(matcher))
}

pub fn has_ancestor(matcher: Matcher) -> Matcher {
    Matcher::HasAncestor(Box::new(matcher))
}

pub fn for_each_descendant(matcher: Matcher) -> Matcher {
    Matcher::ForEachDescendant(Box::new(matcher))
}

pub fn bind(name: Capture, matcher: Matcher) -> Matcher {
    matcher.bind(name)
}

pub fn equals_bound_decl(name: Capture) -> Matcher {
    Matcher::EqualsBoundDecl(name)
}

pub fn anything() -> Matcher {
    Matcher::Anything
}

// -- Leaf constructors --

pub fn is_function() -> Matcher {
    Matcher::Is(Predicate::IsFunction)
}

pub fn is_record() -> Matcher {
    Matcher::Is(Predicate::IsRecord)
}

pub fn is_var() -> Matcher {
    Matcher::Is(Predicate::IsVar)
}

pub fn is_field() -> Matcher {
    Matcher::Is(Predicate::IsField)
}

pub fn is_param() -> Matcher {
    Matcher::Is(Predicate::IsParam)
}

pub fn is_return() -> Matcher {
    Matcher::Is(Predicate::IsReturn)
}

pub fn is_call() -> Matcher {
    Matcher::Is(Predicate::IsCall)
}

pub fn is_member_call() -> Matcher {
    Matcher::Is(Predicate::IsMemberCall)
}

pub fn pointee_is_array() -> Matcher {
    Matcher::Is(Predicate::PointeeIsArray)
}

pub fn is_private_field() -> Matcher {
    Matcher::Is(Predicate::IsPrivateField)
}

pub fn declared_ownership(ownership: Ownership) -> Matcher {
    Matcher::Is(Predicate::DeclaredOwnership(ownership))
}

pub fn returns_ownership(ownership: Ownership) -> Matcher {
    Matcher::Is(Predicate::ReturnsOwnership(ownership))
}

pub fn factory_of(ownership: Ownership) -> Matcher {
    Matcher::Is(Predicate::FactoryOf(ownership))
}

pub fn ref_to(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::RefTo(Box::new(matcher)))
}

pub fn has_initializer(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::HasInitializer(Box::new(matcher)))
}

pub fn has_any_param(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::HasAnyParam(Box::new(matcher)))
}

pub fn has_any_argument(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::HasAnyArgument(Box::new(matcher)))
}

pub fn has_return_value(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::HasReturnValue(Box::new(matcher)))
}

pub fn on_receiver(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::OnReceiver(Box::new(matcher)))
}

pub fn method_in(names: &[&str]) -> Matcher {
    Matcher::Is(Predicate::MethodIn(
        names.iter().map(ToString::to_string).collect(),
    ))
}

pub fn method_not_in(names: &[&str]) -> Matcher {
    Matcher::Is(Predicate::MethodNotIn(
        names.iter().map(ToString::to_string).collect(),
    ))
}

pub fn callee_in(names: &[&str]) -> Matcher {
    Matcher::Is(Predicate::CalleeIn(
        names.iter().map(ToString::to_string).collect(),
    ))
}

pub fn operator_in(ops: &[OpKind]) -> Matcher {
    Matcher::Is(Predicate::OperatorIn(ops.to_vec()))
}

pub fn has_lhs(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::HasLhs(Box::new(matcher)))
}

pub fn has_rhs(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::HasRhs(Box::new(matcher)))
}

pub fn has_operand(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::HasOperand(Box::new(matcher)))
}

pub fn has_type_spec(matcher: Matcher) -> Matcher {
    Matcher::Is(Predicate::HasTypeSpec(Box::new(matcher)))
}
