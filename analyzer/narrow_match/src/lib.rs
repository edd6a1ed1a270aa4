//! Declarative tree matching for the narrow ownership analyzer.
//!
//! A [`Matcher`] is a composed predicate over one syntax node. Matching a
//! node produces zero or more [`Bindings`] environments: zero means "no
//! match" (never an error; absence of a match is the dominant control-flow
//! idiom here), one or more means success, with one environment per way the
//! pattern matched (`for_each_descendant` is the only multiplier).
//!
//! # Design
//!
//! Matchers are plain data, an enum tree you can print and inspect, not
//! closures. Environment propagation is flat-map style: `all_of` threads
//! every environment produced by earlier conjuncts through later ones, so a
//! referential constraint like `equals_bound_decl` always sees the captures
//! bound before it, and a `for_each_descendant` inside an `all_of` yields
//! the full cross product.
//!
//! Referential identity is declaration-handle equality (`DeclId`), never
//! name comparison: two same-spelled variables in sibling branches are
//! different declarations and never conflate.

mod bindings;
mod engine;
mod matcher;

pub use bindings::{Bindings, Capture};
pub use engine::{match_node, match_with};
pub use matcher::{Matcher, Predicate};

// Constructor functions, grouped for glob import in pattern-building code.
pub use matcher::{
    all_of, any_of, anything, bind, callee_in, declared_ownership, each_of, equals_bound_decl,
    factory_of, for_each_descendant, has_ancestor, has_any_argument, has_any_param,
    has_descendant, has_initializer, has_lhs, has_operand, has_return_value, has_rhs,
    has_type_spec, is_call, is_field, is_function, is_member_call, is_param, is_private_field,
    is_record, is_return, is_var, method_in, method_not_in, on_receiver, operator_in, optionally,
    pointee_is_array, ref_to, returns_ownership, unless,
};
