//! Edit records and the edit applier.
//!
//! The analysis produces an ordered sequence of
//! `{ span, replacement, rationale }` records; the host applies them as an
//! in-place fix or presents a diff. [`FixSet`] is the one serialization
//! point of the pipeline: it accepts edits in arrival order and enforces
//! the no-overlap invariant: first accepted wins, and a later conflicting
//! edit is dropped, never an error.

mod edit;
pub mod emitter;
mod fixset;

pub use edit::Edit;
pub use fixset::FixSet;
