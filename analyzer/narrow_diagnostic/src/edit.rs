//! The text-edit record.

use narrow_ir::Span;

/// One textual replacement, with the rationale of the rule that produced
/// it and the span of the node that triggered the rule (for localized
/// reporting; the patch itself applies at `span`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    /// Range of source text to replace.
    pub span: Span,
    /// Replacement text.
    pub replacement: String,
    /// Human-readable rationale of the rewrite rule.
    pub rationale: &'static str,
    /// Node that triggered the rule.
    pub anchor: Span,
}

impl Edit {
    pub fn new(
        span: Span,
        replacement: impl Into<String>,
        rationale: &'static str,
        anchor: Span,
    ) -> Self {
        Edit {
            span,
            replacement: replacement.into(),
            rationale,
            anchor,
        }
    }
}
