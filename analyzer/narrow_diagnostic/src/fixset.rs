//! The edit applier.

use narrow_ir::Span;

use crate::Edit;

/// Accepted, non-overlapping edits for one translation unit.
///
/// Edits are offered in arrival order; an edit whose span overlaps an
/// already-accepted edit is dropped (first-accepted-wins). Duplicate edits
/// from generously-binding selectors overlap themselves and are dropped
/// the same way.
#[derive(Default, Debug, Clone)]
pub struct FixSet {
    accepted: Vec<Edit>,
}

impl FixSet {
    pub fn new() -> Self {
        FixSet::default()
    }

    /// Offer an edit. Returns `true` if accepted, `false` if dropped
    /// because it overlaps an already-accepted edit.
    pub fn push(&mut self, edit: Edit) -> bool {
        let conflict = self
            .accepted
            .iter()
            .any(|accepted| accepted.span.overlaps(edit.span));
        if conflict {
            return false;
        }
        self.accepted.push(edit);
        true
    }

    /// Offer every edit in order; conflicting ones are dropped silently.
    pub fn extend(&mut self, edits: impl IntoIterator<Item = Edit>) {
        for edit in edits {
            let _ = self.push(edit);
        }
    }

    /// Accepted edits in arrival order.
    pub fn edits(&self) -> &[Edit] {
        &self.accepted
    }

    pub fn into_edits(self) -> Vec<Edit> {
        self.accepted
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Apply the accepted edits to `source`.
    ///
    /// Replacements happen back-to-front so earlier spans stay valid;
    /// spans past the end of `source` are ignored rather than panicking
    /// (a host handing us a mismatched source is not our crash to have).
    pub fn apply_to(&self, source: &str) -> String {
        let mut ordered: Vec<&Edit> = self.accepted.iter().collect();
        ordered.sort_by_key(|edit| std::cmp::Reverse(edit.span.start));

        let mut result = source.to_string();
        for edit in ordered {
            let Span { start, end } = edit.span;
            let (start, end) = (start as usize, end as usize);
            if end > result.len() || start > end {
                continue;
            }
            result.replace_range(start..end, &edit.replacement);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const RATIONALE: &str = "prefer exclusive ownership";

    fn edit(start: u32, end: u32, text: &str) -> Edit {
        Edit::new(Span::new(start, end), text, RATIONALE, Span::new(start, end))
    }

    #[test]
    fn test_accepts_disjoint_edits() {
        let mut fixes = FixSet::new();
        assert!(fixes.push(edit(0, 6, "unique")));
        assert!(fixes.push(edit(10, 16, "unique")));
        assert_eq!(fixes.len(), 2);
    }

    #[test]
    fn test_first_accepted_wins() {
        let mut fixes = FixSet::new();
        assert!(fixes.push(edit(0, 10, "first")));
        assert!(!fixes.push(edit(5, 15, "second")));
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes.edits()[0].replacement, "first");
    }

    #[test]
    fn test_duplicate_edit_dropped() {
        let mut fixes = FixSet::new();
        assert!(fixes.push(edit(3, 9, "unique")));
        assert!(!fixes.push(edit(3, 9, "unique")));
        assert_eq!(fixes.len(), 1);
    }

    #[test]
    fn test_apply_to_replaces_back_to_front() {
        let source = "shared_ptr<int> v = make_shared<int>(42);";
        let mut fixes = FixSet::new();
        fixes.extend([edit(0, 10, "unique_ptr"), edit(20, 31, "make_unique")]);
        assert_eq!(
            fixes.apply_to(source),
            "unique_ptr<int> v = make_unique<int>(42);"
        );
    }

    #[test]
    fn test_apply_to_ignores_out_of_range() {
        let mut fixes = FixSet::new();
        fixes.extend([edit(100, 110, "nope"), edit(0, 3, "yes")]);
        assert_eq!(fixes.apply_to("abcdef"), "yesdef");
    }
}
