//! Binding environments produced by successful matches.

use narrow_ir::NodeId;
use smallvec::SmallVec;

/// Capture name. Patterns are built in code, so static strings suffice.
pub type Capture = &'static str;

/// One name→node environment from a successful match attempt.
///
/// Environments are small (a handful of captures per rule), so this is a
/// linear-scan association list rather than a hash map. Insertion with an
/// existing name overrides it; collisions should not occur in well-formed
/// patterns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: SmallVec<[(Capture, NodeId); 4]>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    /// Node bound to `name`, if any.
    pub fn get(&self, name: Capture) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, node)| *node)
    }

    /// Whether `name` is bound. The "if bound" edit condition reads this.
    pub fn is_bound(&self, name: Capture) -> bool {
        self.get(name).is_some()
    }

    /// Bind `name` to `node`, overriding any previous binding.
    pub fn insert(&mut self, name: Capture, node: NodeId) {
        if let Some(entry) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            entry.1 = node;
        } else {
            self.entries.push((name, node));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capture, NodeId)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use narrow_ir::{Span, TreeBuilder};

    use super::*;

    fn two_nodes() -> (NodeId, NodeId) {
        let mut b = TreeBuilder::new();
        let a = b.int_lit(1, Span::new(0, 1));
        let c = b.int_lit(2, Span::new(2, 3));
        (a, c)
    }

    #[test]
    fn test_insert_and_get() {
        let (a, _) = two_nodes();
        let mut env = Bindings::new();
        env.insert("candidate", a);
        assert_eq!(env.get("candidate"), Some(a));
        assert!(env.is_bound("candidate"));
        assert!(!env.is_bound("other"));
    }

    #[test]
    fn test_insert_overrides() {
        let (a, c) = two_nodes();
        let mut env = Bindings::new();
        env.insert("x", a);
        env.insert("x", c);
        assert_eq!(env.get("x"), Some(c));
        assert_eq!(env.len(), 1);
    }
}
