//! Rewrite rule composition.
//!
//! A [`RuleSet`] is an ordered list of `(pattern, edits, rationale)`
//! rules with first-applicable semantics: at most one rule fires per
//! node, which prevents double-rewriting. Rules may recursively apply a
//! different rule set to every descendant of an already-bound node
//! (two-phase rewriting: certify the whole declaration first, then
//! rewrite its initializers and call sites as sub-passes).
//!
//! Ordering and recursion are explicit values here, not control flow.

use narrow_diagnostic::Edit;
use narrow_ir::{NodeId, NodeKind, Span, SyntaxTree};
use narrow_match::{match_with, Bindings, Capture, Matcher};

/// Which range of a bound node an edit replaces.
#[derive(Clone, Debug)]
pub enum RangeSelector {
    /// The node's full span.
    Node(Capture),
    /// The node's "name" span: the callee of a factory call, the head of
    /// a type spec. Falls back to the full span for other kinds.
    Name(Capture),
}

/// Replacement-text template, evaluated against a binding environment.
#[derive(Clone, Debug)]
pub enum TextTemplate {
    Literal(String),
    /// Spelled name of the declaration bound to the capture.
    DeclName(Capture),
    /// Display of the pointee of the bound declaration's ownership type
    /// (`int` for a `shared_ptr<int>` declaration).
    PointeeDisplay(Capture),
    /// Display of the element type when the pointee is an array
    /// (`int` for `shared_ptr<int[]>`).
    ElementDisplay(Capture),
    Concat(Vec<TextTemplate>),
    /// Choose by whether a capture is bound.
    IfBound {
        capture: Capture,
        then: Box<TextTemplate>,
        otherwise: Box<TextTemplate>,
    },
}

impl TextTemplate {
    pub fn literal(text: impl Into<String>) -> Self {
        TextTemplate::Literal(text.into())
    }
}

/// One edit-producing step of a rule.
#[derive(Clone, Debug)]
pub enum EditTemplate {
    /// Replace the selected range with the template text.
    /// Produces nothing when the capture is unbound.
    ChangeTo {
        target: RangeSelector,
        text: TextTemplate,
    },
    /// Apply the inner template only when the capture is bound.
    IfBound {
        capture: Capture,
        then: Box<EditTemplate>,
    },
    /// Apply a rule set to every descendant of the bound node, threading
    /// the current environment into each attempt.
    RewriteDescendants { capture: Capture, rules: RuleSet },
}

impl EditTemplate {
    pub fn change_to(target: RangeSelector, text: TextTemplate) -> Self {
        EditTemplate::ChangeTo { target, text }
    }

    pub fn if_bound(capture: Capture, then: EditTemplate) -> Self {
        EditTemplate::IfBound {
            capture,
            then: Box::new(then),
        }
    }

    pub fn rewrite_descendants(capture: Capture, rules: RuleSet) -> Self {
        EditTemplate::RewriteDescendants { capture, rules }
    }
}

/// A pattern, the edits it produces, and its human-readable rationale.
#[derive(Clone, Debug)]
pub struct RewriteRule {
    pub pattern: Matcher,
    pub edits: Vec<EditTemplate>,
    pub rationale: &'static str,
}

impl RewriteRule {
    pub fn new(pattern: Matcher, edits: Vec<EditTemplate>, rationale: &'static str) -> Self {
        RewriteRule {
            pattern,
            edits,
            rationale,
        }
    }
}

/// Ordered alternatives; the first rule whose pattern matches wins.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        RuleSet { rules }
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Try each rule in order against `node`; the first whose pattern
    /// matches produces edits (one batch per binding environment) and
    /// stops the search. A fired rule with nothing to change still
    /// consumes the node.
    pub fn apply_first(&self, tree: &SyntaxTree, node: NodeId, env: &Bindings) -> Vec<Edit> {
        for rule in &self.rules {
            let envs = match_with(tree, &rule.pattern, node, env);
            if envs.is_empty() {
                continue;
            }
            let anchor = tree.span(node);
            let mut edits = Vec::new();
            for matched in &envs {
                for template in &rule.edits {
                    instantiate(template, tree, matched, anchor, rule.rationale, &mut edits);
                }
            }
            return edits;
        }
        Vec::new()
    }

    /// Apply the set to every descendant of `root`.
    pub fn apply_to_descendants(
        &self,
        tree: &SyntaxTree,
        root: NodeId,
        env: &Bindings,
    ) -> Vec<Edit> {
        let mut edits = Vec::new();
        for node in tree.descendants(root) {
            edits.extend(self.apply_first(tree, node, env));
        }
        edits
    }
}

fn instantiate(
    template: &EditTemplate,
    tree: &SyntaxTree,
    env: &Bindings,
    anchor: Span,
    rationale: &'static str,
    out: &mut Vec<Edit>,
) {
    match template {
        EditTemplate::ChangeTo { target, text } => {
            let (capture, use_name_span) = match target {
                RangeSelector::Node(c) => (*c, false),
                RangeSelector::Name(c) => (*c, true),
            };
            let Some(node) = env.get(capture) else {
                return;
            };
            let Some(replacement) = render(text, tree, env) else {
                return;
            };
            let span = if use_name_span {
                name_span(tree, node)
            } else {
                tree.span(node)
            };
            out.push(Edit::new(span, replacement, rationale, anchor));
        }
        EditTemplate::IfBound { capture, then } => {
            if env.is_bound(*capture) {
                instantiate(then, tree, env, anchor, rationale, out);
            }
        }
        EditTemplate::RewriteDescendants { capture, rules } => {
            let Some(root) = env.get(capture) else {
                return;
            };
            out.extend(rules.apply_to_descendants(tree, root, env));
        }
    }
}

/// The replaceable "name" range of a node.
fn name_span(tree: &SyntaxTree, node: NodeId) -> Span {
    match tree.kind(node) {
        NodeKind::FactoryCall { callee, .. } => *callee,
        NodeKind::TypeSpec { head, .. } => *head,
        _ => tree.span(node),
    }
}

fn render(template: &TextTemplate, tree: &SyntaxTree, env: &Bindings) -> Option<String> {
    match template {
        TextTemplate::Literal(text) => Some(text.clone()),
        TextTemplate::DeclName(capture) => {
            let node = env.get(*capture)?;
            let decl = tree.decl_identity(node)?;
            let name = tree.decl_name(decl)?;
            Some(tree.name(name).to_string())
        }
        TextTemplate::PointeeDisplay(capture) => {
            let pointee = declared_pointee(tree, env.get(*capture)?)?;
            Some(tree.types().display(pointee, tree.interner()))
        }
        TextTemplate::ElementDisplay(capture) => {
            let pointee = declared_pointee(tree, env.get(*capture)?)?;
            match tree.types().kind(pointee) {
                narrow_ir::TypeKind::Array(element) => {
                    Some(tree.types().display(*element, tree.interner()))
                }
                _ => None,
            }
        }
        TextTemplate::Concat(parts) => {
            let mut text = String::new();
            for part in parts {
                text.push_str(&render(part, tree, env)?);
            }
            Some(text)
        }
        TextTemplate::IfBound {
            capture,
            then,
            otherwise,
        } => {
            if env.is_bound(*capture) {
                render(then, tree, env)
            } else {
                render(otherwise, tree, env)
            }
        }
    }
}

/// Pointee of a declaration's ownership type.
fn declared_pointee(tree: &SyntaxTree, node: NodeId) -> Option<narrow_ir::TypeId> {
    let ty = match tree.kind(node) {
        NodeKind::Var { ty, .. } | NodeKind::Field { ty, .. } | NodeKind::Param { ty, .. } => *ty,
        _ => return None,
    };
    tree.types().pointee(ty)
}
