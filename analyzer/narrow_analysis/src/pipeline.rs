//! Analysis driver.
//!
//! Top-level declarations are independent units of work (candidates and
//! their usage scopes never cross declaration boundaries), so they run
//! in parallel. The merge is single-threaded and ordered by declaration
//! position: edits from earlier declarations win overlap conflicts
//! deterministically, regardless of scheduling.

use narrow_diagnostic::FixSet;
use narrow_ir::SyntaxTree;
use rayon::prelude::*;
use tracing::debug;

use crate::checks::check_decl;
use crate::NarrowConfig;

/// Run every check with the default configuration.
pub fn analyze(tree: &SyntaxTree) -> FixSet {
    analyze_with_config(tree, &NarrowConfig::default())
}

/// Run every enabled check and merge the accepted edits.
pub fn analyze_with_config(tree: &SyntaxTree, config: &NarrowConfig) -> FixSet {
    let per_decl: Vec<_> = tree
        .top_level()
        .par_iter()
        .map(|&decl| check_decl(tree, decl, config))
        .collect();

    let mut fixes = FixSet::new();
    let mut proposed = 0usize;
    for edits in per_decl {
        proposed += edits.len();
        fixes.extend(edits);
    }
    debug!(
        declarations = tree.top_level().len(),
        proposed,
        accepted = fixes.len(),
        "analysis complete"
    );
    fixes
}
