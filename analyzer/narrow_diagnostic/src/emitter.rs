//! Human-readable rendering of accepted edits.
//!
//! The edit list is the primary output contract; this module is the
//! host-facing convenience that turns it into ariadne reports, one per
//! edit, located at the anchor node that triggered the rule.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::FixSet;

/// Render one report per accepted edit into a string.
///
/// `name` is the display name of the translation unit; `source` its text.
/// Rendering is best-effort: an edit whose spans fall outside `source` is
/// skipped.
pub fn render_reports(name: &str, source: &str, fixes: &FixSet) -> String {
    let mut out = Vec::new();
    for edit in fixes.edits() {
        let anchor = clamp(edit.anchor.start as usize..edit.anchor.end as usize, source);
        let target = clamp(edit.span.start as usize..edit.span.end as usize, source);
        let report = Report::build(ReportKind::Advice, name, anchor.start)
            .with_config(Config::default().with_color(false))
            .with_message(edit.rationale)
            .with_label(
                Label::new((name, target))
                    .with_message(format!("replace with `{}`", edit.replacement)),
            )
            .with_label(Label::new((name, anchor)).with_message("for this declaration"))
            .finish();
        // Rendering failures only lose pretty output, never edits.
        let _ = report.write((name, Source::from(source)), &mut out);
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn clamp(range: Range<usize>, source: &str) -> Range<usize> {
    let end = range.end.min(source.len());
    let start = range.start.min(end);
    start..end
}

#[cfg(test)]
mod tests {
    use narrow_ir::Span;

    use crate::Edit;

    use super::*;

    #[test]
    fn test_render_contains_rationale_and_replacement() {
        let source = "shared_ptr<int> make() { return make_shared<int>(42); }";
        let mut fixes = FixSet::new();
        fixes.extend([Edit::new(
            Span::new(0, 10),
            "unique_ptr",
            "prefer exclusive ownership for factory returns",
            Span::new(0, 22),
        )]);
        let rendered = render_reports("sample", source, &fixes);
        assert!(rendered.contains("prefer exclusive ownership for factory returns"));
        assert!(rendered.contains("unique_ptr"));
    }

    #[test]
    fn test_render_empty_fixset_is_empty() {
        assert_eq!(render_reports("sample", "code", &FixSet::new()), "");
    }
}
