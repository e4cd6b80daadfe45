//! Pre-render lint pairing diagram fences with markers.
//!
//! A diagram fence counts as paired when the line right above it mentions the
//! marker keyword. This is an adjacent-line check only: fence bodies aren't
//! parsed and a blank line between marker and fence counts as unpaired.

use dochook_diagrams::DiagramLanguage;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::marker::contains_keyword;

/// Fence counts for one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintReport {
    pub paired: usize,
    pub unpaired: usize,
}

impl LintReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.paired + self.unpaired
    }
}

impl std::ops::AddAssign for LintReport {
    fn add_assign(&mut self, other: Self) {
        self.paired += other.paired;
        self.unpaired += other.unpaired;
    }
}

/// Language of a fence-opening line that takes a marker.
fn marker_fence(line: &str) -> Option<DiagramLanguage> {
    let trimmed = line.trim_start();
    let fence = if trimmed.starts_with("```") {
        '`'
    } else if trimmed.starts_with("~~~") {
        '~'
    } else {
        return None;
    };
    let info = trimmed.trim_start_matches(fence);
    DiagramLanguage::from_info(info).filter(|lang| lang.accepts_marker())
}

/// Count paired and unpaired diagram fences in a markdown page.
///
/// The page itself passes through unchanged. One
/// [`UnpairedDiagrams`](DiagnosticKind::UnpairedDiagrams) warning is pushed
/// when any fence lacks a marker.
pub fn lint_markdown(source: &str, page: &str, diagnostics: &mut Diagnostics) -> LintReport {
    let mut report = LintReport::default();
    let mut previous = "";

    for line in source.lines() {
        if marker_fence(line).is_some() {
            if contains_keyword(previous) {
                report.paired += 1;
            } else {
                report.unpaired += 1;
            }
        }
        previous = line;
    }

    if report.unpaired > 0 {
        diagnostics.push(
            page,
            DiagnosticKind::UnpairedDiagrams {
                paired: report.paired,
                unpaired: report.unpaired,
            },
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lint(source: &str) -> (LintReport, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let report = lint_markdown(source, "page.md", &mut diagnostics);
        (report, diagnostics)
    }

    #[test]
    fn test_paired_fence() {
        let source = "<!-- diagram-a11y: title=\"T\" desc=\"D\" -->\n```plantuml\n@startuml\n@enduml\n```\n";
        let (report, diagnostics) = lint(source);

        assert_eq!(report, LintReport { paired: 1, unpaired: 0 });
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_blank_line_between_counts_as_unpaired() {
        let source = "<!-- diagram-a11y: title=\"T\" desc=\"D\" -->\n\n```dot\ndigraph {}\n```\n";
        let (report, diagnostics) = lint(source);

        assert_eq!(report, LintReport { paired: 0, unpaired: 1 });
        assert_eq!(
            diagnostics.events()[0].kind,
            DiagnosticKind::UnpairedDiagrams {
                paired: 0,
                unpaired: 1
            }
        );
    }

    #[test]
    fn test_recognized_languages() {
        for tag in ["plantuml", "puml", "c4plantuml", "graphviz", "dot", "kroki-dot", "{.graphviz}"] {
            let (report, _) = lint(&format!("text\n```{tag}\nx\n```\n"));
            assert_eq!(report.unpaired, 1, "tag {tag}");
        }
    }

    #[test]
    fn test_mermaid_and_code_fences_ignored() {
        let source = "```mermaid\ngraph TD\n```\n\n```rust\nfn main() {}\n```\n\n```\nplain\n```\n";
        let (report, diagnostics) = lint(source);

        assert_eq!(report.total(), 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_tilde_fence_and_case_insensitive_marker() {
        let source = "<!-- DIAGRAM-A11Y: title=\"T\" desc=\"D\" -->\n~~~graphviz\ndigraph {}\n~~~\n";
        let (report, _) = lint(source);

        assert_eq!(report, LintReport { paired: 1, unpaired: 0 });
    }

    #[test]
    fn test_mixed_page_warns_once() {
        let source = concat!(
            "<!-- diagram-a11y: title=\"A\" desc=\"a\" -->\n```puml\nA\n```\n",
            "```dot\ndigraph {}\n```\n",
            "Some text\n```graphviz\ndigraph {}\n```\n"
        );
        let (report, diagnostics) = lint(source);

        assert_eq!(report, LintReport { paired: 1, unpaired: 2 });
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_language_must_match_exactly() {
        // `dotnet` and `graphviz-like` aren't diagram languages
        let (report, _) = lint("```dotnet\nx\n```\n```graphviz-like\nx\n```\n");
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_report_accumulates() {
        let mut total = LintReport::default();
        total += LintReport { paired: 1, unpaired: 2 };
        total += LintReport { paired: 3, unpaired: 0 };
        assert_eq!(total, LintReport { paired: 4, unpaired: 2 });
    }
}
