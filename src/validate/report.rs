//! Plain-text validation reports.
//!
//! Rendering is pure formatting: every number printed is derived from the
//! issue list being rendered, so a report can never disagree with it.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueKind, Severity};

/// Counts over one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid: usize,
    pub errors: usize,
    pub warnings: usize,
    pub by_kind: BTreeMap<IssueKind, usize>,
}

impl ValidationSummary {
    /// Derives the summary from the items processed and the issues raised.
    #[must_use]
    pub fn from_issues(total: usize, valid: usize, issues: &[Issue]) -> Self {
        let mut summary = Self {
            total,
            valid,
            ..Self::default()
        };
        for issue in issues {
            match issue.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
            }
            *summary.by_kind.entry(issue.kind).or_insert(0) += 1;
        }
        summary
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.errors + self.warnings
    }
}

/// Renders a report: counts, then issues grouped by kind, then one line per issue.
#[must_use]
pub fn render_report(title: &str, total: usize, valid: usize, issues: &[Issue]) -> String {
    let summary = ValidationSummary::from_issues(total, valid, issues);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    let _ = writeln!(out, "Total items: {}", summary.total);
    let _ = writeln!(out, "Valid: {}", summary.valid);
    let _ = writeln!(
        out,
        "Issues: {} ({} errors, {} warnings)",
        summary.issue_count(),
        summary.errors,
        summary.warnings
    );

    if issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No issues found.");
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Issues by type:");
    for (kind, count) in &summary.by_kind {
        let _ = writeln!(out, "  {kind}: {count}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Details:");
    for issue in issues {
        let _ = writeln!(
            out,
            "  [{}] #{} {}: {}",
            issue.severity, issue.position, issue.kind, issue.message
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues() -> Vec<Issue> {
        vec![
            Issue::new(2, "P53", IssueKind::PreviousSymbol, "'P53' is a previous symbol of TP53"),
            Issue::new(3, "NOTREAL", IssueKind::NotFound, "'NOTREAL' did not match any record"),
            Issue::new(4, "", IssueKind::EmptyOrNa, "Item 4 is empty or NA"),
        ]
    }

    #[test]
    fn summary_counts_by_severity_and_kind() {
        let summary = ValidationSummary::from_issues(4, 1, &issues());
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 2);
        assert_eq!(summary.issue_count(), 3);
        assert_eq!(summary.by_kind.get(&IssueKind::NotFound), Some(&1));
    }

    #[test]
    fn report_sections_in_order() {
        let report = render_report("Panel validation", 4, 1, &issues());
        let counts = report.find("Issues: 3 (1 errors, 2 warnings)").unwrap();
        let by_type = report.find("Issues by type:").unwrap();
        let details = report.find("Details:").unwrap();
        assert!(counts < by_type && by_type < details);

        assert!(report.starts_with("Panel validation\n================\n"));
        assert!(report.contains("  not_found: 1\n"));
        assert!(report.contains("  [ERROR] #3 not_found: 'NOTREAL' did not match any record\n"));
        assert!(report.contains("  [WARNING] #2 previous_symbol:"));
    }

    #[test]
    fn issue_groups_follow_kind_order() {
        let report = render_report("R", 4, 1, &issues());
        let empty = report.find("  empty_or_na: 1").unwrap();
        let not_found = report.find("  not_found: 1").unwrap();
        let previous = report.find("  previous_symbol: 1").unwrap();
        assert!(empty < not_found && not_found < previous);
    }

    #[test]
    fn clean_report() {
        let report = render_report("R", 2, 2, &[]);
        assert!(report.contains("Issues: 0 (0 errors, 0 warnings)"));
        assert!(report.ends_with("No issues found.\n"));
        assert!(!report.contains("Details:"));
    }
}
