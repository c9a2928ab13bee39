//! Grouped output formatter
//!
//! Groups issues by category within each document for review by concern.

use super::{severity_symbol, NamedReport, OutputFormatter};
use crate::issue::Category;
use crate::report::IssueReport;

/// Formatter that groups issues by rule category
pub struct GroupedFormatter {
    /// Show offending node descriptors
    pub show_nodes: bool,
}

impl GroupedFormatter {
    pub fn new() -> Self {
        Self { show_nodes: true }
    }

    pub fn without_nodes(mut self) -> Self {
        self.show_nodes = false;
        self
    }
}

impl Default for GroupedFormatter {
    fn default() -> Self {
        Self::new()
    }
}

const CATEGORY_ORDER: [Category; 4] = [
    Category::Heading,
    Category::Accessibility,
    Category::Semantic,
    Category::Cleanup,
];

impl OutputFormatter for GroupedFormatter {
    fn format(&self, reports: &[NamedReport]) -> String {
        let mut out = String::new();

        for (source, report) in reports {
            out.push_str(&format!("\n{}\n", source));
            out.push_str(&format!("{}\n", "─".repeat(source.len().min(80))));

            if report.issues.is_empty() {
                out.push_str("  no issues\n");
                continue;
            }

            for category in CATEGORY_ORDER {
                let issues: Vec<&IssueReport> = report
                    .issues
                    .iter()
                    .filter(|i| i.category == category)
                    .collect();
                if issues.is_empty() {
                    continue;
                }

                out.push_str(&format!("  {} ({})\n", category, issues.len()));
                for issue in issues {
                    out.push_str(&format!(
                        "    [{}] {}: {}\n",
                        severity_symbol(issue.severity),
                        issue.rule,
                        issue.message
                    ));
                    if self.show_nodes {
                        for node in &issue.nodes {
                            out.push_str(&format!("        {}\n", node));
                        }
                    }
                }
            }

            out.push_str(&format!(
                "\n  {} error(s), {} warning(s), {} info(s)\n",
                report.error_count(),
                report.warning_count(),
                report.info_count()
            ));
        }

        out
    }
}
