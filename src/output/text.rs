//! Plain text output formatter

use super::{NamedReport, OutputFormatter};
use crate::issue::Severity;
use crate::report::IssueReport;
use colored::Colorize;

/// Default human-readable formatter
pub struct TextFormatter {
    /// Show scan statistics after each report
    pub show_stats: bool,
    /// Show remediation text under each issue
    pub show_remediation: bool,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self {
            show_stats: false,
            show_remediation: true,
        }
    }

    pub fn with_stats(mut self) -> Self {
        self.show_stats = true;
        self
    }

    pub fn without_remediation(mut self) -> Self {
        self.show_remediation = false;
        self
    }

    fn severity_label(&self, severity: Severity) -> String {
        match severity {
            Severity::Error => "error".red().bold().to_string(),
            Severity::Warning => "warning".yellow().bold().to_string(),
            Severity::Info => "info".blue().bold().to_string(),
        }
    }

    fn format_issue(&self, issue: &IssueReport) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "  {}[{}] {}\n",
            self.severity_label(issue.severity),
            issue.rule.cyan(),
            issue.name.bold()
        ));
        out.push_str(&format!("    {}\n", issue.message));

        for node in &issue.nodes {
            out.push_str(&format!("    - {}\n", node.dimmed()));
        }

        if self.show_remediation {
            if let Some(remediation) = &issue.remediation {
                for line in remediation.lines() {
                    out.push_str(&format!("    {} {}\n", "help:".green(), line));
                }
            }
        }
        out
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, reports: &[NamedReport]) -> String {
        let mut out = String::new();
        let mut total_errors = 0;
        let mut total_warnings = 0;
        let mut total_infos = 0;

        for (source, report) in reports {
            if report.issues.is_empty() {
                out.push_str(&format!("{}: {}\n", source.bold(), "clean".green()));
            } else {
                out.push_str(&format!(
                    "{}: {} issue(s)\n",
                    source.bold(),
                    report.issues.len()
                ));
                for issue in &report.issues {
                    out.push_str(&self.format_issue(issue));
                }
            }

            if self.show_stats {
                out.push_str(&format!(
                    "  scanned {} nodes ({} excluded, {} classified) in {}ms\n",
                    report.stats.total_nodes,
                    report.stats.excluded_nodes,
                    report.stats.processed_nodes,
                    report.duration_ms
                ));
            }

            total_errors += report.error_count();
            total_warnings += report.warning_count();
            total_infos += report.info_count();
        }

        if reports.len() > 1 || total_errors + total_warnings + total_infos > 0 {
            out.push_str(&format!(
                "\n{} error(s), {} warning(s), {} info(s) in {} document(s)\n",
                total_errors,
                total_warnings,
                total_infos,
                reports.len()
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Checker;
    use crate::config::Config;
    use crate::report::CheckReport;

    fn report_for(source: &str) -> CheckReport {
        Checker::new(Config::default())
            .unwrap()
            .check_source(source)
            .unwrap()
    }

    #[test]
    fn test_text_output_lists_issues() {
        colored::control::set_override(false);
        let report = report_for("<h2>no h1</h2><img src=\"/x.jpg\">");
        let output = TextFormatter::new().format(&[("page.html".to_string(), report)]);
        assert!(output.contains("page.html"));
        assert!(output.contains("missing_h1"));
        assert!(output.contains("missing_alt"));
        assert!(output.contains("error(s)"));
    }

    #[test]
    fn test_clean_document_output() {
        colored::control::set_override(false);
        let report = report_for("<h1>fine</h1>");
        let output = TextFormatter::new().format(&[("ok.html".to_string(), report)]);
        assert!(output.contains("clean"));
    }
}
