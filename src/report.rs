//! Serializable check reports
//!
//! Live node references cannot cross a serialization boundary, so the
//! report carries everything else: rule id, severity, category, message,
//! remediation, and per-node short descriptors plus a count. Hosts relay
//! this across process or frame boundaries and round-trip it losslessly.

use crate::dom;
use crate::issue::{Category, CheckResult, Issue, ScanStats, Severity};
use serde::{Deserialize, Serialize};

/// One issue, projected for serialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueReport {
    /// Stable rule id
    pub rule: String,
    /// Human-readable rule name
    pub name: String,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    /// Number of offending nodes
    pub node_count: usize,
    /// Short descriptors of the offending nodes, in document order
    #[serde(default)]
    pub nodes: Vec<String>,
}

impl IssueReport {
    pub fn from_issue(issue: &Issue<'_>) -> Self {
        Self {
            rule: issue.rule.id.to_string(),
            name: issue.rule.name.to_string(),
            severity: issue.severity,
            category: issue.category(),
            message: issue.message.clone(),
            remediation: issue.remediation.clone(),
            node_count: issue.nodes.len(),
            nodes: issue.nodes.iter().map(|el| dom::describe(*el)).collect(),
        }
    }
}

/// A full check run, projected for serialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub stats: ScanStats,
    /// Check duration in milliseconds
    pub duration_ms: u64,
    /// Completion time, milliseconds since the Unix epoch
    pub checked_at_ms: u64,
    pub issues: Vec<IssueReport>,
}

impl CheckReport {
    pub fn from_result(result: &CheckResult<'_>) -> Self {
        Self {
            url: result.page.url.clone(),
            title: result.page.title.clone(),
            stats: result.stats,
            duration_ms: result.duration.as_millis() as u64,
            checked_at_ms: result
                .checked_at
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
            issues: result.issues.iter().map(IssueReport::from_issue).collect(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Info)
            .count()
    }

    /// Get exit code (0 = clean, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.error_count() > 0 {
            2
        } else if self.warning_count() > 0 {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Checker;
    use crate::config::Config;

    #[test]
    fn test_report_round_trip() {
        let mut config = Config::default();
        config.page_url = Some("https://example.com/page".to_string());
        let checker = Checker::new(config).unwrap();
        let report = checker
            .check_source(
                "<html><head><title>T</title></head><body>\
                   <h2>no h1</h2><img src=\"/a.jpg\">\
                 </body></html>",
            )
            .unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let back: CheckReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);

        // the fields the host needs survive the boundary
        let missing_h1 = back.issues.iter().find(|i| i.rule == "missing_h1").unwrap();
        assert_eq!(missing_h1.severity, Severity::Error);
        assert_eq!(missing_h1.category, Category::Heading);
        assert_eq!(missing_h1.node_count, 0);
        assert!(missing_h1.remediation.is_some());

        let alt = back.issues.iter().find(|i| i.rule == "missing_alt").unwrap();
        assert_eq!(alt.node_count, 1);
        assert!(alt.nodes[0].contains("a.jpg"));
    }

    #[test]
    fn test_exit_codes() {
        let checker = Checker::new(Config::default()).unwrap();
        let clean = checker
            .check_source("<h1>t</h1>")
            .unwrap();
        assert_eq!(clean.exit_code(), 0);

        let errors = checker.check_source("<h2>no h1</h2>").unwrap();
        assert_eq!(errors.exit_code(), 2);
    }
}
