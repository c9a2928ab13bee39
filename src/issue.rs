//! Issue types for check results

use crate::rules::Rule;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Severity level for issues
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Warning - likely issue
    #[default]
    Warning,
    /// Error - definite problem
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "hint" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Heading hierarchy and content
    Heading,
    /// Accessibility of images, forms, ARIA and tables
    Accessibility,
    /// Semantic markup that should use dedicated elements
    Semantic,
    /// Legacy snippets and dead markup worth removing
    Cleanup,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Heading => write!(f, "heading"),
            Category::Accessibility => write!(f, "accessibility"),
            Category::Semantic => write!(f, "semantic"),
            Category::Cleanup => write!(f, "cleanup"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heading" => Ok(Category::Heading),
            "accessibility" | "a11y" => Ok(Category::Accessibility),
            "semantic" => Ok(Category::Semantic),
            "cleanup" => Ok(Category::Cleanup),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// One reported problem: a rule, a severity, and the nodes it matched.
///
/// Node references borrow the parsed document; an issue never outlives the
/// tree it points into. An empty node list is valid - it reports absence
/// (e.g. a missing H1).
#[derive(Debug, Clone)]
pub struct Issue<'a> {
    /// The rule that produced this issue
    pub rule: &'static Rule,
    /// Severity after any configuration override
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Offending nodes in document order, each at most once
    pub nodes: Vec<ElementRef<'a>>,
    /// Long-form remediation text
    pub remediation: Option<String>,
}

impl<'a> Issue<'a> {
    /// Create a new issue with the rule's default severity
    pub fn new(rule: &'static Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.severity,
            message: message.into(),
            nodes: Vec::new(),
            remediation: None,
        }
    }

    /// Attach offending nodes, removing duplicates while keeping order
    pub fn with_nodes(mut self, nodes: Vec<ElementRef<'a>>) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.nodes = nodes
            .into_iter()
            .filter(|el| seen.insert(el.id()))
            .collect();
        self
    }

    /// Attach remediation text
    pub fn with_remediation(mut self, text: impl Into<String>) -> Self {
        self.remediation = Some(text.into());
        self
    }

    /// Use the rule's static remediation template
    pub fn with_rule_remediation(mut self) -> Self {
        self.remediation = Some(self.rule.remediation.to_string());
        self
    }

    pub fn category(&self) -> Category {
        self.rule.category
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Statistics from a classifier pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Nodes visited by the traversal
    pub total_nodes: usize,
    /// Nodes skipped by the exclusion predicate
    pub excluded_nodes: usize,
    /// Nodes classified into pools
    pub processed_nodes: usize,
}

/// Document-level metadata carried for the presentation layer.
/// The core records it but never interprets it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Source URL, when the host supplied one
    pub url: Option<String>,
    /// Document title text
    pub title: Option<String>,
}

/// Result of a full check run
#[derive(Debug)]
pub struct CheckResult<'a> {
    /// Issues sorted by severity descending (stable within a severity)
    pub issues: Vec<Issue<'a>>,
    /// Classifier statistics
    pub stats: ScanStats,
    /// Page metadata
    pub page: PageInfo,
    /// Wall-clock duration of the check
    pub duration: Duration,
    /// Completion time. The core records it; only the presentation layer
    /// interprets it.
    pub checked_at: SystemTime,
}

impl Default for CheckResult<'_> {
    fn default() -> Self {
        Self {
            issues: Vec::new(),
            stats: ScanStats::default(),
            page: PageInfo::default(),
            duration: Duration::default(),
            checked_at: SystemTime::UNIX_EPOCH,
        }
    }
}

impl<'a> CheckResult<'a> {
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Info).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Check if result is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0 && self.warning_count() == 0
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.error_count() > 0 {
            2
        } else if self.warning_count() > 0 {
            1
        } else {
            0
        }
    }

    /// Group issues by rule id, keeping issue order inside each group
    pub fn group_by_rule(&self) -> Vec<(&'static str, Vec<&Issue<'a>>)> {
        let mut order: Vec<&'static str> = Vec::new();
        let mut groups: std::collections::HashMap<&'static str, Vec<&Issue<'a>>> =
            std::collections::HashMap::new();
        for issue in &self.issues {
            if !groups.contains_key(issue.rule.id) {
                order.push(issue.rule.id);
            }
            groups.entry(issue.rule.id).or_default().push(issue);
        }
        order
            .into_iter()
            .map(|id| (id, groups.remove(id).unwrap_or_default()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("hint".parse::<Severity>(), Ok(Severity::Info));
        assert!("bogus".parse::<Severity>().is_err());
    }

    #[test]
    fn test_category_roundtrip() {
        for cat in [
            Category::Heading,
            Category::Accessibility,
            Category::Semantic,
            Category::Cleanup,
        ] {
            assert_eq!(cat.to_string().parse::<Category>(), Ok(cat));
        }
    }

    #[test]
    fn test_issue_node_dedup() {
        let html = scraper::Html::parse_document("<p>one</p>");
        let root = html.root_element();
        let p = root
            .descendants()
            .filter_map(scraper::ElementRef::wrap)
            .find(|el| el.value().name() == "p")
            .unwrap();

        let issue = Issue::new(rules::rule("missing_alt").unwrap(), "test")
            .with_nodes(vec![p, p, p]);
        assert_eq!(issue.nodes.len(), 1);
    }

    #[test]
    fn test_exit_code() {
        let mut result = CheckResult::default();
        assert_eq!(result.exit_code(), 0);

        let rule = rules::rule("missing_h1").unwrap();
        result.issues.push(Issue::new(rule, "no h1"));
        assert_eq!(result.exit_code(), 2);
    }

    #[test]
    fn test_group_by_rule_keeps_order() {
        let mut result = CheckResult::default();
        let alt = rules::rule("missing_alt").unwrap();
        let h1 = rules::rule("missing_h1").unwrap();
        result.issues.push(Issue::new(alt, "first"));
        result.issues.push(Issue::new(h1, "second"));
        result.issues.push(Issue::new(alt, "third"));

        let groups = result.group_by_rule();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "missing_alt");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "missing_h1");
    }
}
