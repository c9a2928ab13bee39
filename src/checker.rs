//! The checker engine
//!
//! One check run: classify the tree once, hand the pools to every
//! detector, merge their issues into a severity-sorted result. Detectors
//! are isolated - a failing one is logged and skipped, never aborting the
//! check. The engine is stateless between calls.

use crate::classify::classify;
use crate::config::Config;
use crate::detectors::{default_detectors, CheckContext, Detector};
use crate::error::{CheckError, ConfigError};
use crate::exclude::ExclusionFilter;
use crate::issue::{CheckResult, Issue, PageInfo};
use crate::report::CheckReport;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Instant;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));

/// The checker: configuration, compiled exclusion filter, detector set.
/// Build once, check any number of documents.
pub struct Checker {
    config: Config,
    exclusion: ExclusionFilter,
    detectors: Vec<Box<dyn Detector>>,
}

impl Checker {
    /// Build a checker, compiling selectors and signature patterns once
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let exclusion = ExclusionFilter::new(&config.exclude)?;
        let detectors = default_detectors(&config)?;
        Ok(Self {
            config,
            exclusion,
            detectors,
        })
    }

    /// Replace the detector set (custom rule sets, tests)
    pub fn with_detectors(mut self, detectors: Vec<Box<dyn Detector>>) -> Self {
        self.detectors = detectors;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The compiled exclusion predicate, for hosts that query nodes
    /// outside a check run
    pub fn exclusion(&self) -> &ExclusionFilter {
        &self.exclusion
    }

    /// Check a parsed document
    pub fn check<'a>(&self, html: &'a Html) -> Result<CheckResult<'a>, CheckError> {
        let start = Instant::now();
        let root = html.root_element();

        let (pools, stats) = classify(root, &self.exclusion);

        let ctx = CheckContext {
            root,
            config: &self.config,
            exclusion: &self.exclusion,
        };

        let mut merged: Vec<Issue<'a>> = Vec::new();
        for detector in &self.detectors {
            match detector.detect(&ctx, &pools) {
                Ok(issues) => merged.extend(issues),
                Err(e) => {
                    // A single bad rule must never abort the whole check.
                    log::warn!("skipping failed detector '{}': {}", detector.name(), e);
                }
            }
        }

        let mut issues: Vec<Issue<'a>> = merged
            .into_iter()
            .filter(|issue| self.config.is_rule_enabled(issue.rule.id))
            .map(|mut issue| {
                if let Some(severity) = self.config.severity_override(issue.rule.id) {
                    issue.severity = severity;
                }
                issue
            })
            .collect();

        // Stable: ties keep detector encounter order.
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));

        Ok(CheckResult {
            issues,
            stats,
            page: PageInfo {
                url: self.config.page_url.clone(),
                title: page_title(html),
            },
            duration: start.elapsed(),
            checked_at: std::time::SystemTime::now(),
        })
    }

    /// Parse and check HTML source, returning the serializable report.
    /// Fails fast on empty input so callers can tell "no problems found"
    /// from "nothing was scanned".
    pub fn check_source(&self, source: &str) -> Result<CheckReport, CheckError> {
        if source.trim().is_empty() {
            return Err(CheckError::InvalidInput(
                "empty document source".to_string(),
            ));
        }
        let html = Html::parse_document(source);
        let result = self.check(&html)?;
        Ok(CheckReport::from_result(&result))
    }
}

fn page_title(html: &Html) -> Option<String> {
    html.select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
