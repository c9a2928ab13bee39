//! Cleanup detectors
//!
//! Fixed-signature scans over the script and noscript pools plus a meta
//! query. The matching mechanism is fixed; the literal signature lists are
//! deployment data supplied by `SignatureConfig` (with defaults covering
//! the common legacy stacks), compiled once at construction.

use crate::classify::CandidatePools;
use crate::config::SignatureConfig;
use crate::detectors::{CheckContext, Detector};
use crate::dom;
use crate::error::{ConfigError, DetectorError};
use crate::issue::Issue;
use crate::patterns::{LONE_COMMENT, OLD_ROBOTS_DIRECTIVES, TAG_MANAGER_CONTAINER};
use crate::rules::{expect_rule, Rule};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").expect("static selector"));

pub struct CleanupDetector {
    analytics_rule: &'static Rule,
    tag_manager_rule: &'static Rule,
    vendor_rule: &'static Rule,
    noscript_rule: &'static Rule,
    meta_rule: &'static Rule,
    robots_rule: &'static Rule,

    analytics_patterns: Vec<Regex>,
    vendor_patterns: Vec<Regex>,
    tag_manager_ids: Vec<String>,
    retained_meta_selectors: Vec<Selector>,
}

impl CleanupDetector {
    pub fn new(signatures: &SignatureConfig) -> Result<Self, ConfigError> {
        let compile = |patterns: &[String]| -> Result<Vec<Regex>, ConfigError> {
            patterns
                .iter()
                .map(|p| {
                    Regex::new(p)
                        .map_err(|e| ConfigError::Invalid(format!("bad signature '{}': {}", p, e)))
                })
                .collect()
        };

        let mut retained_meta_selectors = Vec::new();
        for raw in &signatures.retained_meta_selectors {
            retained_meta_selectors.push(Selector::parse(raw).map_err(|e| {
                ConfigError::Selector {
                    selector: raw.clone(),
                    message: e.to_string(),
                }
            })?);
        }

        Ok(Self {
            analytics_rule: expect_rule("legacy_analytics"),
            tag_manager_rule: expect_rule("legacy_tag_manager"),
            vendor_rule: expect_rule("vendor_analytics"),
            noscript_rule: expect_rule("unnecessary_noscript"),
            meta_rule: expect_rule("deprecated_meta"),
            robots_rule: expect_rule("old_robots_meta"),
            analytics_patterns: compile(&signatures.analytics_patterns)?,
            vendor_patterns: compile(&signatures.vendor_patterns)?,
            tag_manager_ids: signatures.tag_manager_ids.clone(),
            retained_meta_selectors,
        })
    }

    fn script_matches(&self, script: ElementRef, patterns: &[Regex]) -> bool {
        let content: String = script.text().collect();
        let src = dom::attr(script, "src").unwrap_or("");
        patterns
            .iter()
            .any(|re| re.is_match(&content) || re.is_match(src))
    }

    /// Container-id shaped matches; an explicit id list narrows the scan
    /// to known-orphaned containers.
    fn has_tag_manager(&self, el: ElementRef) -> bool {
        let content: String = el.text().collect();
        let src = dom::attr(el, "src").unwrap_or("");
        if self.tag_manager_ids.is_empty() {
            TAG_MANAGER_CONTAINER.is_match(&content) || TAG_MANAGER_CONTAINER.is_match(src)
        } else {
            self.tag_manager_ids
                .iter()
                .any(|id| content.contains(id.as_str()) || src.contains(id.as_str()))
        }
    }

    fn is_retained_meta(&self, meta: ElementRef) -> bool {
        std::iter::once(*meta)
            .chain(meta.ancestors())
            .filter_map(ElementRef::wrap)
            .any(|node| {
                self.retained_meta_selectors
                    .iter()
                    .any(|sel| sel.matches(&node))
            })
    }
}

impl Detector for CleanupDetector {
    fn name(&self) -> &'static str {
        "cleanup"
    }

    fn detect<'a>(
        &self,
        ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let mut issues = Vec::new();

        let legacy_analytics: Vec<ElementRef<'a>> = pools
            .scripts
            .iter()
            .copied()
            .filter(|s| self.script_matches(*s, &self.analytics_patterns))
            .collect();
        if !legacy_analytics.is_empty() {
            issues.push(
                Issue::new(
                    self.analytics_rule,
                    format!(
                        "{} script(s) carry retired Universal Analytics code.",
                        legacy_analytics.len()
                    ),
                )
                .with_nodes(legacy_analytics)
                .with_rule_remediation(),
            );
        }

        let containers: Vec<ElementRef<'a>> = pools
            .scripts
            .iter()
            .chain(pools.noscripts.iter())
            .copied()
            .filter(|el| self.has_tag_manager(*el))
            .collect();
        if !containers.is_empty() {
            issues.push(
                Issue::new(
                    self.tag_manager_rule,
                    format!(
                        "{} tag-manager container snippet(s) found; verify \
                         each container is still in use.",
                        containers.len()
                    ),
                )
                .with_nodes(containers)
                .with_rule_remediation(),
            );
        }

        let vendor: Vec<ElementRef<'a>> = pools
            .scripts
            .iter()
            .copied()
            .filter(|s| self.script_matches(*s, &self.vendor_patterns))
            .collect();
        if !vendor.is_empty() {
            issues.push(
                Issue::new(
                    self.vendor_rule,
                    format!(
                        "{} script(s) match vendor-analytics signatures.",
                        vendor.len()
                    ),
                )
                .with_nodes(vendor)
                .with_rule_remediation(),
            );
        }

        let empty_noscripts: Vec<ElementRef<'a>> = pools
            .noscripts
            .iter()
            .copied()
            .filter(|n| is_unnecessary_noscript(*n))
            .collect();
        if !empty_noscripts.is_empty() {
            issues.push(
                Issue::new(
                    self.noscript_rule,
                    format!(
                        "{} noscript tag(s) are empty or comment-only.",
                        empty_noscripts.len()
                    ),
                )
                .with_nodes(empty_noscripts)
                .with_rule_remediation(),
            );
        }

        // Meta tags come from a fresh query; it must honour the exclusion
        // predicate like every other lookup.
        let mut deprecated_meta: Vec<ElementRef<'a>> = Vec::new();
        let mut old_robots: Vec<ElementRef<'a>> = Vec::new();
        for meta in ctx.root.select(&META) {
            if ctx.exclusion.is_excluded(meta) {
                continue;
            }
            let name = dom::attr(meta, "name").unwrap_or("");
            let http_equiv = dom::attr(meta, "http-equiv").unwrap_or("");
            let content = dom::attr(meta, "content").unwrap_or("");

            if name.eq_ignore_ascii_case("robots") && OLD_ROBOTS_DIRECTIVES.is_match(content) {
                old_robots.push(meta);
                continue;
            }

            let deprecated = name.eq_ignore_ascii_case("keywords")
                || http_equiv.eq_ignore_ascii_case("pragma")
                || (http_equiv.eq_ignore_ascii_case("expires") && content.trim() == "0");
            if deprecated && !self.is_retained_meta(meta) {
                deprecated_meta.push(meta);
            }
        }

        if !deprecated_meta.is_empty() {
            issues.push(
                Issue::new(
                    self.meta_rule,
                    format!(
                        "{} deprecated meta tag(s) found.",
                        deprecated_meta.len()
                    ),
                )
                .with_nodes(deprecated_meta)
                .with_rule_remediation(),
            );
        }
        if !old_robots.is_empty() {
            issues.push(
                Issue::new(
                    self.robots_rule,
                    format!(
                        "{} robots meta tag(s) carry obsolete directives.",
                        old_robots.len()
                    ),
                )
                .with_nodes(old_robots)
                .with_rule_remediation(),
            );
        }

        Ok(issues)
    }
}

/// Empty after whitespace normalization, or a single comment.
/// noscript content parses as raw text, so the text content is the
/// original inner markup.
fn is_unnecessary_noscript(noscript: ElementRef) -> bool {
    let raw: String = noscript.text().collect();
    let squashed: String = raw.split_whitespace().collect();
    squashed.is_empty() || LONE_COMMENT.is_match(&squashed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::config::{Config, ExclusionConfig};
    use crate::exclude::ExclusionFilter;
    use scraper::Html;

    fn detect_with<'a>(html: &'a Html, config: &Config) -> Vec<Issue<'a>> {
        let exclusion = ExclusionFilter::new(&ExclusionConfig::default()).unwrap();
        let (pools, _) = classify(html.root_element(), &exclusion);
        let ctx = CheckContext {
            root: html.root_element(),
            config,
            exclusion: &exclusion,
        };
        CleanupDetector::new(&config.signatures)
            .unwrap()
            .detect(&ctx, &pools)
            .unwrap()
    }

    fn detect(html: &Html) -> Vec<Issue<'_>> {
        let config = Config::default();
        detect_with(html, &config)
    }

    fn issue_for<'a>(issues: &'a [Issue<'a>], rule_id: &str) -> Option<&'a Issue<'a>> {
        issues.iter().find(|i| i.rule.id == rule_id)
    }

    #[test]
    fn test_legacy_analytics_by_content_and_src() {
        let html = Html::parse_document(
            "<script>var _gaq = _gaq || []; _gaq.push(['_setAccount', 'UA-123456-1']);</script>\
             <script src=\"https://www.google-analytics.com/ga.js\"></script>\
             <script>console.log('modern');</script>",
        );
        let issues = detect(&html);
        let analytics = issue_for(&issues, "legacy_analytics").unwrap();
        assert_eq!(analytics.nodes.len(), 2);
    }

    #[test]
    fn test_tag_manager_generic_and_configured() {
        let source = "<script src=\"https://www.googletagmanager.com/gtm.js?id=GTM-ABC1234\">\
                      </script><noscript><iframe src=\"https://www.googletagmanager.com/ns.html?id=GTM-XYZ9876\"></iframe></noscript>";
        let html = Html::parse_document(source);

        let issues = detect(&html);
        let generic = issue_for(&issues, "legacy_tag_manager").unwrap();
        assert_eq!(generic.nodes.len(), 2);
        assert_eq!(generic.severity, crate::issue::Severity::Info);

        // An explicit id list narrows the match
        let mut config = Config::default();
        config.signatures.tag_manager_ids = vec!["GTM-XYZ9876".to_string()];
        let issues = detect_with(&html, &config);
        let narrowed = issue_for(&issues, "legacy_tag_manager").unwrap();
        assert_eq!(narrowed.nodes.len(), 1);
    }

    #[test]
    fn test_vendor_analytics() {
        let html = Html::parse_document(
            "<script src=\"/sitecatalyst/s_code.js\"></script>\
             <script>var s = s_gi('account'); s.t();</script>",
        );
        let issues = detect(&html);
        let vendor = issue_for(&issues, "vendor_analytics").unwrap();
        assert_eq!(vendor.nodes.len(), 2);
    }

    #[test]
    fn test_unnecessary_noscript() {
        let html = Html::parse_document(
            "<noscript></noscript>\
             <noscript>   </noscript>\
             <noscript><!-- retired pixel --></noscript>\
             <noscript><p>Please enable JavaScript.</p></noscript>",
        );
        let issues = detect(&html);
        let noscript = issue_for(&issues, "unnecessary_noscript").unwrap();
        assert_eq!(noscript.nodes.len(), 3);
    }

    #[test]
    fn test_deprecated_meta() {
        let html = Html::parse_document(
            "<html><head>\
               <meta name=\"keywords\" content=\"a,b,c\">\
               <meta http-equiv=\"Pragma\" content=\"no-cache\">\
               <meta http-equiv=\"expires\" content=\"0\">\
               <meta name=\"description\" content=\"fine\">\
             </head><body></body></html>",
        );
        let issues = detect(&html);
        let meta = issue_for(&issues, "deprecated_meta").unwrap();
        assert_eq!(meta.nodes.len(), 3);
    }

    #[test]
    fn test_old_robots_meta() {
        let html = Html::parse_document(
            "<head><meta name=\"robots\" content=\"index, follow, NOODP\"></head>",
        );
        let issues = detect(&html);
        let robots = issue_for(&issues, "old_robots_meta").unwrap();
        assert_eq!(robots.nodes.len(), 1);
        // an obsolete-directive robots tag is not double-counted as
        // generally deprecated
        assert!(issue_for(&issues, "deprecated_meta").is_none());
    }

    #[test]
    fn test_clean_scripts_produce_nothing() {
        let html = Html::parse_document(
            "<script src=\"/app.js\"></script><noscript><p>fallback</p></noscript>",
        );
        assert!(detect(&html).is_empty());
    }
}
