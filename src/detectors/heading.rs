//! Heading-structure detector
//!
//! A state machine over the heading pool in document order. The missing-H1
//! check runs once against the level-1 pool; everything else walks the
//! headings tracking the previous meaningful level. Sub-problems merge
//! into one `heading_structure` issue whose remediation only describes the
//! sub-problem types that actually fired. An image-only H1 is reported
//! separately as informational.

use crate::classify::CandidatePools;
use crate::detectors::{CheckContext, Detector};
use crate::dom;
use crate::error::DetectorError;
use crate::issue::Issue;
use crate::patterns::SIMPLE_INLINE_TAGS;
use crate::rules::{expect_rule, Rule};
use scraper::ElementRef;
use std::collections::HashSet;

/// Sub-problem kinds merged into the heading_structure issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SubProblem {
    Empty,
    Complex,
    FooterH1,
    LevelSkip,
    DuplicateH1,
}

struct Flagged<'a> {
    kind: SubProblem,
    node: ElementRef<'a>,
    detail: String,
}

pub struct HeadingDetector {
    missing_h1: &'static Rule,
    image_only_h1: &'static Rule,
    heading_structure: &'static Rule,
}

impl HeadingDetector {
    pub fn new() -> Self {
        Self {
            missing_h1: expect_rule("missing_h1"),
            image_only_h1: expect_rule("image_only_h1"),
            heading_structure: expect_rule("heading_structure"),
        }
    }
}

impl Default for HeadingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for HeadingDetector {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let mut issues = Vec::new();

        if pools.headings.level(1).is_empty() {
            issues.push(
                Issue::new(self.missing_h1, "The page has no H1 heading.")
                    .with_rule_remediation(),
            );
        }

        let mut flagged: Vec<Flagged<'a>> = Vec::new();
        let mut image_only_nodes: Vec<ElementRef<'a>> = Vec::new();
        let mut previous_level: u8 = 0;
        let first_h1_index = pools
            .headings
            .all
            .iter()
            .position(|h| level_of(*h) == 1);

        for (index, heading) in pools.headings.all.iter().copied().enumerate() {
            let level = level_of(heading);
            let text = dom::text_content(heading);
            let has_visible_text = !text.is_empty();
            let children = dom::child_elements(heading);

            let image_only = is_image_only_h1(level, has_visible_text, &children);
            if image_only {
                image_only_nodes.push(heading);
            }

            if !has_visible_text && !image_only && is_truly_empty(&children) {
                flagged.push(Flagged {
                    kind: SubProblem::Empty,
                    node: heading,
                    detail: format!("H{} has no text content", level),
                });
            }

            if is_complex(heading, &children) {
                flagged.push(Flagged {
                    kind: SubProblem::Complex,
                    node: heading,
                    detail: format!(
                        "H{} wraps {} child elements or deeply nested markup",
                        level,
                        children.len()
                    ),
                });
            }

            if level == 1 && is_footer_decoration(heading) {
                flagged.push(Flagged {
                    kind: SubProblem::FooterH1,
                    node: heading,
                    detail: "H1 used inside a footer".to_string(),
                });
            }

            if index > 0 && level > previous_level + 1 {
                flagged.push(Flagged {
                    kind: SubProblem::LevelSkip,
                    node: heading,
                    detail: format!(
                        "H{} follows H{} (H{} skipped)",
                        level,
                        previous_level,
                        previous_level + 1
                    ),
                });
            }

            if level == 1
                && index > 0
                && !dom::class_attr_contains(heading, "logo")
                && !dom::class_attr_contains(heading, "footer")
                && first_h1_index.is_some_and(|first| index > first)
            {
                flagged.push(Flagged {
                    kind: SubProblem::DuplicateH1,
                    node: heading,
                    detail: format!("additional H1: \"{}\"", dom::truncate(&text, 40)),
                });
            }

            // Headings without textual content do not move the hierarchy.
            if has_visible_text || image_only {
                previous_level = level;
            }
        }

        if !image_only_nodes.is_empty() {
            issues.push(
                Issue::new(
                    self.image_only_h1,
                    format!(
                        "{} H1 heading(s) contain only an image.",
                        image_only_nodes.len()
                    ),
                )
                .with_nodes(image_only_nodes)
                .with_rule_remediation(),
            );
        }

        if !flagged.is_empty() {
            let mut seen = HashSet::new();
            let nodes: Vec<ElementRef<'a>> = flagged
                .iter()
                .map(|f| f.node)
                .filter(|n| seen.insert(n.id()))
                .collect();

            issues.push(
                Issue::new(
                    self.heading_structure,
                    format!(
                        "{} heading(s) break the document hierarchy. A sound \
                         heading structure organizes the page logically and \
                         carries screen-reader navigation.",
                        nodes.len()
                    ),
                )
                .with_nodes(nodes)
                .with_remediation(compose_remediation(&flagged)),
            );
        }

        Ok(issues)
    }
}

fn level_of(heading: ElementRef) -> u8 {
    heading
        .value()
        .name()
        .strip_prefix('h')
        .and_then(|l| l.parse().ok())
        .unwrap_or(0)
}

/// The one permitted textless H1: exactly one image child with real alt text
fn is_image_only_h1(level: u8, has_visible_text: bool, children: &[ElementRef]) -> bool {
    level == 1
        && !has_visible_text
        && children.len() == 1
        && children[0].value().name() == "img"
        && dom::attr_nonempty(children[0], "alt")
}

/// Trimmed text was empty; confirm no child carries text either
fn is_truly_empty(children: &[ElementRef]) -> bool {
    children.is_empty()
        || children
            .iter()
            .map(|c| dom::text_content(*c))
            .collect::<String>()
            .is_empty()
}

/// Complex markup: deep nesting, too many children, or runs of generic
/// wrappers - waived when every child is a simple inline tag.
fn is_complex(heading: ElementRef, children: &[ElementRef]) -> bool {
    let deep = dom::nesting_depth(heading, 3) >= 3;
    let too_many = children.len() >= 5;
    let span_count = children.iter().filter(|c| c.value().name() == "span").count();
    let div_count = children.iter().filter(|c| c.value().name() == "div").count();
    let wrapper_runs = span_count >= 5 || div_count >= 3;

    let only_simple = !children.is_empty()
        && children
            .iter()
            .all(|c| SIMPLE_INLINE_TAGS.contains(&c.value().name()));

    (deep || too_many || wrapper_runs) && !only_simple
}

/// Footer landmark ancestor, or a class list spelling out footer+logo
fn is_footer_decoration(heading: ElementRef) -> bool {
    dom::closest_tag(heading, "footer").is_some()
        || (dom::class_attr_contains(heading, "footer")
            && dom::class_attr_contains(heading, "logo"))
}

/// Remediation composed section by section; sub-problem types with zero
/// matches produce no section.
fn compose_remediation(flagged: &[Flagged]) -> String {
    let sections: [(SubProblem, &str, &str); 5] = [
        (
            SubProblem::Empty,
            "Empty headings",
            "Remove the element or give it real text: <h2>Section title</h2>.",
        ),
        (
            SubProblem::FooterH1,
            "H1 in footer",
            "Move footer logos to a div or span; reserve H1 for the page's main title.",
        ),
        (
            SubProblem::LevelSkip,
            "Skipped heading levels",
            "Renumber the heading or add the missing intermediate level.",
        ),
        (
            SubProblem::DuplicateH1,
            "Multiple H1 headings",
            "Demote the extra H1s to H2 or below; keep one H1 per page.",
        ),
        (
            SubProblem::Complex,
            "Overly complex heading markup",
            "Flatten the heading to plain text or a single inline wrapper: \
             <h2><span>Title</span></h2>.",
        ),
    ];

    let mut out = String::new();
    for (kind, title, fix) in sections {
        let matches: Vec<&Flagged> = flagged.iter().filter(|f| f.kind == kind).collect();
        if matches.is_empty() {
            continue;
        }
        out.push_str(&format!("{} ({}):\n", title, matches.len()));
        for f in &matches {
            out.push_str(&format!("  - {}\n", f.detail));
        }
        out.push_str(&format!("  Fix: {}\n\n", fix));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::config::{Config, ExclusionConfig};
    use crate::exclude::ExclusionFilter;
    use scraper::Html;

    fn detect(html: &Html) -> Vec<Issue<'_>> {
        let config = Config::default();
        let exclusion = ExclusionFilter::new(&ExclusionConfig::default()).unwrap();
        let (pools, _) = classify(html.root_element(), &exclusion);
        let ctx = CheckContext {
            root: html.root_element(),
            config: &config,
            exclusion: &exclusion,
        };
        HeadingDetector::new().detect(&ctx, &pools).unwrap()
    }

    fn issue_for<'a>(issues: &'a [Issue<'a>], rule_id: &str) -> Option<&'a Issue<'a>> {
        issues.iter().find(|i| i.rule.id == rule_id)
    }

    #[test]
    fn test_missing_h1_fires_once_with_no_nodes() {
        let html = Html::parse_document("<h2>only h2</h2>");
        let issues = detect(&html);
        let missing = issue_for(&issues, "missing_h1").unwrap();
        assert!(missing.nodes.is_empty());
        assert_eq!(
            issues.iter().filter(|i| i.rule.id == "missing_h1").count(),
            1
        );
    }

    #[test]
    fn test_single_h1_removes_missing_h1() {
        let html = Html::parse_document("<h1>Title</h1>");
        let issues = detect(&html);
        assert!(issue_for(&issues, "missing_h1").is_none());
        assert!(issue_for(&issues, "heading_structure").is_none());
    }

    #[test]
    fn test_level_skip_boundary() {
        let html = Html::parse_document("<h1>a</h1><h3>b</h3>");
        let issues = detect(&html);
        let structure = issue_for(&issues, "heading_structure").unwrap();
        assert_eq!(structure.nodes.len(), 1);
        assert_eq!(structure.nodes[0].value().name(), "h3");
        assert!(structure.remediation.as_ref().unwrap().contains("Skipped"));

        let clean = Html::parse_document("<h1>a</h1><h2>b</h2><h3>c</h3>");
        assert!(issue_for(&detect(&clean), "heading_structure").is_none());
    }

    #[test]
    fn test_first_heading_never_a_skip() {
        let html = Html::parse_document("<h3>starts deep</h3>");
        let issues = detect(&html);
        // missing_h1 fires, but no level-skip flag on the first heading
        assert!(issue_for(&issues, "heading_structure").is_none());
    }

    #[test]
    fn test_empty_heading_flagged_and_ignored_for_hierarchy() {
        let html = Html::parse_document("<h1>a</h1><h2> </h2><h2>real</h2>");
        let issues = detect(&html);
        let structure = issue_for(&issues, "heading_structure").unwrap();
        assert_eq!(structure.nodes.len(), 1);
        assert_eq!(structure.nodes[0].value().name(), "h2");

        // empty H2 does not advance the level; H1 -> H3 across it still skips
        let skip = Html::parse_document("<h1>a</h1><h2></h2><h3>c</h3>");
        let issues = detect(&skip);
        let structure = issue_for(&issues, "heading_structure").unwrap();
        let details = structure.remediation.as_ref().unwrap();
        assert!(details.contains("Empty headings"));
        assert!(details.contains("Skipped heading levels"));
    }

    #[test]
    fn test_image_only_h1_reported_separately() {
        let html =
            Html::parse_document("<h1><img src=\"logo.png\" alt=\"Shop name\"></h1><h2>s</h2>");
        let issues = detect(&html);
        let info = issue_for(&issues, "image_only_h1").unwrap();
        assert_eq!(info.nodes.len(), 1);
        // not empty, not a structure problem
        assert!(issue_for(&issues, "heading_structure").is_none());
        assert!(issue_for(&issues, "missing_h1").is_none());
    }

    #[test]
    fn test_image_only_h1_advances_hierarchy() {
        let html = Html::parse_document(
            "<h1><img src=\"logo.png\" alt=\"Shop\"></h1><h2>section</h2><h3>sub</h3>",
        );
        let issues = detect(&html);
        assert!(issue_for(&issues, "heading_structure").is_none());
    }

    #[test]
    fn test_image_without_alt_makes_h1_empty() {
        let html = Html::parse_document("<h1><img src=\"logo.png\"></h1>");
        let issues = detect(&html);
        assert!(issue_for(&issues, "image_only_h1").is_none());
        let structure = issue_for(&issues, "heading_structure").unwrap();
        assert!(structure.remediation.as_ref().unwrap().contains("Empty"));
    }

    #[test]
    fn test_duplicate_h1() {
        let html = Html::parse_document("<h1>first</h1><h2>s</h2><h1>second</h1>");
        let issues = detect(&html);
        let structure = issue_for(&issues, "heading_structure").unwrap();
        assert!(structure
            .remediation
            .as_ref()
            .unwrap()
            .contains("Multiple H1"));
        assert_eq!(structure.nodes.len(), 1);
    }

    #[test]
    fn test_footer_h1_flagged() {
        let html =
            Html::parse_document("<h1>main</h1><footer><h1>Site logo</h1></footer>");
        let issues = detect(&html);
        let structure = issue_for(&issues, "heading_structure").unwrap();
        assert!(structure.remediation.as_ref().unwrap().contains("footer"));
    }

    #[test]
    fn test_complex_heading_waived_for_simple_tags() {
        let simple = Html::parse_document(
            "<h1><span>a</span><span>b</span><span>c</span><span>d</span><span>e</span>\
             <span>f</span></h1>",
        );
        assert!(issue_for(&detect(&simple), "heading_structure").is_none());

        let complex = Html::parse_document(
            "<h1><div>a</div><div>b</div><div>c</div></h1><h2>x</h2>",
        );
        let issues = detect(&complex);
        let structure = issue_for(&issues, "heading_structure").unwrap();
        assert!(structure
            .remediation
            .as_ref()
            .unwrap()
            .contains("complex heading markup"));
    }

    #[test]
    fn test_remediation_omits_untriggered_sections() {
        let html = Html::parse_document("<h1>a</h1><h4>skip</h4>");
        let issues = detect(&html);
        let remediation = issue_for(&issues, "heading_structure")
            .unwrap()
            .remediation
            .clone()
            .unwrap();
        assert!(remediation.contains("Skipped heading levels"));
        assert!(!remediation.contains("Empty headings"));
        assert!(!remediation.contains("Multiple H1"));
    }
}
