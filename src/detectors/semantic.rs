//! Semantic-markup detectors
//!
//! Date text in divs is a direct pool filter. The heading/list/article
//! heuristics run each candidate div through the shared confidence scorer:
//! independent signals contribute weights, rule-specific multiplicative
//! adjustments apply afterwards in a fixed order, and the total is compared
//! against the rule's threshold. The weights and exclusion patterns are
//! deliberate tuning; change them together with their tests.

use crate::classify::CandidatePools;
use crate::detectors::{CheckContext, Detector};
use crate::dom;
use crate::error::DetectorError;
use crate::issue::Issue;
use crate::patterns::{
    self, ARTICLE_CLASS_PATTERNS, CONTENT_CLASS_PATTERNS, DATE_CLASS_PATTERNS,
    HEADING_CLASS_PATTERNS, HEADING_TEXT_PATTERNS, LIST_CLASS_PATTERNS,
    LIST_PARENT_CLASS_PATTERNS, TITLE_CLASS_PATTERNS,
};
use crate::rules::{expect_rule, Rule};
use crate::score::{Confidence, Signal};
use scraper::ElementRef;
use std::collections::{HashMap, HashSet};

const HEADING_THRESHOLD: f64 = 0.8;
const LIST_THRESHOLD: f64 = 0.7;
const ARTICLE_THRESHOLD: f64 = 1.0;

/// Date text living in a div instead of a time element
pub struct DateInDivDetector {
    rule: &'static Rule,
}

impl DateInDivDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("date_in_div"),
        }
    }
}

impl Default for DateInDivDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DateInDivDetector {
    fn name(&self) -> &'static str {
        "date-in-div"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let flagged: Vec<ElementRef<'a>> = pools
            .date_divs
            .iter()
            .copied()
            .filter(|div| {
                let has_time_descendant =
                    dom::descendant_elements(*div).any(|el| el.value().name() == "time");
                let inside_time = dom::closest_tag(*div, "time").is_some();
                // A long text block that merely mentions a date is not a
                // date label.
                let text_len = dom::text_content(*div).chars().count();
                !has_time_descendant && !inside_time && text_len < 100
            })
            .collect();

        if flagged.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            self.rule,
            format!(
                "{} div(s) carry date text that belongs in a <time> element.",
                flagged.len()
            ),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

/// Divs worded and styled like headings
pub struct HeadingInDivDetector {
    rule: &'static Rule,
}

impl HeadingInDivDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("heading_in_div"),
        }
    }
}

impl Default for HeadingInDivDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for HeadingInDivDetector {
    fn name(&self) -> &'static str {
        "heading-in-div"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let flagged: Vec<ElementRef<'a>> = pools
            .divs
            .iter()
            .copied()
            .filter(|div| heading_confidence(*div).meets(HEADING_THRESHOLD))
            .collect();

        if flagged.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            self.rule,
            format!(
                "{} div(s) carry heading-like content without a heading \
                 element.",
                flagged.len()
            ),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

fn heading_confidence(div: ElementRef) -> Confidence {
    let text = dom::text_content(div);
    let class = dom::attr(div, "class").unwrap_or("");

    let pattern_weight = HEADING_TEXT_PATTERNS
        .iter()
        .find(|wp| wp.pattern.is_match(&text))
        .map(|wp| wp.weight)
        .unwrap_or(0.0);

    let char_count = text.chars().count();
    let heading_shaped = (5..=50).contains(&char_count) && !text.contains('\n');

    let large_font = dom::inline_style(div, "font-size")
        .and_then(|v| v.strip_suffix("px").and_then(|n| n.trim().parse::<f64>().ok()))
        .is_some_and(|px| px > 16.0);
    let bold = dom::inline_style(div, "font-weight").is_some_and(|w| {
        w == "bold" || w.parse::<u32>().is_ok_and(|n| n >= 600)
    });

    let in_sectioning = dom::within_tags(div, &["article", "section", "main"]);

    let has_child_heading = dom::descendant_elements(div)
        .any(|el| matches!(el.value().name(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6"));
    let in_form_label = dom::within_tags(div, &["label", "fieldset"]);

    Confidence::from_signals(&[
        Signal::new(pattern_weight > 0.0, pattern_weight),
        Signal::new(HEADING_CLASS_PATTERNS.is_match(class), 0.7),
        Signal::new(heading_shaped, 0.4),
        Signal::new(large_font, 0.3),
        Signal::new(bold, 0.2),
        Signal::new(in_sectioning, 0.2),
    ])
    .veto_if(has_child_heading || in_form_label || patterns::matches_commerce(&text))
}

/// Runs of identically-classed sibling divs that form a list
pub struct ListInDivDetector {
    rule: &'static Rule,
}

impl ListInDivDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("list_in_div"),
        }
    }
}

impl Default for ListInDivDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ListInDivDetector {
    fn name(&self) -> &'static str {
        "list-in-div"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        // Bucket candidate divs by parent, then by exact class string.
        let mut by_parent: HashMap<_, (ElementRef<'a>, Vec<ElementRef<'a>>)> = HashMap::new();
        for div in pools.divs.iter().copied() {
            let Some(parent) = div.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            by_parent
                .entry(parent.id())
                .or_insert_with(|| (parent, Vec::new()))
                .1
                .push(div);
        }

        let mut flagged_ids = HashSet::new();
        for (parent, siblings) in by_parent.into_values() {
            if siblings.len() < 3 {
                continue;
            }

            let mut by_class: HashMap<&str, Vec<ElementRef<'a>>> = HashMap::new();
            for div in &siblings {
                let class = dom::attr(*div, "class").map(str::trim).unwrap_or("");
                if !class.is_empty() {
                    by_class.entry(class).or_default().push(*div);
                }
            }

            for (class, group) in by_class {
                if group.len() < 3 {
                    continue;
                }
                if list_confidence(parent, class, &group).meets(LIST_THRESHOLD) {
                    flagged_ids.extend(group.iter().map(|el| el.id()));
                }
            }
        }

        if flagged_ids.is_empty() {
            return Ok(Vec::new());
        }
        // Report in document order, which the div pool already carries.
        let flagged: Vec<ElementRef<'a>> = pools
            .divs
            .iter()
            .copied()
            .filter(|div| flagged_ids.contains(&div.id()))
            .collect();
        Ok(vec![Issue::new(
            self.rule,
            format!(
                "{} sibling div(s) form list structures without list markup.",
                flagged.len()
            ),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

fn list_confidence(parent: ElementRef, class: &str, group: &[ElementRef]) -> Confidence {
    let child_counts: Vec<usize> = group
        .iter()
        .map(|el| dom::child_elements(*el).len())
        .collect();
    let avg = child_counts.iter().sum::<usize>() as f64 / child_counts.len() as f64;
    let uniform = child_counts
        .iter()
        .all(|&c| (c as f64 - avg).abs() <= 1.0);

    let parent_class = dom::attr(parent, "class").unwrap_or("");

    let positions: Vec<usize> = group
        .iter()
        .map(|el| {
            dom::child_elements(parent)
                .iter()
                .position(|c| c.id() == el.id())
                .unwrap_or(usize::MAX)
        })
        .collect();
    let consecutive = positions
        .windows(2)
        .all(|w| w[0] != usize::MAX && w[1] == w[0] + 1);

    let has_existing_list = dom::descendant_elements(parent)
        .any(|el| matches!(el.value().name(), "ul" | "ol" | "dl"));

    Confidence::from_signals(&[
        Signal::new(LIST_CLASS_PATTERNS.is_match(class), 0.6),
        Signal::new(uniform, 0.4),
        Signal::new(LIST_PARENT_CLASS_PATTERNS.is_match(parent_class), 0.3),
        Signal::new(consecutive, 0.2),
        Signal::new(group.len() >= 5, 0.2),
    ])
    // A real list next to the group suggests the author chose divs for a
    // reason; damp the score instead of vetoing outright.
    .scale_if(has_existing_list, 0.3)
}

/// Dated, titled content blocks that should be article elements
pub struct ArticleInDivDetector {
    rule: &'static Rule,
}

impl ArticleInDivDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("article_in_div"),
        }
    }
}

impl Default for ArticleInDivDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ArticleInDivDetector {
    fn name(&self) -> &'static str {
        "article-in-div"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let flagged: Vec<ElementRef<'a>> = pools
            .divs
            .iter()
            .copied()
            .filter(|div| {
                article_confidence(*div)
                    .map(|c| c.meets(ARTICLE_THRESHOLD))
                    .unwrap_or(false)
            })
            .collect();

        if flagged.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            self.rule,
            format!(
                "{} div(s) hold article-shaped content without an <article> \
                 element.",
                flagged.len()
            ),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

/// `None` when a hard exclusion rules the div out before scoring
fn article_confidence(div: ElementRef) -> Option<Confidence> {
    let text = dom::text_content(div);
    let text_len = text.chars().count();
    let class = dom::attr(div, "class").unwrap_or("");

    let class_of = |el: ElementRef| dom::attr(el, "class").unwrap_or("").to_string();
    let mut has_date_child = false;
    let mut has_title_child = false;
    let mut has_content_child = false;
    let mut has_article_descendant = false;
    let mut paragraph_like = 0usize;
    for el in dom::descendant_elements(div) {
        let child_class = class_of(el);
        has_date_child |= DATE_CLASS_PATTERNS.is_match(&child_class);
        has_title_child |= TITLE_CLASS_PATTERNS.is_match(&child_class);
        has_content_child |= CONTENT_CLASS_PATTERNS.is_match(&child_class);
        match el.value().name() {
            "article" => has_article_descendant = true,
            "p" | "div" => paragraph_like += 1,
            _ => {}
        }
    }

    // Hard exclusions, before any scoring.
    if has_article_descendant
        || dom::closest_tag(div, "article").is_some()
        || text_len < 50
        || dom::within_tags(div, &["nav", "aside", "footer", "header"])
        || ["sidebar", "widget", "banner"]
            .iter()
            .any(|t| dom::closest_class(div, t).is_some())
        || (!has_date_child && !has_title_child)
        || patterns::matches_commerce(&text)
    {
        return None;
    }

    let has_article_class = ARTICLE_CLASS_PATTERNS.is_match(class);
    let has_date_in_text = patterns::matches_date(&text);

    let score = Confidence::from_signals(&[
        Signal::new(has_article_class, 0.5),
        Signal::new(has_date_child && has_title_child, 0.6),
        Signal::new(has_content_child, 0.3),
        Signal::new(text_len >= 100, 0.2),
        Signal::new(has_date_in_text, 0.1),
        Signal::new(paragraph_like >= 2, 0.2),
    ]);

    // Without a strong combination of evidence the additive score alone
    // over-fires; halve it.
    let strong_evidence = (has_article_class && has_date_child && has_content_child)
        || (has_title_child && has_content_child && has_date_in_text && text_len >= 200);

    Some(score.scale_if(!strong_evidence, 0.5))
}
