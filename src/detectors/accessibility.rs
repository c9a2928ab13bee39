//! Accessibility detectors
//!
//! Independent checks over the classified pools: alt text, form labels,
//! ARIA state and role requirements, link-as-button misuse, layout tables.
//! The label lookup is the one secondary query against the document and
//! re-applies the exclusion predicate to what it finds.

use crate::classify::CandidatePools;
use crate::detectors::{CheckContext, Detector};
use crate::dom;
use crate::error::DetectorError;
use crate::issue::Issue;
use crate::patterns::TRACKING_PIXEL_PATTERNS;
use crate::rules::{expect_rule, Rule};
use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static LABEL_FOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("label[for]").expect("static selector"));

/// Images missing alt text, with likely tracking pixels filtered out
pub struct AltTextDetector {
    rule: &'static Rule,
}

impl AltTextDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("missing_alt"),
        }
    }
}

impl Default for AltTextDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for AltTextDetector {
    fn name(&self) -> &'static str {
        "missing-alt"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let flagged: Vec<ElementRef<'a>> = pools
            .images_without_alt
            .iter()
            .copied()
            .filter(|img| !is_tracking_pixel(*img))
            .collect();

        if flagged.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            self.rule,
            format!(
                "{} image(s) have no alt attribute. Screen readers cannot \
                 describe them and search engines cannot index them.",
                flagged.len()
            ),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

/// A tracking pixel: known analytics/ad URL, declared 1x1 dimensions,
/// or hidden outright. Such images are not content and need no alt.
fn is_tracking_pixel(img: ElementRef) -> bool {
    let src = dom::attr(img, "src").unwrap_or("");
    if TRACKING_PIXEL_PATTERNS.iter().any(|re| re.is_match(src)) {
        return true;
    }

    let declared_1x1 = dom::attr(img, "width") == Some("1") && dom::attr(img, "height") == Some("1");
    let styled_1x1 = dom::inline_style(img, "width").as_deref() == Some("1px")
        && dom::inline_style(img, "height").as_deref() == Some("1px");
    if declared_1x1 || styled_1x1 {
        return true;
    }

    dom::is_hidden(img)
}

/// Form controls with no accessible label of any kind
pub struct FormLabelDetector {
    rule: &'static Rule,
}

impl FormLabelDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("missing_form_labels"),
        }
    }
}

impl Default for FormLabelDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for FormLabelDetector {
    fn name(&self) -> &'static str {
        "form-labels"
    }

    fn detect<'a>(
        &self,
        ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        // One pass over the document's labels; labels living in excluded
        // regions do not count as labelling anything.
        let labelled_ids: HashSet<&str> = ctx
            .root
            .select(&LABEL_FOR)
            .filter(|label| !ctx.exclusion.is_excluded(*label))
            .filter_map(|label| dom::attr(label, "for"))
            .collect();

        let flagged: Vec<ElementRef<'a>> = pools
            .form_controls
            .iter()
            .copied()
            .filter(|control| !has_accessible_label(*control, &labelled_ids))
            .collect();

        if flagged.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            self.rule,
            format!(
                "{} form control(s) have no accessible label.",
                flagged.len()
            ),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

fn has_accessible_label(control: ElementRef, labelled_ids: &HashSet<&str>) -> bool {
    if let Some(id) = control.value().id() {
        if labelled_ids.contains(id) {
            return true;
        }
    }
    if dom::attr(control, "aria-label").is_some()
        || dom::attr(control, "aria-labelledby").is_some()
        || dom::attr(control, "placeholder").is_some()
        || dom::attr(control, "title").is_some()
    {
        return true;
    }
    is_search_field(control)
}

/// Search fields carry their context: a bare search box next to a button
/// is understood without a label.
fn is_search_field(control: ElementRef) -> bool {
    let name = dom::attr(control, "name").unwrap_or("");
    name == "q"
        || name == "search"
        || control
            .value()
            .id()
            .is_some_and(|id| id.to_lowercase().contains("search"))
        || dom::class_attr_contains(control, "search")
}

/// Missing aria-expanded on toggles and aria-current on active navigation
pub struct AriaStateDetector {
    expanded_rule: &'static Rule,
    current_rule: &'static Rule,
}

impl AriaStateDetector {
    pub fn new() -> Self {
        Self {
            expanded_rule: expect_rule("missing_aria_expanded"),
            current_rule: expect_rule("missing_aria_current"),
        }
    }
}

impl Default for AriaStateDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for AriaStateDetector {
    fn name(&self) -> &'static str {
        "aria-state"
    }

    fn detect<'a>(
        &self,
        ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let mut issues = Vec::new();

        let missing_expanded: Vec<ElementRef<'a>> = pools
            .expandable_controls
            .iter()
            .copied()
            .filter(|el| el.value().name() != "summary")
            .filter(|el| dom::attr(*el, "aria-expanded").is_none())
            .collect();

        if !missing_expanded.is_empty() {
            issues.push(
                Issue::new(
                    self.expanded_rule,
                    format!(
                        "{} expandable control(s) lack aria-expanded.",
                        missing_expanded.len()
                    ),
                )
                .with_nodes(missing_expanded)
                .with_rule_remediation(),
            );
        }

        let page_url = ctx.config.page_url.as_deref();
        let missing_current: Vec<ElementRef<'a>> = pools
            .navigation_links
            .iter()
            .copied()
            .filter(|link| is_active_link(*link, page_url))
            .filter(|link| dom::attr(*link, "aria-current").is_none())
            .collect();

        if !missing_current.is_empty() {
            issues.push(
                Issue::new(
                    self.current_rule,
                    format!(
                        "{} active navigation link(s) lack aria-current.",
                        missing_current.len()
                    ),
                )
                .with_nodes(missing_current)
                .with_rule_remediation(),
            );
        }

        Ok(issues)
    }
}

/// A link presenting itself as "you are here": an active/current/selected
/// class on itself or an ancestor, or a href equal to the page URL.
fn is_active_link(link: ElementRef, page_url: Option<&str>) -> bool {
    const ACTIVE_TOKENS: [&str; 3] = ["active", "current", "selected"];

    if ACTIVE_TOKENS.iter().any(|t| dom::has_class_token(link, t)) {
        return true;
    }
    if ACTIVE_TOKENS
        .iter()
        .any(|t| dom::closest_class(link, t).is_some())
    {
        return true;
    }
    match (dom::attr(link, "href"), page_url) {
        (Some(href), Some(url)) => href == url,
        _ => false,
    }
}

/// Role-bearing elements missing the companion attributes their role requires
pub struct AriaRequiredDetector {
    rule: &'static Rule,
}

impl AriaRequiredDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("missing_aria_required"),
        }
    }
}

impl Default for AriaRequiredDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for AriaRequiredDetector {
    fn name(&self) -> &'static str {
        "aria-required"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let flagged: Vec<ElementRef<'a>> = pools
            .role_elements
            .iter()
            .copied()
            .filter(|el| violates_role_requirements(*el))
            .collect();

        if flagged.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            self.rule,
            format!(
                "{} element(s) declare a role without its required ARIA \
                 attributes.",
                flagged.len()
            ),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

fn violates_role_requirements(el: ElementRef) -> bool {
    match dom::attr(el, "role").unwrap_or("") {
        "button" => {
            dom::attr(el, "aria-label").is_none()
                && dom::attr(el, "aria-labelledby").is_none()
                && dom::text_content(el).is_empty()
        }
        "tab" => dom::attr(el, "aria-selected").is_none(),
        "tabpanel" => dom::attr(el, "aria-labelledby").is_none(),
        "slider" => {
            dom::attr(el, "aria-valuenow").is_none()
                || dom::attr(el, "aria-valuemin").is_none()
                || dom::attr(el, "aria-valuemax").is_none()
        }
        "progressbar" => dom::attr(el, "aria-valuenow").is_none(),
        _ => false,
    }
}

/// Anchors acting as buttons
pub struct LinkButtonDetector {
    rule: &'static Rule,
}

impl LinkButtonDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("link_button_misuse"),
        }
    }
}

impl Default for LinkButtonDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for LinkButtonDetector {
    fn name(&self) -> &'static str {
        "link-button"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let flagged: Vec<ElementRef<'a>> = pools
            .links
            .iter()
            .copied()
            .filter(|link| is_button_misuse(*link))
            .collect();

        if flagged.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            self.rule,
            format!(
                "{} link(s) act as buttons. Links and buttons announce \
                 differently to assistive technology and behave differently \
                 under keyboard navigation.",
                flagged.len()
            ),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

fn is_button_misuse(link: ElementRef) -> bool {
    let href = dom::attr(link, "href").map(str::trim);
    let has_click_handler = dom::attr(link, "onclick").is_some();

    let inert_href = matches!(href, None | Some("") | Some("#"));
    if inert_href && has_click_handler {
        return true;
    }

    // javascript:void(0) is flagged with or without a handler attribute;
    // the handler is usually attached from script.
    matches!(
        href.map(|h| h.trim_end_matches(';')),
        Some("javascript:void(0)")
    )
}

/// Tables used for layout rather than data
pub struct LayoutTableDetector {
    rule: &'static Rule,
}

impl LayoutTableDetector {
    pub fn new() -> Self {
        Self {
            rule: expect_rule("layout_table_usage"),
        }
    }
}

impl Default for LayoutTableDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for LayoutTableDetector {
    fn name(&self) -> &'static str {
        "layout-table"
    }

    fn detect<'a>(
        &self,
        _ctx: &CheckContext<'a, '_>,
        pools: &CandidatePools<'a>,
    ) -> Result<Vec<Issue<'a>>, DetectorError> {
        let flagged: Vec<ElementRef<'a>> = pools
            .tables
            .iter()
            .copied()
            .filter(|table| is_layout_table(*table))
            .collect();

        if flagged.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            self.rule,
            format!("{} table(s) appear to be used for layout.", flagged.len()),
        )
        .with_nodes(flagged)
        .with_rule_remediation()])
    }
}

fn is_layout_table(table: ElementRef) -> bool {
    let layout_attrs = dom::attr(table, "cellpadding").is_some()
        || dom::attr(table, "cellspacing").is_some()
        || dom::attr(table, "border") == Some("0");
    if !layout_attrs {
        return false;
    }

    let has_data_markers = dom::descendant_elements(table)
        .any(|el| matches!(el.value().name(), "th" | "caption"));
    !has_data_markers
}
