//! Node classifier
//!
//! One depth-first pass over the document buckets every non-excluded
//! element into the typed candidate pools the detectors consume. Detectors
//! never re-traverse the whole tree; they read these pools (plus bounded
//! secondary lookups).

use crate::dom;
use crate::exclude::ExclusionFilter;
use crate::issue::ScanStats;
use crate::patterns;
use scraper::ElementRef;

/// Heading pools: one per level plus the document-order "all" pool
#[derive(Debug, Default)]
pub struct HeadingPools<'a> {
    /// Every heading in document order
    pub all: Vec<ElementRef<'a>>,
    /// Headings bucketed by level (index 0 = h1)
    pub by_level: [Vec<ElementRef<'a>>; 6],
}

impl<'a> HeadingPools<'a> {
    /// Pool for one level (1-6)
    pub fn level(&self, level: u8) -> &[ElementRef<'a>] {
        &self.by_level[(level - 1) as usize]
    }
}

/// The classifier's output: read-only candidate pools.
///
/// A node appears at most once per pool; unrelated pools may share nodes
/// (an anchor can be both a link and a navigation link).
#[derive(Debug, Default)]
pub struct CandidatePools<'a> {
    pub headings: HeadingPools<'a>,

    /// All images
    pub images: Vec<ElementRef<'a>>,
    /// Images lacking an alt attribute entirely
    pub images_without_alt: Vec<ElementRef<'a>>,

    /// All anchors
    pub links: Vec<ElementRef<'a>>,
    /// Anchors inside navigation-ish containers
    pub navigation_links: Vec<ElementRef<'a>>,

    /// input/select/textarea, minus hidden/submit/button inputs
    pub form_controls: Vec<ElementRef<'a>>,

    /// Any element with a role attribute
    pub role_elements: Vec<ElementRef<'a>>,

    /// Toggle/accordion controls that should expose aria-expanded
    pub expandable_controls: Vec<ElementRef<'a>>,

    pub tables: Vec<ElementRef<'a>>,
    pub scripts: Vec<ElementRef<'a>>,
    pub noscripts: Vec<ElementRef<'a>>,

    /// All divs, for the div-misuse heuristics
    pub divs: Vec<ElementRef<'a>>,
    /// Divs whose text contains a date-like run
    pub date_divs: Vec<ElementRef<'a>>,
    /// Semantic time elements
    pub time_elements: Vec<ElementRef<'a>>,
}

/// Classify every descendant of `root` exactly once.
///
/// Excluded nodes join no pool and do not count as processed. An empty
/// tree yields empty pools - that is a valid result, not an error.
pub fn classify<'a>(
    root: ElementRef<'a>,
    exclusion: &ExclusionFilter,
) -> (CandidatePools<'a>, ScanStats) {
    let mut pools = CandidatePools::default();
    let mut stats = ScanStats::default();

    for node in root.descendants().filter_map(ElementRef::wrap) {
        stats.total_nodes += 1;

        if exclusion.is_excluded(node) {
            stats.excluded_nodes += 1;
            continue;
        }
        stats.processed_nodes += 1;

        classify_element(node, &mut pools);
    }

    log::debug!(
        "classifier: {} nodes, {} excluded, {} processed",
        stats.total_nodes,
        stats.excluded_nodes,
        stats.processed_nodes
    );
    log::debug!(
        "pools: {} headings, {} images ({} without alt), {} links ({} nav), {} form controls, \
         {} role-bearing, {} expandable, {} tables, {} scripts, {} noscripts, {} date divs, \
         {} time elements",
        pools.headings.all.len(),
        pools.images.len(),
        pools.images_without_alt.len(),
        pools.links.len(),
        pools.navigation_links.len(),
        pools.form_controls.len(),
        pools.role_elements.len(),
        pools.expandable_controls.len(),
        pools.tables.len(),
        pools.scripts.len(),
        pools.noscripts.len(),
        pools.date_divs.len(),
        pools.time_elements.len(),
    );

    (pools, stats)
}

fn classify_element<'a>(el: ElementRef<'a>, pools: &mut CandidatePools<'a>) {
    let tag = el.value().name();

    if let Some(level) = heading_level(tag) {
        pools.headings.all.push(el);
        pools.headings.by_level[(level - 1) as usize].push(el);
    }

    match tag {
        "img" => {
            pools.images.push(el);
            if dom::attr(el, "alt").is_none() {
                pools.images_without_alt.push(el);
            }
        }
        "a" => {
            pools.links.push(el);
            if is_navigation_link(el) {
                pools.navigation_links.push(el);
            }
        }
        "input" => {
            let input_type = dom::attr(el, "type").unwrap_or("");
            if !matches!(input_type, "hidden" | "submit" | "button") {
                pools.form_controls.push(el);
            }
        }
        "select" | "textarea" => pools.form_controls.push(el),
        "table" => pools.tables.push(el),
        "script" => pools.scripts.push(el),
        "noscript" => pools.noscripts.push(el),
        "time" => pools.time_elements.push(el),
        "div" => {
            pools.divs.push(el);
            if patterns::matches_date(&dom::text_content(el)) {
                pools.date_divs.push(el);
            }
        }
        _ => {}
    }

    if dom::attr(el, "role").is_some() {
        pools.role_elements.push(el);
    }

    if is_expandable_control(el, tag) {
        pools.expandable_controls.push(el);
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Anchors inside a nav landmark or breadcrumb/pagination containers
fn is_navigation_link(el: ElementRef) -> bool {
    dom::closest_tag(el, "nav").is_some()
        || dom::has_class_token(el, "breadcrumb")
        || dom::has_class_token(el, "pagination")
        || dom::closest_class(el, "breadcrumb").is_some()
        || dom::closest_class(el, "pagination").is_some()
}

/// Toggle/accordion markers, minus the summary of a native disclosure
/// widget (details handles its own state).
fn is_expandable_control(el: ElementRef, tag: &str) -> bool {
    let marked = dom::attr(el, "data-toggle").is_some()
        || dom::attr(el, "aria-controls").is_some()
        || dom::has_class_token(el, "dropdown-toggle")
        || dom::has_class_token(el, "accordion-toggle");
    if !marked {
        return false;
    }
    !(tag == "summary" && dom::closest_tag(el, "details").is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExclusionConfig;
    use scraper::Html;
    use std::collections::HashSet;

    fn run(html: &Html) -> (CandidatePools<'_>, ScanStats) {
        let filter = ExclusionFilter::new(&ExclusionConfig::default()).unwrap();
        classify(html.root_element(), &filter)
    }

    #[test]
    fn test_heading_pools_partition() {
        let html = Html::parse_document(
            "<h1>a</h1><h2>b</h2><h2>c</h2><h4>d</h4><p>not a heading</p>",
        );
        let (pools, _) = run(&html);

        assert_eq!(pools.headings.all.len(), 4);
        assert_eq!(pools.headings.level(1).len(), 1);
        assert_eq!(pools.headings.level(2).len(), 2);
        assert_eq!(pools.headings.level(3).len(), 0);
        assert_eq!(pools.headings.level(4).len(), 1);

        // union of level pools equals the all pool, without overlap
        let union: HashSet<_> = pools
            .headings
            .by_level
            .iter()
            .flatten()
            .map(|el| el.id())
            .collect();
        let all: HashSet<_> = pools.headings.all.iter().map(|el| el.id()).collect();
        assert_eq!(union, all);
        let total: usize = pools.headings.by_level.iter().map(|p| p.len()).sum();
        assert_eq!(total, pools.headings.all.len());
    }

    #[test]
    fn test_image_pools() {
        let html = Html::parse_document(
            "<img src=\"a.png\" alt=\"a\"><img src=\"b.png\"><img src=\"c.png\" alt=\"\">",
        );
        let (pools, _) = run(&html);
        assert_eq!(pools.images.len(), 3);
        // alt=\"\" counts as present; only the attribute-less image qualifies
        assert_eq!(pools.images_without_alt.len(), 1);
    }

    #[test]
    fn test_navigation_links() {
        let html = Html::parse_document(
            "<nav><a href=\"/a\">a</a></nav>\
             <div class=\"breadcrumb\"><a href=\"/b\">b</a></div>\
             <a href=\"/c\" class=\"pagination\">c</a>\
             <a href=\"/d\">plain</a>",
        );
        let (pools, _) = run(&html);
        assert_eq!(pools.links.len(), 4);
        assert_eq!(pools.navigation_links.len(), 3);
    }

    #[test]
    fn test_form_controls_exclude_hidden_submit_button() {
        let html = Html::parse_document(
            "<input type=\"text\"><input type=\"hidden\"><input type=\"submit\">\
             <input type=\"button\"><select></select><textarea></textarea>",
        );
        let (pools, _) = run(&html);
        assert_eq!(pools.form_controls.len(), 3);
    }

    #[test]
    fn test_expandable_excludes_native_summary() {
        let html = Html::parse_document(
            "<button data-toggle=\"menu\">m</button>\
             <details><summary aria-controls=\"x\">open</summary></details>\
             <span class=\"accordion-toggle\">acc</span>",
        );
        let (pools, _) = run(&html);
        assert_eq!(pools.expandable_controls.len(), 2);
    }

    #[test]
    fn test_date_divs() {
        let html = Html::parse_document(
            "<div>2024年3月1日</div><div>plain text</div><div>2023-01-15</div>",
        );
        let (pools, _) = run(&html);
        assert_eq!(pools.date_divs.len(), 2);
    }

    #[test]
    fn test_excluded_nodes_join_no_pool() {
        let html = Html::parse_document(
            "<div id=\"html-semantic-checker-drawer\"><h1>ui</h1><img src=\"x.png\"></div>\
             <h1>real</h1>",
        );
        let (pools, stats) = run(&html);
        assert_eq!(pools.headings.level(1).len(), 1);
        assert!(pools.images.is_empty());
        assert_eq!(stats.excluded_nodes, 3);
    }

    #[test]
    fn test_idempotent() {
        let html = Html::parse_document(
            "<h1>t</h1><nav><a href=\"/\">home</a></nav><img src=\"p.jpg\">",
        );
        let filter = ExclusionFilter::new(&ExclusionConfig::default()).unwrap();
        let (first, s1) = classify(html.root_element(), &filter);
        let (second, s2) = classify(html.root_element(), &filter);

        assert_eq!(s1, s2);
        let ids = |pool: &[ElementRef]| pool.iter().map(|el| el.id()).collect::<Vec<_>>();
        assert_eq!(ids(&first.headings.all), ids(&second.headings.all));
        assert_eq!(ids(&first.links), ids(&second.links));
        assert_eq!(ids(&first.images), ids(&second.images));
    }

    #[test]
    fn test_empty_tree_is_valid() {
        let html = Html::parse_document("");
        let (pools, _) = run(&html);
        assert!(pools.headings.all.is_empty());
        assert!(pools.links.is_empty());
    }
}
