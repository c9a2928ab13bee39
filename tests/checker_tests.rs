//! End-to-end checks over the public API

use pretty_assertions::assert_eq;
use scraper::Html;
use semlint::{classify, Checker, Config, ExclusionFilter, Severity};

fn checker() -> Checker {
    Checker::new(Config::default()).unwrap()
}

#[test]
fn clean_document_yields_no_issues() {
    let report = checker()
        .check_source(
            "<html><head><title>Product page</title></head><body>\
               <h1>Product name</h1>\
               <h2>Details</h2>\
               <img src=\"/product.jpg\" alt=\"The product\">\
               <nav><a href=\"/home\">Home</a></nav>\
               <label for=\"qty\">Quantity</label><input id=\"qty\" type=\"number\">\
             </body></html>",
        )
        .unwrap();
    assert_eq!(report.issues, vec![]);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn missing_h1_monotonicity() {
    let without = checker().check_source("<h2>section</h2>").unwrap();
    let missing: Vec<_> = without
        .issues
        .iter()
        .filter(|i| i.rule == "missing_h1")
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].node_count, 0);

    let with = checker()
        .check_source("<h1>title</h1><h2>section</h2>")
        .unwrap();
    assert!(with.issues.iter().all(|i| i.rule != "missing_h1"));
}

#[test]
fn level_skip_boundary() {
    let skipped = checker().check_source("<h1>a</h1><h3>b</h3>").unwrap();
    let structure = skipped
        .issues
        .iter()
        .find(|i| i.rule == "heading_structure")
        .unwrap();
    assert_eq!(structure.node_count, 1);

    let sequential = checker()
        .check_source("<h1>a</h1><h2>b</h2><h3>c</h3>")
        .unwrap();
    assert!(sequential
        .issues
        .iter()
        .all(|i| i.rule != "heading_structure"));
}

#[test]
fn tracking_pixel_excluded_from_missing_alt() {
    let report = checker()
        .check_source(
            "<h1>t</h1>\
             <img src=\"https://x.doubleclick.net/pixel\" width=\"1\" height=\"1\">\
             <img src=\"/product.jpg\">",
        )
        .unwrap();
    let alt = report
        .issues
        .iter()
        .find(|i| i.rule == "missing_alt")
        .unwrap();
    assert_eq!(alt.node_count, 1);
    assert!(alt.nodes[0].contains("product.jpg"));
    assert!(!alt.nodes.iter().any(|n| n.contains("doubleclick")));
}

#[test]
fn link_button_misuse_cases() {
    let report = checker()
        .check_source(
            "<h1>t</h1>\
             <a href=\"#\" onclick=\"f()\">Submit</a>\
             <a href=\"/page\">Page</a>\
             <a href=\"javascript:void(0)\">X</a>",
        )
        .unwrap();
    let misuse = report
        .issues
        .iter()
        .find(|i| i.rule == "link_button_misuse")
        .unwrap();
    assert_eq!(misuse.node_count, 2);
    assert!(!misuse.nodes.iter().any(|n| n.contains("/page")));
}

#[test]
fn reserved_namespace_invisible_to_every_detector() {
    // A drawer full of nodes every detector would otherwise flag.
    let source = "<h1>real title</h1>\
         <div id=\"html-semantic-checker-drawer\">\
           <h1></h1>\
           <img src=\"/oops.png\">\
           <a href=\"#\" onclick=\"x()\">btn</a>\
           <input type=\"text\">\
           <div>2024年3月1日</div>\
           <table cellpadding=\"0\"><tr><td>x</td></tr></table>\
           <script>_gat._getTracker('UA-1-1');</script>\
         </div>";
    let report = checker().check_source(source).unwrap();
    assert_eq!(report.issues, vec![]);

    // Host-supplied excluded selectors behave the same way.
    let mut config = Config::default();
    config
        .exclude
        .excluded_selectors
        .push(".legacy-footer".to_string());
    let report = Checker::new(config)
        .unwrap()
        .check_source(
            "<h1>real</h1>\
             <div class=\"legacy-footer\"><img src=\"/old.png\"></div>",
        )
        .unwrap();
    assert_eq!(report.issues, vec![]);
}

#[test]
fn severity_ordering_is_stable() {
    // missing_alt (error), heading level skip (warning),
    // unnecessary_noscript (info), missing_form_labels (error):
    // output must read error, error, warning, info with encounter order
    // preserved between the two errors.
    let report = checker()
        .check_source(
            "<h1>t</h1><h3>skip</h3>\
             <img src=\"/a.jpg\">\
             <input type=\"text\">\
             <noscript></noscript>",
        )
        .unwrap();

    let severities: Vec<Severity> = report.issues.iter().map(|i| i.severity).collect();
    let mut sorted = severities.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(severities, sorted);

    let error_rules: Vec<&str> = report
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .map(|i| i.rule.as_str())
        .collect();
    // alt detector runs before the form-label detector
    assert_eq!(error_rules, vec!["missing_alt", "missing_form_labels"]);
}

#[test]
fn date_in_div_scenario() {
    let flagged = checker().check_source("<h1>t</h1><div>2024年3月1日</div>").unwrap();
    let date = flagged
        .issues
        .iter()
        .find(|i| i.rule == "date_in_div")
        .unwrap();
    assert_eq!(date.node_count, 1);

    let wrapped = checker()
        .check_source("<h1>t</h1><time datetime=\"2024-03-01\">2024年3月1日</time>")
        .unwrap();
    assert!(wrapped.issues.iter().all(|i| i.rule != "date_in_div"));
}

#[test]
fn classifier_idempotent_over_unmodified_tree() {
    let html = Html::parse_document(
        "<h1>a</h1><h2>b</h2><img src=\"/x.png\" alt=\"x\">\
         <nav><a href=\"/\">home</a></nav><div>2024-01-01</div>",
    );
    let config = Config::default();
    let filter = ExclusionFilter::new(&config.exclude).unwrap();

    let (first, stats1) = classify(html.root_element(), &filter);
    let (second, stats2) = classify(html.root_element(), &filter);

    assert_eq!(stats1, stats2);
    let ids = |pool: &[scraper::ElementRef]| {
        pool.iter().map(|el| el.id()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first.headings.all), ids(&second.headings.all));
    assert_eq!(ids(&first.images), ids(&second.images));
    assert_eq!(ids(&first.navigation_links), ids(&second.navigation_links));
    assert_eq!(ids(&first.date_divs), ids(&second.date_divs));
}

#[test]
fn config_file_round_trip() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
    write!(
        file,
        "rules:\n  disabled:\n    - missing_h1\nexclude:\n  excluded_selectors:\n    - \".skip-me\"\n"
    )
    .unwrap();

    let config = Config::load_file(file.path()).unwrap();
    let report = Checker::new(config)
        .unwrap()
        .check_source("<h2>no h1, but rule disabled</h2><div class=\"skip-me\"><img src=\"/x.png\"></div>")
        .unwrap();
    assert_eq!(report.issues, vec![]);
}

#[test]
fn aggregated_issue_nodes_unique() {
    // a footer H1 that is also a duplicate H1 appears once in the
    // heading_structure node list
    let report = checker()
        .check_source("<h1>main</h1><footer><h1>logo</h1></footer>")
        .unwrap();
    let structure = report
        .issues
        .iter()
        .find(|i| i.rule == "heading_structure")
        .unwrap();
    assert_eq!(structure.node_count, 1);
}
