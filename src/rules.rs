//! Static rule registry
//!
//! Rules are data, not code: a rule names the concern, its category and its
//! default severity; the evaluation logic lives in the detector that owns
//! it. Detectors fetch their rules once at construction instead of looking
//! them up per call.

use crate::issue::{Category, Severity};
use serde::Serialize;

/// A static rule descriptor
#[derive(Debug, Serialize)]
pub struct Rule {
    /// Stable identifier (e.g. "missing_alt")
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Category this rule belongs to
    pub category: Category,
    /// Default severity (configuration may override)
    pub severity: Severity,
    /// What the rule detects
    pub description: &'static str,
    /// Short remediation template
    pub remediation: &'static str,
}

/// All rules known to the engine, in registry order
pub static ALL_RULES: &[Rule] = &[
    Rule {
        id: "missing_h1",
        name: "Missing H1 heading",
        category: Category::Heading,
        severity: Severity::Error,
        description: "The page has no H1 heading. The H1 carries the main \
                      title of the page for both search engines and screen \
                      readers.",
        remediation: "Add a single <h1> holding the page's main topic, placed \
                      before the other headings. Use the page's own subject, \
                      not the site name or a generic greeting.",
    },
    Rule {
        id: "heading_structure",
        name: "Improper heading structure",
        category: Category::Heading,
        severity: Severity::Warning,
        description: "One or more headings break the document hierarchy: \
                      empty headings, skipped levels, duplicate H1s, footer \
                      H1s or overly complex heading markup.",
        remediation: "Keep headings simple, textual and sequential: one H1, \
                      no skipped levels, no decorative headings.",
    },
    Rule {
        id: "image_only_h1",
        name: "Image-only H1",
        category: Category::Heading,
        severity: Severity::Info,
        description: "The H1 contains only an image. Even with alt text, a \
                      text-based H1 serves search engines and assistive \
                      technology better.",
        remediation: "Replace with a text H1 and move the image out: \
                      <h1>Page title</h1> plus a separate <img>.",
    },
    Rule {
        id: "missing_alt",
        name: "Images without alt text",
        category: Category::Accessibility,
        severity: Severity::Error,
        description: "Content images are missing the alt attribute, so \
                      screen readers cannot describe them and search engines \
                      cannot index them.",
        remediation: "Describe the image content: <img src=\"shoes.jpg\" \
                      alt=\"Black running shoes\">. Purely decorative images \
                      take an empty alt=\"\".",
    },
    Rule {
        id: "missing_form_labels",
        name: "Form controls without labels",
        category: Category::Accessibility,
        severity: Severity::Error,
        description: "Form controls lack any accessible label (label[for], \
                      aria-label, aria-labelledby, placeholder or title).",
        remediation: "Pair each control with a label: <label \
                      for=\"email\">Email</label> <input id=\"email\">, or \
                      use aria-label when no visible label fits.",
    },
    Rule {
        id: "missing_aria_expanded",
        name: "Expandable controls without aria-expanded",
        category: Category::Accessibility,
        severity: Severity::Warning,
        description: "Toggle/accordion controls do not expose their open \
                      state via aria-expanded.",
        remediation: "Set aria-expanded=\"false\" on the trigger and update \
                      it when the controlled region opens, pairing it with \
                      aria-controls.",
    },
    Rule {
        id: "missing_aria_current",
        name: "Active navigation links without aria-current",
        category: Category::Accessibility,
        severity: Severity::Warning,
        description: "Navigation links that visually mark the current page \
                      do not carry aria-current.",
        remediation: "Add aria-current=\"page\" to the link for the page the \
                      user is on, alongside the visual active styling.",
    },
    Rule {
        id: "missing_aria_required",
        name: "Roles missing required ARIA attributes",
        category: Category::Accessibility,
        severity: Severity::Error,
        description: "Elements declare a role without the companion ARIA \
                      attributes that role requires (e.g. role=tab without \
                      aria-selected).",
        remediation: "Supply the role's required attributes: button needs an \
                      accessible name, tab needs aria-selected, tabpanel \
                      needs aria-labelledby, slider needs \
                      aria-valuenow/min/max, progressbar needs aria-valuenow.",
    },
    Rule {
        id: "link_button_misuse",
        name: "Links used as buttons",
        category: Category::Accessibility,
        severity: Severity::Error,
        description: "Anchors with href=\"#\" plus a click handler, or \
                      javascript:void(0) hrefs, act as buttons while \
                      announcing themselves as links.",
        remediation: "Use <button type=\"button\"> for script actions and \
                      reserve <a> for real navigation targets.",
    },
    Rule {
        id: "layout_table_usage",
        name: "Tables used for layout",
        category: Category::Accessibility,
        severity: Severity::Error,
        description: "Tables carrying layout attributes (cellpadding, \
                      cellspacing, border=\"0\") with neither header cells \
                      nor a caption are being used for visual layout.",
        remediation: "Rebuild the layout with CSS flexbox or grid; keep \
                      <table> for tabular data with <th> and <caption>.",
    },
    Rule {
        id: "date_in_div",
        name: "Date text in a div",
        category: Category::Semantic,
        severity: Severity::Warning,
        description: "Divs hold date text that should be marked up with the \
                      time element.",
        remediation: "Wrap the date: <time \
                      datetime=\"2024-03-01\">2024-03-01</time>. Machines \
                      read the datetime attribute; people read the text.",
    },
    Rule {
        id: "heading_in_div",
        name: "Heading-like text in a div",
        category: Category::Semantic,
        severity: Severity::Warning,
        description: "Divs styled and worded like headings should use a \
                      real heading element at the appropriate level.",
        remediation: "Replace the div with the heading level matching its \
                      position in the document outline.",
    },
    Rule {
        id: "list_in_div",
        name: "List structure built from divs",
        category: Category::Semantic,
        severity: Severity::Warning,
        description: "Runs of sibling divs with identical classes form a \
                      list without list semantics.",
        remediation: "Use <ul>/<ol> with <li> children so assistive \
                      technology can announce item counts and positions.",
    },
    Rule {
        id: "article_in_div",
        name: "Article structure built from divs",
        category: Category::Semantic,
        severity: Severity::Warning,
        description: "Self-contained dated content blocks are marked up as \
                      plain divs instead of article elements.",
        remediation: "Wrap each self-contained entry in <article>, with its \
                      heading and a <time> for the date.",
    },
    Rule {
        id: "legacy_analytics",
        name: "Legacy analytics snippet",
        category: Category::Cleanup,
        severity: Severity::Warning,
        description: "Scripts reference the retired Universal Analytics \
                      tracking format or its legacy library.",
        remediation: "Remove the UA-era snippet and migrate the property to \
                      the current analytics platform; the old endpoints no \
                      longer collect data.",
    },
    Rule {
        id: "legacy_tag_manager",
        name: "Tag manager container worth auditing",
        category: Category::Cleanup,
        severity: Severity::Info,
        description: "Tag-manager container snippets were found. This \
                      heuristic cannot tell live containers from orphaned \
                      ones, so every match is surfaced for review.",
        remediation: "Confirm each container id is still in use and delete \
                      the loaders for retired ones.",
    },
    Rule {
        id: "vendor_analytics",
        name: "Vendor analytics remnants",
        category: Category::Cleanup,
        severity: Severity::Info,
        description: "Scripts match known vendor-analytics signatures \
                      (SiteCatalyst/Omniture-era code).",
        remediation: "Delete the snippet if the vendor tool is no longer in \
                      use; stale collectors cost page weight for nothing.",
    },
    Rule {
        id: "unnecessary_noscript",
        name: "Unnecessary noscript tag",
        category: Category::Cleanup,
        severity: Severity::Info,
        description: "noscript elements whose content is empty or a lone \
                      comment serve no fallback purpose.",
        remediation: "Remove the empty noscript, or give it real fallback \
                      content for script-less visitors.",
    },
    Rule {
        id: "deprecated_meta",
        name: "Deprecated meta tags",
        category: Category::Cleanup,
        severity: Severity::Info,
        description: "meta keywords and Pragma/zero-expires cache directives \
                      are ignored by modern crawlers and browsers.",
        remediation: "Delete meta keywords; control caching with HTTP \
                      headers instead of meta http-equiv directives.",
    },
    Rule {
        id: "old_robots_meta",
        name: "Obsolete robots directives",
        category: Category::Cleanup,
        severity: Severity::Warning,
        description: "The robots meta tag carries directives no search \
                      engine honours anymore (NOODP, NOYDIR, NOARCHIVE).",
        remediation: "Keep only supported directives such as noindex and \
                      nofollow.",
    },
];

/// Look up a rule by id
pub fn rule(id: &str) -> Option<&'static Rule> {
    ALL_RULES.iter().find(|r| r.id == id)
}

/// Fetch a rule that must exist; panics name the missing id.
/// For detector construction with ids from the static table above.
pub(crate) fn expect_rule(id: &'static str) -> &'static Rule {
    rule(id).unwrap_or_else(|| panic!("rule '{}' not registered", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_unique() {
        let mut seen = HashSet::new();
        for rule in ALL_RULES {
            assert!(seen.insert(rule.id), "duplicate rule id: {}", rule.id);
        }
    }

    #[test]
    fn test_rule_lookup() {
        let r = rule("missing_h1").unwrap();
        assert_eq!(r.severity, Severity::Error);
        assert_eq!(r.category, Category::Heading);
        assert!(rule("nonexistent").is_none());
    }

    #[test]
    fn test_tag_manager_never_above_info() {
        // This heuristic cannot distinguish live from orphaned containers.
        assert_eq!(rule("legacy_tag_manager").unwrap().severity, Severity::Info);
    }

    #[test]
    fn test_every_rule_has_remediation() {
        for rule in ALL_RULES {
            assert!(!rule.remediation.is_empty(), "{} lacks remediation", rule.id);
            assert!(!rule.description.is_empty(), "{} lacks description", rule.id);
        }
    }
}
