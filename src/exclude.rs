//! Exclusion predicate
//!
//! Decides whether a node belongs to the tool's own injected UI or to a
//! host-designated excluded region. The classifier consults it once per
//! node; detectors that discover nodes through secondary queries (label
//! lookups, meta scans) must consult it too, so it is usable standalone.

use crate::config::ExclusionConfig;
use crate::error::ConfigError;
use scraper::{ElementRef, Selector};

/// Compiled exclusion predicate
pub struct ExclusionFilter {
    reserved_ids: Vec<String>,
    reserved_class_prefixes: Vec<String>,
    excluded_selectors: Vec<Selector>,
}

impl ExclusionFilter {
    /// Compile the configured selectors once
    pub fn new(config: &ExclusionConfig) -> Result<Self, ConfigError> {
        let mut excluded_selectors = Vec::with_capacity(config.excluded_selectors.len());
        for raw in &config.excluded_selectors {
            let selector = Selector::parse(raw).map_err(|e| ConfigError::Selector {
                selector: raw.clone(),
                message: e.to_string(),
            })?;
            excluded_selectors.push(selector);
        }
        Ok(Self {
            reserved_ids: config.reserved_ids.clone(),
            reserved_class_prefixes: config.reserved_class_prefixes.clone(),
            excluded_selectors,
        })
    }

    /// True when the element itself sits in the reserved namespace
    fn is_reserved(&self, el: ElementRef) -> bool {
        if let Some(id) = el.value().id() {
            if self.reserved_ids.iter().any(|r| r == id) {
                return true;
            }
        }
        el.value().classes().any(|class| {
            self.reserved_class_prefixes
                .iter()
                .any(|prefix| class.starts_with(prefix.as_str()))
        })
    }

    /// True when the element must be ignored everywhere: it or an ancestor
    /// is part of the tool's UI or matches a host-excluded selector.
    pub fn is_excluded(&self, el: ElementRef) -> bool {
        std::iter::once(*el)
            .chain(el.ancestors())
            .filter_map(ElementRef::wrap)
            .any(|node| {
                self.is_reserved(node)
                    || self
                        .excluded_selectors
                        .iter()
                        .any(|sel| sel.matches(&node))
            })
    }
}
