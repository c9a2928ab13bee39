//! Element helpers over the parsed HTML tree
//!
//! Thin conveniences the classifier and detectors share: text collection,
//! ancestor walks, inline-style probing and short element descriptors for
//! display. The engine only ever borrows nodes; nothing here mutates the
//! tree.

use scraper::ElementRef;

/// Collected descendant text, trimmed
pub fn text_content(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Direct element children (text and comment nodes skipped)
pub fn child_elements(el: ElementRef) -> Vec<ElementRef> {
    el.children().filter_map(ElementRef::wrap).collect()
}

/// Descendant elements, excluding the element itself, in document order
pub fn descendant_elements(el: ElementRef) -> impl Iterator<Item = ElementRef> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |d| d.id() != el.id())
}

/// Whitespace-trimmed attribute value, `None` when absent
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// True when the attribute exists with a non-whitespace value
pub fn attr_nonempty(el: ElementRef, name: &str) -> bool {
    attr(el, name).is_some_and(|v| !v.trim().is_empty())
}

/// True when any class token equals `token` exactly
pub fn has_class_token(el: ElementRef, token: &str) -> bool {
    el.value().classes().any(|c| c == token)
}

/// True when the raw class attribute contains `needle` as a substring
/// (class-list "contains" in the loose sense some heuristics need)
pub fn class_attr_contains(el: ElementRef, needle: &str) -> bool {
    attr(el, "class").is_some_and(|c| c.to_lowercase().contains(&needle.to_lowercase()))
}

/// Closest ancestor-or-self with the given tag name
pub fn closest_tag<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    std::iter::once(*el)
        .chain(el.ancestors())
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == tag)
}

/// Closest ancestor-or-self carrying the exact class token
pub fn closest_class<'a>(el: ElementRef<'a>, token: &str) -> Option<ElementRef<'a>> {
    std::iter::once(*el)
        .chain(el.ancestors())
        .filter_map(ElementRef::wrap)
        .find(|a| has_class_token(*a, token))
}

/// True when self or an ancestor matches any of the tag names
pub fn within_tags(el: ElementRef, tags: &[&str]) -> bool {
    tags.iter().any(|t| closest_tag(el, t).is_some())
}

/// Maximum element nesting depth below `el`, capped at `limit`.
/// Stops descending once the cap is reached.
pub fn nesting_depth(el: ElementRef, limit: usize) -> usize {
    fn walk(el: ElementRef, depth: usize, limit: usize) -> usize {
        if depth >= limit {
            return depth;
        }
        let mut max = depth;
        for child in el.children().filter_map(ElementRef::wrap) {
            max = max.max(walk(child, depth + 1, limit));
            if max >= limit {
                break;
            }
        }
        max
    }
    walk(el, 0, limit)
}

/// Value of one property from the inline style attribute, lowercased.
/// A static checker has no layout engine; the declared style is the
/// closest stand-in for computed style.
pub fn inline_style(el: ElementRef, property: &str) -> Option<String> {
    let style = attr(el, "style")?;
    for decl in style.split(';') {
        let mut parts = decl.splitn(2, ':');
        let name = parts.next()?.trim().to_lowercase();
        if name == property {
            return Some(parts.next().unwrap_or("").trim().to_lowercase());
        }
    }
    None
}

/// True when the element is hidden by declared style or the hidden attribute
pub fn is_hidden(el: ElementRef) -> bool {
    if attr(el, "hidden").is_some() {
        return true;
    }
    matches!(inline_style(el, "display").as_deref(), Some("none"))
        || matches!(inline_style(el, "visibility").as_deref(), Some("hidden"))
}

/// Truncate display text, appending an ellipsis past `max` characters
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Short single-line descriptor of an element for result display.
/// Mirrors the details a reviewer needs per element kind.
pub fn describe(el: ElementRef) -> String {
    let tag = el.value().name();
    match tag {
        "img" => {
            let src = attr(el, "src")
                .map(|s| s.rsplit('/').next().unwrap_or(s))
                .unwrap_or("(no src)");
            let alt = attr(el, "alt").unwrap_or("(no alt)");
            format!("<img src=\"{}\" alt=\"{}\">", src, truncate(alt, 40))
        }
        "meta" => {
            let name = attr(el, "name")
                .or_else(|| attr(el, "http-equiv"))
                .unwrap_or("(unnamed)");
            format!("<meta name=\"{}\">", name)
        }
        "script" => match attr(el, "src") {
            Some(src) => format!("<script src=\"{}\">", truncate(src, 60)),
            None => format!("<script>{}</script>", truncate(&text_content(el), 50)),
        },
        "a" => {
            let href = attr(el, "href").unwrap_or("");
            let text = text_content(el);
            let label = if text.is_empty() {
                "(no text)".to_string()
            } else {
                truncate(&text, 40)
            };
            format!("<a href=\"{}\">{}</a>", truncate(href, 50), label)
        }
        "input" | "select" | "textarea" => {
            let mut desc = format!("<{}", tag);
            for key in ["type", "id", "name", "placeholder"] {
                if let Some(v) = attr(el, key) {
                    desc.push_str(&format!(" {}=\"{}\"", key, truncate(v, 30)));
                }
            }
            desc.push('>');
            desc
        }
        "table" => {
            let mut desc = String::from("<table");
            for key in ["class", "border", "cellpadding", "cellspacing"] {
                if let Some(v) = attr(el, key) {
                    desc.push_str(&format!(" {}=\"{}\"", key, truncate(v, 30)));
                }
            }
            desc.push('>');
            desc
        }
        _ => {
            let text = text_content(el);
            if text.is_empty() {
                format!("<{}>", tag)
            } else {
                format!("<{}> {}", tag, truncate(&text, 50))
            }
        }
    }
}
