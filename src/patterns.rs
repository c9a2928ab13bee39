//! Static pattern tables
//!
//! Every regex the classifier and detectors share, compiled once. Cleanup
//! signature lists live in configuration (`SignatureConfig`) because they
//! are deployment data; the tables here are the fixed heuristics.

use regex::Regex;
use std::sync::LazyLock;

/// A text pattern with the confidence weight its match contributes
pub struct WeightedPattern {
    pub pattern: Regex,
    pub weight: f64,
}

impl WeightedPattern {
    fn new(pattern: &str, weight: f64) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            weight,
        }
    }
}

/// Date formats a div's text may carry: Western numeric, Japanese numeric
/// and Japanese-era forms, plus English month names.
pub static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d{4}[年\-/]\d{1,2}[月\-/]\d{1,2}日?",
        r"\d{1,2}[\-/]\d{1,2}[\-/]\d{4}",
        r"\d{1,2}月\d{1,2}日",
        r"(令和|平成|昭和)\s*\d{1,2}\s*年\s*\d{1,2}\s*月\s*\d{1,2}\s*日",
        r"(?i)\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}",
        r"(?i)\b\d{1,2}\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+\d{4}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// True when text contains any date-like run
pub fn matches_date(text: &str) -> bool {
    DATE_PATTERNS.iter().any(|re| re.is_match(text))
}

/// URL substrings identifying analytics/ad tracking pixels
pub static TRACKING_PIXEL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)adsct",
        r"(?i)doubleclick",
        r"(?i)googletagmanager",
        r"(?i)facebook",
        r"(?i)analytics",
        r"(?i)pixel",
        r"(?i)tr\?",
        r"(?i)1x1",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Tag-manager container ids share this shape
pub static TAG_MANAGER_CONTAINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"GTM-[A-Z0-9]{6,7}").unwrap());

/// Obsolete robots directives
pub static OLD_ROBOTS_DIRECTIVES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(NOODP|NOYDIR|NOARCHIVE)\b").unwrap());

/// A noscript whose body is only an HTML comment
pub static LONE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<!--.*-->$").unwrap());

/// Child tags a heading may hold without counting as complex markup
pub const SIMPLE_INLINE_TAGS: &[&str] = &["br", "a", "strong", "em", "span", "i", "b", "small"];

/// Text openers/closers that read like headings (announcements, notices,
/// business-hours blocks, FAQ markers)
pub static HEADING_TEXT_PATTERNS: LazyLock<Vec<WeightedPattern>> = LazyLock::new(|| {
    vec![
        WeightedPattern::new(r"^(お知らせ|ニュース|情報|案内|注意|重要|速報)", 0.8),
        WeightedPattern::new(r"(について|のお知らせ|のご案内|のご連絡)$", 0.7),
        WeightedPattern::new(r"^(営業時間|休業|定休日|時間変更|料金|価格)", 0.6),
        WeightedPattern::new(r"^(Q[.\d]*|質問|回答|FAQ)", 0.5),
    ]
});

/// Class-name shapes that suggest the div plays a heading role
pub static HEADING_CLASS_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)title|heading|header|subject|caption|label|name").unwrap()
});

/// Class-name shapes that suggest list items
pub static LIST_CLASS_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)item|entry|product|card|tile|list|row|cell|block|unit").unwrap()
});

/// Class-name shapes that suggest a list container
pub static LIST_PARENT_CLASS_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)list|items|products|menu|nav|grid|collection|group").unwrap()
});

/// Class-name shapes that suggest an article/entry block
pub static ARTICLE_CLASS_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)news|article|post|blog|story|content|entry|item").unwrap()
});

/// Class-name shapes marking date children inside a candidate article
pub static DATE_CLASS_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)date|time|publish|created|updated").unwrap()
});

/// Class-name shapes marking title children inside a candidate article
pub static TITLE_CLASS_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)title|heading|subject|headline|caption").unwrap()
});

/// Class-name shapes marking body-content children inside a candidate article
pub static CONTENT_CLASS_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)content|body|text|description|summary").unwrap()
});

/// Price, points and discount text; such blocks read like headings or
/// entries but are product data, so the semantic heuristics must skip them.
pub static COMMERCE_TEXT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"￥[\d,]+",
        r"\$[\d,.]+",
        r"€[\d,.]+",
        r"[\d,]+円",
        r"（税込）",
        r"（税抜）",
        r"^[\d,]+$",
        r"ポイント",
        r"割引",
        r"%\s*(off|OFF)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// True when the text is commerce data rather than prose
pub fn matches_commerce(text: &str) -> bool {
    COMMERCE_TEXT_PATTERNS.iter().any(|re| re.is_match(text))
}
