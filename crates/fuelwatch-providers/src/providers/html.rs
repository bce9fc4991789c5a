//! Small helpers over `scraper` shared by the HTML adapters.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line-break regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Parses a selector literal.
pub(super) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

/// Text of the first element below `scope` matching `sel`, whitespace
/// collapsed. `None` when nothing matches.
pub(super) fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
}

pub(super) fn first_attr(scope: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    scope
        .select(sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
}

/// Inner HTML with `<br>` turned into spaces and other tags dropped.
pub(super) fn text_with_breaks(el: ElementRef<'_>) -> String {
    let inner = el.inner_html();
    let spaced = LINE_BREAK.replace_all(&inner, " ");
    let stripped = TAG.replace_all(&spaced, "");
    collapse_whitespace(&decode_entities(&stripped))
}

pub(super) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
}
