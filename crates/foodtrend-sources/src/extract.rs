//! Best-effort extraction helpers shared by the page-scraping harvesters.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// An extraction strategy: a pure function that either finds what it is
/// looking for or declines.
pub type Strategy<T, O> = fn(&T) -> Option<O>;

/// Apply `strategies` in order and return the first hit.
///
/// Later strategies are not evaluated once one succeeds.
pub fn first_success<T: ?Sized, O>(strategies: &[Strategy<T, O>], input: &T) -> Option<O> {
    strategies.iter().find_map(|strategy| strategy(input))
}

/// Strip HTML tags from a string and normalize whitespace.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

static JSON_LD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid json-ld script regex")
});

/// Parse every JSON-LD `<script>` block in the page, skipping invalid ones.
pub fn json_ld_blocks(html: &str) -> Vec<Value> {
    JSON_LD_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .filter(|raw| !raw.is_empty())
        .filter_map(|raw| serde_json::from_str::<Value>(raw).ok())
        .collect()
}

/// Parse the JSON body of `<script id="{id}">`, if present and valid.
pub fn script_json_by_id(html: &str, id: &str) -> Option<Value> {
    let pattern = format!(r#"(?s)<script[^>]*id="{}"[^>]*>(.*?)</script>"#, regex::escape(id));
    let re = Regex::new(&pattern).ok()?;
    let raw = re.captures(html)?.get(1)?.as_str();
    serde_json::from_str(raw).ok()
}
