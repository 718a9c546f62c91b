use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static RE_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s+#.]").unwrap());
static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase and strip everything that is not alphanumeric, whitespace or
/// one of `+ # .` (keeps "c++", "c#", "node.js" intact), then collapse
/// whitespace runs.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = RE_NOISE.replace_all(&lowered, " ");
    RE_SPACES.replace_all(cleaned.trim(), " ").to_string()
}

/// Whitespace tokens of the preprocessed text.
pub fn tokens(text: &str) -> Vec<String> {
    preprocess(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Canonical form for skill and interest keywords: trimmed, lowercased.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// Location token set: lowercased, commas stripped, whitespace split.
pub fn location_tokens(location: &str) -> HashSet<String> {
    location
        .to_lowercase()
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Treats `None` and whitespace-only strings alike.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
