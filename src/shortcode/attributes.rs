// src/shortcode/attributes.rs

//! Attribute extraction for legacy shortcode openings
//!
//! Parses the free-form text that follows a tag name, e.g.
//! `src="a.png" align=center autoplay`, into an [`AttributeSet`].
//! Tokens follow shell-like rules:
//!
//! - `key="value"` and `key='value'`
//! - `key=value` (unquoted, up to the next whitespace)
//! - bare `key` (a flag, stored with the value `"on"`)
//!
//! Positional quoted fragments and anything that is not a valid key are
//! dropped. Parsing never fails.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Value stored for bare flag attributes
pub const FLAG_VALUE: &str = "on";

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)"#,
        r#"|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)"#,
        r#"|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)"#,
        r#"|"[^"]*"(?:\s|$)"#,
        r#"|'[^']*'(?:\s|$)"#,
        r#"|(\S+)(?:\s|$)"#,
    ))
    .unwrap()
});

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w-]+$").unwrap());

/// Attribute name to value mapping for one shortcode occurrence
///
/// Keys are lowercased. Read sites use [`AttributeSet::get`], which treats
/// an empty value the same as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    values: BTreeMap<String, String>,
}

impl AttributeSet {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw attribute text into an attribute set
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.replace(['\u{00a0}', '\u{200b}'], " ");
        let mut set = Self::new();

        for caps in ATTRIBUTE_RE.captures_iter(&normalized) {
            let pair = [(1, 2), (3, 4), (5, 6)]
                .into_iter()
                .find_map(|(k, v)| Some((caps.get(k)?, caps.get(v)?)));

            if let Some((key, value)) = pair {
                set.insert(key.as_str(), value.as_str());
            } else if let Some(bare) = caps.get(7)
                && KEY_RE.is_match(bare.as_str())
            {
                set.insert(bare.as_str(), FLAG_VALUE);
            }
        }

        set
    }

    /// Insert (or overwrite) an attribute; the key is lowercased
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    /// Get a non-empty attribute value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw(key).filter(|v| !v.is_empty())
    }

    /// Get an attribute value exactly as parsed, even if empty
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a non-empty attribute value or a default
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Owned copy of a non-empty attribute value
    pub fn get_owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// True when the attribute is set to the flag value `on`
    pub fn is_on(&self, key: &str) -> bool {
        self.get(key) == Some(FLAG_VALUE)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_values() {
        let attrs = AttributeSet::parse(r#"src="https://example.com/a.png" alt='A cat'"#);
        assert_eq!(attrs.get("src"), Some("https://example.com/a.png"));
        assert_eq!(attrs.get("alt"), Some("A cat"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_parse_unquoted_value() {
        let attrs = AttributeSet::parse("align=center max_width=50%");
        assert_eq!(attrs.get("align"), Some("center"));
        assert_eq!(attrs.get("max_width"), Some("50%"));
    }

    #[test]
    fn test_parse_spaces_around_equals() {
        let attrs = AttributeSet::parse(r#"button_url = "/contact""#);
        assert_eq!(attrs.get("button_url"), Some("/contact"));
    }

    #[test]
    fn test_bare_flag_defaults_to_on() {
        let attrs = AttributeSet::parse(r#"autoplay src="x.mp4""#);
        assert_eq!(attrs.get("autoplay"), Some(FLAG_VALUE));
        assert!(attrs.is_on("autoplay"));
        assert_eq!(attrs.get("src"), Some("x.mp4"));
    }

    #[test]
    fn test_positional_and_garbage_dropped() {
        let attrs = AttributeSet::parse(r#""positional" 'other' =broken / key="v""#);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("key"), Some("v"));
    }

    #[test]
    fn test_keys_lowercased() {
        let attrs = AttributeSet::parse(r#"SRC="a.png""#);
        assert_eq!(attrs.get("src"), Some("a.png"));
        assert!(!attrs.contains("SRC"));
    }

    #[test]
    fn test_empty_value_is_absent() {
        let attrs = AttributeSet::parse(r#"align="" alt="x""#);
        assert_eq!(attrs.get("align"), None);
        assert_eq!(attrs.raw("align"), Some(""));
        assert_eq!(attrs.get_or("align", "left"), "left");
    }

    #[test]
    fn test_non_breaking_space_separates_tokens() {
        let attrs = AttributeSet::parse("align=right\u{00a0}alt=logo");
        assert_eq!(attrs.get("align"), Some("right"));
        assert_eq!(attrs.get("alt"), Some("logo"));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let attrs = AttributeSet::parse(r#"align="left" align="right""#);
        assert_eq!(attrs.get("align"), Some("right"));
    }

    #[test]
    fn test_empty_input() {
        assert!(AttributeSet::parse("").is_empty());
        assert!(AttributeSet::parse("   ").is_empty());
    }
}
