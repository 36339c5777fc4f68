// src/shortcode/scanner.rs

//! Tag scanner for legacy shortcode openings
//!
//! Finds every `[name ...` opening in document order. The scan does not
//! track nesting or check for closers; the match target for a token is
//! resolved later by [`TagToken::match_span`].

use super::attributes::AttributeSet;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static OPENING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([a-zA-Z0-9_-]+) ?([^\]\[]+)?").unwrap());

/// One legacy tag opening found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    /// Tag name, e.g. `et_pb_image`
    pub name: String,
    /// Attribute text after the name, up to the closing bracket
    pub raw_attributes: String,
    /// Full opening text without the closing `]`, e.g. `[et_pb_image src="a.png"`
    pub opening: String,
    /// Byte range of `opening` in the scanned text
    pub span: Range<usize>,
}

impl TagToken {
    /// Parse this token's attribute text
    pub fn attributes(&self) -> AttributeSet {
        AttributeSet::parse(&self.raw_attributes)
    }

    /// The closer for this tag name, e.g. `[/et_pb_row]`
    pub fn closing_tag(&self) -> String {
        closing_tag(&self.name)
    }

    /// Opening markup including its `]`
    pub fn opening_tag(&self) -> String {
        format!("{}]", self.opening)
    }

    /// The synthetic open-close pair `[name ...][/name]`
    pub fn paired_text(&self) -> String {
        format!("{}]{}", self.opening, self.closing_tag())
    }

    /// Span of the opening including its `]`, if the opening is terminated
    ///
    /// `text` must be the text this token was scanned from.
    pub fn opening_span(&self, text: &str) -> Option<Range<usize>> {
        text.get(self.span.end..)?
            .starts_with(']')
            .then(|| self.span.start..self.span.end + 1)
    }

    /// Resolve the span a replacement should cover
    ///
    /// Prefers the open-close pair when the closer immediately follows the
    /// opening; otherwise falls back to treating the tag as self-closing.
    /// Returns `None` for an unterminated opening.
    pub fn match_span(&self, text: &str) -> Option<Range<usize>> {
        let rest = text.get(self.span.end..)?;
        let pair_suffix = format!("]{}", self.closing_tag());

        if rest.starts_with(&pair_suffix) {
            Some(self.span.start..self.span.end + pair_suffix.len())
        } else {
            self.opening_span(text)
        }
    }
}

/// Closing tag text for a tag name
pub fn closing_tag(name: &str) -> String {
    format!("[/{}]", name)
}

/// Scan text for legacy tag openings, in order of appearance
pub fn scan(text: &str) -> Vec<TagToken> {
    OPENING_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some(TagToken {
                name: name.as_str().to_string(),
                raw_attributes: caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                opening: whole.as_str().to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_in_document_order() {
        let text = r#"[et_pb_section][et_pb_text]Hello[/et_pb_text][et_pb_image src="a.png"][/et_pb_image][/et_pb_section]"#;
        let names: Vec<_> = scan(text).into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["et_pb_section", "et_pb_text", "et_pb_image"]);
    }

    #[test]
    fn test_scan_captures_attributes_and_opening() {
        let text = r#"before [et_pb_button button_url="/go" button_text="Go"] after"#;
        let tokens = scan(text);
        assert_eq!(tokens.len(), 1);

        let token = &tokens[0];
        assert_eq!(token.name, "et_pb_button");
        assert_eq!(token.raw_attributes, r#"button_url="/go" button_text="Go""#);
        assert_eq!(token.opening, r#"[et_pb_button button_url="/go" button_text="Go""#);
        assert_eq!(&text[token.span.clone()], token.opening);
        assert_eq!(token.attributes().get("button_text"), Some("Go"));
    }

    #[test]
    fn test_scan_ignores_closing_tags() {
        let tokens = scan("[/et_pb_row][/et_pb_column]");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_scan_stops_at_open_bracket() {
        let text = "[broken attr=1 [et_pb_text]x[/et_pb_text]";
        let tokens = scan(text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].opening, "[broken attr=1 ");
        assert_eq!(tokens[1].name, "et_pb_text");
    }

    #[test]
    fn test_match_span_prefers_pair() {
        let text = r#"x[et_pb_image src="a.png"][/et_pb_image]y"#;
        let token = &scan(text)[0];
        let span = token.match_span(text).unwrap();
        assert_eq!(&text[span], token.paired_text());
    }

    #[test]
    fn test_match_span_self_closing_fallback() {
        let text = r#"x[et_pb_video src="https://youtube.com/watch?v=1"]y"#;
        let token = &scan(text)[0];
        let span = token.match_span(text).unwrap();
        assert_eq!(&text[span], token.opening_tag());
    }

    #[test]
    fn test_match_span_closer_not_adjacent() {
        let text = "[et_pb_button]label[/et_pb_button]";
        let token = &scan(text)[0];
        let span = token.match_span(text).unwrap();
        assert_eq!(&text[span], "[et_pb_button]");
    }

    #[test]
    fn test_match_span_unterminated() {
        let text = "[et_pb_image src=a.png";
        let token = &scan(text)[0];
        assert_eq!(token.match_span(text), None);
        assert_eq!(token.opening_span(text), None);
    }
}
