// src/convert/button.rs

//! `et_pb_button` → button block
//!
//! The template variant depends on which custom colors are set:
//! both, text only, background only, or neither. Label and URL are copied
//! verbatim.

use super::{BlockConverter, Conversion, ConverterKey, MediaResolver};
use crate::shortcode::AttributeSet;
use crate::Result;

/// Attributes read by the button converter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonAttrs {
    /// `button_url`, default empty
    pub url: String,
    /// `button_text`, default empty
    pub text: String,
    /// `button_text_color`
    pub text_color: Option<String>,
    /// `button_bg_color`
    pub bg_color: Option<String>,
    /// `url_new_window="on"`
    pub new_window: bool,
}

impl ButtonAttrs {
    pub fn from_attributes(attrs: &AttributeSet) -> Self {
        Self {
            url: attrs.get_or("button_url", "").to_string(),
            text: attrs.get_or("button_text", "").to_string(),
            text_color: attrs.get_owned("button_text_color"),
            bg_color: attrs.get_owned("button_bg_color"),
            new_window: attrs.is_on("url_new_window"),
        }
    }
}

const STYLED: &str = "wp-block-button__link has-text-color has-background";

pub struct ButtonConverter;

impl ButtonConverter {
    fn render(button: &ButtonAttrs) -> String {
        let ButtonAttrs { url, text, .. } = button;
        let target = if button.new_window {
            r#"target="_blank""#
        } else {
            ""
        };

        let (opener, link) = match (button.text_color.as_deref(), button.bg_color.as_deref()) {
            (Some(color), Some(bg)) => (
                format!(
                    r#"<!-- wp:button {{"customBackgroundColor":"{bg}","customTextColor":"{color}"}} -->"#
                ),
                format!(
                    r#"<a class="{STYLED}" href="{url}" {target} style="background-color:{bg};color:{color}">{text}</a>"#
                ),
            ),
            (Some(color), None) => (
                format!(r#"<!-- wp:button {{"customTextColor":"{color}"}} -->"#),
                format!(
                    r#"<a class="{STYLED}" href="{url}" {target} style="color:{color}">{text}</a>"#
                ),
            ),
            (None, Some(bg)) => (
                format!(r#"<!-- wp:button {{"customBackgroundColor":"{bg}"}} -->"#),
                format!(
                    r#"<a class="{STYLED}" href="{url}" {target} style="background-color:{bg};">{text}</a>"#
                ),
            ),
            (None, None) => (
                "<!-- wp:button -->".to_string(),
                format!(r#"<a class="wp-block-button__link " href="{url}" {target}>{text}</a>"#),
            ),
        };

        [
            opener,
            format!(r#"<div class="wp-block-button">{link}</div>"#),
            "<!-- /wp:button -->".to_string(),
        ]
        .join("\n")
    }
}

impl BlockConverter for ButtonConverter {
    fn key(&self) -> ConverterKey {
        ConverterKey::Button
    }

    fn convert(&self, attrs: &AttributeSet, _media: &dyn MediaResolver) -> Result<Conversion> {
        let button = ButtonAttrs::from_attributes(attrs);
        Ok(Conversion::migrated(Self::render(&button)))
    }
}
