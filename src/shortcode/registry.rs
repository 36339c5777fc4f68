// src/shortcode/registry.rs

//! Tag classification registry
//!
//! Every known tag name maps to a [`TagRule`]: what to do with it and,
//! for migratable tags, which converter produces the replacement block.
//! Names that are not registered are unknown and left untouched.

use crate::convert::ConverterKey;
use std::collections::HashMap;
use std::fmt;

/// Shortcodes converted into blocks, with their converter
pub const MIGRATABLE_SHORTCODES: &[(&str, ConverterKey)] = &[
    ("et_pb_video", ConverterKey::Video),
    ("et_pb_button", ConverterKey::Button),
    ("et_pb_image", ConverterKey::Image),
    ("et_pb_fullwidth_image", ConverterKey::Image),
];

/// Layout wrappers removed while keeping their inner content
pub const CLEARABLE_SHORTCODES: &[&str] = &[
    "et_pb_section",
    "et_pb_row",
    "et_pb_column",
    "et_pb_text",
    "et_pb_fullwidth_header",
    "et_pb_code",
    "et_pb_cta",
    "et_pb_row_inner",
    "et_pb_column_inner",
    "et_pb_sidebar",
    "et_pb_slider",
    "et_pb_slide",
    "et_pb_post_title",
    "et_pb_line_break_holder",
    "et_pb_divider",
    "et_pb_toggle",
    "et_pb_fullwidth_code",
];

/// Shortcodes left in place and reported as skipped
pub const SKIPPABLE_SHORTCODES: &[&str] = &[
    "et_social_follow",
    "embed",
    "caption",
    "toc",
    "Sarcastic",
    "gallery",
    "Tweet",
    "Proof",
    "et_pb_social_media_follow",
    "et_pb_social_media_follow_network",
    "et_pb_testimonial",
    "et_pb_contact_form",
    "et_pb_contact_field",
    "et_pb_blog",
    "et_pb_pricing_tables",
    "et_pb_blurb",
    "et_pb_video_slider",
    "et_pb_video_slider_item",
    "et_pb_team_member",
    "et_pb_tabs",
    "et_pb_tab",
];

/// What happens to a tag during migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagAction {
    /// Leave the tag in place
    Skip,
    /// Remove the wrapper, keep the content between opener and closer
    Clear,
    /// Replace the tag with block markup
    Migrate,
}

impl TagAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Clear => "clear",
            Self::Migrate => "migrate",
        }
    }

    /// Precedence when a name is registered under more than one action
    fn priority(&self) -> u8 {
        match self {
            Self::Skip => 3,
            Self::Clear => 2,
            Self::Migrate => 1,
        }
    }
}

impl fmt::Display for TagAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification rule for one tag name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRule {
    pub action: TagAction,
    /// Converter for `Migrate` rules; `None` makes the tag fail
    pub converter: Option<ConverterKey>,
}

impl TagRule {
    pub fn skip() -> Self {
        Self {
            action: TagAction::Skip,
            converter: None,
        }
    }

    pub fn clear() -> Self {
        Self {
            action: TagAction::Clear,
            converter: None,
        }
    }

    pub fn migrate(converter: ConverterKey) -> Self {
        Self {
            action: TagAction::Migrate,
            converter: Some(converter),
        }
    }
}

/// Registry mapping tag names to rules
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    rules: HashMap<String, TagRule>,
}

impl TagRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Divi builder vocabulary
    pub fn divi() -> Self {
        let mut registry = Self::new();
        for (name, key) in MIGRATABLE_SHORTCODES {
            registry.register(name, TagRule::migrate(*key));
        }
        for name in CLEARABLE_SHORTCODES {
            registry.register(name, TagRule::clear());
        }
        for name in SKIPPABLE_SHORTCODES {
            registry.register(name, TagRule::skip());
        }
        registry
    }

    /// Register a rule for a tag name
    ///
    /// A rule never replaces an existing rule of higher precedence
    /// (skip, then clear, then migrate). Returns whether the rule was stored.
    pub fn register(&mut self, name: &str, rule: TagRule) -> bool {
        if let Some(existing) = self.rules.get(name)
            && existing.action.priority() > rule.action.priority()
        {
            return false;
        }
        self.rules.insert(name.to_string(), rule);
        true
    }

    /// Rule for a tag name, if known
    pub fn rule(&self, name: &str) -> Option<&TagRule> {
        self.rules.get(name)
    }

    /// Classify a tag name; `None` means unknown
    pub fn classify(&self, name: &str) -> Option<TagAction> {
        self.rule(name).map(|r| r.action)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
