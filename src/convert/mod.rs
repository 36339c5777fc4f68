// src/convert/mod.rs

//! Block converters for migratable shortcodes
//!
//! Each tag family has one [`BlockConverter`]. A converter reads the
//! attributes it declares (with defaults), optionally resolves media URLs
//! to attachment ids, and returns the replacement block markup.
//!
//! Incomplete attributes select a simpler output variant; they never make
//! a conversion fail.

mod button;
mod image;
mod video;

pub use button::{ButtonAttrs, ButtonConverter};
pub use image::{ImageAttrs, ImageConverter};
pub use video::{VideoAttrs, VideoConverter, VideoProvider};

use crate::shortcode::AttributeSet;
use crate::Result;
use std::collections::HashMap;
use std::fmt;

/// Identifies the converter a migratable tag is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterKey {
    Video,
    Button,
    Image,
}

impl ConverterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Button => "button",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ConverterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    /// Replacement markup was produced
    Migrated,
    /// No replacement applies; the tag is left as-is
    Unchanged,
}

/// Replacement markup plus status for one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub markup: Option<String>,
    pub status: ConversionStatus,
}

impl Conversion {
    pub fn migrated(markup: String) -> Self {
        Self {
            markup: Some(markup),
            status: ConversionStatus::Migrated,
        }
    }

    pub fn unchanged() -> Self {
        Self {
            markup: None,
            status: ConversionStatus::Unchanged,
        }
    }
}

/// Looks up media library attachments by URL
pub trait MediaResolver {
    /// Attachment id for a media URL, or `None` if it is not in the library
    fn resolve_attachment(&self, url: &str) -> Result<Option<i64>>;
}

impl MediaResolver for HashMap<String, i64> {
    fn resolve_attachment(&self, url: &str) -> Result<Option<i64>> {
        Ok(self.get(url).copied())
    }
}

/// Converts one tag family's attributes into block markup
pub trait BlockConverter: Send + Sync {
    /// Key this converter is registered under
    fn key(&self) -> ConverterKey;

    /// Produce replacement markup for a tag
    fn convert(&self, attrs: &AttributeSet, media: &dyn MediaResolver) -> Result<Conversion>;
}

/// Converters indexed by key
pub struct ConverterSet {
    converters: HashMap<ConverterKey, Box<dyn BlockConverter>>,
}

impl ConverterSet {
    /// Empty set
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Video, button and image converters
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.insert(Box::new(VideoConverter));
        set.insert(Box::new(ButtonConverter));
        set.insert(Box::new(ImageConverter));
        set
    }

    /// Add or replace a converter
    pub fn insert(&mut self, converter: Box<dyn BlockConverter>) {
        self.converters.insert(converter.key(), converter);
    }

    pub fn get(&self, key: ConverterKey) -> Option<&dyn BlockConverter> {
        self.converters.get(&key).map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl Default for ConverterSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_has_all_keys() {
        let set = ConverterSet::standard();
        for key in [ConverterKey::Video, ConverterKey::Button, ConverterKey::Image] {
            assert_eq!(set.get(key).map(|c| c.key()), Some(key));
        }
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_empty_set_has_no_converters() {
        let set = ConverterSet::new();
        assert!(set.is_empty());
        assert!(set.get(ConverterKey::Image).is_none());
    }

    #[test]
    fn test_hashmap_media_resolver() {
        let mut media = HashMap::new();
        media.insert("https://example.com/a.png".to_string(), 42);
        assert_eq!(
            media.resolve_attachment("https://example.com/a.png").unwrap(),
            Some(42)
        );
        assert_eq!(media.resolve_attachment("missing").unwrap(), None);
    }
}
