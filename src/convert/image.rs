// src/convert/image.rs

//! `et_pb_image` / `et_pb_fullwidth_image` → image block
//!
//! A `src` that resolves to a media library attachment becomes a native
//! `wp:image` block carrying the attachment id and optional dimensions.
//! Anything else becomes a raw `wp:html` block with the same figure markup.

use super::{BlockConverter, Conversion, ConverterKey, MediaResolver};
use crate::shortcode::AttributeSet;
use crate::Result;
use tracing::debug;

/// Size designation written on every migrated image
pub const IMAGE_SIZE_SLUG: &str = "medium";

/// Attributes read by the image converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttrs {
    /// Image URL, default empty
    pub src: String,
    /// Alignment, default `left`
    pub align: String,
    /// Alt text, default empty
    pub alt: String,
    pub max_width: Option<String>,
    pub max_height: Option<String>,
}

impl ImageAttrs {
    pub fn from_attributes(attrs: &AttributeSet) -> Self {
        Self {
            src: attrs.get_or("src", "").to_string(),
            align: attrs.get_or("align", "left").to_string(),
            alt: attrs.get_or("alt", "").to_string(),
            max_width: attrs.get_owned("max_width"),
            max_height: attrs.get_owned("max_height"),
        }
    }

    /// Inline style for the max dimensions, if any are set
    fn style(&self) -> Option<String> {
        let mut style = String::new();
        if let Some(width) = &self.max_width {
            style.push_str(&format!("max-width:{width};"));
        }
        if let Some(height) = &self.max_height {
            style.push_str(&format!("max-height:{height};"));
        }
        (!style.is_empty()).then_some(style)
    }
}

pub struct ImageConverter;

impl ImageConverter {
    fn attachment_block(image: &ImageAttrs, id: i64) -> String {
        let ImageAttrs {
            src, align, alt, ..
        } = image;

        let mut block_attrs = vec![
            format!(r#""id":{id}"#),
            format!(r#""sizeSlug":"{IMAGE_SIZE_SLUG}""#),
            format!(r#""align":"{align}""#),
        ];
        if let Some(width) = &image.max_width {
            block_attrs.push(format!(r#""width":"{width}""#));
        }
        if let Some(height) = &image.max_height {
            block_attrs.push(format!(r#""height":"{height}""#));
        }
        let style = image
            .style()
            .map(|s| format!(r#" style="{s}""#))
            .unwrap_or_default();

        [
            format!("<!-- wp:image {{{}}} -->", block_attrs.join(",")),
            format!(
                r#"<div class="wp-block-image"><figure class="align{align} size-{IMAGE_SIZE_SLUG}"><img src="{src}" alt="{alt}" class="wp-image-{id}"{style}/></figure></div>"#
            ),
            "<!-- /wp:image -->".to_string(),
        ]
        .join("\n")
    }

    fn html_block(image: &ImageAttrs) -> String {
        let ImageAttrs {
            src, align, alt, ..
        } = image;

        [
            format!(
                r#"<!-- wp:html {{"sizeSlug":"{IMAGE_SIZE_SLUG}","align":"{align}"}} -->"#
            ),
            format!(
                r#"<div class="wp-block-image"><figure class="align{align} size-{IMAGE_SIZE_SLUG}"><img src="{src}" alt="{alt}"/></figure></div>"#
            ),
            "<!-- /wp:html -->".to_string(),
        ]
        .join("\n")
    }
}

impl BlockConverter for ImageConverter {
    fn key(&self) -> ConverterKey {
        ConverterKey::Image
    }

    fn convert(&self, attrs: &AttributeSet, media: &dyn MediaResolver) -> Result<Conversion> {
        let image = ImageAttrs::from_attributes(attrs);

        let attachment_id = if image.src.is_empty() {
            None
        } else {
            media.resolve_attachment(&image.src)?
        };

        let markup = match attachment_id {
            Some(id) => Self::attachment_block(&image, id),
            None => {
                debug!("Image not in media library, using html block: {}", image.src);
                Self::html_block(&image)
            }
        };

        Ok(Conversion::migrated(markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConversionStatus;
    use std::collections::HashMap;

    fn library() -> HashMap<String, i64> {
        let mut media = HashMap::new();
        media.insert("https://example.com/cat.png".to_string(), 42);
        media
    }

    fn convert(raw: &str) -> Conversion {
        ImageConverter
            .convert(&AttributeSet::parse(raw), &library())
            .unwrap()
    }

    #[test]
    fn test_resolved_attachment_defaults_left() {
        let conversion = convert(r#"src="https://example.com/cat.png""#);
        assert_eq!(conversion.status, ConversionStatus::Migrated);
        assert_eq!(
            conversion.markup.unwrap(),
            [
                r#"<!-- wp:image {"id":42,"sizeSlug":"medium","align":"left"} -->"#,
                r#"<div class="wp-block-image"><figure class="alignleft size-medium"><img src="https://example.com/cat.png" alt="" class="wp-image-42"/></figure></div>"#,
                "<!-- /wp:image -->",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_resolved_attachment_with_dimensions() {
        let markup = convert(
            r#"src="https://example.com/cat.png" align="center" alt="Cat" max_width="300px" max_height="200px""#,
        )
        .markup
        .unwrap();
        assert!(markup.starts_with(
            r#"<!-- wp:image {"id":42,"sizeSlug":"medium","align":"center","width":"300px","height":"200px"} -->"#
        ));
        assert!(markup.contains(
            r#"alt="Cat" class="wp-image-42" style="max-width:300px;max-height:200px;"/>"#
        ));
    }

    #[test]
    fn test_unresolved_uses_html_fallback() {
        let conversion = convert(r#"src="https://elsewhere.com/dog.png" max_width="10px""#);
        assert_eq!(conversion.status, ConversionStatus::Migrated);

        let markup = conversion.markup.unwrap();
        assert_eq!(
            markup,
            [
                r#"<!-- wp:html {"sizeSlug":"medium","align":"left"} -->"#,
                r#"<div class="wp-block-image"><figure class="alignleft size-medium"><img src="https://elsewhere.com/dog.png" alt=""/></figure></div>"#,
                "<!-- /wp:html -->",
            ]
            .join("\n")
        );
        assert!(!markup.contains("wp-image-"));
        assert!(!markup.contains("width"));
    }

    #[test]
    fn test_missing_src_uses_html_fallback() {
        let markup = convert(r#"align="right""#).markup.unwrap();
        assert!(markup.starts_with(r#"<!-- wp:html {"sizeSlug":"medium","align":"right"} -->"#));
        assert!(markup.contains(r#"<img src="" alt=""/>"#));
    }
}
