// src/shortcode/rewriter.rs

//! Position-stable content rewriting
//!
//! Edits are recorded as byte spans against the text that was scanned and
//! applied in one pass, so an edit never depends on what an earlier edit
//! left behind. Two byte-identical tags each rewrite their own occurrence.

use super::scanner::{closing_tag, TagToken};
use std::ops::Range;
use tracing::warn;

/// Opening placeholder marker stripped after every document pass
pub const PLACEHOLDER_OPEN: &str = "<!-- wp:divi/placeholder -->";

/// Closing placeholder marker stripped after every document pass
pub const PLACEHOLDER_CLOSE: &str = "<!-- /wp:divi/placeholder -->";

/// Replace a byte span of the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

/// Ordered set of edits against one original text
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    edits: Vec<Edit>,
}

impl EditPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `span` with `replacement`
    pub fn replace(&mut self, span: Range<usize>, replacement: impl Into<String>) {
        self.edits.push(Edit {
            span,
            replacement: replacement.into(),
        });
    }

    /// Delete `span`
    pub fn remove(&mut self, span: Range<usize>) {
        self.replace(span, String::new());
    }

    /// Remove a wrapper tag's opening markup
    ///
    /// Returns false when the opening is unterminated and nothing was planned.
    pub fn clear_opening(&mut self, text: &str, token: &TagToken) -> bool {
        match token.opening_span(text) {
            Some(span) => {
                self.remove(span);
                true
            }
            None => false,
        }
    }

    /// Remove every `[/name]` closer in `text`; returns how many were found
    pub fn clear_closers(&mut self, text: &str, name: &str) -> usize {
        let closer = closing_tag(name);
        let spans: Vec<_> = text
            .match_indices(&closer)
            .map(|(start, m)| start..start + m.len())
            .collect();
        let count = spans.len();
        for span in spans {
            self.remove(span);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply all edits to the text they were planned against
    ///
    /// Edits are spliced in span order. An edit overlapping an earlier one,
    /// or falling outside the text, is dropped.
    pub fn apply(mut self, text: &str) -> String {
        self.edits.sort_by_key(|e| (e.span.start, e.span.end));

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for edit in self.edits {
            let Range { start, end } = edit.span;
            if start < cursor || text.get(start..end).is_none() {
                warn!("Dropping overlapping or invalid edit at {}..{}", start, end);
                continue;
            }
            out.push_str(&text[cursor..start]);
            out.push_str(&edit.replacement);
            cursor = end;
        }

        out.push_str(&text[cursor..]);
        out
    }
}

/// Remove placeholder markers left by the page builder
pub fn strip_placeholders(text: &str) -> String {
    text.replace(PLACEHOLDER_OPEN, "").replace(PLACEHOLDER_CLOSE, "")
}
