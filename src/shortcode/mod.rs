// src/shortcode/mod.rs

//! Legacy shortcode handling
//!
//! - `attributes`: attribute text → [`AttributeSet`]
//! - `scanner`: document text → ordered [`TagToken`]s
//! - `registry`: tag name → [`TagRule`] (skip / clear / migrate)
//! - `rewriter`: offset-based [`EditPlan`] applied to the scanned text

mod attributes;
mod registry;
mod rewriter;
mod scanner;

pub use attributes::{AttributeSet, FLAG_VALUE};
pub use registry::{
    TagAction, TagRegistry, TagRule, CLEARABLE_SHORTCODES, MIGRATABLE_SHORTCODES,
    SKIPPABLE_SHORTCODES,
};
pub use rewriter::{strip_placeholders, Edit, EditPlan, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};
pub use scanner::{closing_tag, scan, TagToken};
