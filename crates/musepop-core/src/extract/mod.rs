//! Rule-based field extractors for raw cell text.

pub mod links;
pub mod numbers;
pub mod patterns;
pub mod years;

pub use links::{decode_link_target, slugify_group};
pub use numbers::{extract_integer, MagnitudeExtractor};
pub use years::{
    extract_standalone_year, extract_year, AnnotatedYearExtractor, ColumnYearExtractor,
};

use patterns::{FOOTNOTE, WHITESPACE};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// Lowercase and collapse whitespace, for header matching.
pub fn normalize_label(text: &str) -> String {
    WHITESPACE
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

/// Remove footnote markers (`[1]`, `[a]`, `[note 2]`) and tidy whitespace.
pub fn strip_footnotes(text: &str) -> String {
    let stripped = FOOTNOTE.replace_all(text, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}
