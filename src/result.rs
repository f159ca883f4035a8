//! Result types for extraction output.
//!
//! [`Extraction`] is what every extraction stage hands to the next one;
//! [`ExtractResult`] is the final, public outcome of a document.

use serde::Serialize;

use crate::dedup::Fingerprint;
use crate::dom;
use crate::etree;
use crate::tree::Tree;

/// Body tree plus its derived text.
///
/// `text` is the whitespace-normalized text of `body` and `length` its
/// character count.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub body: Tree,
    pub text: String,
    pub length: usize,
}

impl Extraction {
    /// Derive text and length from a result body.
    #[must_use]
    pub fn from_body(body: Tree) -> Self {
        let text = etree::iter_text(&body, body.root(), " ");
        let length = etree::char_len(&text);
        Self { body, text, length }
    }

    /// An empty `<body>`.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_body(Tree::new("body"))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Stage that produced the final body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    /// Rule-based main extractor (including wild-text recovery).
    #[default]
    Main,
    /// Baseline fallback (structured data, article text, paragraph scrape).
    Baseline,
    /// Alternative extractor chosen by arbitration.
    Alternative,
}

/// Result of content extraction from an HTML document.
#[derive(Debug, Clone)]
pub struct ExtractResult {
    /// Result tree rooted at `<body>`, restricted to the output tag taxonomy.
    pub body: Tree,

    /// Main content as plain text.
    pub text: String,

    /// Character count of `text`.
    pub length: usize,

    /// Similarity hash of `text`, for near-duplicate detection across documents.
    pub fingerprint: Fingerprint,

    pub source: ExtractionSource,
}

impl ExtractResult {
    /// Result body serialized as HTML.
    #[must_use]
    pub fn html(&self) -> String {
        dom::to_html(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_counts_chars() {
        let body = dom::parse_fragment("<p>Grüße</p><p>aus   Köln</p>");
        let extraction = Extraction::from_body(body);
        assert_eq!(extraction.text, "Grüße aus Köln");
        assert_eq!(extraction.length, 14);
    }

    #[test]
    fn test_empty() {
        let extraction = Extraction::empty();
        assert!(extraction.is_empty());
        assert_eq!(extraction.body.tag(extraction.body.root()), "body");
    }
}
