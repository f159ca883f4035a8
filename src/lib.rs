//! # rs-distill
//!
//! Main-content extraction for web pages.
//!
//! This library takes an HTML document, strips navigation, advertisements and
//! other boilerplate, and returns the article content as a normalized tree
//! (paragraphs, headings, lists, quotes, code, tables, images) plus its text.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_distill::{extract_with_options, Options};
//!
//! let html = r#"<html><body>
//! <nav><a>Home</a><a>About</a><a>Contact</a></nav>
//! <article><p>Real article content that is reasonably long and substantive.</p></article>
//! </body></html>"#;
//!
//! let options = Options { fast: true, ..Options::default() };
//! let result = extract_with_options(html, &options)?;
//! assert!(result.text.contains("Real article content"));
//! assert!(!result.text.contains("Home"));
//! # Ok::<(), rs_distill::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. **Cleaning**: scripts, forms, overlays and other noise are removed
//! 2. **Main extraction**: a content candidate is pruned by selector rules and
//!    link density, then walked element by element
//! 3. **Fallbacks**: a tiered baseline extractor and arbitration against an
//!    alternative (readability) extractor
//! 4. **Checks**: output size, tree size and repetition limits
//!
//! Use [`Extractor`] to process many documents with a shared repetition cache.

mod error;
mod extract;
mod options;
mod result;

/// Arena element tree with text/tail semantics.
pub mod tree;

/// HTML parsing into [`Tree`] and serialization back to HTML.
pub mod dom;

/// Element tree text utilities.
pub mod etree;

/// Selector rules for content finding and boilerplate detection.
pub mod selector;

/// Document cleaning and node text processing.
pub mod html_processing;

/// Main content extraction (handlers, pruning, pipeline, fallbacks).
pub mod extractor;

/// Link density testing for boilerplate detection.
pub mod link_density;

/// Similarity hashing and the repetition cache.
pub mod dedup;

// Public API - re-exports
pub use dedup::{fingerprint, DedupCache, Fingerprint};
pub use error::{Error, Result, TreeError};
pub use extract::{declared_language, Extractor};
#[cfg(feature = "readability")]
pub use extractor::ReadabilityExtractor;
pub use extractor::{AlternativeExtractor, NoAlternative};
pub use options::{Focus, Options};
pub use result::{ExtractResult, Extraction, ExtractionSource};
pub use tree::{NodeId, Tree};

/// Extracts main content from an HTML document using default options.
///
/// # Example
///
/// ```rust
/// use rs_distill::extract;
///
/// let html = "<html><body><article><p>Content</p></article></body></html>";
/// let result = extract(html)?;
/// println!("{}", result.text);
/// # Ok::<(), rs_distill::Error>(())
/// ```
pub fn extract(html: &str) -> Result<ExtractResult> {
    extract_with_options(html, &Options::default())
}

/// Extracts main content from an HTML document with custom options.
///
/// Each call uses a fresh repetition cache, so `dedup` only removes
/// segments repeated within the document. Keep an [`Extractor`] around to
/// deduplicate across documents.
///
/// # Example
///
/// ```rust
/// use rs_distill::{extract_with_options, Focus, Options};
///
/// let html = "<html><body><article><p>Content</p></article></body></html>";
/// let options = Options {
///     focus: Focus::Precision,
///     tables: false,
///     ..Options::default()
/// };
/// let result = extract_with_options(html, &options)?;
/// # Ok::<(), rs_distill::Error>(())
/// ```
pub fn extract_with_options(html: &str, options: &Options) -> Result<ExtractResult> {
    Extractor::new(options.clone()).extract(html)
}
