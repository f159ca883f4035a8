//! Configuration options for content extraction.
//!
//! The `Options` struct is read by every pipeline stage. It can be built in
//! code with struct update syntax or loaded from a JSON document with
//! [`Options::from_json`].

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How aggressively boilerplate is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    /// Remove more, risk losing marginal content.
    Precision,
    #[default]
    Balanced,
    /// Keep more, risk keeping some boilerplate.
    Recall,
}

/// Configuration options for content extraction.
///
/// # Example
///
/// ```rust
/// use rs_distill::{Focus, Options};
///
/// let options = Options {
///     focus: Focus::Precision,
///     images: true,
///     ..Options::default()
/// };
/// assert!(options.is_precision());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Precision/recall trade-off.
    ///
    /// Default: `Focus::Balanced`
    pub focus: Focus,

    /// Keep tables in the result.
    ///
    /// Default: `true`
    pub tables: bool,

    /// Keep images in the result.
    ///
    /// Default: `false`
    pub images: bool,

    /// Keep links (with their `href`) in the result.
    ///
    /// Default: `false`
    pub links: bool,

    /// Keep inline formatting (bold, italics, ...) in the result.
    ///
    /// Default: `false`
    pub formatting: bool,

    /// Skip arbitration against the alternative extractor.
    ///
    /// Default: `false`
    pub fast: bool,

    /// Drop segments and documents repeated more than `max_repetitions` times.
    ///
    /// Default: `false`
    pub dedup: bool,

    /// Below this many characters the main extractor's output is considered
    /// too small and the fallbacks are tried.
    ///
    /// Default: `250`
    pub min_extracted_size: usize,

    /// Documents whose final text is shorter than this are rejected.
    ///
    /// Default: `1`
    pub min_output_size: usize,

    /// Segments must be longer than this to take part in duplicate detection.
    ///
    /// Default: `100`
    pub min_duplcheck_size: usize,

    /// A segment seen more often than this is a duplicate.
    ///
    /// Default: `2`
    pub max_repetitions: usize,

    /// Maximum number of elements in the result tree.
    ///
    /// Default: `None` (unbounded)
    pub max_tree_size: Option<usize>,

    /// Capacity of the repetition cache created by [`crate::Extractor::new`].
    ///
    /// Default: `4096`
    pub dedup_cache_size: usize,

    /// Source URL of the document. Base for resolving relative link and
    /// image targets, and attached to the extraction's log span.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Expected document language (ISO 639-1). Documents declaring another
    /// language are rejected before extraction.
    ///
    /// Default: `None`
    pub target_language: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            focus: Focus::Balanced,
            tables: true,
            images: false,
            links: false,
            formatting: false,
            fast: false,
            dedup: false,
            min_extracted_size: 250,
            min_output_size: 1,
            min_duplcheck_size: 100,
            max_repetitions: 2,
            max_tree_size: None,
            dedup_cache_size: 4096,
            url: None,
            target_language: None,
        }
    }
}

impl Options {
    /// Loads options from a JSON object. Missing keys take their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[inline]
    #[must_use]
    pub fn is_precision(&self) -> bool {
        self.focus == Focus::Precision
    }

    #[inline]
    #[must_use]
    pub fn is_recall(&self) -> bool {
        self.focus == Focus::Recall
    }
}
