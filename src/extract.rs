//! Extraction orchestrator.
//!
//! Runs the stages in order for one document: language check, cleaning,
//! tag conversion, main extraction, baseline fallback, arbitration, output
//! checks and document-level deduplication.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::dedup::{fingerprint, DedupCache};
use crate::dom;
use crate::error::{Error, Result};
use crate::extractor::arbitration::{arbitrate, default_alternative, AlternativeExtractor};
use crate::extractor::baseline::baseline;
use crate::extractor::pipeline::extract_content;
use crate::extractor::tags::HI_TAGS;
use crate::html_processing;
use crate::options::Options;
use crate::result::{ExtractResult, Extraction, ExtractionSource};
use crate::tree::Tree;

/// Primary language subtag, lowercased: `"en-GB"` and `"en_US"` give `"en"`.
fn normalize_language(lang: &str) -> String {
    lang.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Language declared by the document, from `<html lang>`, then
/// `<meta http-equiv="content-language">`, then `<meta name="language">`.
#[must_use]
pub fn declared_language(tree: &Tree) -> Option<String> {
    let root = tree.root();
    if let Some(lang) = tree.attr(root, "lang").filter(|l| !l.trim().is_empty()) {
        return Some(normalize_language(lang));
    }

    let metas = tree.iter_tags(root, &["meta"]);
    let meta_content = |key: &str, value: &str| {
        metas.iter().find_map(|&m| {
            tree.attr(m, key)
                .filter(|v| v.eq_ignore_ascii_case(value))
                .and_then(|_| tree.attr(m, "content"))
                .filter(|c| !c.trim().is_empty())
        })
    };
    meta_content("http-equiv", "content-language")
        .or_else(|| meta_content("name", "language"))
        .map(normalize_language)
}

fn check_language(tree: &Tree, options: &Options) -> Result<()> {
    let Some(target) = options.target_language.as_deref() else {
        return Ok(());
    };
    let expected = normalize_language(target);
    match declared_language(tree) {
        Some(found) if found != expected => Err(Error::LanguageMismatch { expected, found }),
        _ => Ok(()),
    }
}

/// Unwrap inline formatting, then reject the body if it is still too large.
fn enforce_tree_size(extraction: Extraction, limit: usize) -> Result<Extraction> {
    let size = |body: &Tree| body.descendants(body.root()).len();
    if size(&extraction.body) <= limit {
        return Ok(extraction);
    }

    let mut body = extraction.body;
    let root = body.root();
    body.strip_tags(root, &HI_TAGS);
    let size = size(&body);
    if size > limit {
        return Err(Error::TreeTooLarge { size, limit });
    }
    debug!(size, limit, "result tree simplified to fit size limit");
    Ok(Extraction::from_body(body))
}

/// An empty main result always gives way to a longer baseline. Otherwise
/// the baseline must reach `min_extracted_size` itself, outside precision
/// mode.
fn adopt_baseline(main: &Extraction, fallback: &Extraction, options: &Options) -> bool {
    if fallback.length <= main.length {
        return false;
    }
    main.is_empty() || (!options.is_precision() && fallback.length >= options.min_extracted_size)
}

/// Reusable extractor holding options, the repetition cache and the
/// alternative extractor used for arbitration.
///
/// # Example
///
/// ```rust
/// use rs_distill::{Extractor, NoAlternative, Options};
///
/// let extractor = Extractor::new(Options::default()).with_alternative(NoAlternative);
/// let html = "<html><body><nav><a>Home</a></nav><article><p>Real article content.</p></article></body></html>";
/// let result = extractor.extract(html)?;
/// assert_eq!(result.text, "Real article content.");
/// # Ok::<(), rs_distill::Error>(())
/// ```
pub struct Extractor {
    options: Options,
    cache: Arc<DedupCache>,
    alternative: Box<dyn AlternativeExtractor>,
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("options", &self.options)
            .field("cache_len", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Extractor {
    /// Extractor with a fresh cache of `options.dedup_cache_size` entries
    /// and the default alternative extractor.
    #[must_use]
    pub fn new(options: Options) -> Self {
        let cache = Arc::new(DedupCache::new(options.dedup_cache_size));
        Self {
            options,
            cache,
            alternative: default_alternative(),
        }
    }

    /// Share a repetition cache with other extractors.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<DedupCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_alternative(mut self, alternative: impl AlternativeExtractor + 'static) -> Self {
        self.alternative = Box::new(alternative);
        self
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<DedupCache> {
        &self.cache
    }

    /// Parse `html` and extract its main content.
    pub fn extract(&self, html: &str) -> Result<ExtractResult> {
        if html.trim().is_empty() {
            return Err(Error::NoContent);
        }
        self.extract_tree(dom::parse(html))
    }

    /// Extract the main content of an already parsed document.
    pub fn extract_tree(&self, tree: Tree) -> Result<ExtractResult> {
        let options = &self.options;
        let span = debug_span!("extract", url = options.url.as_deref().unwrap_or_default());
        let _guard = span.enter();

        check_language(&tree, options)?;

        let raw = tree.clone();
        let Some(mut tree) = html_processing::clean(tree, options) else {
            debug!("document empty after cleaning");
            return Err(Error::NoContent);
        };
        html_processing::convert_tags(&mut tree, options);
        let cleaned = tree.clone();

        let mut extraction = extract_content(&mut tree, options, Some(self.cache.as_ref()));
        let mut source = ExtractionSource::Main;

        if extraction.length < options.min_extracted_size {
            let fallback = baseline(&raw);
            if adopt_baseline(&extraction, &fallback, options) {
                debug!(main = extraction.length, baseline = fallback.length, "adopting baseline");
                extraction = fallback;
                source = ExtractionSource::Baseline;
            }
        }

        if !options.fast {
            if let Some(alternative) = arbitrate(&cleaned, &extraction, options, self.alternative.as_ref()) {
                extraction = alternative;
                source = ExtractionSource::Alternative;
            }
        }

        if let Some(limit) = options.max_tree_size {
            extraction = enforce_tree_size(extraction, limit)?;
        }

        if extraction.length < options.min_output_size {
            debug!(length = extraction.length, "output below minimum size");
            return Err(Error::NoContent);
        }

        if options.dedup && self.cache.is_duplicate(&extraction.text, options) {
            debug!("duplicate document");
            return Err(Error::Duplicate);
        }

        let Extraction { body, text, length } = extraction;
        Ok(ExtractResult {
            fingerprint: fingerprint(&text),
            body,
            text,
            length,
            source,
        })
    }
}
