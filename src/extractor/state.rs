//! Extraction state tracking.
//!
//! Per-document set of tags the extractor currently accepts as content, plus
//! the options and repetition cache every handler consults. Processed nodes
//! are tracked on the tree itself (`Node::done`).

use std::collections::HashSet;

use super::tags::{LB_TAGS, LIST_TAGS, TAG_CATALOG};
use crate::dedup::DedupCache;
use crate::options::Options;

/// Handler inputs for one document.
#[derive(Debug, Clone)]
pub struct ExtractionState<'a> {
    potential_tags: HashSet<&'static str>,
    pub options: &'a Options,
    /// Present only when segment-level deduplication is enabled.
    pub cache: Option<&'a DedupCache>,
}

impl<'a> ExtractionState<'a> {
    /// Start from the tag catalog and add what the content toggles enable.
    #[must_use]
    pub fn new(options: &'a Options, cache: Option<&'a DedupCache>) -> Self {
        let mut potential_tags = (*TAG_CATALOG).clone();
        if options.tables {
            potential_tags.extend(["table", "tr", "th", "td"]);
        }
        if options.images {
            potential_tags.insert("img");
        }
        if options.links {
            potential_tags.insert("a");
        }
        Self {
            potential_tags,
            options,
            cache: cache.filter(|_| options.dedup),
        }
    }

    #[must_use]
    pub fn is_potential_tag(&self, tag: &str) -> bool {
        self.potential_tags.contains(tag)
    }

    pub fn add_potential_tag(&mut self, tag: &'static str) {
        self.potential_tags.insert(tag);
    }

    /// Loosened acceptance used by wild-text recovery in recall mode.
    pub fn widen_for_recovery(&mut self) {
        self.potential_tags.insert("div");
        self.potential_tags.extend(LB_TAGS);
        self.potential_tags.extend(LIST_TAGS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_configure_potential_tags() {
        let opts = Options::default();
        let state = ExtractionState::new(&opts, None);
        assert!(state.is_potential_tag("table"));
        assert!(state.is_potential_tag("td"));
        assert!(!state.is_potential_tag("img"));
        assert!(!state.is_potential_tag("a"));

        let opts = Options {
            tables: false,
            images: true,
            links: true,
            ..Options::default()
        };
        let state = ExtractionState::new(&opts, None);
        assert!(!state.is_potential_tag("table"));
        assert!(state.is_potential_tag("img"));
        assert!(state.is_potential_tag("a"));
    }

    #[test]
    fn test_widen_adds_div() {
        let opts = Options::default();
        let mut state = ExtractionState::new(&opts, None);
        assert!(!state.is_potential_tag("div"));
        state.widen_for_recovery();
        assert!(state.is_potential_tag("div"));
        assert!(state.is_potential_tag("br"));
    }

    #[test]
    fn test_cache_only_with_dedup() {
        let cache = DedupCache::new(8);
        let opts = Options::default();
        assert!(ExtractionState::new(&opts, Some(&cache)).cache.is_none());
        let opts = Options { dedup: true, ..Options::default() };
        assert!(ExtractionState::new(&opts, Some(&cache)).cache.is_some());
    }
}
