//! Content deduplication.
//!
//! Two tools with different jobs:
//! - [`fingerprint`] computes a 64-bit similarity hash (simhash) of a text, so
//!   near-identical documents end up a small Hamming distance apart.
//! - [`DedupCache`] counts verbatim repetitions of text segments across the
//!   documents an [`crate::Extractor`] processes. It is keyed by the exact
//!   trimmed text, not by the hash.
//!
//! Repetition counts depend on the order documents are processed in. Share
//! one cache between threads to deduplicate a whole crawl; give each test its
//! own cache.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

use crate::etree;
use crate::options::Options;
use crate::tree::{NodeId, Tree};

const HASH_BITS: usize = 64;

/// Default number of distinct segments remembered.
pub const DEFAULT_CACHE_SIZE: usize = 4096;

/// Similarity hash of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Number of differing bits.
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// 1.0 for identical hashes, 0.0 when every bit differs.
    #[must_use]
    pub fn similarity(self, other: Self) -> f64 {
        1.0 - f64::from(self.distance(other)) / HASH_BITS as f64
    }
}

/// Alphanumeric tokens, surrounding punctuation removed.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|t| !t.is_empty() && t.chars().all(char::is_alphanumeric))
        .collect()
}

/// Keep the longest tokens that still give half the hash width in samples:
/// tokens longer than 4 chars, else longer than 3, ... down to all tokens.
fn sample_tokens(text: &str) -> Vec<&str> {
    let tokens = tokenize(text);
    let mut sample = Vec::new();
    for min_len in (0..=4).rev() {
        sample = tokens
            .iter()
            .copied()
            .filter(|t| t.chars().count() > min_len)
            .collect();
        if sample.len() >= HASH_BITS / 2 {
            break;
        }
    }
    sample
}

/// Simhash of the text's sampled tokens. Empty input hashes to zero.
#[must_use]
pub fn fingerprint(text: &str) -> Fingerprint {
    let sample = sample_tokens(text);
    if sample.is_empty() {
        return Fingerprint(0);
    }

    let mut sums = [0i64; HASH_BITS];
    for token in sample {
        let hash = xxh3_64(token.as_bytes());
        for (bit, sum) in sums.iter_mut().enumerate() {
            if (hash >> bit) & 1 == 1 {
                *sum += 1;
            } else {
                *sum -= 1;
            }
        }
    }

    let value = sums
        .iter()
        .enumerate()
        .filter(|(_, sum)| **sum > 0)
        .fold(0u64, |acc, (bit, _)| acc | (1 << bit));
    Fingerprint(value)
}

/// Bounded LRU map from exact segment text to its repetition count.
#[derive(Debug)]
pub struct DedupCache {
    inner: Mutex<LruCache<String, usize>>,
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl DedupCache {
    /// Cache remembering at most `capacity` segments (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Record one more sighting of `text` and report whether it is now
    /// repeated more than `max_repetitions` times.
    ///
    /// Text no longer than `min_duplcheck_size` characters (after whitespace
    /// normalization) is never a duplicate and is not recorded.
    pub fn is_duplicate(&self, text: &str, options: &Options) -> bool {
        let key = etree::trim(text);
        if etree::char_len(&key) <= options.min_duplcheck_size {
            return false;
        }

        let mut cache = self.inner.lock();
        let count = cache.get(&key).copied().unwrap_or(0) + 1;
        cache.put(key, count);
        count > options.max_repetitions
    }

    /// Duplicate test on the text of a subtree.
    pub fn is_duplicate_element(&self, tree: &Tree, id: NodeId, options: &Options) -> bool {
        self.is_duplicate(&etree::iter_text(tree, id, " "), options)
    }

    /// Times `text` has been recorded, if it is still cached.
    #[must_use]
    pub fn count(&self, text: &str) -> Option<usize> {
        self.inner.lock().peek(&etree::trim(text)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Forget every recorded segment.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}
