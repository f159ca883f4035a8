use std::sync::Arc;
use std::thread;

use rs_distill::{fingerprint, DedupCache, Error, Extractor, NoAlternative, Options};

const SEGMENT: &str = "A sentence repeated across many pages of the same site, long enough to be checked for repetition by the cache.";

#[test]
fn repetition_boundary() {
    for n in 0..4 {
        let cache = DedupCache::new(16);
        let options = Options { max_repetitions: n, ..Options::default() };
        for i in 1..=n {
            assert!(!cache.is_duplicate(SEGMENT, &options), "submission {i} of max {n}");
        }
        assert!(cache.is_duplicate(SEGMENT, &options), "submission {} of max {n}", n + 1);
        assert!(cache.is_duplicate(SEGMENT, &options));
    }
}

#[test]
fn short_segments_never_counted() {
    let cache = DedupCache::new(16);
    let options = Options { max_repetitions: 0, ..Options::default() };
    assert!(!cache.is_duplicate("short text", &options));
    assert!(cache.is_empty());
}

#[test]
fn whitespace_is_normalized_before_lookup() {
    let cache = DedupCache::new(16);
    let options = Options::default();
    cache.is_duplicate(SEGMENT, &options);
    let spaced = format!("  {}\n", SEGMENT.replace(' ', "   "));
    cache.is_duplicate(&spaced, &options);
    assert_eq!(cache.count(SEGMENT), Some(2));
}

#[test]
fn lru_eviction_and_clear() {
    let cache = DedupCache::new(2);
    let options = Options::default();
    let segments: Vec<String> = (0..3).map(|i| format!("{i} {SEGMENT}")).collect();
    for s in &segments {
        cache.is_duplicate(s, &options);
    }
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.count(&segments[0]), None);
    assert_eq!(cache.count(&segments[2]), Some(1));

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn shared_cache_counts_across_threads() {
    let cache = Arc::new(DedupCache::new(64));
    let options = Options { max_repetitions: 100, ..Options::default() };
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let options = options.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    cache.is_duplicate(SEGMENT, &options);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked");
    }
    assert_eq!(cache.count(SEGMENT), Some(40));
}

#[test]
fn repeated_document_rejected_by_shared_cache() {
    let html = format!(
        "<html><body><article><p>First: {SEGMENT}</p><p>Second: {SEGMENT}</p></article></body></html>"
    );
    let options = Options { dedup: true, ..Options::default() };
    let cache = Arc::new(DedupCache::default());
    let first = Extractor::new(options.clone())
        .with_cache(Arc::clone(&cache))
        .with_alternative(NoAlternative);
    let second = Extractor::new(options)
        .with_cache(Arc::clone(&cache))
        .with_alternative(NoAlternative);

    assert!(first.extract(&html).is_ok());
    assert!(second.extract(&html).is_ok());
    assert!(matches!(first.extract(&html), Err(Error::Duplicate)));
    assert!(Arc::ptr_eq(first.cache(), second.cache()));
}

#[test]
fn dedup_off_never_rejects() {
    let html = format!("<html><body><article><p>{SEGMENT}</p></article></body></html>");
    let extractor = Extractor::new(Options::default()).with_alternative(NoAlternative);
    for _ in 0..5 {
        assert!(extractor.extract(&html).is_ok());
    }
    assert!(extractor.cache().is_empty());
}

#[test]
fn fingerprint_similarity() {
    let text = "The quick brown fox jumps over the lazy dog while the farmer watches from the porch of the old house. "
        .repeat(3);
    let edited = text.replacen("farmer", "neighbour", 1);
    let other = "Completely unrelated text about compilers, borrow checking, lifetimes and trait objects in systems code. "
        .repeat(3);

    let base = fingerprint(&text);
    assert_eq!(base, fingerprint(&text));
    assert!(base.similarity(fingerprint(&edited)) > base.similarity(fingerprint(&other)));
    assert_eq!(base.distance(base), 0);
    assert_eq!(fingerprint("").0, 0);
}
