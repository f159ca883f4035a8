//! Baseline Extraction
//!
//! Cheap, high-recall fallback that works on the raw document and ignores
//! the main extractor's state. Tiers are tried in order, and the first one
//! yielding more than [`BASELINE_MIN_LENGTH`] characters wins:
//!
//! 1. `articleBody` from JSON-LD script blocks
//! 2. text of every `<article>` element
//! 3. de-duplicated paragraph-like elements
//! 4. every text fragment under `<body>`, one per line
//! 5. all visible text of the document
//!
//! No link-density filtering happens here.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, trace};

use crate::dom;
use crate::etree;
use crate::result::Extraction;
use crate::tree::{NodeId, Tree};

/// A tier must produce more characters than this to be adopted.
pub const BASELINE_MIN_LENGTH: usize = 100;

/// Removed before tiers 2-5; nothing else is cleaned.
const BASIC_CLEANING_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// Elements scraped by the paragraph tier.
const PARAGRAPH_TAGS: [&str; 5] = ["blockquote", "code", "p", "pre", "q"];

/// Recursively find `articleBody` (any casing) in JSON-LD data.
fn find_article_body(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => map.iter().find_map(|(key, val)| match val {
            Value::String(s) if key.eq_ignore_ascii_case("articlebody") => Some(s.as_str()),
            _ => find_article_body(val),
        }),
        Value::Array(items) => items.iter().find_map(find_article_body),
        _ => None,
    }
}

fn is_json_ld(tree: &Tree, id: NodeId) -> bool {
    tree.is_tag(id, "script")
        && tree
            .attr(id, "type")
            .is_some_and(|t| t.to_ascii_lowercase().contains("ld+json"))
}

/// Article body declared in JSON-LD, with embedded markup reduced to text.
///
/// Blocks that fail to parse are skipped.
#[must_use]
pub fn json_ld_article_body(tree: &Tree) -> Option<String> {
    for script in tree.iter(tree.root()) {
        if !is_json_ld(tree, script) {
            continue;
        }
        let data: Value = match serde_json::from_str(tree.text(script).trim()) {
            Ok(data) => data,
            Err(err) => {
                trace!(%err, "skipping unparsable JSON-LD block");
                continue;
            }
        };
        let Some(body) = find_article_body(&data) else {
            continue;
        };
        let text = if body.contains('<') {
            let fragment = dom::parse_fragment(body);
            etree::iter_text(&fragment, fragment.root(), " ")
        } else {
            etree::trim(body)
        };
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

/// Remove scripts and styles only.
fn basic_cleaning(tree: &mut Tree) {
    let root = tree.root();
    tree.remove_tags(root, &BASIC_CLEANING_TAGS);
}

/// Single-paragraph body holding `text`.
fn paragraph_body(text: &str) -> Extraction {
    let mut body = Tree::new("body");
    let root = body.root();
    etree::sub_element_with_text(&mut body, root, "p", text);
    Extraction::from_body(body)
}

fn adopt(tier: &str, extraction: Extraction) -> Option<Extraction> {
    if extraction.length > BASELINE_MIN_LENGTH {
        debug!(tier, length = extraction.length, "baseline tier adopted");
        Some(extraction)
    } else {
        None
    }
}

fn article_tier(tree: &Tree) -> Option<Extraction> {
    let texts: Vec<String> = tree
        .iter_tags(tree.root(), &["article"])
        .into_iter()
        // Nested articles are covered by their outermost ancestor.
        .filter(|&a| !tree.ancestors(a).any(|p| tree.is_tag(p, "article")))
        .map(|a| etree::iter_text(tree, a, " "))
        .filter(|t| !t.is_empty())
        .collect();
    adopt("article", paragraph_body(&texts.join(" ")))
}

fn paragraph_tier(tree: &Tree, body: NodeId) -> Option<Extraction> {
    let mut out = Tree::new("body");
    let root = out.root();
    let mut seen = HashSet::new();
    for elem in tree.iter_tags(body, &PARAGRAPH_TAGS) {
        let entry = etree::iter_text(tree, elem, " ");
        if entry.is_empty() || !seen.insert(entry.clone()) {
            continue;
        }
        etree::sub_element_with_text(&mut out, root, "p", &entry);
    }
    adopt("paragraphs", Extraction::from_body(out))
}

fn body_text_tier(tree: &Tree, body: NodeId) -> Option<Extraction> {
    let lines: Vec<&str> = tree
        .text_fragments(body)
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    adopt("body text", paragraph_body(&lines.join("\n")))
}

/// Fallback extraction over an uncleaned document tree.
#[must_use]
pub fn baseline(tree: &Tree) -> Extraction {
    if let Some(text) = json_ld_article_body(tree) {
        if let Some(extraction) = adopt("json-ld", paragraph_body(&text)) {
            return extraction;
        }
    }

    let mut tree = tree.clone();
    basic_cleaning(&mut tree);

    if let Some(extraction) = article_tier(&tree) {
        return extraction;
    }
    if let Some(body) = dom::body(&tree) {
        if let Some(extraction) = paragraph_tier(&tree, body) {
            return extraction;
        }
        if let Some(extraction) = body_text_tier(&tree, body) {
            return extraction;
        }
    }

    debug!("baseline falling back to whole document text");
    paragraph_body(&etree::iter_text(&tree, tree.root(), " "))
}
