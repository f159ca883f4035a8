//! HTML Processing and Pruning
//!
//! Tree cleaning before extraction, tag conversion, and the text probes the
//! node handlers share.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::dedup::DedupCache;
use crate::etree;
use crate::extractor::tags::{
    is_lb_tag, EMPTY_TAGS_TO_REMOVE, HI_TAGS, IMAGE_CONTAINERS, TABLE_TAGS_TO_STRIP,
    TAGS_TO_CLEAN, TAGS_TO_STRIP,
};
use crate::options::Options;
use crate::selector::utils::{attr, class, id};
use crate::tree::{NodeId, Tree};

/// Minimum visible text for a `<noscript>` to count as misparsed content.
const NOSCRIPT_CONTENT_THRESHOLD: usize = 500;

/// Lines made only of a share-button or "read more" label.
#[allow(clippy::expect_used)]
static RE_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\W*(Drucken|E-?Mail|Facebook|Flipboard|Google|Instagram|Linkedin|Mail|PDF|Pinterest|Pocket|Print|QQ|Reddit|Twitter|WeChat|WeiBo|Whatsapp|Xing|Mehr zum Thema:?|More on this.{0,8}|Comments?|Kommentare)\W*$",
    )
    .expect("RE_FILTER regex")
});

// === Document Cleaning ===

/// Clean a parsed document ahead of extraction.
///
/// Returns `None` for a tree holding neither elements nor text. In recall
/// mode the removal pass is undone when it would leave no paragraph behind.
#[must_use]
pub fn clean(mut tree: Tree, options: &Options) -> Option<Tree> {
    let root = tree.root();
    if tree.children(root).is_empty() && !etree::has_text(&tree, root) {
        return None;
    }
    doc_cleaning(&mut tree, options);
    Some(tree)
}

/// In-place cleaning: unwrap, remove, then prune empty nodes.
pub fn doc_cleaning(tree: &mut Tree, options: &Options) {
    let root = tree.root();

    for figure in tree.iter_tags(root, &["figure"]) {
        let has_table = options.tables && tree.find_tag(figure, "table").is_some();
        if has_table || tree.find_tag(figure, "blockquote").is_some() {
            tree.set_tag(figure, "div");
        }
    }

    for noscript in tree.iter_tags(root, &["noscript"]) {
        if !tree.is_attached(noscript) {
            continue;
        }
        let text = etree::text_content(tree, noscript);
        if etree::char_len(&text) > NOSCRIPT_CONTENT_THRESHOLD && !is_consent_text(&text) {
            trace!("unwrapping noscript with {} chars", etree::char_len(&text));
            if let Err(err) = tree.strip(noscript) {
                warn!(%err, "could not unwrap noscript");
            }
        }
    }

    tree.strip_tags(root, &strip_list(options));

    let paragraphs_before = tree.find_tag(root, "p").is_some();
    let snapshot = (options.is_recall() && paragraphs_before).then(|| tree.clone());

    let clean_list = clean_list(options);
    for tag in &clean_list {
        remove_elements(tree, |t, n| t.is_tag(n, tag), tag);
    }
    remove_elements(tree, is_overlay, "overlay");

    if let Some(snapshot) = snapshot {
        if tree.find_tag(root, "p").is_none() {
            debug!("cleaning removed every paragraph, restoring");
            *tree = snapshot;
        }
    }

    prune_html(tree);
}

/// Remove every attached element matching `pred`, logging failures.
fn remove_elements(tree: &mut Tree, pred: impl Fn(&Tree, NodeId) -> bool, label: &str) {
    let root = tree.root();
    let mut removed = 0usize;
    for n in tree.descendants(root) {
        if !pred(tree, n) || !tree.is_attached(n) {
            continue;
        }
        match tree.remove(n) {
            Ok(()) => removed += 1,
            Err(err) => warn!(%err, label, "removal failed, skipping"),
        }
    }
    if removed > 0 {
        trace!(label, removed, "cleaned");
    }
}

fn strip_list(options: &Options) -> Vec<&'static str> {
    TAGS_TO_STRIP
        .iter()
        .chain(TABLE_TAGS_TO_STRIP.iter())
        .copied()
        .filter(|&t| !(options.images && t == "img"))
        .collect()
}

fn clean_list(options: &Options) -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = TAGS_TO_CLEAN.to_vec();
    if !options.tables {
        tags.extend(["table", "td", "th", "tr"]);
    }
    if options.images {
        tags.retain(|t| !IMAGE_CONTAINERS.contains(t));
    }
    tags
}

fn is_consent_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    [
        "cookie",
        "consent",
        "gdpr",
        "privacy",
        "third party partners",
        "personalize content",
        "enable javascript",
    ]
    .iter()
    .any(|marker| lower.contains(marker))
}

/// Modal dialogs and consent banners.
fn is_overlay(tree: &Tree, n: NodeId) -> bool {
    let class = class(tree, n);
    let id = id(tree, n);
    class
        .split_whitespace()
        .any(|c| matches!(c, "modal" | "modal-dialog" | "modal-content" | "modal-backdrop" | "modal-overlay"))
        || attr(tree, n, "role") == "dialog"
        || [id, class].iter().any(|s| {
            s.contains("gdpr")
                || s.contains("consent")
                || s.contains("cookie-banner")
                || s.contains("cookiebanner")
        })
}

/// Delete empty elements from the safe list, children before parents.
pub fn prune_html(tree: &mut Tree) {
    let root = tree.root();
    for n in tree.descendants(root).into_iter().rev() {
        if !EMPTY_TAGS_TO_REMOVE.contains(&tree.tag(n)) || !tree.children(n).is_empty() {
            continue;
        }
        if tree.text(n).trim().is_empty() && tree.is_attached(n) {
            if let Err(err) = tree.remove(n) {
                warn!(%err, "could not prune empty node");
            }
        }
    }
}

// === Tag Conversion ===

/// Normalize links, formatting and code blocks after cleaning.
///
/// Without `links`, anchors inside block containers stay in place so the
/// link-density filter can still see them; every other anchor is unwrapped.
/// With `links`, anchors keep only an absolute `href`.
pub fn convert_tags(tree: &mut Tree, options: &Options) {
    let root = tree.root();

    if options.links {
        for a in tree.iter_tags(root, &["a"]) {
            let href = tree.attr(a, "href").map(|h| absolute_url(h, options.url.as_deref()));
            tree.clear_attrs(a);
            if let Some(href) = href.filter(|h| !h.is_empty()) {
                tree.set_attr(a, "href", &href);
            }
        }
    } else {
        let mut blocks = vec!["div", "li", "p"];
        if options.tables {
            blocks.push("table");
        }
        for a in tree.iter_tags(root, &["a"]).into_iter().rev() {
            let protected = tree.ancestors(a).any(|p| blocks.contains(&tree.tag(p)));
            if !protected && tree.is_attached(a) {
                let _ = tree.strip(a);
            }
        }
    }

    if !options.formatting {
        tree.strip_tags(root, &HI_TAGS);
    }

    for pre in tree.iter_tags(root, &["pre"]) {
        if is_code_block(tree, pre) {
            for span in tree.descendants(pre) {
                if class(tree, span).starts_with("hljs") {
                    tree.clear_attrs(span);
                }
            }
            for code in tree.iter_tags(pre, &["code"]) {
                let _ = tree.strip(code);
            }
            tree.set_tag(pre, "code");
        }
    }
}

/// A `<pre>` holding source code rather than quoted text.
fn is_code_block(tree: &Tree, pre: NodeId) -> bool {
    let children = tree.children(pre);
    tree.attr(pre, "lang").is_some()
        || (children.len() == 1 && matches!(tree.tag(children[0]), "span" | "code"))
        || tree
            .descendants(pre)
            .into_iter()
            .any(|n| tree.is_tag(n, "span") && class(tree, n).starts_with("hljs"))
        || tree
            .parent(pre)
            .is_some_and(|p| class(tree, p).contains("highlight"))
}

/// Resolve `href` against `base` when it is relative.
#[must_use]
pub fn absolute_url(href: &str, base: Option<&str>) -> String {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("data:") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("http://{rest}");
    }
    if url::Url::parse(href).is_ok() {
        return href.to_string();
    }
    base.and_then(|b| url::Url::parse(b).ok())
        .and_then(|b| b.join(href).ok())
        .map_or_else(|| href.to_string(), |u| u.to_string())
}

/// Whether a URL path ends in a known image extension.
#[must_use]
pub fn is_image_file(src: &str) -> bool {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    let ext = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    matches!(
        ext.as_str(),
        "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" | "bmp" | "ico" | "tiff" | "tif" | "avif"
    )
}

/// An `img` whose `src` or a `data-src*` attribute names an image file.
#[must_use]
pub fn is_image_element(tree: &Tree, id: NodeId) -> bool {
    image_source(tree, id).is_some()
}

/// The first usable image source: `data-src`, `src`, then any `data-src*`.
#[must_use]
pub fn image_source(tree: &Tree, id: NodeId) -> Option<&str> {
    ["data-src", "src"]
        .iter()
        .filter_map(|name| tree.attr(id, name))
        .chain(
            tree.attrs(id)
                .iter()
                .filter(|(name, _)| name.starts_with("data-src"))
                .map(|(_, value)| value.as_str()),
        )
        .find(|src| is_image_file(src))
}

// === Text Probes ===

/// Any non-whitespace character.
#[inline]
#[must_use]
pub fn text_chars_test(text: &str) -> bool {
    text.chars().any(|c| !c.is_whitespace())
}

/// Share buttons, social links and similar one-line labels.
#[must_use]
pub fn is_share_button_text(line: &str) -> bool {
    RE_FILTER.is_match(line.trim())
}

/// Whether the node's own text (or its tail when the text is blank) is
/// empty or matches a boilerplate label.
#[must_use]
pub fn text_filter(tree: &Tree, id: NodeId) -> bool {
    let text = if text_chars_test(tree.text(id)) {
        tree.text(id)
    } else {
        tree.tail(id)
    };
    !text_chars_test(text) || text.lines().any(is_share_button_text)
}

fn is_duplicate(tree: &Tree, id: NodeId, options: &Options, cache: Option<&DedupCache>) -> bool {
    options.dedup && cache.is_some_and(|c| c.is_duplicate_element(tree, id, options))
}

/// Trim a leaf-like node in place and decide whether it is kept.
///
/// Text is trimmed; a node with no text takes over its tail. Rejected when
/// the result is blank, boilerplate, or a repeated segment.
pub fn process_node(
    tree: &mut Tree,
    id: NodeId,
    options: &Options,
    cache: Option<&DedupCache>,
) -> bool {
    if tree.is_done(id)
        || (tree.children(id).is_empty() && tree.text(id).is_empty() && tree.tail(id).is_empty())
    {
        return false;
    }

    let text = tree.text(id).trim().to_string();
    let tail = tree.tail(id).trim().to_string();
    if !is_lb_tag(tree.tag(id)) && text.is_empty() && !tail.is_empty() {
        tree.set_text(id, &tail);
        tree.set_tail(id, "");
    } else {
        tree.set_text(id, &text);
        tree.set_tail(id, &tail);
    }

    if tree.text(id).is_empty() && tree.tail(id).is_empty() {
        return !tree.children(id).is_empty();
    }
    !(text_filter(tree, id) || is_duplicate(tree, id, options, cache))
}

/// Like [`process_node`] for text containers, with line-break handling.
///
/// With `fix_breaks`, a childless `br`/`hr` carrying a tail becomes a `p`
/// holding that tail. Without it, a line break is kept and only its tail is
/// trimmed. `preserve_spaces` keeps whitespace as is (code blocks).
pub fn handle_text_node(
    tree: &mut Tree,
    id: NodeId,
    options: &Options,
    cache: Option<&DedupCache>,
    fix_breaks: bool,
    preserve_spaces: bool,
) -> bool {
    if tree.is_tag(id, "img") && is_image_element(tree, id) {
        return true;
    }
    if tree.is_done(id)
        || (tree.children(id).is_empty() && tree.text(id).is_empty() && tree.tail(id).is_empty())
    {
        return false;
    }

    if !fix_breaks && is_lb_tag(tree.tag(id)) {
        if !preserve_spaces {
            let tail = etree::trim(tree.tail(id));
            tree.set_tail(id, &tail);
        }
        return true;
    }

    if tree.text(id).is_empty() && tree.children(id).is_empty() {
        let tail = tree.tail(id).to_string();
        tree.set_text(id, &tail);
        tree.set_tail(id, "");
        if fix_breaks && is_lb_tag(tree.tag(id)) {
            tree.set_tag(id, "p");
        }
    }

    if !preserve_spaces {
        let text = etree::trim(tree.text(id));
        let tail = etree::trim(tree.tail(id));
        tree.set_text(id, &text);
        tree.set_tail(id, &tail);
    }

    if tree.text(id).is_empty() && tree.children(id).is_empty() {
        return false;
    }
    if !tree.text(id).is_empty() && text_filter(tree, id) {
        return false;
    }
    !is_duplicate(tree, id, options, cache)
}
