//! Content extraction pipeline.
//!
//! Candidate selection, section pruning, handler dispatch and result
//! assembly, followed by a one-off wild-text recovery pass when the yield is
//! too small.

use tracing::{debug, trace};

use super::handlers::{
    handle_code_blocks, handle_formatting, handle_image, handle_lists, handle_other_elements,
    handle_paragraphs, handle_quotes, handle_table, handle_titles,
};
use super::pruning::prune_unwanted_sections;
use super::state::ExtractionState;
use super::tags::{is_result_tag, NodeKind, NOT_AT_THE_END};
use crate::dedup::DedupCache;
use crate::dom;
use crate::etree;
use crate::html_processing::{process_node, text_chars_test};
use crate::options::Options;
use crate::result::Extraction;
use crate::selector::content::CONTENT_RULES;
use crate::tree::{NodeId, Tree};

/// Tags searched by wild-text recovery in every mode.
const WILD_TEXT_TAGS: [&str; 6] = ["blockquote", "code", "p", "pre", "q", "table"];

/// Extra tags searched by wild-text recovery in recall mode.
const WILD_TEXT_RECALL_TAGS: [&str; 6] = ["div", "br", "hr", "ul", "ol", "dl"];

/// Route one source element to its handler.
pub fn handle_text_elem(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    match NodeKind::of(src.tag(id)) {
        NodeKind::List => handle_lists(src, id, out, state),
        NodeKind::Code => handle_code_blocks(src, id, out),
        NodeKind::Quote => handle_quotes(src, id, out, state),
        NodeKind::Heading => handle_titles(src, id, out, state),
        NodeKind::Paragraph => handle_paragraphs(src, id, out, state),
        NodeKind::LineBreak => handle_line_break(src, id, out, state),
        NodeKind::Formatting => handle_formatting(src, id, out, state),
        NodeKind::Table if state.is_potential_tag("table") => handle_table(src, id, out, state),
        NodeKind::Image if state.is_potential_tag("img") => handle_image(src, id, out, state),
        _ => handle_other_elements(src, id, out, state),
    }
}

/// A `br`/`hr` followed by loose text: the text becomes a paragraph.
fn handle_line_break(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    if !text_chars_test(src.tail(id)) || !process_node(src, id, state.options, state.cache) {
        return None;
    }
    let paragraph = out.create_element("p");
    out.set_text(paragraph, src.tail(id));
    Some(paragraph)
}

/// Keep the result tree inside the taxonomy: unknown tags are unwrapped,
/// paragraphs do not nest, and attributes are reduced to a whitelist.
fn normalize_result_node(out: &mut Tree, node: NodeId) {
    for n in out.descendants(node).into_iter().rev() {
        let nested_p = out.is_tag(n, "p") && out.ancestors(n).any(|a| out.is_tag(a, "p"));
        if !is_result_tag(out.tag(n)) || nested_p {
            let _ = out.strip(n);
        }
    }
    for n in out.iter(node) {
        match out.tag(n) {
            "a" => out.retain_attrs(n, &["href", "target"]),
            "img" => out.retain_attrs(n, &["src", "alt", "title"]),
            _ => out.clear_attrs(n),
        }
    }
}

/// Append a handler's output to the result and retire its source subtree.
///
/// A div turned into a paragraph only carries its lead text, so only the
/// div itself is retired and its children stay reachable.
fn emit(src: &mut Tree, elem: NodeId, out: &mut Tree, node: NodeId) {
    normalize_result_node(out, node);
    let root = out.root();
    // `node` is detached, so it cannot be an ancestor of the root.
    let _ = out.append_child(root, node);
    if src.is_tag(elem, "div") && out.is_tag(node, "p") {
        src.mark_done(elem);
        return;
    }
    for n in src.iter(elem) {
        src.mark_done(n);
    }
}

/// Total character count of paragraph text below `root`.
fn paragraph_text_length(tree: &Tree, root: NodeId) -> usize {
    tree.iter_tags(root, &["p"])
        .into_iter()
        .map(|p| etree::char_len(&etree::text_content(tree, p)))
        .sum()
}

/// First node matching `rule` that carries text, `root` included.
fn find_candidate(tree: &Tree, root: NodeId, rule: crate::selector::Rule) -> Option<NodeId> {
    tree.iter(root)
        .into_iter()
        .find(|&n| rule(tree, n) && etree::has_text(tree, n))
}

fn extract_from_candidates(tree: &mut Tree, out: &mut Tree, state: &mut ExtractionState<'_>) {
    let root = tree.root();
    let factor = if state.options.is_precision() { 1 } else { 3 };

    for (index, rule) in CONTENT_RULES.iter().enumerate() {
        let Some(candidate) = find_candidate(tree, root, *rule) else {
            continue;
        };
        trace!(rule = index + 1, tag = tree.tag(candidate), "content candidate");

        prune_unwanted_sections(tree, candidate, state);
        if tree.children(candidate).is_empty() {
            continue;
        }

        if paragraph_text_length(tree, candidate) < state.options.min_extracted_size * factor {
            state.add_potential_tag("div");
        }
        if !state.is_potential_tag("a") {
            tree.strip_tags(candidate, &["a"]);
        }
        tree.strip_tags(candidate, &["span"]);

        let mut elements = tree.descendants(candidate);
        if !elements.is_empty() && elements.iter().all(|&n| tree.is_tag(n, "br")) {
            elements = vec![candidate];
        }
        for elem in elements {
            if tree.is_done(elem) || !tree.is_attached(elem) {
                continue;
            }
            if let Some(node) = handle_text_elem(tree, elem, out, state) {
                emit(tree, elem, out, node);
            }
        }

        let out_root = out.root();
        while let Some(last) = out.last_child(out_root) {
            if !NOT_AT_THE_END.contains(&out.tag(last)) {
                break;
            }
            let _ = out.remove(last);
        }
        if !out.children(out_root).is_empty() {
            break;
        }
    }
}

/// Second pass over the whole document for paragraphs, quotes and tables
/// the candidate pass never reached. Recall mode also accepts containers,
/// line breaks and lists.
pub fn recover_wild_text(tree: &mut Tree, out: &mut Tree, state: &mut ExtractionState<'_>) {
    debug!("recovering wild text elements");
    let root = dom::body(tree).unwrap_or_else(|| tree.root());

    let mut tags: Vec<&str> = WILD_TEXT_TAGS.to_vec();
    if state.options.is_recall() {
        state.widen_for_recovery();
        tags.extend(WILD_TEXT_RECALL_TAGS);
    }

    prune_unwanted_sections(tree, root, state);
    if !state.is_potential_tag("a") {
        tree.strip_tags(root, &["a"]);
    }
    tree.strip_tags(root, &["span"]);

    for elem in tree.descendants(root) {
        if tree.is_done(elem) || !tree.is_attached(elem) {
            continue;
        }
        let tag = tree.tag(elem);
        let w3_code = tag == "div" && tree.attr(elem, "class").is_some_and(|c| c.contains("w3-code"));
        if !tags.contains(&tag) && !w3_code {
            continue;
        }
        if let Some(node) = handle_text_elem(tree, elem, out, state) {
            emit(tree, elem, out, node);
        }
    }
}

/// Extract the main content of a cleaned document.
///
/// The tree is consumed by the extraction (nodes are pruned and marked
/// done). A copy taken beforehand feeds the wild-text recovery pass.
pub fn extract_content(tree: &mut Tree, options: &Options, cache: Option<&DedupCache>) -> Extraction {
    let backup = tree.clone();
    let mut state = ExtractionState::new(options, cache);
    let mut out = Tree::new("body");

    extract_from_candidates(tree, &mut out, &mut state);
    let mut result = Extraction::from_body(out);

    if result.length < options.min_extracted_size && !options.is_precision() {
        let mut backup = backup;
        for n in tree.iter(tree.root()) {
            if tree.is_done(n) && backup.get(n).is_some() {
                backup.mark_done(n);
            }
        }
        let mut out = result.body;
        recover_wild_text(&mut backup, &mut out, &mut state);
        result = Extraction::from_body(out);
    }

    debug!(length = result.length, "main extraction finished");
    result
}
