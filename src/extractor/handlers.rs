//! Element handlers.
//!
//! Each handler reads one element of the source tree and builds the
//! corresponding node in the result tree. It returns the new, still detached
//! result node, or `None` when the element is discarded. Handlers mark the
//! source nodes they consume as done so later passes skip them.

use tracing::debug;

use super::state::ExtractionState;
use super::tags::{is_cell_tag, is_head_tag, is_hi_tag, is_item_tag, is_list_tag, is_quote_tag, is_result_tag};
use crate::etree;
use crate::html_processing::{absolute_url, handle_text_node, image_source, process_node, text_chars_test};
use crate::tree::{NodeId, Tree};

/// Parents under which a formatting element needs no wrapping paragraph.
fn is_formatting_protected(tag: &str) -> bool {
    is_cell_tag(tag)
        || is_head_tag(tag)
        || is_hi_tag(tag)
        || is_item_tag(tag)
        || is_quote_tag(tag)
        || matches!(tag, "p" | "a")
}

/// Whether the subtree carries any visible text.
#[must_use]
pub fn is_text_element(tree: &Tree, id: NodeId) -> bool {
    text_chars_test(&etree::iter_text(tree, id, ""))
}

fn process(src: &mut Tree, id: NodeId, state: &ExtractionState<'_>) -> bool {
    process_node(src, id, state.options, state.cache)
}

fn text_node(
    src: &mut Tree,
    id: NodeId,
    state: &ExtractionState<'_>,
    fix_breaks: bool,
    preserve_spaces: bool,
) -> bool {
    handle_text_node(src, id, state.options, state.cache, fix_breaks, preserve_spaces)
}

/// Copy tag, text and tail of a processed node under `parent`.
fn define_new_element(out: &mut Tree, parent: NodeId, src: &Tree, processed: NodeId) -> NodeId {
    let child = out.sub_element(parent, src.tag(processed));
    out.set_text(child, src.text(processed));
    out.set_tail(child, src.tail(processed));
    child
}

fn attach(out: &mut Tree, parent: NodeId, child: NodeId) {
    // Freshly created nodes are never ancestors of `parent`.
    let _ = out.append_child(parent, child);
}

fn mark_subtree_done(src: &mut Tree, id: NodeId) {
    for n in src.iter(id) {
        src.mark_done(n);
    }
}

/// Headings (`h1`-`h6`, `summary`).
pub fn handle_titles(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    let title = if src.children(id).is_empty() {
        if !process(src, id, state) {
            return None;
        }
        out.import_shallow(src, id)
    } else {
        let title = out.create_element(src.tag(id));
        out.set_text(title, &etree::trim(src.text(id)));
        out.set_tail(title, &etree::trim(src.tail(id)));
        for child in src.children(id).to_vec() {
            if text_node(src, child, state, false, false) {
                let copy = out.import(src, child);
                attach(out, title, copy);
            }
            src.mark_done(child);
        }
        title
    };
    out.clear_attrs(title);
    is_text_element(out, title).then_some(title)
}

/// Inline formatting, links and spans met outside a paragraph.
///
/// Orphans are wrapped in a `p` unless their source parent already is a
/// text container.
pub fn handle_formatting(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    if !process(src, id, state) {
        return None;
    }
    let formatting = out.import(src, id);
    let protected = src.parent(id).is_some_and(|p| is_formatting_protected(src.tag(p)));
    if protected {
        return Some(formatting);
    }
    let wrapper = out.create_element("p");
    attach(out, wrapper, formatting);
    Some(wrapper)
}

/// Flatten the descendants of a list item into `item`.
fn process_nested_elements(
    src: &mut Tree,
    child: NodeId,
    out: &mut Tree,
    item: NodeId,
    state: &ExtractionState<'_>,
) {
    out.set_text(item, src.text(child));
    for sub in src.descendants(child) {
        if src.is_done(sub) {
            continue;
        }
        if is_list_tag(src.tag(sub)) {
            if let Some(list) = handle_lists(src, sub, out, state) {
                out.set_tail(list, &etree::trim(src.tail(sub)));
                attach(out, item, list);
            }
        } else if text_node(src, sub, state, false, false) {
            define_new_element(out, item, src, sub);
        }
        src.mark_done(sub);
    }
}

/// Lists (`ul`, `ol`, `dl`), nested lists included.
pub fn handle_lists(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    let list = out.create_element(src.tag(id));
    let text = etree::trim(src.text(id));
    if !text.is_empty() {
        etree::sub_element_with_text(out, list, "li", &text);
    }

    for child in src.descendants(id) {
        if !is_item_tag(src.tag(child)) || src.is_done(child) {
            continue;
        }
        let item = out.create_element(src.tag(child));
        if src.children(child).is_empty() {
            if process(src, child, state) {
                let mut text = src.text(child).to_string();
                let tail = src.tail(child).trim();
                if !tail.is_empty() {
                    text.push(' ');
                    text.push_str(tail);
                }
                out.set_text(item, &text);
            }
        } else {
            process_nested_elements(src, child, out, item, state);
            let tail = src.tail(child).trim().to_string();
            if let (false, Some(last)) = (tail.is_empty(), out.last_child(item)) {
                let existing = out.tail(last).trim().to_string();
                let merged = if existing.is_empty() { tail } else { format!("{existing} {tail}") };
                out.set_tail(last, &merged);
            }
        }
        if !out.text(item).is_empty() || !out.children(item).is_empty() {
            attach(out, list, item);
        }
        src.mark_done(child);
    }
    src.mark_done(id);

    is_text_element(out, list).then_some(list)
}

/// Source code markers: a `lang` attribute, a `code` tag, a highlighted
/// parent, or a `pre` wrapping a single `code`.
#[must_use]
pub fn is_code_block_element(tree: &Tree, id: NodeId) -> bool {
    if tree.attr(id, "lang").is_some() || tree.is_tag(id, "code") {
        return true;
    }
    if tree
        .parent(id)
        .and_then(|p| tree.attr(p, "class"))
        .is_some_and(|c| c.contains("highlight"))
    {
        return true;
    }
    let children = tree.children(id);
    children.len() == 1 && tree.is_tag(children[0], "code")
}

/// Copy a code block verbatim, markup reduced to text and line breaks.
pub fn handle_code_blocks(src: &mut Tree, id: NodeId, out: &mut Tree) -> Option<NodeId> {
    let code = out.import(src, id);
    out.set_tag(code, "code");
    out.clear_attrs(code);
    for n in out.descendants(code).into_iter().rev() {
        if !out.is_tag(n, "br") {
            let _ = out.strip(n);
        }
    }
    mark_subtree_done(src, id);
    is_text_element(out, code).then_some(code)
}

/// Quotes (`blockquote`, `pre`, `q`), or code blocks in disguise.
pub fn handle_quotes(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    if is_code_block_element(src, id) {
        return handle_code_blocks(src, id, out);
    }

    let quote = out.create_element("blockquote");
    for child in src.iter(id) {
        if process(src, child, state) {
            define_new_element(out, quote, src, child);
        }
        src.mark_done(child);
    }
    if !is_text_element(out, quote) {
        return None;
    }
    out.strip_tags(quote, &["blockquote", "pre", "q"]);
    Some(quote)
}

/// Generic containers; only `div` is accepted, and only once it became a
/// potential tag. Its lead text turns into a paragraph. The children stay
/// in the source for the caller's descent, and the div's tail moves onto
/// its last child so it keeps its place after them.
pub fn handle_other_elements(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    let tag = src.tag(id).to_string();
    if tag == "div" && src.attr(id, "class").is_some_and(|c| c.contains("w3-code")) {
        return handle_code_blocks(src, id, out);
    }
    if !state.is_potential_tag(&tag) {
        if !src.is_done(id) {
            debug!(tag, "discarding element");
        }
        return None;
    }
    if tag != "div" {
        debug!(tag, "unexpected element");
        return None;
    }

    if !text_node(src, id, state, false, true) || !text_chars_test(src.text(id)) {
        return None;
    }
    let paragraph = out.create_element("p");
    out.set_text(paragraph, src.text(id));
    match src.last_child(id) {
        Some(last) => {
            let tail = format!("{} {}", src.tail(last), src.tail(id));
            src.set_tail(last, tail.trim());
            src.set_tail(id, "");
        }
        None => out.set_tail(paragraph, src.tail(id)),
    }
    Some(paragraph)
}

/// Paragraphs, with their inline children flattened one level deep.
pub fn handle_paragraphs(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    src.clear_attrs(id);
    for child in src.descendants(id) {
        if !state.is_potential_tag(src.tag(child)) && !src.is_done(child) {
            debug!(tag = src.tag(child), "unwrapping in p");
            let _ = src.strip(child);
        }
    }
    if src.children(id).is_empty() {
        if !process(src, id, state) {
            return None;
        }
        return Some(out.import_shallow(src, id));
    }

    let paragraph = out.create_element("p");
    out.set_tail(paragraph, &etree::trim(src.tail(id)));
    for child in src.iter(id) {
        let tag = src.tag(child).to_string();
        if !text_node(src, child, state, false, false) {
            src.mark_done(child);
            continue;
        }

        if tag == "p" {
            let text = src.text(child).to_string();
            let merged = if out.text(paragraph).is_empty() {
                text
            } else {
                format!("{} {text}", out.text(paragraph))
            };
            out.set_text(paragraph, &merged);
        } else if tag == "img" {
            if let Some(image) = handle_image(src, child, out, state) {
                attach(out, paragraph, image);
            }
        } else {
            let sub = define_new_element(out, paragraph, src, child);
            if tag == "a" {
                for name in ["href", "target"] {
                    if let Some(value) = src.attr(child, name).map(str::trim).filter(|v| !v.is_empty()) {
                        out.set_attr(sub, name, value);
                    }
                }
            }
        }
        src.mark_done(child);
    }

    if let Some(last) = out.last_child(paragraph) {
        if out.is_tag(last, "br") && out.tail(last).is_empty() {
            let _ = out.remove(last);
        }
    }
    if out.children(paragraph).is_empty() && out.text(paragraph).is_empty() {
        debug!("discarding empty p");
        return None;
    }
    Some(paragraph)
}

/// Fill a cell that has element children.
fn process_cell_children(
    src: &mut Tree,
    cell: NodeId,
    out: &mut Tree,
    new_cell: NodeId,
    state: &ExtractionState<'_>,
) {
    for child in src.descendants(cell) {
        if src.is_done(child) {
            continue;
        }
        let tag = src.tag(child).to_string();
        if is_cell_tag(&tag) || is_hi_tag(&tag) || tag == "tr" {
            if text_node(src, child, state, true, true) {
                define_new_element(out, new_cell, src, child);
            }
        } else if is_list_tag(&tag) && state.options.is_recall() {
            if let Some(list) = handle_lists(src, child, out, state) {
                attach(out, new_cell, list);
            }
        } else if text_node(src, child, state, false, false) {
            let sub = define_new_element(out, new_cell, src, child);
            if !is_result_tag(&tag) {
                out.set_tag(sub, "p");
            }
        }
        src.mark_done(child);
    }
}

/// Tables, rebuilt as `table > tr > td|th`. Nested tables end the scan.
pub fn handle_table(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    src.strip_tags(id, &["thead", "tbody", "tfoot"]);

    let table = out.create_element("table");
    let mut row = out.create_element("tr");
    for sub in src.descendants(id) {
        if src.is_done(sub) {
            continue;
        }
        match src.tag(sub) {
            "tr" => {
                if !out.children(row).is_empty() {
                    attach(out, table, row);
                    row = out.create_element("tr");
                }
            }
            "td" | "th" => {
                let cell = out.create_element(src.tag(sub));
                if src.children(sub).is_empty() {
                    if process(src, sub, state) {
                        out.set_text(cell, src.text(sub));
                        out.set_tail(cell, src.tail(sub));
                    }
                } else {
                    out.set_text(cell, &etree::trim(src.text(sub)));
                    out.set_tail(cell, &etree::trim(src.tail(sub)));
                    src.mark_done(sub);
                    process_cell_children(src, sub, out, cell, state);
                }
                if !out.text(cell).is_empty() || !out.children(cell).is_empty() {
                    attach(out, row, cell);
                }
            }
            "table" => break,
            _ => {}
        }
        src.mark_done(sub);
    }
    if !out.children(row).is_empty() {
        attach(out, table, row);
    }
    src.mark_done(id);

    (!out.children(table).is_empty()).then_some(table)
}

/// Images: the first usable source plus `alt` and `title`.
pub fn handle_image(
    src: &mut Tree,
    id: NodeId,
    out: &mut Tree,
    state: &ExtractionState<'_>,
) -> Option<NodeId> {
    let source = image_source(src, id)?;
    let source = absolute_url(source, state.options.url.as_deref());

    let image = out.create_element("img");
    out.set_attr(image, "src", &source);
    for name in ["alt", "title"] {
        if let Some(value) = src.attr(id, name).filter(|v| !v.is_empty()) {
            out.set_attr(image, name, value);
        }
    }
    out.set_tail(image, src.tail(id));
    src.mark_done(id);
    Some(image)
}
