//! DOM Adapter
//!
//! Bridges `dom_query` (html5ever) and the arena [`Tree`]: HTML text is parsed
//! by `dom_query` and copied into a tree with text/tail semantics, and a tree
//! can be serialized back to HTML.
//!
//! Comments, doctypes and processing instructions are not copied, so no later
//! stage ever sees them.

use dom_query::{Document, NodeRef};

use crate::tree::{NodeId, Tree};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Parse an HTML document into a tree rooted at `<html>`.
///
/// html5ever always produces `html`, `head` and `body`, so the result has
/// that skeleton even for fragments or empty input.
#[must_use]
pub fn parse(html: &str) -> Tree {
    let doc = Document::from(html);
    let mut tree = Tree::new("html");
    let root = tree.root();

    let html_sel = doc.select("html");
    let Some(html_node) = html_sel.nodes().first() else {
        return tree;
    };
    copy_attributes(&mut tree, root, html_node);

    let mut stack: Vec<(NodeRef, NodeId)> = vec![(*html_node, root)];
    while let Some((node, parent)) = stack.pop() {
        let mut child = node.first_child();
        while let Some(current) = child {
            if current.is_element() {
                let tag = current
                    .node_name()
                    .map(|t| t.to_ascii_lowercase())
                    .unwrap_or_default();
                let id = tree.sub_element(parent, &tag);
                copy_attributes(&mut tree, id, &current);
                stack.push((current, id));
            } else if current.is_text() {
                tree.push_char_data(parent, &current.text());
            }
            child = current.next_sibling();
        }
    }
    tree
}

/// Parse an HTML fragment and return a tree rooted at its `<body>`.
#[must_use]
pub fn parse_fragment(html: &str) -> Tree {
    let tree = parse(html);
    match tree.find_tag(tree.root(), "body") {
        Some(body) => tree.subtree(body),
        None => Tree::new("body"),
    }
}

fn copy_attributes(tree: &mut Tree, id: NodeId, node: &NodeRef) {
    for attr in node.attrs() {
        tree.set_attr(id, &attr.name.local.to_ascii_lowercase(), &attr.value);
    }
}

/// The `<body>` element of a parsed document, if any.
#[must_use]
pub fn body(tree: &Tree) -> Option<NodeId> {
    if tree.is_tag(tree.root(), "body") {
        return Some(tree.root());
    }
    tree.find_tag(tree.root(), "body")
}

// === Serialization ===

/// Serialize the whole tree.
#[must_use]
pub fn to_html(tree: &Tree) -> String {
    outer_html(tree, tree.root())
}

/// Serialize the element at `id` and its subtree (its own tail excluded).
#[must_use]
pub fn outer_html(tree: &Tree, id: NodeId) -> String {
    enum Step {
        Open(NodeId),
        Close(NodeId),
    }

    let mut out = String::new();
    let mut stack = vec![Step::Open(id)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open(n) => {
                let tag = tree.tag(n);
                out.push('<');
                out.push_str(tag);
                for (name, value) in tree.attrs(n) {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(&mut out, value, true);
                    out.push('"');
                }
                out.push('>');
                escape_into(&mut out, tree.text(n), false);
                stack.push(Step::Close(n));
                stack.extend(tree.children(n).iter().rev().map(|&c| Step::Open(c)));
            }
            Step::Close(n) => {
                let tag = tree.tag(n);
                if !VOID_ELEMENTS.contains(&tag) {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
                if n != id {
                    escape_into(&mut out, tree.tail(n), false);
                }
            }
        }
    }
    out
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
