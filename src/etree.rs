//! Element Tree (etree) Utilities
//!
//! Text helpers layered on the [`Tree`] text/tail model. All lengths are
//! counted in characters, not bytes.

use crate::tree::{NodeId, Tree};

/// Collapse runs of whitespace into single spaces and trim both ends.
#[must_use]
pub fn trim(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Join the text fragments of a subtree with `separator`, then normalize
/// whitespace.
#[must_use]
pub fn iter_text(tree: &Tree, id: NodeId, separator: &str) -> String {
    trim(&tree.text_fragments(id).join(separator))
}

/// Normalized text of a subtree, fragments joined without separator.
#[must_use]
pub fn text_content(tree: &Tree, id: NodeId) -> String {
    trim(&tree.text_content(id))
}

/// Character count.
#[inline]
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether the subtree at `id` carries any non-whitespace text.
#[must_use]
pub fn has_text(tree: &Tree, id: NodeId) -> bool {
    tree.text_fragments(id)
        .iter()
        .any(|f| f.chars().any(|c| !c.is_whitespace()))
}

/// Append a text-only element to `parent`.
pub fn sub_element_with_text(tree: &mut Tree, parent: NodeId, tag: &str, text: &str) -> NodeId {
    let id = tree.sub_element(parent, tag);
    tree.set_text(id, text);
    id
}
