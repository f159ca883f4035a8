//! Arena-backed element tree with text/tail support.
//!
//! Every element owns two pieces of character data:
//! - **Text**: content BEFORE the first child element
//! - **Tail**: content AFTER the element's closing tag, up to the next sibling
//!
//! ```html
//! <div>
//!   TEXT HERE          <!-- div's "text" -->
//!   <span>inner</span>
//!   TAIL HERE          <!-- span's "tail" -->
//! </div>
//! ```
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]. Ids are never reused,
//! so a cloned tree keeps every id valid: a snapshot is simply `tree.clone()`,
//! and restoring it is an assignment.
//!
//! Removing a node never drops its tail. The tail is merged into the previous
//! sibling's tail, or into the parent's text when the node was the first child.

use std::ops::Index;

use crate::error::TreeError;

/// Stable handle to a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One element of the tree.
#[derive(Debug, Clone, Default)]
pub struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    tail: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Set once the extractor has emitted or discarded this node.
    pub done: bool,
}

impl Node {
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn tail(&self) -> &str {
        &self.tail
    }

    #[must_use]
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Mutable element tree.
///
/// Indexing with a `NodeId` from another tree panics; every id handed out by a
/// tree (or by a clone of it) stays in bounds for that tree's lifetime.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

enum Step {
    Enter(NodeId),
    Tail(NodeId),
}

impl Tree {
    /// Creates a tree holding a single root element.
    #[must_use]
    pub fn new(root_tag: &str) -> Self {
        let root = Node {
            tag: root_tag.to_ascii_lowercase(),
            ..Node::default()
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    // === Construction ===

    /// Creates a detached element. Attach it with [`Tree::append_child`].
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        id
    }

    /// Appends `child` as the last child of `parent`, moving it (with its tail)
    /// if it is currently attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if child == self.root || self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::Cycle(child));
        }
        self.unlink(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Creates an element and appends it to `parent`.
    pub fn sub_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Deep-copies the subtree at `id` from `src` into this tree, detached.
    ///
    /// Text, tails and attributes are copied; `done` markers are not.
    pub fn import(&mut self, src: &Tree, id: NodeId) -> NodeId {
        let copy = self.import_shallow(src, id);
        let mut stack: Vec<(NodeId, NodeId)> = src[id]
            .children
            .iter()
            .rev()
            .map(|&c| (c, copy))
            .collect();
        while let Some((src_id, parent)) = stack.pop() {
            let new_id = self.import_shallow(src, src_id);
            self.nodes[new_id.0].parent = Some(parent);
            self.nodes[parent.0].children.push(new_id);
            stack.extend(src[src_id].children.iter().rev().map(|&c| (c, new_id)));
        }
        copy
    }

    /// Copies one node (tag, attributes, text, tail) without its children.
    pub fn import_shallow(&mut self, src: &Tree, id: NodeId) -> NodeId {
        let source = &src[id];
        let new_id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: source.tag.clone(),
            attrs: source.attrs.clone(),
            text: source.text.clone(),
            tail: source.tail.clone(),
            ..Node::default()
        });
        new_id
    }

    /// Copies the subtree at `id` into a fresh tree rooted at that node.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Tree {
        let mut out = Tree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = out.import(self, id);
        out.nodes[root.0].tail.clear();
        out.root = root;
        out
    }

    // === Node data ===

    #[must_use]
    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    pub fn set_tag(&mut self, id: NodeId, tag: &str) {
        self.nodes[id.0].tag = tag.to_ascii_lowercase();
    }

    #[must_use]
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.nodes[id.0].tag == tag
    }

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        &self.nodes[id.0].attrs
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[id.0].attrs;
        if let Some(slot) = attrs.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value.to_string();
        } else {
            attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.nodes[id.0].attrs.retain(|(k, _)| k != name);
    }

    pub fn clear_attrs(&mut self, id: NodeId) {
        self.nodes[id.0].attrs.clear();
    }

    /// Keeps only the attributes whose name is in `allowed`.
    pub fn retain_attrs(&mut self, id: NodeId, allowed: &[&str]) {
        self.nodes[id.0]
            .attrs
            .retain(|(k, _)| allowed.contains(&k.as_str()));
    }

    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].text
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        text.clone_into(&mut self.nodes[id.0].text);
    }

    #[must_use]
    pub fn tail(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tail
    }

    pub fn set_tail(&mut self, id: NodeId, tail: &str) {
        tail.clone_into(&mut self.nodes[id.0].tail);
    }

    /// Appends character data at the end of the node's content: to the tail
    /// of its last child, or to its text when it has no children.
    pub fn push_char_data(&mut self, id: NodeId, data: &str) {
        match self.nodes[id.0].children.last() {
            Some(&last) => self.nodes[last.0].tail.push_str(data),
            None => self.nodes[id.0].text.push_str(data),
        }
    }

    #[must_use]
    pub fn is_done(&self, id: NodeId) -> bool {
        self.nodes[id.0].done
    }

    pub fn mark_done(&mut self, id: NodeId) {
        self.nodes[id.0].done = true;
    }

    // === Navigation ===

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    fn position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes[id.0].parent?;
        let pos = self.nodes[parent.0].children.iter().position(|&c| c == id)?;
        Some((parent, pos))
    }

    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, pos) = self.position(id)?;
        pos.checked_sub(1).map(|p| self.nodes[parent.0].children[p])
    }

    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, pos) = self.position(id)?;
        self.nodes[parent.0].children.get(pos + 1).copied()
    }

    /// Iterates over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> bool {
        candidate == id || self.ancestors(id).any(|a| a == candidate)
    }

    /// Whether `id` is still reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    /// All descendants of `id` in document order, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev());
        }
        out
    }

    /// `id` followed by its descendants, in document order.
    #[must_use]
    pub fn iter(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        out.extend(self.descendants(id));
        out
    }

    /// Like [`Tree::iter`], restricted to the given tags.
    #[must_use]
    pub fn iter_tags(&self, id: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.iter(id)
            .into_iter()
            .filter(|&n| tags.contains(&self.tag(n)))
            .collect()
    }

    /// First element with the given tag in the subtree at `id`, in document order.
    #[must_use]
    pub fn find_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.iter(id).into_iter().find(|&n| self.is_tag(n, tag))
    }

    /// Number of elements in the subtree at `id`, `id` included.
    #[must_use]
    pub fn element_count(&self, id: NodeId) -> usize {
        1 + self.descendants(id).len()
    }

    // === Text ===

    /// Text and tail fragments of the subtree at `id`, in document order.
    /// The tail of `id` itself is not included.
    #[must_use]
    pub fn text_fragments(&self, id: NodeId) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![Step::Enter(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(n) => {
                    let node = &self.nodes[n.0];
                    if !node.text.is_empty() {
                        out.push(node.text.as_str());
                    }
                    for &c in node.children.iter().rev() {
                        stack.push(Step::Tail(c));
                        stack.push(Step::Enter(c));
                    }
                }
                Step::Tail(n) => {
                    let tail = &self.nodes[n.0].tail;
                    if !tail.is_empty() {
                        out.push(tail.as_str());
                    }
                }
            }
        }
        out
    }

    /// Concatenated character data of the subtree, as `textContent` would give.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.text_fragments(id).concat()
    }

    // === Mutation ===

    fn check_removable(&self, id: NodeId) -> Result<(NodeId, usize), TreeError> {
        if id == self.root {
            return Err(TreeError::RootRemoval);
        }
        self.position(id).ok_or(TreeError::Detached(id))
    }

    fn append_to_previous(&mut self, parent: NodeId, pos: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        if pos == 0 {
            self.nodes[parent.0].text.push_str(text);
        } else {
            let prev = self.nodes[parent.0].children[pos - 1];
            self.nodes[prev.0].tail.push_str(text);
        }
    }

    fn unlink(&mut self, id: NodeId) {
        if let Some((parent, pos)) = self.position(id) {
            self.nodes[parent.0].children.remove(pos);
        }
        self.nodes[id.0].parent = None;
    }

    /// Removes the node and its subtree, merging its tail into the preceding
    /// sibling's tail (or the parent's text when it was the first child).
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        let (parent, pos) = self.check_removable(id)?;
        let tail = std::mem::take(&mut self.nodes[id.0].tail);
        self.append_to_previous(parent, pos, &tail);
        self.nodes[parent.0].children.remove(pos);
        self.nodes[id.0].parent = None;
        Ok(())
    }

    /// Replaces the node by its children, keeping its text and tail in place.
    pub fn strip(&mut self, id: NodeId) -> Result<(), TreeError> {
        let (parent, pos) = self.check_removable(id)?;
        let text = std::mem::take(&mut self.nodes[id.0].text);
        let tail = std::mem::take(&mut self.nodes[id.0].tail);
        let children = std::mem::take(&mut self.nodes[id.0].children);

        self.append_to_previous(parent, pos, &text);
        match children.last() {
            Some(&last) => self.nodes[last.0].tail.push_str(&tail),
            None => self.append_to_previous(parent, pos, &tail),
        }
        for &c in &children {
            self.nodes[c.0].parent = Some(parent);
        }
        self.nodes[parent.0].children.splice(pos..=pos, children);
        self.nodes[id.0].parent = None;
        Ok(())
    }

    /// Unwraps every element below `id` whose tag is listed, deepest first.
    pub fn strip_tags(&mut self, id: NodeId, tags: &[&str]) {
        for n in self.descendants(id).into_iter().rev() {
            if tags.contains(&self.tag(n)) {
                // Descendants of `id` always have a parent.
                let _ = self.strip(n);
            }
        }
    }

    /// Removes every element below `id` whose tag is listed (tails preserved).
    pub fn remove_tags(&mut self, id: NodeId, tags: &[&str]) {
        for n in self.descendants(id) {
            if tags.contains(&self.tag(n)) && self.is_attached(n) {
                let _ = self.remove(n);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        // <div>lead<a>one</a> after-a <b>two</b> after-b</div>
        let mut tree = Tree::new("div");
        let root = tree.root();
        tree.set_text(root, "lead");
        let a = tree.sub_element(root, "a");
        tree.set_text(a, "one");
        tree.set_tail(a, " after-a ");
        let b = tree.sub_element(root, "b");
        tree.set_text(b, "two");
        tree.set_tail(b, " after-b");
        (tree, root, a, b)
    }

    #[test]
    fn test_text_content_order() {
        let (tree, root, _, _) = sample();
        assert_eq!(tree.text_content(root), "leadone after-a two after-b");
    }

    #[test]
    fn test_remove_first_child_merges_tail_into_parent_text() {
        let (mut tree, root, a, _) = sample();
        tree.remove(a).expect("remove");
        assert_eq!(tree.text(root), "lead after-a ");
        assert_eq!(tree.children(root).len(), 1);
        assert!(!tree.is_attached(a));
    }

    #[test]
    fn test_remove_later_child_merges_tail_into_previous_sibling() {
        let (mut tree, root, a, b) = sample();
        tree.remove(b).expect("remove");
        assert_eq!(tree.tail(a), " after-a  after-b");
        assert_eq!(tree.text_content(root), "leadone after-a  after-b");
    }

    #[test]
    fn test_remove_twice_reports_detached() {
        let (mut tree, _, a, _) = sample();
        tree.remove(a).expect("remove");
        assert_eq!(tree.remove(a), Err(TreeError::Detached(a)));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let (mut tree, root, _, _) = sample();
        assert_eq!(tree.remove(root), Err(TreeError::RootRemoval));
        assert_eq!(tree.strip(root), Err(TreeError::RootRemoval));
    }

    #[test]
    fn test_strip_keeps_text_children_and_tail() {
        let mut tree = Tree::new("p");
        let root = tree.root();
        let span = tree.sub_element(root, "span");
        tree.set_text(span, "inner ");
        let em = tree.sub_element(span, "em");
        tree.set_text(em, "emph");
        tree.set_tail(em, " rest");
        tree.set_tail(span, " after");

        tree.strip(span).expect("strip");
        assert_eq!(tree.children(root), &[em]);
        assert_eq!(tree.text(root), "inner ");
        assert_eq!(tree.tail(em), " rest after");
        assert_eq!(tree.text_content(root), "inner emph rest after");
    }

    #[test]
    fn test_strip_childless_node() {
        let (mut tree, root, a, _) = sample();
        tree.strip(a).expect("strip");
        assert_eq!(tree.text(root), "leadone after-a ");
    }

    #[test]
    fn test_clone_is_snapshot() {
        let (mut tree, root, a, _) = sample();
        let backup = tree.clone();
        tree.remove(a).expect("remove");
        tree = backup;
        assert!(tree.is_attached(a));
        assert_eq!(tree.text_content(root), "leadone after-a two after-b");
    }

    #[test]
    fn test_import_and_subtree() {
        let (tree, _, _, b) = sample();
        let sub = tree.subtree(b);
        assert_eq!(sub.tag(sub.root()), "b");
        assert_eq!(sub.text_content(sub.root()), "two");
        assert_eq!(sub.tail(sub.root()), "");

        let mut out = Tree::new("body");
        let copy = out.import(&tree, tree.root());
        out.append_child(out.root(), copy).expect("append");
        assert_eq!(out.text_content(out.root()), "leadone after-a two after-b");
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let (mut tree, root, a, _) = sample();
        assert_eq!(tree.append_child(a, root), Err(TreeError::Cycle(root)));
        assert_eq!(tree.append_child(a, a), Err(TreeError::Cycle(a)));
    }

    #[test]
    fn test_siblings_and_descendants() {
        let (tree, root, a, b) = sample();
        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.next_sibling(b), None);
        assert_eq!(tree.descendants(root), vec![a, b]);
        assert_eq!(tree.iter_tags(root, &["b"]), vec![b]);
        assert_eq!(tree.element_count(root), 3);
    }

    #[test]
    fn test_attributes() {
        let (mut tree, _, a, _) = sample();
        tree.set_attr(a, "href", "/x");
        tree.set_attr(a, "class", "nav");
        tree.set_attr(a, "href", "/y");
        assert_eq!(tree.attr(a, "href"), Some("/y"));
        tree.retain_attrs(a, &["href"]);
        assert_eq!(tree.attrs(a).len(), 1);
        tree.clear_attrs(a);
        assert!(tree.attr(a, "href").is_none());
    }
}
