//! Attribute and string helpers shared by selector rules.

use crate::tree::{NodeId, Tree};

/// Block containers the class/id discard rules apply to.
pub const DISCARDABLE_CONTAINERS: &[&str] = &[
    "div", "dd", "dt", "li", "ul", "ol", "dl", "p", "section", "span",
];

/// Tags that may hold the main content.
pub const CONTENT_CONTAINERS: &[&str] = &["article", "div", "main", "section"];

#[inline]
#[must_use]
pub fn id<'a>(tree: &'a Tree, n: NodeId) -> &'a str {
    tree.attr(n, "id").unwrap_or_default()
}

#[inline]
#[must_use]
pub fn class<'a>(tree: &'a Tree, n: NodeId) -> &'a str {
    tree.attr(n, "class").unwrap_or_default()
}

#[inline]
#[must_use]
pub fn attr<'a>(tree: &'a Tree, n: NodeId, name: &str) -> &'a str {
    tree.attr(n, name).unwrap_or_default()
}

/// `id` and `class` concatenated, as several rules test them together.
#[must_use]
pub fn id_class(tree: &Tree, n: NodeId) -> String {
    format!("{}{}", id(tree, n), class(tree, n))
}

#[inline]
#[must_use]
pub fn is_one_of_tags(tree: &Tree, n: NodeId, tags: &[&str]) -> bool {
    tags.contains(&tree.tag(n))
}

/// Whether `haystack` contains any of the needles.
#[must_use]
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Whether `haystack` starts with any of the prefixes.
#[must_use]
pub fn starts_with_any(haystack: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| haystack.starts_with(p))
}
