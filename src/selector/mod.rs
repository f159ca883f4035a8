//! Selector Infrastructure
//!
//! Rules are plain predicates over a tree node. They drive content-candidate
//! selection and the discard lists used while pruning.

pub mod content;
pub mod discard;
pub mod precision;

pub mod utils;

use crate::tree::{NodeId, Tree};

/// A selector rule that tests if a node matches certain criteria.
pub type Rule = fn(&Tree, NodeId) -> bool;

/// All descendants of `root` (`root` excluded) matching the rule, in
/// document order.
#[must_use]
pub fn query_all(tree: &Tree, root: NodeId, rule: Rule) -> Vec<NodeId> {
    tree.descendants(root)
        .into_iter()
        .filter(|&n| rule(tree, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn is_target(tree: &Tree, n: NodeId) -> bool {
        utils::class(tree, n).contains("target")
    }

    #[test]
    fn test_query_document_order() {
        let tree = dom::parse(
            r#"<div>
                <section><p class="target">Deep first</p></section>
                <p class="target">Shallow second</p>
            </div>"#,
        );
        let found = query_all(&tree, tree.root(), is_target);
        assert_eq!(tree.text_content(found[0]), "Deep first");
    }

    #[test]
    fn test_query_all_preserves_order() {
        let tree = dom::parse(
            r#"<div><p class="target">1</p><span>no</span><section><p class="target">2</p></section></div>"#,
        );
        let found: Vec<String> = query_all(&tree, tree.root(), is_target)
            .into_iter()
            .map(|n| tree.text_content(n))
            .collect();
        assert_eq!(found, vec!["1", "2"]);
    }

    #[test]
    fn test_query_excludes_root() {
        let tree = dom::parse_fragment(r#"<p>content</p>"#);
        assert!(query_all(&tree, tree.root(), |t, n| t.is_tag(n, "body")).is_empty());
    }
}
