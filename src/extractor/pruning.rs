//! Section pruning functions.
//!
//! Removes unwanted sections (boilerplate, ads, navigation) from a content
//! candidate before extraction, using selector rules and link density.

use tracing::debug;

use super::state::ExtractionState;
use super::tags::{is_head_tag, HEAD_TAGS, LIST_TAGS, QUOTE_TAGS};
use crate::etree;
use crate::link_density::{delete_by_link_density, is_boilerplate_table};
use crate::selector::{discard, precision, query_all, Rule};
use crate::tree::{NodeId, Tree};

/// Remove every node below `root` matching one of `rules`.
///
/// With `with_backup`, the whole tree reverts when pruning leaves a seventh
/// of the previous text or less.
pub fn prune_unwanted_nodes(tree: &mut Tree, root: NodeId, rules: &[Rule], with_backup: bool) {
    let backup = with_backup.then(|| (tree.clone(), etree::char_len(&tree.text_content(root))));

    for rule in rules {
        for node in query_all(tree, root, *rule) {
            if !tree.is_attached(node) {
                continue;
            }
            if let Err(err) = tree.remove(node) {
                debug!(%err, "skipping node that cannot be pruned");
            }
        }
    }

    if let Some((backup, old_len)) = backup {
        let new_len = etree::char_len(&tree.text_content(root));
        if new_len * 7 <= old_len {
            debug!(old_len, new_len, "pruning too aggressive, restoring");
            *tree = backup;
        }
    }
}

/// Drop tables that are mostly links or have no text.
fn prune_link_tables(tree: &mut Tree, root: NodeId) {
    for table in tree.descendants(root) {
        if tree.is_tag(table, "table") && tree.is_attached(table) && is_boilerplate_table(tree, table) {
            let _ = tree.remove(table);
        }
    }
}

/// Rule-based and link-density pruning of a content candidate.
pub fn prune_unwanted_sections(tree: &mut Tree, root: NodeId, state: &ExtractionState<'_>) {
    let favor_precision = state.options.is_precision();

    prune_unwanted_nodes(tree, root, discard::OVERALL_DISCARDED_CONTENT, true);
    if !state.is_potential_tag("img") {
        prune_unwanted_nodes(tree, root, precision::DISCARDED_IMAGE, false);
    }
    prune_unwanted_nodes(tree, root, precision::DISCARDED_TEASER, false);
    if favor_precision {
        prune_unwanted_nodes(tree, root, precision::PRECISION_DISCARDED_CONTENT, false);
    }

    for _ in 0..2 {
        delete_by_link_density(tree, root, &["div"], true, favor_precision);
        delete_by_link_density(tree, root, &LIST_TAGS, false, favor_precision);
        delete_by_link_density(tree, root, &["p"], false, favor_precision);
    }

    if state.is_potential_tag("table") || favor_precision {
        prune_link_tables(tree, root);
    }

    if favor_precision {
        while let Some(last) = tree.last_child(root).filter(|&n| is_head_tag(tree.tag(n))) {
            if tree.remove(last).is_err() {
                break;
            }
        }
        delete_by_link_density(tree, root, &HEAD_TAGS, false, true);
        delete_by_link_density(tree, root, &QUOTE_TAGS, false, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::options::{Focus, Options};

    fn body(tree: &Tree) -> NodeId {
        dom::body(tree).expect("body")
    }

    #[test]
    fn test_prune_keeps_tail_text() {
        let mut tree = dom::parse("<body><div><p>Para</p><div class='share-buttons'>x</div> tail kept</div></body>");
        let root = body(&tree);
        prune_unwanted_nodes(&mut tree, root, discard::OVERALL_DISCARDED_CONTENT, false);
        let p = tree.find_tag(root, "p").expect("p");
        assert_eq!(tree.tail(p), " tail kept");
        assert_eq!(tree.iter_tags(root, &["div"]).len(), 1);
    }

    #[test]
    fn test_backup_restores_when_too_much_removed() {
        let html = "<body><div class='sidebar'>Almost all of the text of this page sits here.</div><p>x</p></body>";
        let mut tree = dom::parse(html);
        let root = body(&tree);
        prune_unwanted_nodes(&mut tree, root, discard::OVERALL_DISCARDED_CONTENT, true);
        assert!(tree.find_tag(root, "div").is_some());

        let mut tree = dom::parse(html);
        prune_unwanted_nodes(&mut tree, root, discard::OVERALL_DISCARDED_CONTENT, false);
        assert!(tree.find_tag(root, "div").is_none());
    }

    #[test]
    fn test_sections_pruning_removes_link_lists() {
        let html = "<body><article><p>A real paragraph with enough words to stay in place after pruning.</p>\
                    <ul><li><a>One</a></li><li><a>Two</a></li><li><a>Three</a></li></ul></article></body>";
        let mut tree = dom::parse(html);
        let article = tree.find_tag(tree.root(), "article").expect("article");
        let opts = Options::default();
        let state = ExtractionState::new(&opts, None);
        prune_unwanted_sections(&mut tree, article, &state);
        assert!(tree.find_tag(article, "ul").is_none());
        assert!(tree.find_tag(article, "p").is_some());
    }

    #[test]
    fn test_precision_drops_trailing_headings() {
        let html = "<body><article><p>Some paragraph text that is long enough for the test.</p><h2>Related</h2></article></body>";
        let opts = Options { focus: Focus::Precision, ..Options::default() };
        let state = ExtractionState::new(&opts, None);
        let mut tree = dom::parse(html);
        let article = tree.find_tag(tree.root(), "article").expect("article");
        prune_unwanted_sections(&mut tree, article, &state);
        assert!(tree.find_tag(article, "h2").is_none());

        let opts = Options::default();
        let state = ExtractionState::new(&opts, None);
        let mut tree = dom::parse(html);
        prune_unwanted_sections(&mut tree, article, &state);
        assert!(tree.find_tag(article, "h2").is_some());
    }
}
