//! Mode-specific discard rules: precision-only, teaser and image captions.

use crate::selector::utils::{attr, id_class, is_one_of_tags, DISCARDABLE_CONTAINERS};
use crate::selector::Rule;
use crate::tree::{NodeId, Tree};

/// Extra removals applied only in precision mode.
pub static PRECISION_DISCARDED_CONTENT: &[Rule] = &[
    precision_discarded_content_rule_1,
    precision_discarded_content_rule_2,
];

/// Teasers and excerpts of other articles.
pub static DISCARDED_TEASER: &[Rule] = &[discarded_teaser_rule_1];

/// Caption containers, dropped when images are not kept.
pub static DISCARDED_IMAGE: &[Rule] = &[discarded_image_rule_1];

#[must_use]
pub fn precision_discarded_content_rule_1(tree: &Tree, n: NodeId) -> bool {
    tree.is_tag(n, "header")
}

#[must_use]
pub fn precision_discarded_content_rule_2(tree: &Tree, n: NodeId) -> bool {
    if !is_one_of_tags(tree, n, DISCARDABLE_CONTAINERS) {
        return false;
    }
    let id_class = id_class(tree, n);
    id_class.contains("bottom") || id_class.contains("link") || attr(tree, n, "style").contains("border")
}

#[must_use]
pub fn discarded_teaser_rule_1(tree: &Tree, n: NodeId) -> bool {
    is_one_of_tags(tree, n, DISCARDABLE_CONTAINERS) && id_class(tree, n).to_lowercase().contains("teaser")
}

#[must_use]
pub fn discarded_image_rule_1(tree: &Tree, n: NodeId) -> bool {
    is_one_of_tags(tree, n, DISCARDABLE_CONTAINERS) && id_class(tree, n).contains("caption")
}
