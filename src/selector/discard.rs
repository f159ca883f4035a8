//! Overall discard rules
//!
//! Sections that are never main content, whatever the focus mode:
//! navigation, sharing widgets, related links, hidden elements and
//! comment-form debris.

use crate::selector::utils::{
    attr, class, contains_any, id, id_class, is_one_of_tags, DISCARDABLE_CONTAINERS,
};
use crate::selector::Rule;
use crate::tree::{NodeId, Tree};

pub static OVERALL_DISCARDED_CONTENT: &[Rule] = &[
    overall_discarded_content_rule_1,
    overall_discarded_content_rule_2,
    overall_discarded_content_rule_3,
];

/// Lowercased id/class fragments marking navigation and widgets.
const BOILERPLATE_MARKERS: &[&str] = &[
    "footer", "viral", "social", "sociable", "syndication", "newsletter", "subnav", "cookie",
    "tag-list", "banner", "toolbar", "navbar", "topbar", "navbox", "navigation", "breadcrumb",
    "bread-crumb", "author", "button", "byline", "rating", "attachment", "timestamp",
    "user-info", "user-profile", "outbrain", "taboola", "consent", "modal-content", "paywall",
    "most-popular", "most-read", "top-stories", "trending", "subscribe", "signup", "sign-up",
    "carousel", "slick-", "swiper",
];

/// Rule 1: boilerplate widgets recognized by id/class.
#[must_use]
pub fn overall_discarded_content_rule_1(tree: &Tree, n: NodeId) -> bool {
    if !is_one_of_tags(tree, n, DISCARDABLE_CONTAINERS) {
        return false;
    }
    let id = id(tree, n).to_lowercase();
    let class = class(tree, n).to_lowercase();
    let id_class = format!("{id} {class}");

    if contains_any(&id_class, BOILERPLATE_MARKERS) {
        return true;
    }
    let related = id_class.contains("related") && !contains_any(&id_class, &["related-post", "related_post"]);
    let sidebar = id_class.contains("sidebar") && !contains_any(&class, &["with-sidebar", "sidebar-wrapper"]);
    let widget = class.contains("widget") && !class.contains("elementor-widget");

    related
        || sidebar
        || widget
        || id_class.starts_with("shar")
        || class.starts_with("shar")
        || class.contains("share-")
        || id.contains("share")
        || id.contains("menu")
        || (class.contains("menu") && !class.contains("contextmenu"))
        || id.contains("nav")
        || class.starts_with("nav")
        || class.starts_with("post-nav")
        || attr(tree, n, "role").to_lowercase().contains("nav")
        || class.contains("-ad-")
        || class.split_whitespace().any(|c| matches!(c, "ad" | "ads" | "advert" | "meta" | "tags"))
}

/// Rule 2: hidden elements and comment-thread debris.
#[must_use]
pub fn overall_discarded_content_rule_2(tree: &Tree, n: NodeId) -> bool {
    let class = class(tree, n);
    let style = attr(tree, n, "style").replace(' ', "").to_lowercase();

    attr(tree, n, "aria-hidden") == "true"
        || tree.attr(n, "hidden").is_some()
        || style.contains("display:none")
        || style.contains("visibility:hidden")
        || id(tree, n).contains("hidden")
        || class.split_whitespace().any(|c| matches!(c, "hidden" | "hide" | "noprint" | "sr-only"))
        || class.starts_with("hide-")
        || class.contains("-hide-")
        || contains_any(class, &["comments-title", "nocomments", "-reply-", "akismet", "notloaded"])
        || id_class(tree, n).starts_with("reply-")
        || id(tree, n).contains("reader-comments")
}

/// Class/id fragments of share-button plugins injected into article bodies.
const SHARE_PLUGIN_MARKERS: &[&str] = &[
    "dpsp-", "wabtn", "addtoany", "shareaholic", "share-wrapper", "social-share",
    "share-buttons", "post-share", "entry-share",
];

/// Share-button plugin markup, whatever the element.
#[must_use]
pub fn share_plugin(tree: &Tree, n: NodeId) -> bool {
    contains_any(class(tree, n), SHARE_PLUGIN_MARKERS) || id(tree, n).contains("share-buttons")
}

/// Rule 3: landmark elements for page chrome.
#[must_use]
pub fn overall_discarded_content_rule_3(tree: &Tree, n: NodeId) -> bool {
    is_one_of_tags(tree, n, &["header", "nav", "aside"])
}
