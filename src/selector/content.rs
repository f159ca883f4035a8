//! Content candidate rules
//!
//! Ordered from most to least specific. The extractor tries each rule in turn
//! and works on the first node it matches; `<body>` is the last resort.

use crate::selector::utils::{attr, class, contains_any, id, is_one_of_tags, starts_with_any, CONTENT_CONTAINERS};
use crate::selector::Rule;
use crate::tree::{NodeId, Tree};

pub static CONTENT_RULES: &[Rule] = &[
    content_rule_1,
    content_rule_2,
    content_rule_3,
    content_rule_4,
    content_rule_5,
    content_rule_6,
    content_rule_7,
];

/// Class fragments of typical CMS article bodies.
const ARTICLE_BODY_CLASSES: &[&str] = &[
    "post-text", "post_text", "post-body", "post-entry", "postentry", "post-content",
    "post_content", "postcontent", "article-text", "articletext", "entry-content",
    "article-content", "article__content", "article-body", "article__body", "articlebody",
    "page-content", "text-content", "body-text", "art-content", "storybody", "article_body",
    "contentbody", "blog-content", "blog_content", "blogcontent", "blog-post-content",
    "wysiwyg", "blogpostbody", "blogpostcontent", "postbody", "mw-parser-output",
];

/// Id fragments of typical CMS article bodies.
const ARTICLE_BODY_IDS: &[&str] = &[
    "entry-content", "article-content", "article__content", "article-body", "article__body",
    "articlebody", "body-text", "art-content", "storybody", "article_body", "mw-content-text",
    "bodycontent",
];

/// Rule 1: explicit article-body markers (`itemprop="articleBody"`, CMS classes).
#[must_use]
pub fn content_rule_1(tree: &Tree, n: NodeId) -> bool {
    if !is_one_of_tags(tree, n, CONTENT_CONTAINERS) {
        return false;
    }
    let class = class(tree, n).to_lowercase();
    let id = id(tree, n).to_lowercase();

    attr(tree, n, "itemprop") == "articleBody"
        || class == "post"
        || class == "entry"
        || contains_any(&class, ARTICLE_BODY_CLASSES)
        || contains_any(&id, ARTICLE_BODY_IDS)
}

/// Rule 2: `<article>` elements.
#[must_use]
pub fn content_rule_2(tree: &Tree, n: NodeId) -> bool {
    tree.is_tag(n, "article")
}

/// Rule 3: story and single-post containers.
#[must_use]
pub fn content_rule_3(tree: &Tree, n: NodeId) -> bool {
    if !is_one_of_tags(tree, n, CONTENT_CONTAINERS) {
        return false;
    }
    let class = class(tree, n);
    let id = id(tree, n);

    contains_any(
        class,
        &[
            "post-bodycopy", "storycontent", "story-content", "theme-content", "section-content",
            "single-content", "single-post", "main-column", "story-body", "field-body", "fulltext",
        ],
    ) || starts_with_any(class, &["article"])
        || starts_with_any(id, &["primary"])
        || matches!(class, "postarea" | "text" | "story")
        || matches!(id, "article" | "story")
        || attr(tree, n, "role") == "article"
}

/// Rule 4: generic "main content" containers.
#[must_use]
pub fn content_rule_4(tree: &Tree, n: NodeId) -> bool {
    if !is_one_of_tags(tree, n, CONTENT_CONTAINERS) {
        return false;
    }
    let class = class(tree, n).to_lowercase();
    let id = id(tree, n).to_lowercase();
    let needles = ["content-main", "content_main", "content-body", "content__body", "main-content"];

    contains_any(&class, &needles) || contains_any(&id, &needles) || id == "content" || class == "content"
}

/// Rule 5: `<main>` and main-prefixed markers.
#[must_use]
pub fn content_rule_5(tree: &Tree, n: NodeId) -> bool {
    if tree.is_tag(n, "main") {
        return true;
    }
    if !is_one_of_tags(tree, n, &["article", "div", "section"]) {
        return false;
    }
    class(tree, n).starts_with("main")
        || id(tree, n).starts_with("main")
        || attr(tree, n, "role").starts_with("main")
}

/// Rule 6: any "content" container that is not obviously boilerplate.
#[must_use]
pub fn content_rule_6(tree: &Tree, n: NodeId) -> bool {
    if !is_one_of_tags(tree, n, &["div", "section", "td"]) {
        return false;
    }
    let id_class = format!("{} {}", id(tree, n), class(tree, n)).to_lowercase();
    id_class.contains("content")
        && !contains_any(
            &id_class,
            &["footer", "header", "sidebar", "comment", "share", "social", "related", "nav", "menu", "widget"],
        )
}

/// Rule 7: the document body.
#[must_use]
pub fn content_rule_7(tree: &Tree, n: NodeId) -> bool {
    tree.is_tag(n, "body")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::selector::query_all;

    fn first_match(html: &str, rule: Rule) -> Option<String> {
        let tree = dom::parse(html);
        query_all(&tree, tree.root(), rule).first().map(|&n| tree.tag(n).to_string())
    }

    #[test]
    fn test_rule_1_itemprop_and_classes() {
        assert!(first_match(r#"<div itemprop="articleBody">x</div>"#, content_rule_1).is_some());
        assert!(first_match(r#"<section class="Entry-Content">x</section>"#, content_rule_1).is_some());
        assert!(first_match(r#"<span class="entry-content">x</span>"#, content_rule_1).is_none());
    }

    #[test]
    fn test_rule_2_article() {
        assert_eq!(first_match("<article>x</article>", content_rule_2).as_deref(), Some("article"));
    }

    #[test]
    fn test_rule_5_main() {
        assert_eq!(first_match("<main>x</main>", content_rule_5).as_deref(), Some("main"));
        assert!(first_match(r#"<div role="main-region">x</div>"#, content_rule_5).is_some());
    }

    #[test]
    fn test_rule_6_excludes_boilerplate() {
        assert!(first_match(r#"<div id="centercontent">x</div>"#, content_rule_6).is_some());
        assert!(first_match(r#"<div class="sidebar-content">x</div>"#, content_rule_6).is_none());
    }

    #[test]
    fn test_rule_7_body_is_last_resort() {
        assert_eq!(first_match("<p>x</p>", content_rule_7).as_deref(), Some("body"));
        assert_eq!(CONTENT_RULES.len(), 7);
    }
}
