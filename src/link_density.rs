//! Link Density Testing
//!
//! Checks whether sections should be removed because they are rich in links
//! (probably boilerplate). All lengths are character counts of trimmed text.

use tracing::trace;

use crate::etree;
use crate::tree::{NodeId, Tree};

/// Links shorter than this count as "short".
const SHORT_LINK_LENGTH: usize = 10;

/// Outcome of [`is_boilerplate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDensityResult {
    pub boilerplate: bool,
    /// Non-empty anchor texts, collected only for elements short enough to
    /// be measured in detail.
    pub anchor_texts: Vec<String>,
}

impl LinkDensityResult {
    fn verdict(boilerplate: bool) -> Self {
        Self {
            boilerplate,
            anchor_texts: Vec::new(),
        }
    }
}

/// Aggregate statistics over the non-empty links of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkInfo {
    /// Total characters of link text.
    pub link_length: usize,
    /// Links shorter than ten characters.
    pub short_links: usize,
    pub texts: Vec<String>,
}

#[must_use]
pub fn collect_link_info(tree: &Tree, links: &[NodeId]) -> LinkInfo {
    let mut info = LinkInfo::default();
    for &link in links {
        let text = etree::text_content(tree, link);
        let length = etree::char_len(&text);
        if length == 0 {
            continue;
        }
        info.link_length += length;
        if length < SHORT_LINK_LENGTH {
            info.short_links += 1;
        }
        info.texts.push(text);
    }
    info
}

fn links_of(tree: &Tree, id: NodeId) -> Vec<NodeId> {
    tree.descendants(id)
        .into_iter()
        .filter(|&n| tree.is_tag(n, "a"))
        .collect()
}

/// Whether `element` is mostly made of links.
///
/// `text` is the element's normalized text, passed in since callers
/// usually have it already.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn is_boilerplate(tree: &Tree, element: NodeId, text: &str, favor_precision: bool) -> LinkDensityResult {
    let links = links_of(tree, element);
    if links.is_empty() {
        return LinkDensityResult::default();
    }
    let text_length = etree::char_len(text);

    if let [link] = links.as_slice() {
        let floor = if favor_precision { 10 } else { 100 };
        let link_length = etree::char_len(&etree::text_content(tree, *link));
        if link_length > floor && link_length as f64 >= text_length as f64 * 0.9 {
            return LinkDensityResult::verdict(true);
        }
    }

    let is_last = tree.next_sibling(element).is_none();
    let limit = match (tree.tag(element), is_last) {
        ("p", true) => 60,
        ("p", false) => 30,
        (_, true) => 300,
        (_, false) => 100,
    };
    if text_length >= limit {
        return LinkDensityResult::verdict(false);
    }

    let info = collect_link_info(tree, &links);
    let n_links = info.texts.len();
    let boilerplate = if n_links == 0 {
        true
    } else {
        info.link_length as f64 > text_length as f64 * 0.8
            || (n_links > 1 && info.short_links as f64 / n_links as f64 > 0.8)
    };
    if boilerplate {
        trace!(tag = tree.tag(element), text_length, n_links, "link-dense element");
    }
    LinkDensityResult {
        boilerplate,
        anchor_texts: info.texts,
    }
}

/// Table variant: a textless table is boilerplate, otherwise anchors must
/// cover more than half of the text.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn is_boilerplate_table(tree: &Tree, table: NodeId) -> bool {
    let text = etree::text_content(tree, table);
    let text_length = etree::char_len(&text);
    if text_length == 0 {
        return true;
    }
    let links = links_of(tree, table);
    if links.is_empty() {
        return false;
    }
    let info = collect_link_info(tree, &links);
    info.link_length as f64 > text_length as f64 * 0.5
}

/// Delete every `tags` element below `root` that is link-dense.
///
/// With `backtracking`, short elements with a few children and at least
/// one link are deleted too.
pub fn delete_by_link_density(
    tree: &mut Tree,
    root: NodeId,
    tags: &[&str],
    backtracking: bool,
    favor_precision: bool,
) {
    let (max_length, min_children) = if favor_precision { (200, 1) } else { (100, 3) };

    let mut doomed = Vec::new();
    for elem in tree.descendants(root) {
        if !tags.contains(&tree.tag(elem)) {
            continue;
        }
        let text = etree::text_content(tree, elem);
        let result = is_boilerplate(tree, elem, &text, favor_precision);
        if result.boilerplate {
            doomed.push(elem);
        } else if backtracking && !result.anchor_texts.is_empty() {
            let length = etree::char_len(&text);
            if length > 0 && length < max_length && tree.children(elem).len() >= min_children {
                doomed.push(elem);
            }
        }
    }

    for elem in doomed.into_iter().rev() {
        if tree.is_attached(elem) {
            trace!(tag = tree.tag(elem), "deleting by link density");
            let _ = tree.remove(elem);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn first(tree: &Tree, tag: &str) -> NodeId {
        tree.find_tag(tree.root(), tag).expect("tag present")
    }

    fn check(tree: &Tree, id: NodeId, precision: bool) -> LinkDensityResult {
        is_boilerplate(tree, id, &etree::text_content(tree, id), precision)
    }

    #[test]
    fn test_no_links_is_content() {
        let tree = dom::parse_fragment("<p>Plain paragraph.</p>");
        assert_eq!(check(&tree, first(&tree, "p"), false), LinkDensityResult::default());
    }

    #[test]
    fn test_single_dominant_link() {
        let link_text = "a".repeat(120);
        let html = format!("<div><a href='#'>{link_text}</a> ok</div><p>next</p>");
        let tree = dom::parse_fragment(&html);
        let div = first(&tree, "div");
        assert!(check(&tree, div, false).boilerplate);

        let tree = dom::parse_fragment("<div><a>short link text</a>!</div>");
        let div = first(&tree, "div");
        assert!(check(&tree, div, true).boilerplate);
    }

    #[test]
    fn test_nav_list_of_short_links() {
        let tree = dom::parse_fragment(
            "<ul><li><a>Home</a></li><li><a>About</a></li><li><a>Contact</a></li></ul><p>x</p>",
        );
        let result = check(&tree, first(&tree, "ul"), false);
        assert!(result.boilerplate);
        assert_eq!(result.anchor_texts, vec!["Home", "About", "Contact"]);
    }

    #[test]
    fn test_long_text_with_links_is_content() {
        let body = "word ".repeat(80);
        let html = format!("<p>{body}<a>one link</a> {body}</p>");
        let tree = dom::parse_fragment(&html);
        assert!(!check(&tree, first(&tree, "p"), false).boilerplate);
    }

    #[test]
    fn test_length_limit_depends_on_position() {
        // 36 chars of text: under the last-child paragraph limit, above the inner one.
        let html = "<p>some text around a link <a>here is link</a></p><p>tail</p>";
        let tree = dom::parse_fragment(html);
        let p = first(&tree, "p");
        let result = check(&tree, p, false);
        assert!(!result.boilerplate);
        assert!(result.anchor_texts.is_empty());
    }

    #[test]
    fn test_table_variant() {
        let tree = dom::parse_fragment("<table><tr><td> </td></tr></table>");
        assert!(is_boilerplate_table(&tree, first(&tree, "table")));

        let tree = dom::parse_fragment(
            "<table><tr><td><a>link one</a></td><td><a>link two</a></td><td>x</td></tr></table>",
        );
        assert!(is_boilerplate_table(&tree, first(&tree, "table")));

        let tree = dom::parse_fragment(
            "<table><tr><td>A long cell of real tabular data</td><td><a>src</a></td></tr></table>",
        );
        assert!(!is_boilerplate_table(&tree, first(&tree, "table")));
    }

    #[test]
    fn test_delete_by_link_density_keeps_tail() {
        let mut tree = dom::parse_fragment(
            "<div><p>Intro text that is plain.</p><ul><li><a>One</a></li><li><a>Two</a></li></ul> after</div>",
        );
        let root = tree.root();
        delete_by_link_density(&mut tree, root, &["ul"], false, false);
        assert!(tree.find_tag(root, "ul").is_none());
        let p = first(&tree, "p");
        assert_eq!(tree.tail(p), " after");
    }

    #[test]
    fn test_backtracking_removes_short_link_lists() {
        let html = "<div><div>Read <a>this story about things</a>, more text here to pad <a>that</a> \
                    and some more words <a>plus one</a></div><p>Body</p></div>";
        let mut tree = dom::parse_fragment(html);
        let root = tree.root();
        delete_by_link_density(&mut tree, root, &["div"], false, false);
        assert_eq!(tree.iter_tags(root, &["div"]).len(), 2);
        delete_by_link_density(&mut tree, root, &["div"], true, false);
        // The outer div has only two children and survives.
        assert_eq!(tree.iter_tags(root, &["div"]).len(), 1);
        assert!(etree::text_content(&tree, root).ends_with("Body"));
    }
}
