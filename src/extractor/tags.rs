//! Tag constants and the node-kind taxonomy.
//!
//! Result trees only ever contain tags from [`RESULT_TAGS`]. Source elements
//! are routed to a handler through [`NodeKind::of`].

use std::collections::HashSet;
use std::sync::LazyLock;

pub static LIST_TAGS: [&str; 3] = ["ul", "ol", "dl"];

pub static ITEM_TAGS: [&str; 3] = ["dd", "dt", "li"];

pub static QUOTE_TAGS: [&str; 3] = ["blockquote", "pre", "q"];

pub static HEAD_TAGS: [&str; 7] = ["h1", "h2", "h3", "h4", "h5", "h6", "summary"];

pub static LB_TAGS: [&str; 2] = ["br", "hr"];

pub static HI_TAGS: [&str; 14] = [
    "em", "i", "b", "strong", "u", "kbd", "samp", "tt", "var", "sub", "sup", "del", "s", "strike",
];

pub static CELL_TAGS: [&str; 2] = ["th", "td"];

pub static TABLE_TAGS_TO_STRIP: [&str; 3] = ["tbody", "tfoot", "thead"];

/// Removed wholesale with their content by the cleaner.
pub static TAGS_TO_CLEAN: [&str; 50] = [
    "aside", "embed", "footer", "form", "head", "iframe", "menu", "object", "script",
    "applet", "audio", "canvas", "figure", "map", "picture", "svg", "video",
    "area", "blink", "button", "datalist", "dialog", "frame", "frameset", "fieldset",
    "link", "input", "ins", "label", "legend", "marquee", "math", "menuitem", "nav",
    "noscript", "optgroup", "option", "output", "param", "progress", "rp", "rt", "rtc",
    "select", "source", "style", "track", "textarea", "time", "use",
];

/// Entries of [`TAGS_TO_CLEAN`] that hold images; kept when images are wanted.
pub static IMAGE_CONTAINERS: [&str; 3] = ["figure", "picture", "source"];

/// Unwrapped by the cleaner: the tag goes, the content stays.
pub static TAGS_TO_STRIP: [&str; 17] = [
    "abbr", "acronym", "address", "bdi", "bdo", "big", "cite", "data", "dfn", "font",
    "hgroup", "img", "mark", "meta", "ruby", "small", "template",
];

/// Tags that may be deleted when they hold neither children nor text.
pub static EMPTY_TAGS_TO_REMOVE: [&str; 22] = [
    "article", "b", "blockquote", "dd", "div", "dt", "em",
    "h1", "h2", "h3", "h4", "h5", "h6", "i", "li", "main",
    "p", "pre", "q", "section", "span", "strong",
];

/// Tags that must not end a result tree.
pub static NOT_AT_THE_END: [&str; 8] = ["h1", "h2", "h3", "h4", "h5", "h6", "summary", "a"];

/// Tags a result tree may contain.
pub static RESULT_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set: HashSet<&'static str> = [
        "body", "p", "a", "img", "table", "tr", "code", "br",
    ]
    .into_iter()
    .collect();
    set.extend(LIST_TAGS);
    set.extend(ITEM_TAGS);
    set.extend(QUOTE_TAGS);
    set.extend(HEAD_TAGS);
    set.extend(HI_TAGS);
    set.extend(CELL_TAGS);
    set
});

/// Potential tags before options are applied.
pub static TAG_CATALOG: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set: HashSet<&'static str> = ["p", "code"].into_iter().collect();
    set.extend(LIST_TAGS);
    set.extend(QUOTE_TAGS);
    set.extend(HEAD_TAGS);
    set.extend(HI_TAGS);
    set.extend(LB_TAGS);
    set
});

#[inline]
#[must_use]
pub fn is_list_tag(tag: &str) -> bool {
    LIST_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_item_tag(tag: &str) -> bool {
    ITEM_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_quote_tag(tag: &str) -> bool {
    QUOTE_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_head_tag(tag: &str) -> bool {
    HEAD_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_lb_tag(tag: &str) -> bool {
    LB_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_hi_tag(tag: &str) -> bool {
    HI_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_cell_tag(tag: &str) -> bool {
    CELL_TAGS.contains(&tag)
}

#[inline]
#[must_use]
pub fn is_result_tag(tag: &str) -> bool {
    RESULT_TAGS.contains(tag)
}

/// Which handler a source element goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    List,
    Quote,
    Code,
    Heading,
    Paragraph,
    LineBreak,
    Formatting,
    Table,
    Image,
    Other,
}

impl NodeKind {
    /// Classify a source tag. Order matters: `code` is checked with the quotes.
    #[must_use]
    pub fn of(tag: &str) -> Self {
        match tag {
            t if is_list_tag(t) => Self::List,
            "code" => Self::Code,
            t if is_quote_tag(t) => Self::Quote,
            t if is_head_tag(t) => Self::Heading,
            "p" => Self::Paragraph,
            t if is_lb_tag(t) => Self::LineBreak,
            t if is_hi_tag(t) || t == "a" || t == "span" => Self::Formatting,
            "table" => Self::Table,
            "img" => Self::Image,
            _ => Self::Other,
        }
    }
}
