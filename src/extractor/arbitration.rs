//! Arbitration between the main extractor and an alternative extractor.
//!
//! The alternative is any [`AlternativeExtractor`]; the crate ships a
//! readability implementation (`readability` feature) and [`NoAlternative`].
//! The two results are compared on length and structure, and a winning
//! alternative is sanitized into the result tag taxonomy.

use tracing::{debug, trace};

use super::pruning::prune_unwanted_nodes;
use super::tags::{is_result_tag, HEAD_TAGS, HI_TAGS, TABLE_TAGS_TO_STRIP};
use crate::options::Options;
use crate::result::Extraction;
use crate::selector::{discard, query_all};
use crate::tree::Tree;

/// Removed with their content from an alternative result.
static TAGS_TO_SANITIZE: &[&str] = &[
    "aside", "audio", "button", "fieldset", "figure", "footer", "iframe", "input", "label",
    "link", "nav", "noindex", "noscript", "object", "option", "select", "source", "svg",
    "time", "script", "style",
];

/// A second content extractor run over the cleaned document.
pub trait AlternativeExtractor: Send + Sync {
    /// Main content of `document`, or `None` when nothing was found.
    fn extract(&self, document: &Tree) -> Option<Tree>;
}

/// Never produces anything, so the main result is always kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlternative;

impl AlternativeExtractor for NoAlternative {
    fn extract(&self, _document: &Tree) -> Option<Tree> {
        None
    }
}

/// Mozilla-readability port from `dom_smoothie`.
#[cfg(feature = "readability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityExtractor;

#[cfg(feature = "readability")]
impl AlternativeExtractor for ReadabilityExtractor {
    fn extract(&self, document: &Tree) -> Option<Tree> {
        use dom_smoothie::Readability;

        let html = crate::dom::to_html(document);
        let mut reader = match Readability::new(html.as_str(), None, None) {
            Ok(reader) => reader,
            Err(err) => {
                debug!(%err, "readability could not load document");
                return None;
            }
        };
        match reader.parse() {
            Ok(article) => Some(crate::dom::parse_fragment(&article.content)),
            Err(err) => {
                debug!(%err, "readability found no article");
                None
            }
        }
    }
}

/// The alternative extractor used when none is configured.
#[must_use]
pub fn default_alternative() -> Box<dyn AlternativeExtractor> {
    #[cfg(feature = "readability")]
    {
        Box::new(ReadabilityExtractor)
    }
    #[cfg(not(feature = "readability"))]
    {
        Box::new(NoAlternative)
    }
}

fn looks_like_json(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with('{') || text.starts_with('[')
}

/// First matching rule decides; `Some(reason)` means the alternative wins.
fn alternative_wins(primary: &Extraction, alternative: &Extraction, options: &Options) -> Option<&'static str> {
    let (len_primary, len_alt) = (primary.length, alternative.length);
    let min_size = options.min_extracted_size;

    if len_alt == 0 || len_alt == len_primary {
        return None;
    }
    if len_primary == 0 {
        return Some("primary empty");
    }
    if len_primary > 2 * len_alt {
        return None;
    }
    if len_alt > 2 * len_primary && !looks_like_json(&alternative.text) {
        return Some("alternative more than double");
    }

    let body = &primary.body;
    let paragraphs = body.iter_tags(body.root(), &["p"]).len();
    let tables = body.iter_tags(body.root(), &["table"]).len();
    if paragraphs == 0 && len_alt >= 2 * min_size {
        return Some("primary without paragraphs");
    }
    if tables > paragraphs && len_alt >= 2 * min_size {
        return Some("primary mostly tables");
    }
    if options.is_recall() {
        let alt = &alternative.body;
        let primary_heads = body.iter_tags(body.root(), &HEAD_TAGS).len();
        let alt_subheads = alt.iter_tags(alt.root(), &["h2", "h3", "h4"]).len();
        if primary_heads == 0 && alt_subheads > 0 && len_alt > len_primary {
            return Some("alternative has headings");
        }
    }
    None
}

/// Reduce an alternative result to the tags the main extractor emits.
pub fn sanitize_tree(tree: &mut Tree, options: &Options) {
    let root = tree.root();
    tree.remove_tags(root, TAGS_TO_SANITIZE);
    for plugin in query_all(tree, root, discard::share_plugin).into_iter().rev() {
        if tree.is_attached(plugin) {
            let _ = tree.remove(plugin);
        }
    }
    if !options.links {
        tree.strip_tags(root, &["a"]);
    }
    if !options.formatting {
        tree.strip_tags(root, &HI_TAGS);
    }
    tree.strip_tags(root, &["span"]);
    tree.strip_tags(root, &TABLE_TAGS_TO_STRIP);
    if !options.tables {
        tree.remove_tags(root, &["table"]);
    }
    if !options.images {
        tree.remove_tags(root, &["img"]);
    }

    for n in tree.descendants(root).into_iter().rev() {
        if !is_result_tag(tree.tag(n)) {
            let _ = tree.strip(n);
        }
    }
    for n in tree.descendants(root) {
        match tree.tag(n) {
            "a" => tree.retain_attrs(n, &["href", "target"]),
            "img" => tree.retain_attrs(n, &["src", "alt", "title"]),
            _ => tree.clear_attrs(n),
        }
    }
    if tree.tag(root) != "body" {
        tree.set_tag(root, "body");
    }
    tree.clear_attrs(root);
}

/// Compare the main extraction with the alternative extractor's output.
///
/// `document` is the cleaned tree as it was before main extraction. Returns
/// the sanitized alternative when it should replace `primary`, `None` to
/// keep `primary`.
pub fn arbitrate(
    document: &Tree,
    primary: &Extraction,
    options: &Options,
    alternative: &dyn AlternativeExtractor,
) -> Option<Extraction> {
    if options.is_recall() && primary.length > options.min_extracted_size * 10 {
        trace!("primary result abundant, skipping alternative");
        return None;
    }

    let candidate = if options.is_precision() {
        let mut pruned = document.clone();
        let root = pruned.root();
        prune_unwanted_nodes(&mut pruned, root, discard::OVERALL_DISCARDED_CONTENT, true);
        alternative.extract(&pruned)
    } else {
        alternative.extract(document)
    };
    let candidate = Extraction::from_body(candidate?);

    let reason = alternative_wins(primary, &candidate, options);
    debug!(
        primary = primary.length,
        alternative = candidate.length,
        chosen = reason.unwrap_or("primary"),
        "arbitration"
    );
    reason?;

    let mut body = candidate.body;
    sanitize_tree(&mut body, options);
    Some(Extraction::from_body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::options::Focus;

    struct Fixed(String);

    impl AlternativeExtractor for Fixed {
        fn extract(&self, _document: &Tree) -> Option<Tree> {
            Some(dom::parse_fragment(&self.0))
        }
    }

    fn primary(html: &str) -> Extraction {
        Extraction::from_body(dom::parse_fragment(html))
    }

    #[test]
    fn test_empty_primary_takes_alternative() {
        let long = format!("<div><p>{}</p></div>", "word ".repeat(120));
        let alt = Fixed(long);
        let document = dom::parse("<body></body>");
        let result = arbitrate(&document, &Extraction::empty(), &Options::default(), &alt).expect("alternative");
        assert!(result.length > 2 * Options::default().min_extracted_size);
        assert!(result.body.find_tag(result.body.root(), "div").is_none());
    }

    #[test]
    fn test_no_alternative_keeps_primary() {
        let document = dom::parse("<body><p>x</p></body>");
        assert!(arbitrate(&document, &primary("<p>x</p>"), &Options::default(), &NoAlternative).is_none());
    }

    #[test]
    fn test_length_rules() {
        let opts = Options::default();
        let short = primary("<p>short text</p>");
        let long = primary(&format!("<p>{}</p>", "longer text ".repeat(5)));
        assert_eq!(alternative_wins(&short, &long, &opts), Some("alternative more than double"));
        assert_eq!(alternative_wins(&long, &short, &opts), None);
        assert_eq!(alternative_wins(&long, &long, &opts), None);

        let json = primary(&format!("<p>{{\"a\": \"{}\"}}</p>", "x".repeat(80)));
        assert_eq!(alternative_wins(&short, &json, &opts), None);
    }

    #[test]
    fn test_structure_rules() {
        let opts = Options { min_extracted_size: 10, ..Options::default() };
        let tables = primary("<table><tr><td>cell text one</td></tr></table><table><tr><td>two</td></tr></table><p>p</p>");
        let alt = primary(&format!("<p>{}</p>", "a".repeat(25)));
        assert_eq!(alternative_wins(&tables, &alt, &opts), Some("primary mostly tables"));

        let recall = Options { focus: Focus::Recall, min_extracted_size: 100, ..Options::default() };
        let flat = primary("<p>Some text here.</p><p>More text.</p>");
        let headed = primary("<h2>Intro</h2><p>Some text here.</p><p>More text, longer.</p>");
        assert_eq!(alternative_wins(&flat, &headed, &recall), Some("alternative has headings"));
        assert_eq!(alternative_wins(&flat, &headed, &Options { min_extracted_size: 100, ..Options::default() }), None);
    }

    #[test]
    fn test_recall_abundance_skips_alternative() {
        let opts = Options { focus: Focus::Recall, min_extracted_size: 5, ..Options::default() };
        let document = dom::parse("<body></body>");
        let big = primary(&format!("<p>{}</p>", "text ".repeat(20)));
        let alt = Fixed("<p>irrelevant</p>".to_string());
        assert!(arbitrate(&document, &big, &opts, &alt).is_none());
    }

    #[test]
    fn test_sanitize_tree() {
        let mut tree = dom::parse_fragment(
            r#"<article class="x"><nav>menu</nav><p>Keep <span>this</span> <a href="/a" rel="x">link</a></p>
               <table><tbody><tr><td>c</td></tr></tbody></table><section><p>deep</p></section></article>"#,
        );
        sanitize_tree(&mut tree, &Options::default());
        let root = tree.root();
        for n in tree.descendants(root) {
            assert!(is_result_tag(tree.tag(n)), "{}", tree.tag(n));
        }
        assert!(tree.find_tag(root, "a").is_none());
        assert!(tree.find_tag(root, "tbody").is_none());
        assert!(tree.find_tag(root, "tr").is_some());
        let text = crate::etree::iter_text(&tree, root, " ");
        assert!(!text.contains("menu"));
        assert!(text.contains("Keep this link"));

        let mut tree = dom::parse_fragment(
            r#"<p><strong>Bold</strong> word and <em>stress</em>.</p><div class="addtoany_share">Share this</div><p>End</p>"#,
        );
        sanitize_tree(&mut tree, &Options::default());
        let root = tree.root();
        assert!(tree.find_tag(root, "strong").is_none());
        assert!(tree.find_tag(root, "em").is_none());
        assert_eq!(crate::etree::iter_text(&tree, root, " "), "Bold word and stress. End");

        let mut tree = dom::parse_fragment(r#"<p><strong>Bold</strong> word.</p>"#);
        sanitize_tree(&mut tree, &Options { formatting: true, ..Options::default() });
        assert!(tree.find_tag(tree.root(), "strong").is_some());

        let mut tree = dom::parse_fragment(r#"<p><a href="/a" rel="x">link</a></p>"#);
        sanitize_tree(&mut tree, &Options { links: true, ..Options::default() });
        let a = tree.find_tag(tree.root(), "a").expect("a");
        assert_eq!(tree.attrs(a), &[("href".to_string(), "/a".to_string())]);
    }
}
