//! Performance benchmarks for rs-distill.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Full extraction of a small article page, per focus mode
//! - The cleaning stage alone
//! - Extraction over synthetic pages of growing size

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_distill::{dom, fingerprint, html_processing, Extractor, Focus, NoAlternative, Options};

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Article</title>
    <script type="application/ld+json">{"@type": "NewsArticle", "headline": "Sample"}</script>
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/about">About</a>
    </nav>
    <article>
        <h1>Sample Article Title</h1>
        <p>This is the first paragraph of the article. It contains some meaningful
        content that should be kept by the extractor.</p>
        <p>Here is a second paragraph with more content. The extraction should
        preserve the text while removing navigation and other boilerplate.</p>
        <table><tr><th>Year</th><th>Value</th></tr><tr><td>2023</td><td>42</td></tr></table>
        <p>A third paragraph ensures we have enough content for meaningful
        benchmarking of the extraction performance.</p>
    </article>
    <aside>
        <h3>Related Articles</h3>
        <ul>
            <li><a href="/1">Related article 1</a></li>
            <li><a href="/2">Related article 2</a></li>
        </ul>
    </aside>
    <footer>
        <p>Copyright 2024</p>
    </footer>
</body>
</html>
"#;

/// Article page with `paragraphs` paragraphs and a link list every tenth one.
fn synthetic_page(paragraphs: usize) -> String {
    let mut html = String::from("<html><body><div class=\"content\">");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>Paragraph {i} with a handful of ordinary words describing the topic at length.</p>"
        ));
        if i % 10 == 9 {
            html.push_str("<ul><li><a href=\"/a\">Link</a></li><li><a href=\"/b\">Other</a></li></ul>");
        }
    }
    html.push_str("</div></body></html>");
    html
}

fn bench_extract_focus(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_focus");
    for focus in [Focus::Precision, Focus::Balanced, Focus::Recall] {
        let extractor = Extractor::new(Options { focus, ..Options::default() }).with_alternative(NoAlternative);
        group.bench_function(format!("{focus:?}"), |b| {
            b.iter(|| extractor.extract(black_box(SAMPLE_HTML)));
        });
    }
    group.finish();
}

fn bench_clean(c: &mut Criterion) {
    let options = Options::default();
    let tree = dom::parse(SAMPLE_HTML);
    c.bench_function("clean", |b| {
        b.iter(|| html_processing::clean(black_box(tree.clone()), &options));
    });
}

fn bench_page_size(c: &mut Criterion) {
    let extractor = Extractor::new(Options { fast: true, ..Options::default() });
    let mut group = c.benchmark_group("page_size");
    for paragraphs in [10, 100, 1000] {
        let html = synthetic_page(paragraphs);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("extract", paragraphs), &html, |b, html| {
            b.iter(|| extractor.extract(black_box(html)));
        });
    }
    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let text = "ordinary words describing the topic at length ".repeat(50);
    c.bench_function("fingerprint", |b| b.iter(|| fingerprint(black_box(&text))));
}

criterion_group!(
    benches,
    bench_extract_focus,
    bench_clean,
    bench_page_size,
    bench_fingerprint
);
criterion_main!(benches);
