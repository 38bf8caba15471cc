//! Benchmarks for chapter sanitization.
//!
//! Run with: cargo bench

use std::hint::black_box;
use std::path::Path;

use criterion::{Criterion, criterion_group, criterion_main};

use epub_gen::{EpubVersion, Sanitizer};

/// A long chapter with the usual mix of blocks, inline markup and images.
fn sample_chapter() -> String {
    let mut html = String::from("<html><head><title>Sample</title></head><body>");
    for i in 0..200 {
        html.push_str(&format!(
            r#"<section id="s{i}" data-index="{i}"><h2 class="title" style="margin:0">Section {i}</h2>
<p onclick="go({i})" align="justify">Lorem <em>ipsum</em> dolor <a href="https://example.com/{i}" rel="next" ping="x">sit</a> amet,<br>consectetur <span class="x">adipiscing</span> elit.</p>
<figure><img src="https://cdn.example.com/img/{i}.png" width="640" loading="lazy"><figcaption>Figure {i}</figcaption></figure></section>"#
        ));
    }
    html.push_str("</body></html>");
    html
}

fn bench_sanitize(c: &mut Criterion) {
    let html = sample_chapter();
    let dir = Path::new("/tmp/epub-gen/bench/OEBPS");

    c.bench_function("sanitize_v3", |b| {
        let sanitizer = Sanitizer::new(EpubVersion::V3);
        b.iter(|| sanitizer.sanitize(0, black_box(&html), dir));
    });

    c.bench_function("sanitize_v2", |b| {
        let sanitizer = Sanitizer::new(EpubVersion::V2);
        b.iter(|| sanitizer.sanitize(0, black_box(&html), dir));
    });
}

criterion_group!(benches, bench_sanitize);
criterion_main!(benches);
