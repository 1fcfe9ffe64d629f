// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mureena::{CssSanitizer, DefaultUrlPolicy, SanitizerBuilder};

fn html_sanitize_benchmark(c: &mut Criterion) {
    let sanitizer = SanitizerBuilder::new().build().unwrap();
    let html = r#"
        <div id="content" onclick="steal()">
            <h1>Heading</h1>
            <p style="color: red; background: url(javascript:alert(1))">
                Some <b>bold</b> and <i>italic</i> text with a
                <a href="/page?a=1&b=2" title="link">link</a>.
            </p>
            <script>document.location = 'https://evil.example'</script>
            <img src="https://example.com/pic.png" alt="pic" onerror="alert(1)">
            <ul><li dir="ltr">one</li><li>two</li><li>three</li></ul>
            <table><tr><td colspan="2">cell</td></tr></table>
        </div>
    "#;

    c.bench_function("sanitize_html", |b| {
        b.iter(|| black_box(sanitizer.sanitize(black_box(html)).unwrap()))
    });

    let clean = sanitizer.sanitize(html).unwrap();
    c.bench_function("sanitize_clean_html", |b| {
        b.iter(|| black_box(sanitizer.sanitize(black_box(clean.as_str())).unwrap()))
    });
}

fn css_sanitize_benchmark(c: &mut Criterion) {
    let css = CssSanitizer::new(Arc::new(DefaultUrlPolicy::new()));
    let style = "color: red; margin: 4px 8px; background: url(https://example.com/bg.png); \
                 width: calc(100% - 20px); behavior: url(#default#time2)";

    c.bench_function("sanitize_style_attribute", |b| {
        b.iter(|| black_box(css.sanitize_style_attribute(black_box(style))))
    });

    let sheet = "p { color: red } .note { border: 1px solid #ccc; padding: 4px } \
                 @import url(https://evil.example/x.css); ul > li { margin: 0 }";
    c.bench_function("sanitize_stylesheet", |b| {
        b.iter(|| black_box(css.sanitize_stylesheet(black_box(sheet))))
    });
}

criterion_group!(benches, html_sanitize_benchmark, css_sanitize_benchmark);
criterion_main!(benches);
