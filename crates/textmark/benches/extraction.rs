//! Performance benchmarks for textmark.
//!
//! Covers page extraction (interpretation, geometry and assembly) for a
//! plain text page, a rotated page with nested transforms, and range
//! queries over the resulting mark index.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use textmark::{ExtractOptions, FontResources, PageInput, Rectangle, SimpleFont};

const LETTER: Rectangle = Rectangle {
    llx: 0.0,
    lly: 0.0,
    urx: 612.0,
    ury: 792.0,
};

fn fonts() -> FontResources {
    let mut fonts = FontResources::new();
    if let Some(helv) = SimpleFont::standard("Helvetica") {
        fonts.insert("F1", helv);
    }
    if let Some(courier) = SimpleFont::standard("Courier") {
        fonts.insert("F2", courier);
    }
    fonts
}

/// Escape a string for a PDF literal string.
fn pdf_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// `n_lines` lines of text, each ~70 chars.
fn text_content(n_lines: usize) -> Vec<u8> {
    let mut ops = String::from("BT\n/F1 10 Tf\n72 720 Td\n");
    for i in 0..n_lines {
        let line = format!(
            "Line {} of the document with some words to measure extraction speed here",
            i + 1
        );
        if i > 0 {
            ops.push_str("0 -14 Td\n");
        }
        ops.push_str(&format!("({}) Tj\n", pdf_escape(&line)));
    }
    ops.push_str("ET\n");
    ops.into_bytes()
}

/// Columns of kerned text inside nested `q`/`cm` scopes, plus a vertical
/// caption.
fn transformed_content(n_blocks: usize) -> Vec<u8> {
    let mut ops = String::new();
    for i in 0..n_blocks {
        let x = 72.0 + (i % 3) as f64 * 160.0;
        let y = 700.0 - (i / 3) as f64 * 60.0;
        ops.push_str(&format!("q 1 0 0 1 {x} {y} cm q 0.9 0 0 0.9 0 0 cm\n"));
        ops.push_str("BT /F1 9 Tf 0 0 Td\n");
        ops.push_str(&format!(
            "[(Item) -250 ({}) 120 (: ) -40 (qty) -250 ({})] TJ\n",
            i + 1,
            i * 7 % 13
        ));
        ops.push_str("0 -11 Td (unit price 12.50) Tj ET Q Q\n");
    }
    ops.push_str("BT /F2 8 Tf 0 1 -1 0 590 100 Tm (generated for benchmarking) Tj ET\n");
    ops.into_bytes()
}

fn bench_page_extraction(c: &mut Criterion) {
    let fonts = fonts();
    let options = ExtractOptions::default();
    let plain = text_content(50);
    let transformed = transformed_content(30);

    let mut group = c.benchmark_group("extract_page_text");

    group.bench_function("plain_50_lines", |b| {
        let page = PageInput {
            media_box: LETTER,
            rotation: 0,
            content: &plain,
            fonts: &fonts,
        };
        b.iter(|| textmark::extract_page_text(black_box(&page), &options))
    });

    group.bench_function("transformed_rotated", |b| {
        let page = PageInput {
            media_box: LETTER,
            rotation: 90,
            content: &transformed,
            fonts: &fonts,
        };
        b.iter(|| textmark::extract_page_text(black_box(&page), &options))
    });

    group.bench_function("pages_10", |b| {
        let pages: Vec<PageInput<'_>> = (0..10)
            .map(|_| PageInput {
                media_box: LETTER,
                rotation: 0,
                content: &plain,
                fonts: &fonts,
            })
            .collect();
        b.iter(|| textmark::extract_pages(black_box(&pages), &options))
    });

    group.finish();
}

fn bench_range_queries(c: &mut Criterion) {
    let fonts = fonts();
    let content = text_content(50);
    let page = PageInput {
        media_box: LETTER,
        rotation: 0,
        content: &content,
        fonts: &fonts,
    };
    let Ok(result) = textmark::extract_page_text(&page, &ExtractOptions::default()) else {
        return;
    };
    let text = result.value;
    let len = text.len() as i64;

    let mut group = c.benchmark_group("range_offset");

    group.bench_function("word_windows", |b| {
        b.iter(|| {
            let marks = text.marks();
            let mut start = 0;
            while start + 8 <= len {
                let _ = black_box(marks.range_offset(start, start + 8).map(|v| v.bbox()));
                start += 8;
            }
        })
    });

    group.bench_function("term_bbox", |b| {
        b.iter(|| black_box(text.term_bbox(black_box("Line 42 of the document"))))
    });

    group.finish();
}

criterion_group!(benches, bench_page_extraction, bench_range_queries);
criterion_main!(benches);
