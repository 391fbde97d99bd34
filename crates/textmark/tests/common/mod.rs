//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use textmark::{
    ExtractOptions, ExtractResult, FontResources, PageInput, PageText, Rectangle, SimpleFont,
    TextError,
};

/// The two-line page used across the end-to-end tests.
pub const HELLO: &str = "BT /F 24 Tf (Hello World!)Tj 0 -25 Td (Doink)Tj ET";
pub const HELLO_TEXT: &str = "Hello World!\nDoink";

/// Letter-sized media box.
pub const LETTER: Rectangle = Rectangle {
    llx: 0.0,
    lly: 0.0,
    urx: 612.0,
    ury: 792.0,
};

/// Helvetica under `/F` and `/F1`, Courier under `/F2`.
pub fn fonts() -> FontResources {
    FontResources::new()
        .with("F", SimpleFont::standard("Helvetica").unwrap())
        .with("F1", SimpleFont::standard("Helvetica").unwrap())
        .with("F2", SimpleFont::standard("Courier").unwrap())
}

pub fn extract_with(
    content: &str,
    media_box: Rectangle,
    rotation: i32,
    fonts: &FontResources,
    options: &ExtractOptions,
) -> Result<ExtractResult<PageText>, TextError> {
    let page = PageInput {
        media_box,
        rotation,
        content: content.as_bytes(),
        fonts,
    };
    textmark::extract_page_text(&page, options)
}

/// Extract with default options on a letter page, expecting success.
pub fn extract(content: &str) -> PageText {
    extract_with(content, LETTER, 0, &fonts(), &ExtractOptions::default())
        .unwrap()
        .value
}

pub fn assert_approx(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

pub fn assert_rect_approx(actual: &Rectangle, expected: &Rectangle, tolerance: f64) {
    assert!(
        actual.approx_eq(expected, tolerance),
        "expected {expected:?} ± {tolerance}, got {actual:?}"
    );
}

/// The page text's chars in `[start, end)`.
pub fn chars(page: &PageText, start: usize, end: usize) -> String {
    page.text().chars().skip(start).take(end - start).collect()
}
