//! textmark: Extract page text from PDF content streams, with an exact
//! mapping from every text offset back to the glyph box it came from.
//!
//! This is the public API facade crate. It re-exports types from
//! textmark-core and runs textmark-parse for interpretation.
//!
//! # Architecture
//!
//! - **textmark-core**: Backend-independent data types, text assembly and
//!   range queries
//! - **textmark-parse**: Content stream interpreter and glyph geometry
//! - **textmark** (this crate): Public API that ties everything together
//!
//! # Example
//!
//! ```
//! use textmark::{ExtractOptions, FontResources, PageInput, Rectangle, SimpleFont};
//!
//! let fonts = FontResources::new().with("F1", SimpleFont::standard("Helvetica").unwrap());
//! let page = PageInput {
//!     media_box: Rectangle::new(0.0, 0.0, 612.0, 792.0),
//!     rotation: 0,
//!     content: b"BT /F1 12 Tf 72 720 Td (PRICE LIST) Tj ET",
//!     fonts: &fonts,
//! };
//! let result = textmark::extract_page_text(&page, &ExtractOptions::default()).unwrap();
//! let page_text = result.value;
//! assert_eq!(page_text.text(), "PRICE LIST");
//!
//! let bbox = page_text.marks().range_offset(0, 5).unwrap().bbox().unwrap();
//! assert!(bbox.llx >= 72.0 && bbox.ury <= 732.0);
//! ```

pub use textmark_core;
pub use textmark_parse;

pub use textmark_core::{
    Color, Ctm, ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, LayoutOptions,
    Orientation, PageText, PlacedGlyph, Point, Rectangle, SearchOptions, TermMatch, TextError,
    TextMark, TextMarkArray, UnicodeNorm,
};
pub use textmark_parse::{
    ContentHandler, Font, FontMetrics, FontResolver, FontResources, GlyphBox, GlyphEvent,
    PageGeometry, SimpleFont,
};

use textmark_parse::{interpret, resolve_glyph};
use tracing::debug;

/// One page to extract.
#[derive(Clone, Copy)]
pub struct PageInput<'a> {
    /// Media box in PDF default user space.
    pub media_box: Rectangle,
    /// Declared `/Rotate`; normalized to 0, 90, 180 or 270.
    pub rotation: i32,
    /// Decoded content stream bytes.
    pub content: &'a [u8],
    /// Fonts referenced by `Tf` operators.
    pub fonts: &'a dyn FontResolver,
}

impl std::fmt::Debug for PageInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageInput")
            .field("media_box", &self.media_box)
            .field("rotation", &self.rotation)
            .field("content_len", &self.content.len())
            .finish_non_exhaustive()
    }
}

/// Places glyphs as they are shown and gathers warnings.
struct PageCollector<'o> {
    options: &'o ExtractOptions,
    glyphs: Vec<PlacedGlyph>,
    warnings: Vec<ExtractWarning>,
}

impl ContentHandler for PageCollector<'_> {
    fn on_glyph(&mut self, glyph: GlyphEvent) {
        if let Some(placed) = resolve_glyph(&glyph, self.options) {
            self.glyphs.push(placed);
        }
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        self.warnings.push(warning);
    }
}

/// Extract the logical text of one page together with its mark index.
///
/// Recoverable faults (unknown fonts, unmapped glyphs, malformed operators,
/// unbalanced `q`/`Q`) are returned as warnings next to the text.
///
/// # Errors
///
/// * [`TextError::StreamDecode`] if no operator could be read.
/// * [`TextError::NoTextObject`] if the page never begins a text object.
/// * [`TextError::ResourceLimitExceeded`] if the content is larger than
///   [`ExtractOptions::max_stream_bytes`].
/// * [`TextError::Other`] for the first warning when
///   [`ExtractOptions::strict_mode`] is set.
pub fn extract_page_text(
    page: &PageInput<'_>,
    options: &ExtractOptions,
) -> Result<ExtractResult<PageText>, TextError> {
    let geometry = PageGeometry::new(page.media_box, page.rotation);
    let mut collector = PageCollector {
        options,
        glyphs: Vec::new(),
        warnings: Vec::new(),
    };
    for warning in geometry.warnings {
        if options.strict_mode {
            return Err(warning.to_error());
        }
        if options.collect_warnings {
            collector.warnings.push(warning);
        }
    }
    let geometry = geometry.value;

    let summary = interpret(
        page.content,
        geometry.base_transform(),
        page.fonts,
        options,
        &mut collector,
    )?;

    let page_text = textmark_core::assemble(&collector.glyphs, &options.layout);
    debug!(
        rotation = geometry.rotation(),
        operators = summary.operators,
        glyphs = summary.glyphs,
        placed = collector.glyphs.len(),
        marks = page_text.marks().len(),
        chars = page_text.len(),
        warnings = collector.warnings.len(),
        "page text extracted"
    );
    Ok(ExtractResult::with_warnings(page_text, collector.warnings))
}

/// Extract several independent pages, in input order.
///
/// With the `parallel` feature the pages are processed concurrently on the
/// rayon thread pool.
pub fn extract_pages(
    pages: &[PageInput<'_>],
    options: &ExtractOptions,
) -> Vec<Result<ExtractResult<PageText>, TextError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        pages
            .par_iter()
            .map(|page| extract_page_text(page, options))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        pages
            .iter()
            .map(|page| extract_page_text(page, options))
            .collect()
    }
}
