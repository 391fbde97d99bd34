//! Content handler callback trait for content stream interpretation.
//!
//! The interpreter reports every shown glyph and every recoverable fault
//! to a [`ContentHandler`]. What happens next (geometry, assembly,
//! collecting warnings) is up to the handler.

use textmark_core::{Color, Ctm, ExtractWarning, Point};

use crate::font::GlyphBox;
use crate::text_state::TextRenderMode;
use crate::transform::TransformSnapshot;

/// Information about one shown glyph.
///
/// Carries everything the geometry resolver needs: the glyph box in glyph
/// space and the matrix that maps em-unit glyph space to the displayed page.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphEvent {
    /// The character code from the content stream.
    pub code: u32,
    /// Decoded text; the replacement text for unmapped codes, `None` when
    /// an unmapped glyph is to be left out of the text.
    pub text: Option<String>,
    /// True when the font had no Unicode mapping for `code`.
    pub unmapped: bool,
    /// Font name as reported by the font (e.g., "Helvetica").
    pub font_name: String,
    /// Font size operand of `Tf`.
    pub font_size: f64,
    pub glyph_box: GlyphBox,
    /// Transforms in effect when the glyph was shown.
    pub transform: TransformSnapshot,
    /// `transform.render_matrix()`: em-unit glyph space to the displayed
    /// page frame.
    pub render_matrix: Ctm,
    /// Pen displacement after this glyph, as a displayed-page vector.
    pub advance: Point,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub render_mode: TextRenderMode,
    /// Rendering mode paints nothing (3 or 7).
    pub invisible: bool,
    /// A next-line operator (`T*`, `'`, `"`) ran
    /// since the previous glyph.
    pub new_line: bool,
    /// Index of the showing operator in the stream.
    pub operator_index: usize,
}

/// Callback handler for content stream interpretation.
///
/// Both methods have default no-op implementations, so handlers subscribe
/// only to what they need.
pub trait ContentHandler {
    /// Called for each shown glyph, in stream order.
    fn on_glyph(&mut self, _glyph: GlyphEvent) {}

    /// Called for each recoverable fault.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}

/// Handler that records everything, mostly useful in tests.
#[derive(Debug, Default)]
pub struct CollectingHandler {
    pub glyphs: Vec<GlyphEvent>,
    pub warnings: Vec<ExtractWarning>,
}

impl CollectingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenated glyph text.
    pub fn text(&self) -> String {
        self.glyphs
            .iter()
            .filter_map(|g| g.text.as_deref())
            .collect()
    }
}

impl ContentHandler for CollectingHandler {
    fn on_glyph(&mut self, glyph: GlyphEvent) {
        self.glyphs.push(glyph);
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        self.warnings.push(warning);
    }
}
