//! Fonts as seen by the interpreter.
//!
//! The interpreter only needs four things from a font: how to split shown
//! bytes into character codes, the Unicode text of a code, its advance
//! width and its glyph box. [`Font`] captures exactly that; [`SimpleFont`]
//! is the implementation for single-byte and fixed two-byte fonts, and
//! [`FontResources`] maps resource names (`/F1`) to fonts.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use textmark_core::{FontEncoding, Point};

use crate::font_metrics::FontMetrics;
use crate::standard_fonts;

/// Glyph box in glyph space units (1/1000 em).
///
/// Spans horizontally from the origin to the advance width and vertically
/// from descent to ascent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl GlyphBox {
    /// The four corners in em units: lower-left, lower-right, upper-right,
    /// upper-left.
    pub fn corners(&self) -> [Point; 4] {
        let w = self.width / 1000.0;
        let top = self.ascent / 1000.0;
        let bottom = self.descent / 1000.0;
        [
            Point::new(0.0, bottom),
            Point::new(w, bottom),
            Point::new(w, top),
            Point::new(0.0, top),
        ]
    }
}

/// A font that can decode and measure shown strings.
pub trait Font: fmt::Debug + Send + Sync {
    /// Base font name, used in warnings and on marks.
    fn name(&self) -> &str;

    /// Split the next character code off `bytes`.
    ///
    /// Returns the code and the number of bytes it used, or `None` once
    /// `bytes` is empty. A length of 0 is read as 1.
    fn next_code(&self, bytes: &[u8]) -> Option<(u32, usize)>;

    /// Unicode text for a code; `None` when the font has no mapping.
    fn to_unicode(&self, code: u32) -> Option<String>;

    /// Advance width in glyph space units.
    fn width(&self, code: u32) -> f64;

    fn glyph_box(&self, code: u32) -> GlyphBox;

    /// Whether word spacing (Tw) applies: single-byte code 32 only.
    fn is_word_space(&self, code: u32, code_len: usize) -> bool {
        code == 32 && code_len == 1
    }
}

/// Resolves font resource names for a page.
pub trait FontResolver: Send + Sync {
    fn font(&self, name: &str) -> Option<&dyn Font>;
}

/// A simple (non-composite) font, or a composite font with fixed two-byte
/// codes.
#[derive(Debug, Clone)]
pub struct SimpleFont {
    name: String,
    metrics: FontMetrics,
    encoding: FontEncoding,
    to_unicode: HashMap<u32, String>,
    two_byte: bool,
}

impl SimpleFont {
    pub fn new(name: impl Into<String>, metrics: FontMetrics, encoding: FontEncoding) -> Self {
        Self {
            name: name.into(),
            metrics,
            encoding,
            to_unicode: HashMap::new(),
            two_byte: false,
        }
    }

    /// One of the built-in Courier, Helvetica or Times fonts with
    /// WinAnsiEncoding.
    pub fn standard(name: &str) -> Option<Self> {
        let data = standard_fonts::lookup(name)?;
        Some(Self::new(
            name,
            FontMetrics::from_standard(data),
            FontEncoding::win_ansi(),
        ))
    }

    /// Stand-in for a font that could not be resolved: default metrics and
    /// Latin-1 decoding.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self::new(name, FontMetrics::default_metrics(), FontEncoding::latin1())
    }

    /// Add ToUnicode mappings, which take priority over the encoding.
    pub fn with_to_unicode<S: Into<String>>(
        mut self,
        entries: impl IntoIterator<Item = (u32, S)>,
    ) -> Self {
        self.to_unicode
            .extend(entries.into_iter().map(|(code, text)| (code, text.into())));
        self
    }

    /// Read codes as big-endian byte pairs.
    pub fn with_two_byte_codes(mut self) -> Self {
        self.two_byte = true;
        self
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn encoding(&self) -> &FontEncoding {
        &self.encoding
    }
}

impl Font for SimpleFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_code(&self, bytes: &[u8]) -> Option<(u32, usize)> {
        match bytes {
            [] => None,
            [hi, lo, ..] if self.two_byte => Some(((u32::from(*hi) << 8) | u32::from(*lo), 2)),
            [b, ..] => Some((u32::from(*b), 1)),
        }
    }

    fn to_unicode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.get(&code) {
            return Some(text.clone());
        }
        if self.two_byte {
            return None;
        }
        u8::try_from(code)
            .ok()
            .and_then(|b| self.encoding.decode(b))
            .map(String::from)
    }

    fn width(&self, code: u32) -> f64 {
        self.metrics.width(code)
    }

    fn glyph_box(&self, code: u32) -> GlyphBox {
        GlyphBox {
            width: self.metrics.width(code),
            ascent: self.metrics.ascent(),
            descent: self.metrics.descent(),
        }
    }
}

/// Page font resources by name.
#[derive(Debug, Clone, Default)]
pub struct FontResources {
    fonts: HashMap<String, Arc<dyn Font>>,
}

impl FontResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font under a resource name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, font: impl Font + 'static) {
        self.fonts.insert(name.into(), Arc::new(font));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, font: impl Font + 'static) -> Self {
        self.insert(name, font);
        self
    }

    /// Register an already shared font.
    pub fn insert_shared(&mut self, name: impl Into<String>, font: Arc<dyn Font>) {
        self.fonts.insert(name.into(), font);
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl FontResolver for FontResources {
    fn font(&self, name: &str) -> Option<&dyn Font> {
        self.fonts.get(name).map(|f| f.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(font: &dyn Font, mut bytes: &[u8]) -> Vec<u32> {
        let mut out = Vec::new();
        while let Some((code, len)) = font.next_code(bytes) {
            out.push(code);
            bytes = &bytes[len..];
        }
        out
    }

    #[test]
    fn standard_helvetica() {
        let helv = SimpleFont::standard("Helvetica").unwrap();
        assert_eq!(helv.name(), "Helvetica");
        assert_eq!(helv.width(u32::from(b'e')), 556.0);
        assert_eq!(helv.to_unicode(0xB4).as_deref(), Some("\u{00B4}"));
        let gb = helv.glyph_box(u32::from(b'e'));
        assert_eq!((gb.width, gb.ascent, gb.descent), (556.0, 718.0, -207.0));
        assert!(SimpleFont::standard("Garamond").is_none());
    }

    #[test]
    fn single_byte_codes() {
        let font = SimpleFont::standard("Courier").unwrap();
        assert_eq!(codes(&font, b"Hi!"), vec![72, 105, 33]);
        assert_eq!(font.next_code(b""), None);
    }

    #[test]
    fn two_byte_codes() {
        let font = SimpleFont::fallback("F0").with_two_byte_codes();
        assert_eq!(codes(&font, &[0x00, 0x41, 0x12, 0x34, 0x07]), vec![0x41, 0x1234, 0x07]);
        // two-byte fonts need a ToUnicode entry
        assert_eq!(font.to_unicode(0x41), None);
        assert!(!font.is_word_space(32, 2));
    }

    #[test]
    fn to_unicode_overrides_encoding() {
        let font = SimpleFont::standard("Times-Roman")
            .unwrap()
            .with_to_unicode([(1, "fi"), (u32::from(b'A'), "Ä")]);
        assert_eq!(font.to_unicode(1).as_deref(), Some("fi"));
        assert_eq!(font.to_unicode(u32::from(b'A')).as_deref(), Some("Ä"));
        assert_eq!(font.to_unicode(u32::from(b'B')).as_deref(), Some("B"));
    }

    #[test]
    fn unmapped_codes() {
        let font = SimpleFont::standard("Helvetica").unwrap();
        assert_eq!(font.to_unicode(0x81), None);
        assert_eq!(font.to_unicode(0x1_0000), None);
    }

    #[test]
    fn fallback_uses_latin1_and_default_metrics() {
        let font = SimpleFont::fallback("Missing");
        assert_eq!(font.to_unicode(0xE9).as_deref(), Some("é"));
        assert_eq!(font.width(65), 600.0);
        let gb = font.glyph_box(65);
        assert_eq!((gb.ascent, gb.descent), (750.0, -250.0));
    }

    #[test]
    fn word_space_is_single_byte_32() {
        let font = SimpleFont::fallback("F");
        assert!(font.is_word_space(32, 1));
        assert!(!font.is_word_space(33, 1));
    }

    #[test]
    fn glyph_box_corners() {
        let gb = GlyphBox {
            width: 500.0,
            ascent: 750.0,
            descent: -250.0,
        };
        let [ll, lr, ur, ul] = gb.corners();
        assert_eq!((ll.x, ll.y), (0.0, -0.25));
        assert_eq!((lr.x, lr.y), (0.5, -0.25));
        assert_eq!((ur.x, ur.y), (0.5, 0.75));
        assert_eq!((ul.x, ul.y), (0.0, 0.75));
    }

    #[test]
    fn resources_resolve_by_name() {
        let fonts = FontResources::new()
            .with("F1", SimpleFont::standard("Helvetica").unwrap())
            .with("F2", SimpleFont::standard("Courier").unwrap());
        assert_eq!(fonts.len(), 2);
        assert_eq!(fonts.font("F1").map(|f| f.name()), Some("Helvetica"));
        assert!(fonts.font("F3").is_none());
    }
}
