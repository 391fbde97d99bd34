//! Text state for the content stream interpreter.
//!
//! Splits the PDF text state in two:
//! - [`TextParams`]: Tc, Tw, Tz, TL, Tf, Tr, Ts. Part of the graphics state,
//!   saved and restored by `q`/`Q`.
//! - [`TextObject`]: the text and line matrices, alive only between `BT`
//!   and `ET`. The interpreter holds an `Option<TextObject>`, so being
//!   outside a text object is simply `None`.

use textmark_core::Ctm;

/// Text rendering mode values (Tr operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRenderMode {
    /// Fill character glyphs (default).
    #[default]
    Fill = 0,
    /// Stroke (outline) character glyphs.
    Stroke = 1,
    /// Fill and stroke character glyphs.
    FillStroke = 2,
    /// Neither fill nor stroke (invisible text).
    Invisible = 3,
    /// Fill and add to clipping path.
    FillClip = 4,
    /// Stroke and add to clipping path.
    StrokeClip = 5,
    /// Fill, stroke, and add to clipping path.
    FillStrokeClip = 6,
    /// Add to clipping path only.
    Clip = 7,
}

impl TextRenderMode {
    /// Create a TextRenderMode from an integer value (0-7).
    /// Returns None for invalid values.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Fill),
            1 => Some(Self::Stroke),
            2 => Some(Self::FillStroke),
            3 => Some(Self::Invisible),
            4 => Some(Self::FillClip),
            5 => Some(Self::StrokeClip),
            6 => Some(Self::FillStrokeClip),
            7 => Some(Self::Clip),
            _ => None,
        }
    }

    /// Modes that paint nothing on the page.
    pub fn is_invisible(&self) -> bool {
        matches!(self, Self::Invisible | Self::Clip)
    }
}

/// Text state parameters that belong to the graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    /// Character spacing (Tc), unscaled text space units.
    pub char_spacing: f64,
    /// Word spacing (Tw), applied to single-byte code 32.
    pub word_spacing: f64,
    /// Horizontal scaling (Tz) as a percentage, 100 = normal.
    pub h_scaling: f64,
    /// Leading (TL) used by `T*`, `'` and `"`.
    pub leading: f64,
    /// Resource name of the font selected by `Tf`; empty before any `Tf`.
    pub font_name: String,
    pub font_size: f64,
    pub render_mode: TextRenderMode,
    /// Text rise (Ts).
    pub rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            render_mode: TextRenderMode::default(),
            rise: 0.0,
        }
    }
}

impl TextParams {
    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scale(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// `[Tfs·Th, 0, 0, Tfs, 0, Trise]`: glyph text space to text space.
    pub fn font_matrix(&self) -> Ctm {
        Ctm::new(
            self.font_size * self.h_scale(),
            0.0,
            0.0,
            self.font_size,
            0.0,
            self.rise,
        )
    }

    /// Horizontal displacement after showing a glyph of width `w0`
    /// (glyph units, 1/1000 em).
    ///
    /// `tx = ((w0/1000)·Tfs + Tc + Tw) · Th`, Tw only for word spaces.
    pub fn glyph_advance(&self, w0: f64, is_word_space: bool) -> f64 {
        let word = if is_word_space { self.word_spacing } else { 0.0 };
        ((w0 / 1000.0) * self.font_size + self.char_spacing + word) * self.h_scale()
    }

    /// Displacement for a TJ adjustment: `-(adj/1000)·Tfs·Th`.
    pub fn adjustment_advance(&self, adjustment: f64) -> f64 {
        -(adjustment / 1000.0) * self.font_size * self.h_scale()
    }
}

/// Matrices of an open text object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextObject {
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl Default for TextObject {
    fn default() -> Self {
        Self::new()
    }
}

impl TextObject {
    /// `BT`: both matrices start at identity.
    pub fn new() -> Self {
        Self {
            text_matrix: Ctm::identity(),
            line_matrix: Ctm::identity(),
        }
    }

    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    pub fn line_matrix(&self) -> &Ctm {
        &self.line_matrix
    }

    /// `Tm`: replace both matrices.
    pub fn set_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: offset the start of the line by `(tx, ty)`.
    pub fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Ctm::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `T*`: equivalent to `0 -TL Td`.
    pub fn next_line(&mut self, leading: f64) {
        self.move_line(0.0, -leading);
    }

    /// Move the pen along the baseline by `tx` text space units.
    pub fn advance(&mut self, tx: f64) {
        self.text_matrix = Ctm::translation(tx, 0.0).concat(&self.text_matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_matrix_approx(actual: &Ctm, expected: [f64; 6]) {
        for (a, e) in actual.to_array().iter().zip(expected) {
            assert_approx(*a, e);
        }
    }

    #[test]
    fn render_mode_from_i64() {
        assert_eq!(TextRenderMode::from_i64(0), Some(TextRenderMode::Fill));
        assert_eq!(TextRenderMode::from_i64(3), Some(TextRenderMode::Invisible));
        assert_eq!(TextRenderMode::from_i64(7), Some(TextRenderMode::Clip));
        assert_eq!(TextRenderMode::from_i64(8), None);
        assert_eq!(TextRenderMode::from_i64(-1), None);
    }

    #[test]
    fn render_mode_invisibility() {
        assert!(TextRenderMode::Invisible.is_invisible());
        assert!(TextRenderMode::Clip.is_invisible());
        assert!(!TextRenderMode::Fill.is_invisible());
        assert!(!TextRenderMode::StrokeClip.is_invisible());
    }

    #[test]
    fn params_defaults() {
        let p = TextParams::default();
        assert_approx(p.h_scaling, 100.0);
        assert_approx(p.h_scale(), 1.0);
        assert!(p.font_name.is_empty());
        assert_eq!(p.render_mode, TextRenderMode::Fill);
    }

    #[test]
    fn font_matrix_includes_scaling_and_rise() {
        let p = TextParams {
            font_size: 12.0,
            h_scaling: 50.0,
            rise: 3.0,
            ..TextParams::default()
        };
        assert_matrix_approx(&p.font_matrix(), [6.0, 0.0, 0.0, 12.0, 0.0, 3.0]);
    }

    #[test]
    fn glyph_advance_formula() {
        let p = TextParams {
            font_size: 10.0,
            char_spacing: 1.0,
            word_spacing: 2.0,
            h_scaling: 200.0,
            ..TextParams::default()
        };
        // ((600/1000)*10 + 1) * 2
        assert_approx(p.glyph_advance(600.0, false), 14.0);
        // word space adds Tw before scaling
        assert_approx(p.glyph_advance(600.0, true), 18.0);
    }

    #[test]
    fn adjustment_moves_left_for_positive_values() {
        let p = TextParams {
            font_size: 10.0,
            ..TextParams::default()
        };
        assert_approx(p.adjustment_advance(100.0), -1.0);
        assert_approx(p.adjustment_advance(-250.0), 2.5);
    }

    #[test]
    fn text_object_starts_at_identity() {
        let t = TextObject::new();
        assert_eq!(*t.text_matrix(), Ctm::identity());
        assert_eq!(*t.line_matrix(), Ctm::identity());
    }

    #[test]
    fn move_line_accumulates_from_line_start() {
        let mut t = TextObject::new();
        t.move_line(72.0, 720.0);
        t.advance(30.0);
        t.move_line(0.0, -25.0);
        // advance does not move the line start
        assert_matrix_approx(t.text_matrix(), [1.0, 0.0, 0.0, 1.0, 72.0, 695.0]);
    }

    #[test]
    fn move_line_in_rotated_matrix() {
        let mut t = TextObject::new();
        t.set_matrix(Ctm::new(0.0, 1.0, -1.0, 0.0, 100.0, 100.0));
        t.move_line(10.0, -5.0);
        // text space x runs along page y, text space y along page -x
        assert_matrix_approx(t.text_matrix(), [0.0, 1.0, -1.0, 0.0, 105.0, 110.0]);
    }

    #[test]
    fn next_line_uses_leading() {
        let mut t = TextObject::new();
        t.move_line(0.0, 100.0);
        t.next_line(14.0);
        assert_approx(t.text_matrix().f, 86.0);
        assert_approx(t.line_matrix().f, 86.0);
    }

    #[test]
    fn advance_moves_text_matrix_only() {
        let mut t = TextObject::new();
        t.set_matrix(Ctm::new(2.0, 0.0, 0.0, 2.0, 10.0, 20.0));
        t.advance(5.0);
        assert_matrix_approx(t.text_matrix(), [2.0, 0.0, 0.0, 2.0, 20.0, 20.0]);
        assert_matrix_approx(t.line_matrix(), [2.0, 0.0, 0.0, 2.0, 10.0, 20.0]);
    }
}
