//! Text showing operators (Tj, TJ, ', ") for the content stream interpreter.
//!
//! Splits shown strings into character codes through the active [`Font`],
//! snapshots the text matrix for each code and advances the pen.

use textmark_core::Ctm;

use crate::font::Font;
use crate::operator::TjElement;
use crate::text_state::{TextObject, TextParams};

/// A character code shown by a text operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownCode {
    pub code: u32,
    /// Number of string bytes the code used.
    pub code_len: usize,
    /// Text matrix at the moment the glyph was shown.
    pub text_matrix: Ctm,
    /// Pen advance in text space units:
    /// `((w0/1000)·Tfs + Tc + Tw_if_word_space) · Th`.
    pub displacement: f64,
}

/// `Tj`: show a string.
pub fn show_string(
    text: &mut TextObject,
    params: &TextParams,
    font: &dyn Font,
    mut bytes: &[u8],
) -> Vec<ShownCode> {
    let mut shown = Vec::with_capacity(bytes.len());
    while let Some((code, code_len)) = font.next_code(bytes) {
        // a code always consumes at least one byte
        let code_len = code_len.max(1);
        bytes = bytes.get(code_len..).unwrap_or_default();
        let displacement =
            params.glyph_advance(font.width(code), font.is_word_space(code, code_len));
        shown.push(ShownCode {
            code,
            code_len,
            text_matrix: *text.text_matrix(),
            displacement,
        });
        text.advance(displacement);
    }
    shown
}

/// `TJ`: show strings with positioning adjustments.
///
/// Positive adjustments move the pen left, negative ones right.
pub fn show_adjusted(
    text: &mut TextObject,
    params: &TextParams,
    font: &dyn Font,
    elements: &[TjElement],
) -> Vec<ShownCode> {
    let mut shown = Vec::new();
    for element in elements {
        match element {
            TjElement::Text(bytes) => shown.extend(show_string(text, params, font, bytes)),
            TjElement::Adjust(adj) => text.advance(params.adjustment_advance(*adj)),
        }
    }
    shown
}
