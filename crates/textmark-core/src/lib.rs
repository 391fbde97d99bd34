//! textmark-core: Backend-independent data types and algorithms.
//!
//! This crate provides the foundational types ([`Rectangle`], [`Ctm`],
//! [`TextMark`], [`PageText`]) and algorithms (logical text assembly,
//! range queries, term search) used by textmark. It knows nothing about
//! content streams; glyphs arrive already placed in page space.

pub mod assembler;
pub mod color;
pub mod encoding;
pub mod error;
pub mod geometry;
pub mod marks;
pub mod search;
pub mod text;
pub mod unicode_norm;

pub use assembler::assemble;
pub use color::Color;
pub use encoding::{FontEncoding, glyph_name_to_char};
pub use error::{
    ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, LayoutOptions, TextError,
};
pub use geometry::{Ctm, Point, Rectangle};
pub use marks::{PageText, TextMarkArray};
pub use search::{SearchOptions, TermMatch, search_text};
pub use text::{Orientation, PlacedGlyph, TextMark};
pub use unicode_norm::UnicodeNorm;
