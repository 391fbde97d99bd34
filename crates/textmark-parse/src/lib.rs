//! textmark-parse: Content stream interpretation and glyph geometry.
//!
//! Tokenizes page content streams, tracks the graphics and text state
//! through nested `q`/`Q` scopes and turns every shown glyph into a
//! [`PlacedGlyph`](textmark_core::PlacedGlyph) in the displayed page frame.
//! It depends on textmark-core for shared data types.

pub mod color_space;
pub mod error;
pub mod font;
pub mod font_metrics;
pub mod glyph_geometry;
pub mod handler;
pub mod interpreter;
pub mod operator;
pub mod page_geometry;
pub mod standard_fonts;
pub mod text_renderer;
pub mod text_state;
pub mod tokenizer;
pub mod transform;

pub use color_space::ColorSpace;
pub use error::InterpretError;
pub use font::{Font, FontResolver, FontResources, GlyphBox, SimpleFont};
pub use font_metrics::FontMetrics;
pub use glyph_geometry::resolve_glyph;
pub use handler::{CollectingHandler, ContentHandler, GlyphEvent};
pub use interpreter::{InterpretSummary, interpret};
pub use operator::{ContentOp, PaintTarget, TjElement};
pub use page_geometry::PageGeometry;
pub use text_state::{TextObject, TextParams, TextRenderMode};
pub use textmark_core;
pub use tokenizer::{Operand, Operator, Tokenized, tokenize, tokenize_lenient};
pub use transform::{GraphicsState, TransformScope, TransformSnapshot, TransformStack};
