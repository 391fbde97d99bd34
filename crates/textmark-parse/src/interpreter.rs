//! Content stream interpreter.
//!
//! Tokenizes a page's content leniently, converts each operator to a
//! [`ContentOp`] and runs it against the graphics state, emitting a
//! [`GlyphEvent`] per shown glyph and an [`ExtractWarning`] per
//! recoverable fault to a [`ContentHandler`].
//!
//! `q` recurses into a new scope holding a
//! [`TransformScope`](crate::transform::TransformScope) guard and `Q`
//! returns from it, so the saved state is restored on every exit path,
//! including errors and streams that end inside a `q`.

use std::collections::HashMap;
use std::iter::Enumerate;
use std::slice::Iter;
use std::sync::Arc;

use textmark_core::{Color, Ctm, ExtractOptions, ExtractWarning, ExtractWarningCode, TextError};
use tracing::{debug, trace, warn};

use crate::color_space::ColorSpace;
use crate::error::InterpretError;
use crate::font::{Font, FontResolver, SimpleFont};
use crate::handler::{ContentHandler, GlyphEvent};
use crate::operator::{ContentOp, TjElement};
use crate::text_renderer::{show_adjusted, show_string};
use crate::text_state::{TextObject, TextRenderMode};
use crate::tokenizer::{Operator, tokenize_lenient};
use crate::transform::TransformStack;

/// Counters reported after a stream has been interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterpretSummary {
    /// Operators recovered from the stream.
    pub operators: usize,
    /// Glyph events emitted.
    pub glyphs: usize,
    /// Warnings raised, whether or not they were collected.
    pub warnings: usize,
}

/// Interpret one page's content stream.
///
/// `base` maps PDF default space to the displayed page frame.
///
/// # Errors
///
/// * [`TextError::ResourceLimitExceeded`] when the content is larger than
///   `max_stream_bytes`.
/// * [`TextError::StreamDecode`] when the stream has malformed tokens and
///   no operator could be recovered.
/// * [`TextError::NoTextObject`] when no `BT` was ever run.
/// * [`TextError::Other`] for the first warning in strict mode.
pub fn interpret(
    content: &[u8],
    base: Ctm,
    fonts: &dyn FontResolver,
    options: &ExtractOptions,
    handler: &mut dyn ContentHandler,
) -> Result<InterpretSummary, InterpretError> {
    if content.len() > options.max_stream_bytes {
        return Err(TextError::ResourceLimitExceeded {
            limit_name: "max_stream_bytes".to_string(),
            limit_value: options.max_stream_bytes,
            actual_value: content.len(),
        }
        .into());
    }

    let tokenized = tokenize_lenient(content);
    if tokenized.operators.is_empty() {
        if let Some(fault) = tokenized.faults.first() {
            return Err(TextError::StreamDecode(fault.to_string()).into());
        }
    }

    let mut interpreter = Interpreter {
        fonts,
        options,
        handler,
        missing_fonts: HashMap::new(),
        text: None,
        entered_text: false,
        pending_new_line: false,
        glyph_limit_hit: false,
        ignored_saves: 0,
        summary: InterpretSummary {
            operators: tokenized.operators.len(),
            ..InterpretSummary::default()
        },
    };

    for fault in tokenized.faults {
        let warning = match fault {
            InterpretError::Tokenize { offset, message } => {
                ExtractWarning::with_code(ExtractWarningCode::StreamDecode, message).at_byte(offset)
            }
            other => ExtractWarning::with_code(ExtractWarningCode::StreamDecode, other.to_string()),
        };
        interpreter.warn(warning)?;
    }

    let mut stack = TransformStack::new(base, options.max_state_depth);
    let mut ops = tokenized.operators.iter().enumerate();
    interpreter.run_scope(&mut stack, &mut ops)?;

    if !interpreter.entered_text {
        return Err(TextError::NoTextObject.into());
    }
    if interpreter.text.is_some() {
        interpreter.warn(ExtractWarning::with_code(
            ExtractWarningCode::UnbalancedState,
            "text object not closed by ET",
        ))?;
    }

    let summary = interpreter.summary;
    debug!(
        operators = summary.operators,
        glyphs = summary.glyphs,
        warnings = summary.warnings,
        "content stream interpreted"
    );
    Ok(summary)
}

type Ops<'s> = Enumerate<Iter<'s, Operator>>;

/// The string operand of a text showing operator.
enum Shown<'o> {
    Plain(&'o [u8]),
    Adjusted(&'o [TjElement]),
}

struct Interpreter<'a> {
    fonts: &'a dyn FontResolver,
    options: &'a ExtractOptions,
    handler: &'a mut dyn ContentHandler,
    /// Stand-ins for font names the resolver does not know.
    missing_fonts: HashMap<String, Arc<SimpleFont>>,
    /// `Some` between `BT` and `ET`.
    text: Option<TextObject>,
    entered_text: bool,
    pending_new_line: bool,
    glyph_limit_hit: bool,
    /// `q` operators refused at the depth limit whose `Q` is still due.
    ignored_saves: usize,
    summary: InterpretSummary,
}

impl<'a> Interpreter<'a> {
    /// Run operators until the matching `Q` or the end of the stream.
    fn run_scope(&mut self, stack: &mut TransformStack, ops: &mut Ops<'_>) -> Result<(), InterpretError> {
        while let Some((index, raw)) = ops.next() {
            let op = match ContentOp::parse(raw) {
                Ok(op) => op,
                Err(err) => {
                    self.warn(
                        ExtractWarning::with_code(ExtractWarningCode::MalformedOperator, err.to_string())
                            .at_operator(index)
                            .at_byte(raw.offset),
                    )?;
                    continue;
                }
            };

            if op.requires_text_object() && self.text.is_none() {
                self.warn(
                    ExtractWarning::with_code(
                        ExtractWarningCode::TextOutsideTextObject,
                        format!("`{}` outside BT/ET", raw.name),
                    )
                    .at_operator(index),
                )?;
                continue;
            }

            match op {
                ContentOp::Save => match stack.enter() {
                    Some(mut scope) => self.run_scope(&mut scope, ops)?,
                    None => {
                        self.ignored_saves += 1;
                        self.warn(
                            ExtractWarning::with_code(
                                ExtractWarningCode::UnbalancedState,
                                format!("`q` nesting exceeds {}, ignored", self.options.max_state_depth),
                            )
                            .at_operator(index),
                        )?;
                    }
                },
                ContentOp::Restore => {
                    if self.ignored_saves > 0 {
                        self.ignored_saves -= 1;
                    } else if stack.depth() == 0 {
                        self.warn(
                            ExtractWarning::with_code(
                                ExtractWarningCode::UnbalancedState,
                                "`Q` without matching `q`",
                            )
                            .at_operator(index),
                        )?;
                    } else {
                        return Ok(());
                    }
                }
                ContentOp::BeginText => {
                    if self.text.is_some() {
                        self.warn(
                            ExtractWarning::with_code(
                                ExtractWarningCode::UnbalancedState,
                                "`BT` inside a text object, matrices reset",
                            )
                            .at_operator(index),
                        )?;
                    }
                    self.text = Some(TextObject::new());
                    self.entered_text = true;
                }
                ContentOp::EndText => {
                    if self.text.take().is_none() {
                        self.warn(
                            ExtractWarning::with_code(
                                ExtractWarningCode::UnbalancedState,
                                "`ET` outside a text object",
                            )
                            .at_operator(index),
                        )?;
                    }
                }
                ContentOp::SetFont { name, size } => {
                    self.select_font(stack, name, size, index)?;
                }
                ContentOp::SetTextMatrix(m) => {
                    if let Some(text) = self.text.as_mut() {
                        text.set_matrix(m);
                    }
                }
                ContentOp::MoveText { tx, ty } => {
                    if let Some(text) = self.text.as_mut() {
                        text.move_line(tx, ty);
                    }
                }
                ContentOp::MoveTextSetLeading { tx, ty } => {
                    stack.text_mut().leading = -ty;
                    if let Some(text) = self.text.as_mut() {
                        text.move_line(tx, ty);
                    }
                }
                ContentOp::NextLine => self.next_line(stack),
                ContentOp::ShowText(bytes) => self.show(stack, Shown::Plain(&bytes), index)?,
                ContentOp::ShowTextAdjusted(elements) => {
                    self.show(stack, Shown::Adjusted(&elements), index)?;
                }
                ContentOp::NextLineShowText(bytes) => {
                    self.next_line(stack);
                    self.show(stack, Shown::Plain(&bytes), index)?;
                }
                ContentOp::NextLineShowTextSpaced {
                    word_spacing,
                    char_spacing,
                    text,
                } => {
                    stack.text_mut().word_spacing = word_spacing;
                    stack.text_mut().char_spacing = char_spacing;
                    self.next_line(stack);
                    self.show(stack, Shown::Plain(&text), index)?;
                }
                ContentOp::SetCharSpacing(v) => stack.text_mut().char_spacing = v,
                ContentOp::SetWordSpacing(v) => stack.text_mut().word_spacing = v,
                ContentOp::SetHorizontalScaling(v) => stack.text_mut().h_scaling = v,
                ContentOp::SetLeading(v) => stack.text_mut().leading = v,
                ContentOp::SetRise(v) => stack.text_mut().rise = v,
                ContentOp::SetRenderMode(mode) => match TextRenderMode::from_i64(mode) {
                    Some(mode) => stack.text_mut().render_mode = mode,
                    None => self.warn(
                        ExtractWarning::with_code(
                            ExtractWarningCode::MalformedOperator,
                            format!("invalid text rendering mode {mode}"),
                        )
                        .at_operator(index),
                    )?,
                },
                ContentOp::ConcatMatrix(m) => stack.concat(&m),
                ContentOp::SetColorSpace { target, space } => {
                    if let ColorSpace::Unsupported(name) = &space {
                        self.warn(unsupported_space(name, index))?;
                    }
                    stack.state_mut().set_space(target, space);
                }
                ContentOp::SetColor { target, components } => {
                    let space = stack.state().space(target).clone();
                    let color = match space.resolve(&components) {
                        Some(color) => color,
                        None => {
                            if let ColorSpace::Unsupported(name) = &space {
                                self.warn(unsupported_space(name, index))?;
                            }
                            Color::black()
                        }
                    };
                    stack.state_mut().set_color(target, color);
                }
                ContentOp::SetDeviceColor {
                    target,
                    space,
                    components,
                } => {
                    let color = space.resolve(&components).unwrap_or_default();
                    let state = stack.state_mut();
                    state.set_space(target, space);
                    state.set_color(target, color);
                }
                ContentOp::Ignored(_) => {}
            }
        }
        if stack.depth() > 0 {
            debug!(depth = stack.depth(), "stream ended inside `q`");
        }
        Ok(())
    }

    /// `Tf`: unknown names get a stand-in font and a warning.
    fn select_font(
        &mut self,
        stack: &mut TransformStack,
        name: String,
        size: f64,
        index: usize,
    ) -> Result<(), InterpretError> {
        if self.fonts.font(&name).is_none() && !self.missing_fonts.contains_key(&name) {
            self.missing_fonts
                .insert(name.clone(), Arc::new(SimpleFont::fallback(name.clone())));
            self.warn(
                ExtractWarning::with_code(ExtractWarningCode::MissingFont, "font not found, using default metrics")
                    .at_operator(index)
                    .with_font(name.clone()),
            )?;
        }
        debug!(font = %name, size, "font selected");
        let params = stack.text_mut();
        params.font_name = name;
        params.font_size = size;
        Ok(())
    }

    /// `T*`; the next glyph starts a line whatever the leading.
    fn next_line(&mut self, stack: &TransformStack) {
        let leading = stack.text().leading;
        if let Some(text) = self.text.as_mut() {
            text.next_line(leading);
        }
        self.pending_new_line = true;
    }

    /// The active font; names never seen in `Tf` fall back like unknown ones.
    fn active_font(&mut self, name: &str, index: usize) -> Result<FontHandle<'a>, InterpretError> {
        let fonts: &'a dyn FontResolver = self.fonts;
        if let Some(font) = fonts.font(name) {
            return Ok(FontHandle::Resolved(font));
        }
        if let Some(font) = self.missing_fonts.get(name) {
            return Ok(FontHandle::Fallback(Arc::clone(font)));
        }
        let font = Arc::new(SimpleFont::fallback(name));
        self.missing_fonts.insert(name.to_string(), Arc::clone(&font));
        let description = if name.is_empty() {
            "text shown before any font was selected"
        } else {
            "font not found, using default metrics"
        };
        self.warn(
            ExtractWarning::with_code(ExtractWarningCode::MissingFont, description)
                .at_operator(index)
                .with_font(name),
        )?;
        Ok(FontHandle::Fallback(font))
    }

    fn show(&mut self, stack: &TransformStack, shown: Shown<'_>, index: usize) -> Result<(), InterpretError> {
        let params = stack.text().clone();
        let handle = self.active_font(&params.font_name, index)?;
        let font = handle.font();

        let Some(text) = self.text.as_mut() else {
            return Ok(());
        };
        let codes = match shown {
            Shown::Plain(bytes) => show_string(text, &params, font, bytes),
            Shown::Adjusted(elements) => show_adjusted(text, &params, font, elements),
        };

        let state = stack.state();
        for shown_code in codes {
            if self.summary.glyphs >= self.options.max_glyphs_per_page {
                if !self.glyph_limit_hit {
                    self.glyph_limit_hit = true;
                    self.warn(
                        ExtractWarning::with_code(
                            ExtractWarningCode::ResourceLimitReached,
                            format!(
                                "glyph limit of {} reached, further glyphs dropped",
                                self.options.max_glyphs_per_page
                            ),
                        )
                        .at_operator(index),
                    )?;
                }
                break;
            }
            self.summary.glyphs += 1;

            let (glyph_text, unmapped) = match font.to_unicode(shown_code.code) {
                Some(t) => (Some(t), false),
                None => {
                    self.warn(
                        ExtractWarning::with_code(
                            ExtractWarningCode::UnmappedGlyph,
                            format!("no Unicode mapping for code {:#06x}", shown_code.code),
                        )
                        .at_operator(index)
                        .with_font(font.name()),
                    )?;
                    (self.options.replacement_char.map(String::from), true)
                }
            };

            let transform = stack.snapshot(&shown_code.text_matrix);
            let event = GlyphEvent {
                code: shown_code.code,
                text: glyph_text,
                unmapped,
                font_name: font.name().to_string(),
                font_size: params.font_size,
                glyph_box: font.glyph_box(shown_code.code),
                transform,
                render_matrix: transform.render_matrix(),
                advance: transform.page_advance(shown_code.displacement),
                fill_color: state.fill_color.clone(),
                stroke_color: state.stroke_color.clone(),
                render_mode: params.render_mode,
                invisible: params.render_mode.is_invisible(),
                new_line: std::mem::take(&mut self.pending_new_line),
                operator_index: index,
            };
            if self.options.trace_glyphs {
                trace!(
                    code = event.code,
                    text = ?event.text,
                    x = event.render_matrix.e,
                    y = event.render_matrix.f,
                    "glyph"
                );
            }
            self.handler.on_glyph(event);
        }
        Ok(())
    }

    /// Report a recoverable fault; strict mode turns it into an error.
    fn warn(&mut self, warning: ExtractWarning) -> Result<(), InterpretError> {
        warn!(code = %warning.code, "{}", warning);
        if self.options.strict_mode {
            return Err(warning.to_error().into());
        }
        self.summary.warnings += 1;
        if self.options.collect_warnings {
            self.handler.on_warning(warning);
        }
        Ok(())
    }
}

/// A font borrowed from the page resources or a stand-in owned here.
enum FontHandle<'f> {
    Resolved(&'f dyn Font),
    Fallback(Arc<SimpleFont>),
}

impl FontHandle<'_> {
    fn font(&self) -> &dyn Font {
        match self {
            FontHandle::Resolved(font) => *font,
            FontHandle::Fallback(font) => font.as_ref(),
        }
    }
}

fn unsupported_space(name: &str, index: usize) -> ExtractWarning {
    ExtractWarning::with_code(
        ExtractWarningCode::UnsupportedColorspace,
        format!("color space `{name}` not supported, using black"),
    )
    .at_operator(index)
}
