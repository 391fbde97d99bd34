//! Graphics state and the `q`/`Q` transform stack.
//!
//! Saving the graphics state is a scoped acquisition: [`TransformStack::enter`]
//! hands out a [`TransformScope`] guard that restores the saved state when
//! it is dropped, whichever way the scope is left. The interpreter recurses
//! on `q` and returns on `Q`, so nesting in the stream maps onto nesting of
//! guards.

use std::ops::{Deref, DerefMut};

use textmark_core::{Color, Ctm, Point};

use crate::color_space::ColorSpace;
use crate::operator::PaintTarget;
use crate::text_state::TextParams;

/// Every matrix and scalar that places one glyph, captured by value at
/// show time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSnapshot {
    /// PDF default space to the displayed page frame.
    pub base: Ctm,
    pub ctm: Ctm,
    pub text_matrix: Ctm,
    pub font_size: f64,
    /// Tz, in percent.
    pub h_scaling: f64,
    pub rise: f64,
}

impl TransformSnapshot {
    /// `[Tfs·Th, 0, 0, Tfs, 0, Trise]`.
    pub fn font_matrix(&self) -> Ctm {
        Ctm::new(
            self.font_size * self.h_scaling / 100.0,
            0.0,
            0.0,
            self.font_size,
            0.0,
            self.rise,
        )
    }

    /// Text space to displayed page frame: `Tm × CTM × Base`.
    pub fn text_to_page(&self) -> Ctm {
        self.text_matrix.concat(&self.ctm).concat(&self.base)
    }

    /// Em-unit glyph space to displayed page frame.
    pub fn render_matrix(&self) -> Ctm {
        self.font_matrix().concat(&self.text_to_page())
    }

    /// A text space displacement along the baseline, as a page vector.
    pub fn page_advance(&self, displacement: f64) -> Point {
        self.text_to_page()
            .transform_vector(Point::new(displacement, 0.0))
    }
}

/// The part of the graphics state that `q` saves and `Q` restores.
///
/// Text matrices live in the open text object and are not included.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphicsState {
    /// Current transformation matrix, user space to PDF default space.
    pub ctm: Ctm,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub fill_space: ColorSpace,
    pub stroke_space: ColorSpace,
    /// Tc, Tw, Tz, TL, Tf, Tr, Ts.
    pub text: TextParams,
}

impl GraphicsState {
    /// Color space currently selected for `target`.
    pub fn space(&self, target: PaintTarget) -> &ColorSpace {
        match target {
            PaintTarget::Fill => &self.fill_space,
            PaintTarget::Stroke => &self.stroke_space,
        }
    }

    /// Select a color space; the color resets to the space's initial color.
    pub fn set_space(&mut self, target: PaintTarget, space: ColorSpace) {
        let initial = space.initial_color();
        match target {
            PaintTarget::Fill => {
                self.fill_space = space;
                self.fill_color = initial;
            }
            PaintTarget::Stroke => {
                self.stroke_space = space;
                self.stroke_color = initial;
            }
        }
    }

    pub fn set_color(&mut self, target: PaintTarget, color: Color) {
        match target {
            PaintTarget::Fill => self.fill_color = color,
            PaintTarget::Stroke => self.stroke_color = color,
        }
    }
}

/// Current graphics state plus the fixed page base transform.
#[derive(Debug, Clone)]
pub struct TransformStack {
    base: Ctm,
    state: GraphicsState,
    depth: usize,
    max_depth: usize,
}

impl TransformStack {
    /// Start at the initial graphics state with at most `max_depth` nested
    /// saves.
    pub fn new(base: Ctm, max_depth: usize) -> Self {
        Self {
            base,
            state: GraphicsState::default(),
            depth: 0,
            max_depth,
        }
    }

    /// PDF default space to displayed page frame.
    pub fn base(&self) -> &Ctm {
        &self.base
    }

    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GraphicsState {
        &mut self.state
    }

    pub fn text(&self) -> &TextParams {
        &self.state.text
    }

    pub fn text_mut(&mut self) -> &mut TextParams {
        &mut self.state.text
    }

    /// Number of currently open scopes.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// `q`: save the graphics state until the returned guard is dropped.
    ///
    /// Returns `None` when the nesting limit is reached; the caller keeps
    /// working on the current state.
    pub fn enter(&mut self) -> Option<TransformScope<'_>> {
        if self.depth >= self.max_depth {
            return None;
        }
        self.depth += 1;
        let saved = self.state.clone();
        Some(TransformScope { stack: self, saved })
    }

    /// `cm`: pre-multiply `m` into the CTM.
    pub fn concat(&mut self, m: &Ctm) {
        self.state.ctm = m.concat(&self.state.ctm);
    }

    /// User space to displayed page frame.
    pub fn user_to_page(&self) -> Ctm {
        self.state.ctm.concat(&self.base)
    }

    /// Em-unit glyph space to displayed page frame:
    /// `[Tfs·Th, 0, 0, Tfs, 0, Trise] × Tm × CTM × Base`.
    pub fn font_to_page(&self, text_matrix: &Ctm) -> Ctm {
        self.snapshot(text_matrix).render_matrix()
    }

    /// Capture the transforms that place a glyph shown at `text_matrix`.
    pub fn snapshot(&self, text_matrix: &Ctm) -> TransformSnapshot {
        let text = &self.state.text;
        TransformSnapshot {
            base: self.base,
            ctm: self.state.ctm,
            text_matrix: *text_matrix,
            font_size: text.font_size,
            h_scaling: text.h_scaling,
            rise: text.rise,
        }
    }
}

/// Guard for one `q` ... `Q` scope.
///
/// Dereferences to the underlying [`TransformStack`]; dropping it restores
/// the graphics state saved on entry.
#[derive(Debug)]
pub struct TransformScope<'a> {
    stack: &'a mut TransformStack,
    saved: GraphicsState,
}

impl Deref for TransformScope<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.stack.state = std::mem::take(&mut self.saved);
        self.stack.depth -= 1;
    }
}
