use crate::color::Color;
use crate::geometry::{Point, Rectangle};

/// Reading direction of a glyph baseline, quantized to quarter turns.
///
/// Angles are measured counter-clockwise in default page space: text
/// running up the page is `Deg90`, upside-down text is `Deg180`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    /// Quantize a baseline direction vector `(dx, dy)`.
    ///
    /// Ties between axes favour the horizontal reading.
    pub fn from_direction(dx: f64, dy: f64) -> Self {
        if dx.abs() >= dy.abs() {
            if dx >= 0.0 {
                Orientation::Deg0
            } else {
                Orientation::Deg180
            }
        } else if dy > 0.0 {
            Orientation::Deg90
        } else {
            Orientation::Deg270
        }
    }

    pub fn degrees(&self) -> i32 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// Rotate a page-space point into the frame where this orientation
    /// reads left to right with y growing upwards.
    pub fn to_upright(&self, p: Point) -> Point {
        match self {
            Orientation::Deg0 => p,
            Orientation::Deg90 => Point::new(p.y, -p.x),
            Orientation::Deg180 => Point::new(-p.x, -p.y),
            Orientation::Deg270 => Point::new(-p.y, p.x),
        }
    }

    /// [`to_upright`](Self::to_upright) applied to a rectangle.
    pub fn upright_rect(&self, r: &Rectangle) -> Rectangle {
        let a = self.to_upright(Point::new(r.llx, r.lly));
        let b = self.to_upright(Point::new(r.urx, r.ury));
        Rectangle::new(a.x, a.y, b.x, b.y)
    }
}

/// A glyph placed in default page space, ready for assembly.
///
/// Produced by the geometry resolver from an interpreter glyph event.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    /// Decoded text after normalization (may hold several chars).
    pub text: String,
    /// Decoded text as the font reported it.
    pub original: String,
    /// Page-space bounding box of the glyph.
    pub bbox: Rectangle,
    /// Baseline start in page space.
    pub origin: Point,
    /// Baseline end (origin plus glyph advance) in page space.
    pub end: Point,
    /// Rendered size of the font in page units.
    pub size: f64,
    pub orientation: Orientation,
    pub font_name: String,
    /// Font size operand of the active `Tf`.
    pub font_size: f64,
    pub fill_color: Color,
    pub stroke_color: Color,
    /// Rendered with mode 3 or 7 (no paint).
    pub invisible: bool,
    /// An explicit next-line operator preceded this glyph.
    pub new_line: bool,
}

/// One unit of correspondence between page text and page geometry.
///
/// A mark covers `text.chars().count()` chars starting at `offset`.
/// Meta marks stand for separators inserted during assembly and carry
/// no bounding box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextMark {
    /// Starting position in the page text, counted in chars.
    pub offset: usize,
    /// The substring this mark stands for.
    pub text: String,
    /// Decoded glyph text before normalization and diacritic merging.
    pub original: String,
    /// Page-space bounding box; `None` for meta marks.
    pub bbox: Option<Rectangle>,
    /// True for separators that no glyph produced.
    pub meta: bool,
    pub font_name: String,
    pub font_size: f64,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub orientation: Orientation,
    pub invisible: bool,
}

impl TextMark {
    /// Mark backed by a placed glyph.
    pub fn from_glyph(offset: usize, text: String, glyph: &PlacedGlyph) -> Self {
        Self {
            offset,
            text,
            original: glyph.original.clone(),
            bbox: Some(glyph.bbox),
            meta: false,
            font_name: glyph.font_name.clone(),
            font_size: glyph.font_size,
            fill_color: glyph.fill_color.clone(),
            stroke_color: glyph.stroke_color.clone(),
            orientation: glyph.orientation,
            invisible: glyph.invisible,
        }
    }

    /// Separator mark (`" "` or `"\n"`) inserted by the assembler.
    pub fn separator(offset: usize, text: &str, orientation: Orientation) -> Self {
        Self {
            offset,
            text: text.to_string(),
            original: String::new(),
            bbox: None,
            meta: true,
            font_name: String::new(),
            font_size: 0.0,
            fill_color: Color::black(),
            stroke_color: Color::black(),
            orientation,
            invisible: false,
        }
    }

    /// Number of chars this mark covers.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// One past the last covered char.
    pub fn end_offset(&self) -> usize {
        self.offset + self.char_len()
    }
}

impl std::fmt::Display for TextMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} @{}", self.text, self.offset)?;
        match self.bbox {
            Some(b) => write!(
                f,
                " ({:.2},{:.2},{:.2},{:.2})",
                b.llx, b.lly, b.urx, b.ury
            )?,
            None => f.write_str(" (meta)")?,
        }
        if self.invisible {
            f.write_str(" [invisible]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_from_direction() {
        assert_eq!(Orientation::from_direction(1.0, 0.0), Orientation::Deg0);
        assert_eq!(Orientation::from_direction(0.0, 1.0), Orientation::Deg90);
        assert_eq!(Orientation::from_direction(-1.0, 0.1), Orientation::Deg180);
        assert_eq!(Orientation::from_direction(0.2, -1.0), Orientation::Deg270);
        assert_eq!(Orientation::from_direction(1.0, 1.0), Orientation::Deg0);
    }

    #[test]
    fn upright_frame_reads_left_to_right() {
        // text running up the page: later glyphs have larger y
        let o = Orientation::Deg90;
        let a = o.to_upright(Point::new(100.0, 10.0));
        let b = o.to_upright(Point::new(100.0, 20.0));
        assert!(b.x > a.x);
        // glyph tops point towards -x, so the next line sits further right
        let next_line = o.to_upright(Point::new(120.0, 10.0));
        assert!(next_line.y < a.y);
    }

    #[test]
    fn upright_frame_for_upside_down_text() {
        let o = Orientation::Deg180;
        let a = o.to_upright(Point::new(100.0, 10.0));
        let b = o.to_upright(Point::new(90.0, 10.0));
        assert!(b.x > a.x);
        assert_eq!(o.degrees(), 180);
    }

    #[test]
    fn upright_rect_normalizes() {
        let r = Orientation::Deg270.upright_rect(&Rectangle::new(0.0, 0.0, 2.0, 4.0));
        assert_eq!(r, Rectangle::new(-4.0, 0.0, 0.0, 2.0));
    }

    #[test]
    fn separator_mark_has_no_geometry() {
        let m = TextMark::separator(5, " ", Orientation::Deg0);
        assert!(m.meta);
        assert!(m.bbox.is_none());
        assert_eq!(m.end_offset(), 6);
        assert_eq!(m.to_string(), "\" \" @5 (meta)");
    }

    #[test]
    fn mark_char_len_counts_chars_not_bytes() {
        let mut m = TextMark::separator(0, " ", Orientation::Deg0);
        m.text = "\u{00E9}".to_string();
        assert_eq!(m.char_len(), 1);
        m.text = "ffi".to_string();
        assert_eq!(m.end_offset(), 3);
    }
}
