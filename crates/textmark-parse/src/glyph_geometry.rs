//! Glyph geometry: glyph events to placed glyphs.
//!
//! Maps the glyph box corners and the baseline through the render matrix.
//! The box is the min/max of all four corners, which covers axis flips,
//! rotation and mirroring. Nothing is rounded.

use textmark_core::{ExtractOptions, Orientation, PlacedGlyph, Point, Rectangle};

use crate::handler::GlyphEvent;

/// Place a glyph in the displayed page frame.
///
/// Returns `None` for glyphs that contribute no text: unmapped glyphs when
/// no replacement text is configured, and glyphs whose text normalizes to
/// nothing.
pub fn resolve_glyph(event: &GlyphEvent, options: &ExtractOptions) -> Option<PlacedGlyph> {
    let original = event.text.as_deref()?;
    let text = if event.unmapped {
        original.to_string()
    } else {
        options.glyph_text(original)
    };
    if text.is_empty() {
        return None;
    }

    let m = &event.render_matrix;
    let corners = event.glyph_box.corners().map(|p| m.transform_point(p));
    let bbox = Rectangle::enclosing(&corners)?;

    let advance = event.glyph_box.width / 1000.0;
    let origin = m.transform_point(Point::new(0.0, 0.0));
    let end = m.transform_point(Point::new(advance, 0.0));
    let x_axis = m.transform_vector(Point::new(1.0, 0.0));
    let y_axis = m.transform_vector(Point::new(0.0, 1.0));

    Some(PlacedGlyph {
        text,
        original: original.to_string(),
        bbox,
        origin,
        end,
        size: y_axis.x.hypot(y_axis.y),
        orientation: Orientation::from_direction(x_axis.x, x_axis.y),
        font_name: event.font_name.clone(),
        font_size: event.font_size,
        fill_color: event.fill_color.clone(),
        stroke_color: event.stroke_color.clone(),
        invisible: event.invisible,
        new_line: event.new_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::GlyphBox;
    use crate::text_state::TextRenderMode;
    use crate::transform::TransformSnapshot;
    use textmark_core::{Color, Ctm};

    /// Event whose snapshot composes to `render_matrix`.
    fn event(text: &str, render_matrix: Ctm) -> GlyphEvent {
        let transform = TransformSnapshot {
            base: Ctm::identity(),
            ctm: render_matrix,
            text_matrix: Ctm::identity(),
            font_size: 1.0,
            h_scaling: 100.0,
            rise: 0.0,
        };
        GlyphEvent {
            code: 65,
            text: Some(text.to_string()),
            unmapped: false,
            font_name: "Helvetica".to_string(),
            font_size: 10.0,
            glyph_box: GlyphBox {
                width: 500.0,
                ascent: 750.0,
                descent: -250.0,
            },
            transform,
            render_matrix,
            advance: transform.page_advance(0.5),
            fill_color: Color::black(),
            stroke_color: Color::black(),
            render_mode: TextRenderMode::Fill,
            invisible: false,
            new_line: false,
            operator_index: 3,
        }
    }

    fn resolve(e: &GlyphEvent) -> PlacedGlyph {
        resolve_glyph(e, &ExtractOptions::default()).unwrap()
    }

    fn assert_rect(actual: Rectangle, expected: (f64, f64, f64, f64)) {
        let e = Rectangle::new(expected.0, expected.1, expected.2, expected.3);
        assert!(actual.approx_eq(&e, 1e-9), "expected {e:?}, got {actual:?}");
    }

    #[test]
    fn upright_glyph() {
        let g = resolve(&event("A", Ctm::new(10.0, 0.0, 0.0, 10.0, 100.0, 200.0)));
        assert_rect(g.bbox, (100.0, 197.5, 105.0, 207.5));
        assert_eq!((g.origin.x, g.origin.y), (100.0, 200.0));
        assert_eq!((g.end.x, g.end.y), (105.0, 200.0));
        assert_eq!(g.size, 10.0);
        assert_eq!(g.orientation, Orientation::Deg0);
        assert_eq!(g.text, "A");
    }

    #[test]
    fn rotated_90() {
        let g = resolve(&event("A", Ctm::new(0.0, 10.0, -10.0, 0.0, 100.0, 200.0)));
        // x runs up the page, ascent points to -x
        assert_rect(g.bbox, (92.5, 200.0, 102.5, 205.0));
        assert_eq!(g.orientation, Orientation::Deg90);
        assert!((g.size - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rotated_180() {
        let g = resolve(&event("A", Ctm::new(-10.0, 0.0, 0.0, -10.0, 100.0, 200.0)));
        assert_rect(g.bbox, (95.0, 192.5, 100.0, 202.5));
        assert_eq!(g.orientation, Orientation::Deg180);
    }

    #[test]
    fn mirrored_glyph_still_has_positive_box() {
        let g = resolve(&event("A", Ctm::new(-10.0, 0.0, 0.0, 10.0, 100.0, 200.0)));
        assert_rect(g.bbox, (95.0, 197.5, 100.0, 207.5));
        assert!(g.bbox.width() > 0.0);
    }

    #[test]
    fn degenerate_matrix_gives_zero_area() {
        let g = resolve(&event("A", Ctm::new(0.0, 0.0, 0.0, 0.0, 50.0, 60.0)));
        assert!(g.bbox.is_zero_area());
        assert_eq!(g.size, 0.0);
    }

    #[test]
    fn text_is_normalized_and_ligatures_expanded() {
        let g = resolve(&event("\u{FB01}", Ctm::identity()));
        assert_eq!(g.text, "fi");
        assert_eq!(g.original, "\u{FB01}");

        let raw = resolve_glyph(&event("\u{FB01}", Ctm::identity()), &ExtractOptions::raw_text())
            .unwrap();
        assert_eq!(raw.text, "\u{FB01}");
    }

    #[test]
    fn omitted_and_empty_glyphs() {
        let mut e = event("A", Ctm::identity());
        e.text = None;
        e.unmapped = true;
        assert!(resolve_glyph(&e, &ExtractOptions::default()).is_none());

        assert!(resolve_glyph(&event("", Ctm::identity()), &ExtractOptions::default()).is_none());
    }

    #[test]
    fn replacement_text_is_kept_verbatim() {
        let mut e = event("\u{FFFD}", Ctm::identity());
        e.unmapped = true;
        let g = resolve(&e);
        assert_eq!(g.text, "\u{FFFD}");
    }

    #[test]
    fn carries_event_attributes() {
        let mut e = event("A", Ctm::identity());
        e.invisible = true;
        e.new_line = true;
        e.fill_color = Color::Rgb(1.0, 0.0, 0.0);
        let g = resolve(&e);
        assert!(g.invisible);
        assert!(g.new_line);
        assert_eq!(g.fill_color, Color::Rgb(1.0, 0.0, 0.0));
        assert_eq!(g.font_name, "Helvetica");
        assert_eq!(g.font_size, 10.0);
    }
}
