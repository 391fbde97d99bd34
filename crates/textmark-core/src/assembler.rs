//! Logical text assembly.
//!
//! Turns placed glyphs, in the order the content stream drew them, into a
//! [`PageText`]: glyphs are grouped into lines, lines are put in reading
//! order, and separators are inserted where the geometry calls for them.
//!
//! Every glyph is projected into its orientation's upright frame first, so
//! the same heuristics handle portrait, landscape and upside-down text.

use crate::error::LayoutOptions;
use crate::marks::PageText;
use crate::text::{Orientation, PlacedGlyph, TextMark};
use crate::unicode_norm::{compose_cluster, is_combining_text, spacing_accent_text};

/// Minimum share of the narrower glyph that must be covered for a spacing
/// accent to count as drawn over another glyph.
const ACCENT_OVERLAP_RATIO: f64 = 0.3;

/// Consecutive glyphs drawn along one baseline.
#[derive(Debug)]
struct Run<'g> {
    glyphs: Vec<&'g PlacedGlyph>,
    start_x: f64,
}

#[derive(Debug)]
struct Line<'g> {
    orientation: Orientation,
    /// Index of the orientation in first-appearance order.
    group: usize,
    /// Upright baseline of the line's first glyph.
    baseline: f64,
    size: f64,
    /// Started by a next-line operator rather than a baseline jump.
    explicit: bool,
    runs: Vec<Run<'g>>,
}

/// A base glyph with the diacritics drawn onto it.
#[derive(Debug)]
struct Cluster<'g> {
    members: Vec<(&'g PlacedGlyph, String)>,
}

impl Cluster<'_> {
    fn base(&self) -> &PlacedGlyph {
        self.members[0].0
    }

    fn end_x(&self) -> f64 {
        self.members
            .iter()
            .map(|(g, _)| g.orientation.to_upright(g.end).x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn ends_with_whitespace(&self) -> bool {
        self.members
            .last()
            .and_then(|(_, t)| t.chars().last())
            .is_some_and(char::is_whitespace)
    }
}

/// Build the page text for `glyphs`, given in drawing order.
pub fn assemble(glyphs: &[PlacedGlyph], options: &LayoutOptions) -> PageText {
    let mut lines = build_lines(glyphs, options);
    lines.sort_by(|a, b| {
        a.group
            .cmp(&b.group)
            .then_with(|| b.baseline.total_cmp(&a.baseline))
    });
    let lines = merge_lines(lines, options);

    let mut writer = MarkWriter::default();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            writer.separator("\n", line.orientation);
        }
        let glyphs: Vec<&PlacedGlyph> = line
            .runs
            .iter()
            .flat_map(|r| r.glyphs.iter().copied())
            .collect();
        let clusters = build_clusters(&glyphs, options);
        let mut prev: Option<&Cluster<'_>> = None;
        for cluster in &clusters {
            if let Some(prev) = prev {
                if needs_word_space(prev, cluster, options) {
                    writer.separator(" ", line.orientation);
                }
            }
            writer.cluster(cluster);
            prev = Some(cluster);
        }
    }
    writer.finish()
}

fn build_lines<'g>(glyphs: &'g [PlacedGlyph], options: &LayoutOptions) -> Vec<Line<'g>> {
    let mut groups: Vec<Orientation> = Vec::new();
    let mut lines: Vec<Line<'g>> = Vec::new();
    let mut last_baseline = 0.0;

    for glyph in glyphs.iter().filter(|g| !g.text.is_empty()) {
        let origin = glyph.orientation.to_upright(glyph.origin);
        let group = match groups.iter().position(|o| *o == glyph.orientation) {
            Some(i) => i,
            None => {
                groups.push(glyph.orientation);
                groups.len() - 1
            }
        };

        let continues = lines.last().is_some_and(|line| {
            let tolerance = options.line_break_factor * line.size.max(glyph.size);
            line.group == group
                && !glyph.new_line
                && (origin.y - last_baseline).abs() <= tolerance
        });
        match lines.last_mut() {
            Some(line) if continues => {
                line.size = line.size.max(glyph.size);
                if let Some(run) = line.runs.last_mut() {
                    run.glyphs.push(glyph);
                }
            }
            _ => lines.push(Line {
                orientation: glyph.orientation,
                group,
                baseline: origin.y,
                size: glyph.size,
                explicit: glyph.new_line,
                runs: vec![Run {
                    glyphs: vec![glyph],
                    start_x: origin.x,
                }],
            }),
        }
        last_baseline = origin.y;
    }
    lines
}

/// Join neighbouring lines that share a baseline, ordering their runs
/// left to right. Lines started by a next-line operator stay separate.
fn merge_lines<'g>(lines: Vec<Line<'g>>, options: &LayoutOptions) -> Vec<Line<'g>> {
    let mut merged: Vec<Line<'g>> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.last_mut() {
            Some(prev)
                if prev.group == line.group
                    && !line.explicit
                    && (prev.baseline - line.baseline).abs()
                        <= options.line_break_factor * prev.size.max(line.size) =>
            {
                prev.size = prev.size.max(line.size);
                prev.runs.extend(line.runs);
                prev.runs.sort_by(|a, b| a.start_x.total_cmp(&b.start_x));
            }
            _ => merged.push(line),
        }
    }
    merged
}

fn accent_overlaps(accent: &PlacedGlyph, other: &PlacedGlyph) -> bool {
    let a = accent.orientation.upright_rect(&accent.bbox);
    let b = other.orientation.upright_rect(&other.bbox);
    let narrower = a.width().min(b.width());
    narrower > 0.0 && a.horizontal_overlap(&b) > ACCENT_OVERLAP_RATIO * narrower
}

fn is_diacritic(text: &str) -> bool {
    is_combining_text(text) || spacing_accent_text(text).is_some()
}

fn build_clusters<'g>(glyphs: &[&'g PlacedGlyph], options: &LayoutOptions) -> Vec<Cluster<'g>> {
    let mut clusters: Vec<Cluster<'g>> = Vec::new();
    // spacing accent drawn before the base it sits on
    let mut leading: Option<(&'g PlacedGlyph, String)> = None;

    for (i, &glyph) in glyphs.iter().enumerate() {
        let text = glyph.text.clone();
        if options.merge_diacritics {
            if is_combining_text(&text) {
                if let Some(cluster) = clusters.last_mut() {
                    cluster.members.push((glyph, text));
                    continue;
                }
            } else if let Some(combining) = spacing_accent_text(&text) {
                if let Some(cluster) = clusters.last_mut() {
                    if accent_overlaps(glyph, cluster.base()) {
                        cluster.members.push((glyph, combining));
                        continue;
                    }
                }
                let next = glyphs.get(i + 1).copied();
                if let Some(next) = next {
                    if !is_diacritic(&next.text) && accent_overlaps(glyph, next) {
                        leading = Some((glyph, combining));
                        continue;
                    }
                }
            }
        }
        let mut members = vec![(glyph, text)];
        if let Some(accent) = leading.take() {
            members.push(accent);
        }
        clusters.push(Cluster { members });
    }
    clusters
}

fn needs_word_space(prev: &Cluster<'_>, next: &Cluster<'_>, options: &LayoutOptions) -> bool {
    let base = next.base();
    let next_text = &next.members[0].1;
    if prev.ends_with_whitespace() || next_text.starts_with(char::is_whitespace) {
        return false;
    }
    let start_x = base.orientation.to_upright(base.origin).x;
    let gap = start_x - prev.end_x();
    let size = prev.base().size.max(base.size);
    gap > options.word_gap_factor * size
}

/// Accumulates the page text and its marks, tracking the char offset.
#[derive(Default)]
struct MarkWriter {
    text: String,
    marks: Vec<TextMark>,
    offset: usize,
}

impl MarkWriter {
    fn separator(&mut self, sep: &str, orientation: Orientation) {
        self.marks
            .push(TextMark::separator(self.offset, sep, orientation));
        self.push_text(sep);
    }

    fn cluster(&mut self, cluster: &Cluster<'_>) {
        if cluster.members.len() > 1 {
            let parts: Vec<&str> = cluster.members.iter().map(|(_, t)| t.as_str()).collect();
            if let Some(composed) = compose_cluster(&parts) {
                for (glyph, _) in &cluster.members {
                    self.marks
                        .push(TextMark::from_glyph(self.offset, composed.clone(), glyph));
                }
                self.push_text(&composed);
                return;
            }
        }
        for (glyph, text) in &cluster.members {
            self.marks
                .push(TextMark::from_glyph(self.offset, text.clone(), glyph));
            self.push_text(text);
        }
    }

    fn push_text(&mut self, s: &str) {
        self.text.push_str(s);
        self.offset += s.chars().count();
    }

    fn finish(self) -> PageText {
        PageText::new(self.text, self.marks)
    }
}
